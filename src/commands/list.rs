/*
 * This file is a part of godis
 *
 * Copyright (c) 2026, the godis authors.
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! List commands backed by `storage::list::PagedList`.

use bytes::Bytes;

use super::{parse_i64, CommandCtx, HandlerResult};
use crate::error::{CommandError, DbError};
use crate::protocol::Frame;
use crate::storage::list::PagedList;
use crate::storage::value::Value;

fn with_list<R>(
    ctx: &CommandCtx,
    key: &Bytes,
    f: impl FnOnce(&mut PagedList) -> R,
) -> Result<R, CommandError> {
    ctx.engine
        .keyspace(ctx.db)
        .with_value_mut(key, |current| {
            let mut list = match current {
                Some(v) => v.as_list().cloned().ok_or(DbError::WrongType)?,
                None => PagedList::new(),
            };
            let r = f(&mut list);
            let replacement = if list.is_empty() { None } else { Some(Value::List(list)) };
            Ok((r, replacement))
        })
        .map_err(CommandError::from)
}

pub fn lpush(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let len = with_list(ctx, &argv[1], |list| {
        for v in &argv[2..] {
            list.push_front(v.clone());
        }
        list.len()
    })?;
    Ok(Frame::Integer(len as i64))
}

pub fn rpush(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let len = with_list(ctx, &argv[1], |list| {
        for v in &argv[2..] {
            list.push_back(v.clone());
        }
        list.len()
    })?;
    Ok(Frame::Integer(len as i64))
}

pub fn lpop(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let popped = with_list(ctx, &argv[1], |list| list.pop_front())?;
    Ok(popped.map(Frame::Bulk).unwrap_or(Frame::Null))
}

pub fn rpop(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let popped = with_list(ctx, &argv[1], |list| list.pop_back())?;
    Ok(popped.map(Frame::Bulk).unwrap_or(Frame::Null))
}

pub fn llen(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => v.as_list().map(|l| Frame::Integer(l.len() as i64)).ok_or(CommandError::WrongType),
        None => Ok(Frame::Integer(0)),
    }
}

fn normalize_index(idx: i64, len: usize) -> Option<usize> {
    let idx = if idx < 0 { idx + len as i64 } else { idx };
    if idx < 0 || idx as usize >= len {
        None
    } else {
        Some(idx as usize)
    }
}

pub fn lindex(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let idx = parse_i64(&argv[2])?;
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let list = v.as_list().ok_or(CommandError::WrongType)?;
            match normalize_index(idx, list.len()) {
                Some(i) => Ok(Frame::Bulk(list.get(i).unwrap().clone())),
                None => Ok(Frame::Null),
            }
        }
        None => Ok(Frame::Null),
    }
}

pub fn lset(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let idx = parse_i64(&argv[2])?;
    with_list(ctx, &argv[1], |list| {
        let len = list.len();
        match normalize_index(idx, len) {
            Some(i) => {
                list.set(i, argv[3].clone());
                Ok(())
            }
            None => Err(CommandError::Syntax("ERR index out of range".to_owned())),
        }
    })??;
    Ok(Frame::ok())
}

pub fn linsert(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let before = match argv[2].to_ascii_uppercase().as_slice() {
        b"BEFORE" => true,
        b"AFTER" => false,
        _ => return Err(CommandError::Syntax("ERR syntax error".to_owned())),
    };
    let pivot = argv[3].clone();
    let value = argv[4].clone();
    let new_len = with_list(ctx, &argv[1], |list| {
        let mut found = None;
        for i in 0..list.len() {
            if list.get(i) == Some(&pivot) {
                found = Some(i);
                break;
            }
        }
        match found {
            Some(i) => {
                let at = if before { i } else { i + 1 };
                list.insert(at, value);
                list.len() as i64
            }
            None => -1,
        }
    })?;
    Ok(Frame::Integer(new_len))
}

pub fn lrange(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let start = parse_i64(&argv[2])?;
    let stop = parse_i64(&argv[3])?;
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let list = v.as_list().ok_or(CommandError::WrongType)?;
            let len = list.len() as i64;
            let start = (if start < 0 { (start + len).max(0) } else { start }).min(len);
            let stop = (if stop < 0 { stop + len } else { stop }) + 1;
            let stop = stop.clamp(0, len);
            let values = list.range(start.max(0) as usize, stop.max(0) as usize);
            Ok(Frame::Array(values.into_iter().map(Frame::Bulk).collect()))
        }
        None => Ok(Frame::Array(Vec::new())),
    }
}

pub fn lrem(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let count = parse_i64(&argv[2])?;
    let target = argv[3].clone();
    let removed = with_list(ctx, &argv[1], |list| {
        let reverse = count < 0;
        list.remove_matching(count.unsigned_abs() as usize, reverse, |v| v == &target)
    })?;
    Ok(Frame::Integer(removed as i64))
}
