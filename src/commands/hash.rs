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

//! Hash commands backed by a plain `HashMap<Bytes, Bytes>`.

use bytes::Bytes;
use std::collections::HashMap;

use super::{CommandCtx, HandlerResult};
use crate::error::{CommandError, DbError};
use crate::protocol::Frame;
use crate::storage::value::Value;

fn with_hash<R>(
    ctx: &CommandCtx,
    key: &Bytes,
    f: impl FnOnce(&mut HashMap<Bytes, Bytes>) -> R,
) -> Result<R, CommandError> {
    ctx.engine
        .keyspace(ctx.db)
        .with_value_mut(key, |current| {
            let mut hash = match current {
                Some(v) => v.as_hash().cloned().ok_or(DbError::WrongType)?,
                None => HashMap::new(),
            };
            let r = f(&mut hash);
            let replacement = if hash.is_empty() { None } else { Some(Value::Hash(hash)) };
            Ok((r, replacement))
        })
        .map_err(CommandError::from)
}

pub fn hset(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    if argv.len() < 4 || argv.len() % 2 != 0 {
        return Err(CommandError::arity("hset"));
    }
    let added = with_hash(ctx, &argv[1], |hash| {
        let mut added = 0;
        for pair in argv[2..].chunks_exact(2) {
            if hash.insert(pair[0].clone(), pair[1].clone()).is_none() {
                added += 1;
            }
        }
        added
    })?;
    Ok(Frame::Integer(added))
}

pub fn hget(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let hash = v.as_hash().ok_or(CommandError::WrongType)?;
            Ok(hash.get(&argv[2]).cloned().map(Frame::Bulk).unwrap_or(Frame::Null))
        }
        None => Ok(Frame::Null),
    }
}

pub fn hmget(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let hash = v.as_hash().ok_or(CommandError::WrongType)?;
            let out = argv[2..]
                .iter()
                .map(|f| hash.get(f).cloned().map(Frame::Bulk).unwrap_or(Frame::Null))
                .collect();
            Ok(Frame::Array(out))
        }
        None => Ok(Frame::Array(argv[2..].iter().map(|_| Frame::Null).collect())),
    }
}

pub fn hdel(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let removed = with_hash(ctx, &argv[1], |hash| argv[2..].iter().filter(|f| hash.remove(*f).is_some()).count())?;
    Ok(Frame::Integer(removed as i64))
}

pub fn hexists(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let hash = v.as_hash().ok_or(CommandError::WrongType)?;
            Ok(Frame::Integer(hash.contains_key(&argv[2]) as i64))
        }
        None => Ok(Frame::Integer(0)),
    }
}

pub fn hlen(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => v.as_hash().map(|h| Frame::Integer(h.len() as i64)).ok_or(CommandError::WrongType),
        None => Ok(Frame::Integer(0)),
    }
}

pub fn hkeys(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let hash = v.as_hash().ok_or(CommandError::WrongType)?;
            Ok(Frame::Array(hash.keys().cloned().map(Frame::Bulk).collect()))
        }
        None => Ok(Frame::Array(Vec::new())),
    }
}

pub fn hvals(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let hash = v.as_hash().ok_or(CommandError::WrongType)?;
            Ok(Frame::Array(hash.values().cloned().map(Frame::Bulk).collect()))
        }
        None => Ok(Frame::Array(Vec::new())),
    }
}

pub fn hgetall(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let hash = v.as_hash().ok_or(CommandError::WrongType)?;
            let mut out = Vec::with_capacity(hash.len() * 2);
            for (k, val) in hash {
                out.push(Frame::Bulk(k.clone()));
                out.push(Frame::Bulk(val.clone()));
            }
            Ok(Frame::Array(out))
        }
        None => Ok(Frame::Array(Vec::new())),
    }
}
