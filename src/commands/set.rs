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

//! Set commands backed by a plain `HashMap<Bytes, ()>`.

use bytes::Bytes;
use rand::seq::IteratorRandom;
use std::collections::HashMap;

use super::{parse_usize, CommandCtx, HandlerResult};
use crate::error::{CommandError, DbError};
use crate::protocol::Frame;
use crate::storage::value::Value;

fn with_set<R>(
    ctx: &CommandCtx,
    key: &Bytes,
    f: impl FnOnce(&mut HashMap<Bytes, ()>) -> R,
) -> Result<R, CommandError> {
    ctx.engine
        .keyspace(ctx.db)
        .with_value_mut(key, |current| {
            let mut set = match current {
                Some(v) => v.as_set().cloned().ok_or(DbError::WrongType)?,
                None => HashMap::new(),
            };
            let r = f(&mut set);
            let replacement = if set.is_empty() { None } else { Some(Value::Set(set)) };
            Ok((r, replacement))
        })
        .map_err(CommandError::from)
}

pub fn sadd(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let added =
        with_set(ctx, &argv[1], |set| argv[2..].iter().filter(|m| set.insert((*m).clone(), ()).is_none()).count())?;
    Ok(Frame::Integer(added as i64))
}

pub fn srem(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let removed = with_set(ctx, &argv[1], |set| argv[2..].iter().filter(|m| set.remove(*m).is_some()).count())?;
    Ok(Frame::Integer(removed as i64))
}

pub fn sismember(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let set = v.as_set().ok_or(CommandError::WrongType)?;
            Ok(Frame::Integer(set.contains_key(&argv[2]) as i64))
        }
        None => Ok(Frame::Integer(0)),
    }
}

pub fn scard(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => v.as_set().map(|s| Frame::Integer(s.len() as i64)).ok_or(CommandError::WrongType),
        None => Ok(Frame::Integer(0)),
    }
}

pub fn smembers(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let set = v.as_set().ok_or(CommandError::WrongType)?;
            Ok(Frame::Array(set.keys().cloned().map(Frame::Bulk).collect()))
        }
        None => Ok(Frame::Array(Vec::new())),
    }
}

pub fn spop(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let popped = with_set(ctx, &argv[1], |set| {
        let chosen = set.keys().choose(&mut rand::thread_rng()).cloned();
        if let Some(m) = &chosen {
            set.remove(m);
        }
        chosen
    })?;
    Ok(popped.map(Frame::Bulk).unwrap_or(Frame::Null))
}

pub fn srandmember(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let set = v.as_set().ok_or(CommandError::WrongType)?;
            if argv.len() == 2 {
                return Ok(set
                    .keys()
                    .choose(&mut rand::thread_rng())
                    .cloned()
                    .map(Frame::Bulk)
                    .unwrap_or(Frame::Null));
            }
            let count = parse_usize(&argv[2])?;
            let chosen: Vec<Bytes> = set.keys().cloned().choose_multiple(&mut rand::thread_rng(), count);
            Ok(Frame::Array(chosen.into_iter().map(Frame::Bulk).collect()))
        }
        None => {
            if argv.len() == 2 {
                Ok(Frame::Null)
            } else {
                Ok(Frame::Array(Vec::new()))
            }
        }
    }
}
