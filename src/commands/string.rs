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

//! String commands, including the integer-counter family.

use bytes::{Bytes, BytesMut};

use super::{parse_i64, CommandCtx, HandlerResult};
use crate::error::{CommandError, DbError};
use crate::protocol::Frame;
use crate::storage::Value;

pub fn set(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    ctx.engine.keyspace(ctx.db).set(argv[1].clone(), Value::String(argv[2].clone()));
    Ok(Frame::ok())
}

pub fn get(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => v.as_string().cloned().map(Frame::Bulk).ok_or(CommandError::WrongType),
        None => Ok(Frame::Null),
    }
}

pub fn setnx(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    if ctx.engine.get(ctx.db, &argv[1]).is_some() {
        return Ok(Frame::Integer(0));
    }
    ctx.engine.keyspace(ctx.db).set(argv[1].clone(), Value::String(argv[2].clone()));
    Ok(Frame::Integer(1))
}

pub fn mset(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    if argv.len() < 3 || argv.len() % 2 != 1 {
        return Err(CommandError::arity("mset"));
    }
    let ks = ctx.engine.keyspace(ctx.db);
    for pair in argv[1..].chunks_exact(2) {
        ks.set(pair[0].clone(), Value::String(pair[1].clone()));
    }
    Ok(Frame::ok())
}

pub fn mget(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let out = argv[1..]
        .iter()
        .map(|k| match ctx.engine.get(ctx.db, k) {
            Some(v) => v.as_string().cloned().map(Frame::Bulk).unwrap_or(Frame::Null),
            None => Frame::Null,
        })
        .collect();
    Ok(Frame::Array(out))
}

pub fn getset(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let old = match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => Some(v.as_string().cloned().ok_or(CommandError::WrongType)?),
        None => None,
    };
    ctx.engine.keyspace(ctx.db).set(argv[1].clone(), Value::String(argv[2].clone()));
    Ok(old.map(Frame::Bulk).unwrap_or(Frame::Null))
}

pub fn strlen(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => v.as_string().map(|b| Frame::Integer(b.len() as i64)).ok_or(CommandError::WrongType),
        None => Ok(Frame::Integer(0)),
    }
}

pub fn append(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let ks = ctx.engine.keyspace(ctx.db);
    ks.with_value_mut(&argv[1], |current| {
        let mut buf = BytesMut::new();
        if let Some(v) = current {
            buf.extend_from_slice(v.as_string().ok_or(DbError::WrongType)?);
        }
        buf.extend_from_slice(&argv[2]);
        let len = buf.len();
        Ok((len, Some(Value::String(buf.freeze()))))
    })
    .map(|len| Frame::Integer(len as i64))
    .map_err(CommandError::from)
}

fn counter_op(ctx: &CommandCtx, key: &Bytes, delta: i64) -> HandlerResult {
    let ks = ctx.engine.keyspace(ctx.db);
    ks.with_value_mut(key, |current| {
        let old = match current {
            Some(v) => {
                let s = v.as_string().ok_or(DbError::WrongType)?;
                std::str::from_utf8(s)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .ok_or(DbError::OutOfRange)?
            }
            None => 0,
        };
        let new = old.checked_add(delta).ok_or(DbError::OutOfRange)?;
        Ok((new, Some(Value::String(Bytes::from(new.to_string())))))
    })
    .map(Frame::Integer)
    .map_err(|e| match e {
        DbError::OutOfRange => CommandError::NotInteger,
        DbError::WrongType => CommandError::WrongType,
    })
}

pub fn incr(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    counter_op(ctx, &argv[1], 1)
}

pub fn decr(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    counter_op(ctx, &argv[1], -1)
}

pub fn incrby(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let delta = parse_i64(&argv[2])?;
    counter_op(ctx, &argv[1], delta)
}

pub fn decrby(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let delta = parse_i64(&argv[2])?;
    counter_op(ctx, &argv[1], delta.checked_neg().ok_or(CommandError::NotInteger)?)
}
