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

//! `SETBIT`/`GETBIT`/`BITCOUNT`, operating on a string key as a bit vector.

use bytes::Bytes;

use super::{parse_i64, parse_usize, CommandCtx, HandlerResult};
use crate::error::{CommandError, DbError};
use crate::protocol::Frame;
use crate::storage::value::Value;

pub fn setbit(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let offset = parse_usize(&argv[2])?;
    let bit = parse_usize(&argv[3])?;
    if bit > 1 {
        return Err(CommandError::Syntax("ERR bit is not an integer or out of range".to_owned()));
    }
    let ks = ctx.engine.keyspace(ctx.db);
    ks.with_value_mut(&argv[1], |current| {
        let mut bitmap = match current {
            Some(v) => v.as_bitmap().ok_or(DbError::WrongType)?,
            None => crate::storage::bitmap::Bitmap::from_bytes(Vec::new()),
        };
        let prev = bitmap.set_bit(offset, bit as u8);
        Ok((prev, Some(Value::String(Bytes::from(bitmap.into_bytes())))))
    })
    .map(|prev| Frame::Integer(prev as i64))
    .map_err(CommandError::from)
}

pub fn getbit(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let offset = parse_usize(&argv[2])?;
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let bitmap = v.as_bitmap().ok_or(CommandError::WrongType)?;
            Ok(Frame::Integer(bitmap.get_bit(offset) as i64))
        }
        None => Ok(Frame::Integer(0)),
    }
}

pub fn bitcount(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    if argv.len() != 2 && argv.len() != 4 {
        return Err(CommandError::arity("bitcount"));
    }
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let bitmap = v.as_bitmap().ok_or(CommandError::WrongType)?;
            if argv.len() == 2 {
                return Ok(Frame::Integer(bitmap.count_set_bits() as i64));
            }
            let start = parse_i64(&argv[2])?;
            let end = parse_i64(&argv[3])?;
            let len = bitmap.len_bytes() as i64;
            let start = (if start < 0 { (start + len).max(0) } else { start }).min(len);
            let end = (if end < 0 { end + len } else { end }).min(len - 1);
            if start > end || len == 0 {
                return Ok(Frame::Integer(0));
            }
            Ok(Frame::Integer(bitmap.count_set_bits_range(start as usize, end as usize) as i64))
        }
        None => Ok(Frame::Integer(0)),
    }
}
