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

//! Key-agnostic commands: existence, deletion, renaming, wildcard scans.

use bytes::Bytes;

use super::{CommandCtx, HandlerResult};
use crate::error::CommandError;
use crate::protocol::Frame;
use crate::storage::RenameOutcome;

pub fn del(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let removed = argv[1..].iter().filter(|k| ctx.engine.keyspace(ctx.db).remove(k)).count();
    Ok(Frame::Integer(removed as i64))
}

pub fn exists(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let count = argv[1..].iter().filter(|k| ctx.engine.keyspace(ctx.db).exists(k)).count();
    Ok(Frame::Integer(count as i64))
}

pub fn type_cmd(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => Ok(Frame::Simple(v.kind().name().to_owned())),
        None => Ok(Frame::Simple("none".to_owned())),
    }
}

pub fn keys(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let pattern = std::str::from_utf8(&argv[1])
        .map_err(|_| CommandError::Syntax("ERR invalid pattern".to_owned()))?;
    // the glob engine compiles the full pattern language (?, [...], \x) so it
    // can back a future SCAN, but this cut of KEYS only ever accepted a bare
    // "*" — anything else errors rather than silently scanning on it.
    if pattern != "*" {
        return Err(CommandError::Syntax("ERR only * pattern supported currently".to_owned()));
    }
    let matcher = crate::glob::compile(pattern)
        .map_err(|_| CommandError::Syntax("ERR invalid pattern".to_owned()))?;
    let keys = ctx.engine.keyspace(ctx.db).keys_matching(&matcher);
    Ok(Frame::Array(keys.into_iter().map(Frame::Bulk).collect()))
}

pub fn rename(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    if ctx.engine.keyspace(ctx.db).rename(&argv[1], argv[2].clone()) {
        Ok(Frame::ok())
    } else {
        Err(CommandError::Syntax("ERR no such key".to_owned()))
    }
}

pub fn renamenx(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let ks = ctx.engine.keyspace(ctx.db);
    // The exists-check and the move share one lock_many guard inside
    // rename_if_absent, so no writer can slip a key into dst between them.
    match ks.rename_if_absent(&argv[1], argv[2].clone()) {
        RenameOutcome::Moved => Ok(Frame::Integer(1)),
        RenameOutcome::DestinationExists => Ok(Frame::Integer(0)),
        RenameOutcome::NoSuchKey => Err(CommandError::Syntax("ERR no such key".to_owned())),
    }
}

pub fn copy(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let ks = ctx.engine.keyspace(ctx.db);
    Ok(Frame::Integer(ks.copy_if_absent(&argv[1], argv[2].clone()) as i64))
}

pub fn flushdb(ctx: &CommandCtx, _argv: &[Bytes]) -> HandlerResult {
    ctx.engine.flush_db(ctx.db);
    Ok(Frame::ok())
}

pub fn flushall(ctx: &CommandCtx, _argv: &[Bytes]) -> HandlerResult {
    ctx.engine.flush_all();
    Ok(Frame::ok())
}

pub fn dbsize(ctx: &CommandCtx, _argv: &[Bytes]) -> HandlerResult {
    Ok(Frame::Integer(ctx.engine.keyspace(ctx.db).len() as i64))
}
