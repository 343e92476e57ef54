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

//! Sorted-set commands backed by `storage::zset::SortedSet`.

use bytes::Bytes;

use super::{parse_f64, parse_i64, CommandCtx, HandlerResult};
use crate::error::{CommandError, DbError};
use crate::protocol::Frame;
use crate::storage::value::Value;
use crate::storage::zset::{LexBorder, ScoreBorder, SortedSet};

fn with_zset<R>(
    ctx: &CommandCtx,
    key: &Bytes,
    f: impl FnOnce(&mut SortedSet) -> R,
) -> Result<R, CommandError> {
    ctx.engine
        .keyspace(ctx.db)
        .with_value_mut(key, |current| {
            let mut zset = match current {
                Some(v) => v.as_zset().cloned().ok_or(DbError::WrongType)?,
                None => SortedSet::new(),
            };
            let r = f(&mut zset);
            let replacement = if zset.is_empty() { None } else { Some(Value::ZSet(zset)) };
            Ok((r, replacement))
        })
        .map_err(CommandError::from)
}

pub fn zadd(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    if argv.len() < 4 || argv.len() % 2 != 0 {
        return Err(CommandError::arity("zadd"));
    }
    let mut pairs = Vec::new();
    for pair in argv[2..].chunks_exact(2) {
        pairs.push((parse_f64(&pair[0])?, pair[1].clone()));
    }
    let added = with_zset(ctx, &argv[1], |zset| {
        let mut added = 0;
        for (score, member) in pairs {
            let member_str = String::from_utf8_lossy(&member).into_owned();
            if zset.add(&member_str, score) {
                added += 1;
            }
        }
        added
    })?;
    Ok(Frame::Integer(added))
}

pub fn zscore(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let zset = v.as_zset().ok_or(CommandError::WrongType)?;
            let member = String::from_utf8_lossy(&argv[2]);
            Ok(zset.score(&member).map(|s| Frame::Bulk(Bytes::from(s.to_string()))).unwrap_or(Frame::Null))
        }
        None => Ok(Frame::Null),
    }
}

pub fn zrem(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let removed = with_zset(ctx, &argv[1], |zset| {
        argv[2..]
            .iter()
            .filter(|m| zset.remove(&String::from_utf8_lossy(m)))
            .count()
    })?;
    Ok(Frame::Integer(removed as i64))
}

pub fn zcard(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => v.as_zset().map(|z| Frame::Integer(z.len() as i64)).ok_or(CommandError::WrongType),
        None => Ok(Frame::Integer(0)),
    }
}

pub fn zrank(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let zset = v.as_zset().ok_or(CommandError::WrongType)?;
            let member = String::from_utf8_lossy(&argv[2]);
            Ok(zset.rank(&member).map(|r| Frame::Integer(r as i64)).unwrap_or(Frame::Null))
        }
        None => Ok(Frame::Null),
    }
}

pub fn zrevrank(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let zset = v.as_zset().ok_or(CommandError::WrongType)?;
            let member = String::from_utf8_lossy(&argv[2]);
            Ok(zset
                .rank(&member)
                .map(|r| Frame::Integer(zset.len() as i64 - 1 - r as i64))
                .unwrap_or(Frame::Null))
        }
        None => Ok(Frame::Null),
    }
}

pub fn zrange(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let start = parse_i64(&argv[2])?;
    let stop = parse_i64(&argv[3])?;
    let with_scores = argv.get(4).is_some_and(|a| a.eq_ignore_ascii_case(b"WITHSCORES"));
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let zset = v.as_zset().ok_or(CommandError::WrongType)?;
            let len = zset.len() as i64;
            let start = (if start < 0 { (start + len).max(0) } else { start }).min(len);
            let stop = (if stop < 0 { stop + len } else { stop }).min(len - 1);
            let mut out = Vec::new();
            if start <= stop {
                for rank in start..=stop {
                    if let Some((member, score)) = zset.by_rank(rank as u64) {
                        out.push(Frame::Bulk(Bytes::from(member)));
                        if with_scores {
                            out.push(Frame::Bulk(Bytes::from(score.to_string())));
                        }
                    }
                }
            }
            Ok(Frame::Array(out))
        }
        None => Ok(Frame::Array(Vec::new())),
    }
}

pub fn zrevrange(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let start = parse_i64(&argv[2])?;
    let stop = parse_i64(&argv[3])?;
    let with_scores = argv.get(4).is_some_and(|a| a.eq_ignore_ascii_case(b"WITHSCORES"));
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let zset = v.as_zset().ok_or(CommandError::WrongType)?;
            let len = zset.len() as i64;
            let start = (if start < 0 { (start + len).max(0) } else { start }).min(len);
            let stop = (if stop < 0 { stop + len } else { stop }).min(len - 1);
            let mut out = Vec::new();
            if start <= stop {
                for rank in (start..=stop).rev() {
                    if let Some((member, score)) = zset.by_rank(rank as u64) {
                        out.push(Frame::Bulk(Bytes::from(member)));
                        if with_scores {
                            out.push(Frame::Bulk(Bytes::from(score.to_string())));
                        }
                    }
                }
            }
            Ok(Frame::Array(out))
        }
        None => Ok(Frame::Array(Vec::new())),
    }
}

pub fn zrangebyscore(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let min_text = std::str::from_utf8(&argv[2]).map_err(|_| CommandError::NotFloat)?;
    let max_text = std::str::from_utf8(&argv[3]).map_err(|_| CommandError::NotFloat)?;
    let min = ScoreBorder::parse(min_text).map_err(|e| CommandError::Syntax(e.0))?;
    let max = ScoreBorder::parse(max_text).map_err(|e| CommandError::Syntax(e.0))?;
    let with_scores = argv.get(4).is_some_and(|a| a.eq_ignore_ascii_case(b"WITHSCORES"));
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let zset = v.as_zset().ok_or(CommandError::WrongType)?;
            let results = zset.range_by_score(&min, &max, 0);
            let mut out = Vec::new();
            for (member, score) in results {
                out.push(Frame::Bulk(Bytes::from(member)));
                if with_scores {
                    out.push(Frame::Bulk(Bytes::from(score.to_string())));
                }
            }
            Ok(Frame::Array(out))
        }
        None => Ok(Frame::Array(Vec::new())),
    }
}

pub fn zrangebylex(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let min_text = std::str::from_utf8(&argv[2]).map_err(|_| CommandError::Syntax("ERR min or max not valid string range item".to_owned()))?;
    let max_text = std::str::from_utf8(&argv[3]).map_err(|_| CommandError::Syntax("ERR min or max not valid string range item".to_owned()))?;
    let min = LexBorder::parse(min_text).map_err(|e| CommandError::Syntax(e.0))?;
    let max = LexBorder::parse(max_text).map_err(|e| CommandError::Syntax(e.0))?;
    match ctx.engine.get(ctx.db, &argv[1]) {
        Some(v) => {
            let zset = v.as_zset().ok_or(CommandError::WrongType)?;
            let results = zset.range_by_lex(&min, &max, 0);
            Ok(Frame::Array(results.into_iter().map(|(m, _)| Frame::Bulk(Bytes::from(m))).collect()))
        }
        None => Ok(Frame::Array(Vec::new())),
    }
}

pub fn zremrangebyrank(ctx: &CommandCtx, argv: &[Bytes]) -> HandlerResult {
    let start = parse_i64(&argv[2])?;
    let stop = parse_i64(&argv[3])?;
    let removed = with_zset(ctx, &argv[1], |zset| {
        let len = zset.len() as i64;
        let start = (if start < 0 { (start + len).max(0) } else { start }).min(len);
        let stop = (if stop < 0 { stop + len } else { stop }).min(len - 1);
        if start > stop {
            0
        } else {
            zset.remove_range_by_rank(start as u64, stop as u64 + 1).len()
        }
    })?;
    Ok(Frame::Integer(removed as i64))
}
