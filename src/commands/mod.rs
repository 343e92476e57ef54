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

//! Command implementations and the dispatch registry.

pub mod registry;

mod bitmap;
mod expire;
mod generic;
mod hash;
mod list;
mod set;
mod string;
mod system;
pub mod tx;
mod zset;

use bytes::Bytes;

use crate::error::CommandError;
use crate::protocol::Frame;
use crate::storage::Engine;

pub use registry::{lookup, CommandSpec};

/// Everything a command handler needs: the engine and which numbered
/// keyspace the issuing connection currently has selected.
pub struct CommandCtx<'a> {
    pub engine: &'a Engine,
    pub db: usize,
}

pub type HandlerResult = Result<Frame, CommandError>;
pub type Handler = fn(&CommandCtx, &[Bytes]) -> HandlerResult;

fn parse_i64(arg: &Bytes) -> Result<i64, CommandError> {
    std::str::from_utf8(arg).ok().and_then(|s| s.parse().ok()).ok_or(CommandError::NotInteger)
}

fn parse_f64(arg: &Bytes) -> Result<f64, CommandError> {
    std::str::from_utf8(arg).ok().and_then(|s| s.parse().ok()).ok_or(CommandError::NotFloat)
}

fn parse_usize(arg: &Bytes) -> Result<usize, CommandError> {
    std::str::from_utf8(arg).ok().and_then(|s| s.parse().ok()).ok_or(CommandError::NotInteger)
}
