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

//! RESP (REdis Serialization Protocol) framing.
//!
//! A [`Frame`] is the parsed shape of one protocol element. Clients talk to
//! this server exclusively in the "inline array of bulk strings" form (what
//! redis-cli and every client library send for a command), but the reader
//! understands the full type set so replies and nested arrays round-trip.

mod reader;
mod writer;

pub use reader::{ProtocolError, RespReader};
pub use writer::RespWriter;

use bytes::Bytes;

/// One RESP value, owned.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

impl Frame {
    pub fn ok() -> Self {
        Frame::Simple("OK".to_owned())
    }

    pub fn bulk(b: impl Into<Bytes>) -> Self {
        Frame::Bulk(b.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Frame::Error(msg.into())
    }
}

/// Encode a command's argument vector as the canonical RESP array of bulk
/// strings. Used by the AOF writer to persist a command and by undoers to
/// build compensating command lines, so it lives here rather than being
/// duplicated at each call site.
pub fn encode_command(argv: &[Bytes]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("*{}\r\n", argv.len()).as_bytes());
    for arg in argv {
        out.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        out.extend_from_slice(arg);
        out.extend_from_slice(b"\r\n");
    }
    out
}
