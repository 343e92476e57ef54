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

//! Incremental RESP parser over a growable byte buffer.
//!
//! The reader is fed raw bytes from the socket and asked to try parsing a
//! frame; if the buffer doesn't yet hold a complete frame it reports
//! `Ok(None)` and the caller reads more bytes and tries again. This avoids
//! needing to know the frame length up front.

use bytes::{Buf, Bytes, BytesMut};
use core::fmt;

use super::Frame;

#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// The leading type byte wasn't one of `+-:$*`.
    UnknownType(u8),
    /// A length/integer field wasn't valid ASCII decimal.
    InvalidInteger,
    /// A bulk string or array declared a negative length other than the
    /// `-1` null sentinel.
    NegativeLength,
    /// A bulk string length exceeded [`MAX_BULK_LEN`] or an array count
    /// exceeded [`MAX_ARRAY_LEN`] — rejected before any allocation sized
    /// off the attacker-controlled field is made.
    LengthOverflow,
    /// The inline command array contained something other than bulk
    /// strings (this server only accepts arrays of bulk strings as
    /// commands).
    ExpectedBulkArray,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(b) => write!(f, "unknown RESP type byte {b:#x}"),
            Self::InvalidInteger => write!(f, "invalid integer field"),
            Self::NegativeLength => write!(f, "invalid bulk length"),
            Self::LengthOverflow => write!(f, "bulk length or array count too large"),
            Self::ExpectedBulkArray => write!(f, "expected array of bulk strings"),
        }
    }
}

/// Largest accepted `$<len>` bulk string length: 512 MiB.
const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Largest accepted `*<count>` array element count: 1,024 × 1,024.
const MAX_ARRAY_LEN: i64 = 1024 * 1024;

impl std::error::Error for ProtocolError {}

/// Parses [`Frame`]s out of a `BytesMut` accumulation buffer.
#[derive(Debug, Default)]
pub struct RespReader {
    buf: BytesMut,
}

impl RespReader {
    pub fn new() -> Self {
        Self { buf: BytesMut::new() }
    }

    /// Append freshly-read socket bytes to the internal buffer.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Try to parse one full command (an array of bulk strings) from the
    /// buffer. Returns `Ok(None)` if more bytes are needed.
    pub fn try_parse_command(&mut self) -> Result<Option<Vec<Bytes>>, ProtocolError> {
        let mut cursor = 0usize;
        match parse_frame(&self.buf, &mut cursor)? {
            None => Ok(None),
            Some(frame) => {
                let argv = match frame {
                    Frame::Array(items) => items
                        .into_iter()
                        .map(|f| match f {
                            Frame::Bulk(b) => Ok(b),
                            _ => Err(ProtocolError::ExpectedBulkArray),
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                    _ => return Err(ProtocolError::ExpectedBulkArray),
                };
                self.buf.advance(cursor);
                Ok(Some(argv))
            }
        }
    }

    /// Try to parse one arbitrary reply frame (not restricted to an array
    /// of bulk strings). Used by clients speaking RESP back to a server,
    /// as opposed to `try_parse_command`, which only ever needs to decode
    /// what a client sent.
    pub fn try_parse_frame(&mut self) -> Result<Option<Frame>, ProtocolError> {
        let mut cursor = 0usize;
        match parse_frame(&self.buf, &mut cursor)? {
            None => Ok(None),
            Some(frame) => {
                self.buf.advance(cursor);
                Ok(Some(frame))
            }
        }
    }
}

fn find_crlf(buf: &[u8], start: usize) -> Option<usize> {
    buf[start..]
        .windows(2)
        .position(|w| w == b"\r\n")
        .map(|i| start + i)
}

fn read_line<'a>(buf: &'a [u8], cursor: &mut usize) -> Option<&'a [u8]> {
    let line_end = find_crlf(buf, *cursor)?;
    let line = &buf[*cursor..line_end];
    *cursor = line_end + 2;
    Some(line)
}

fn parse_integer(line: &[u8]) -> Result<i64, ProtocolError> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(ProtocolError::InvalidInteger)
}

/// Parse one frame starting at `*cursor`, advancing `cursor` past it on
/// success. Returns `Ok(None)` (cursor left untouched) if the buffer is
/// incomplete.
fn parse_frame(buf: &[u8], cursor: &mut usize) -> Result<Option<Frame>, ProtocolError> {
    let start = *cursor;
    if start >= buf.len() {
        return Ok(None);
    }
    let type_byte = buf[start];
    let mut pos = start + 1;
    let line = match read_line(buf, &mut pos) {
        Some(l) => l,
        None => return Ok(None),
    };

    match type_byte {
        b'+' => {
            let s = String::from_utf8_lossy(line).into_owned();
            *cursor = pos;
            Ok(Some(Frame::Simple(s)))
        }
        b'-' => {
            let s = String::from_utf8_lossy(line).into_owned();
            *cursor = pos;
            Ok(Some(Frame::Error(s)))
        }
        b':' => {
            let n = parse_integer(line)?;
            *cursor = pos;
            Ok(Some(Frame::Integer(n)))
        }
        b'$' => {
            let len = parse_integer(line)?;
            if len == -1 {
                *cursor = pos;
                return Ok(Some(Frame::Null));
            }
            if len < 0 {
                return Err(ProtocolError::NegativeLength);
            }
            if len > MAX_BULK_LEN {
                return Err(ProtocolError::LengthOverflow);
            }
            let len = len as usize;
            if buf.len() < pos + len + 2 {
                return Ok(None);
            }
            let data = Bytes::copy_from_slice(&buf[pos..pos + len]);
            pos += len + 2;
            *cursor = pos;
            Ok(Some(Frame::Bulk(data)))
        }
        b'*' => {
            let len = parse_integer(line)?;
            if len == -1 {
                *cursor = pos;
                return Ok(Some(Frame::Null));
            }
            if len < 0 {
                return Err(ProtocolError::NegativeLength);
            }
            if len > MAX_ARRAY_LEN {
                return Err(ProtocolError::LengthOverflow);
            }
            let mut items = Vec::with_capacity(len as usize);
            for _ in 0..len {
                match parse_frame(buf, &mut pos)? {
                    Some(item) => items.push(item),
                    None => return Ok(None),
                }
            }
            *cursor = pos;
            Ok(Some(Frame::Array(items)))
        }
        other => Err(ProtocolError::UnknownType(other)),
    }
}
