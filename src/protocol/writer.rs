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

//! Serializes [`Frame`]s to the wire.

use super::Frame;

#[derive(Debug, Default)]
pub struct RespWriter {
    buf: Vec<u8>,
}

impl RespWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append `frame`'s wire encoding to the internal buffer.
    pub fn write(&mut self, frame: &Frame) {
        encode_into(&mut self.buf, frame);
    }

    /// Drain and return everything buffered so far, ready to write to the
    /// socket.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}

fn encode_into(out: &mut Vec<u8>, frame: &Frame) {
    match frame {
        Frame::Simple(s) => {
            out.push(b'+');
            out.extend_from_slice(s.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        Frame::Error(s) => {
            out.push(b'-');
            out.extend_from_slice(s.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        Frame::Integer(n) => {
            out.push(b':');
            out.extend_from_slice(n.to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        Frame::Bulk(b) => {
            out.push(b'$');
            out.extend_from_slice(b.len().to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(b);
            out.extend_from_slice(b"\r\n");
        }
        Frame::Null => {
            out.extend_from_slice(b"$-1\r\n");
        }
        Frame::Array(items) => {
            out.push(b'*');
            out.extend_from_slice(items.len().to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
            for item in items {
                encode_into(out, item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn encodes_simple_and_bulk() {
        let mut w = RespWriter::new();
        w.write(&Frame::ok());
        w.write(&Frame::bulk(Bytes::from_static(b"hi")));
        assert_eq!(w.take(), b"+OK\r\n$2\r\nhi\r\n".to_vec());
    }

    #[test]
    fn encodes_null_and_array() {
        let mut w = RespWriter::new();
        w.write(&Frame::Array(vec![Frame::Null, Frame::Integer(-7)]));
        assert_eq!(w.take(), b"*2\r\n$-1\r\n:-7\r\n".to_vec());
    }

    #[test]
    fn encodes_error() {
        let mut w = RespWriter::new();
        w.write(&Frame::error("ERR bad"));
        assert_eq!(w.take(), b"-ERR bad\r\n".to_vec());
    }
}
