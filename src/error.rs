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

//! Internal error taxonomy.
//!
//! The storage layer and the command layer each get their own error type.
//! Storage errors never know about RESP; the command layer is solely
//! responsible for turning one into a reply frame.

use core::fmt;

/// Errors raised by the storage engine (keyspace / value containers).
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DbError {
    /// The key exists but holds a value of a different kind.
    WrongType,
    /// An index or rank argument fell outside the addressable range.
    OutOfRange,
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongType => {
                write!(f, "Operation against a key holding the wrong kind of value")
            }
            Self::OutOfRange => write!(f, "index out of range"),
        }
    }
}

impl std::error::Error for DbError {}

/// Errors raised while validating or executing a command, destined to
/// become a RESP error frame.
#[derive(Debug, Clone)]
pub enum CommandError {
    /// Wrong number of arguments for `cmd`.
    Arity(String),
    /// Key holds a value of the wrong kind.
    WrongType,
    /// An argument failed to parse as a 64-bit integer.
    NotInteger,
    /// An argument failed to parse as a float.
    NotFloat,
    /// A command-specific syntax problem, with the exact message to send.
    Syntax(String),
}

impl CommandError {
    pub fn arity(cmd: &str) -> Self {
        Self::Arity(cmd.to_ascii_lowercase())
    }

    /// Render as the exact `-ERR ...`/`-WRONGTYPE ...` text the wire
    /// protocol expects (without the leading `-` or trailing CRLF, which
    /// the RESP writer adds).
    pub fn message(&self) -> String {
        match self {
            Self::Arity(cmd) => {
                format!("ERR wrong number of arguments for '{cmd}' command")
            }
            Self::WrongType => {
                "WRONGTYPE Operation against a key holding the wrong kind of value".to_owned()
            }
            Self::NotInteger => "ERR value is not an integer or out of range".to_owned(),
            Self::NotFloat => "ERR value is not a valid float".to_owned(),
            Self::Syntax(msg) => msg.clone(),
        }
    }
}

impl From<DbError> for CommandError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::WrongType => Self::WrongType,
            DbError::OutOfRange => Self::Syntax("ERR index out of range".to_owned()),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CommandError {}
