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

//! Transaction control-word recognition.
//!
//! `MULTI`/`EXEC`/`DISCARD` mutate the per-connection queue rather than the
//! engine, so they have no registry entry or handler function here —
//! `connection::ConnState` intercepts them by name before a command ever
//! reaches [`super::registry::lookup`]. This module exists so that
//! knowledge of which words are transaction control lives in one place.

pub const MULTI: &[u8] = b"MULTI";
pub const EXEC: &[u8] = b"EXEC";
pub const DISCARD: &[u8] = b"DISCARD";

pub fn is_control_word(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(MULTI) || name.eq_ignore_ascii_case(EXEC) || name.eq_ignore_ascii_case(DISCARD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_control_words_case_insensitively() {
        assert!(is_control_word(b"multi"));
        assert!(is_control_word(b"Exec"));
        assert!(is_control_word(b"DISCARD"));
        assert!(!is_control_word(b"GET"));
    }
}
