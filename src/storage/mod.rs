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

//! Storage layer: the sharded dictionary, the five value containers, a
//! single numbered keyspace, and the multi-keyspace engine that ties them
//! together with TTL sweeping and stats.

pub mod bitmap;
pub mod dict;
pub mod engine;
pub mod keyspace;
pub mod list;
pub mod value;
pub mod zset;

pub use engine::{Engine, Stats};
pub use keyspace::{Keyspace, RenameOutcome};
pub use value::{Value, ValueKind};

/// Number of numbered keyspaces, selected via `SELECT 0`..`SELECT 15`.
pub const NUM_KEYSPACES: usize = 16;
