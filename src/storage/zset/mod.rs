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

//! Sorted set: a skiplist ordered by (score, member) plus a member→score
//! map for O(1) score lookup, mirroring
//! `examples/original_source/internal/datastruct/sortedset/sorted_set.go`.

pub mod border;
mod skiplist;

use std::collections::HashMap;

pub use border::{LexBorder, ScoreBorder};
use skiplist::Skiplist;

#[derive(Debug, Clone, Default)]
pub struct SortedSet {
    dict: HashMap<String, f64>,
    skiplist: Skiplist,
}

impl SortedSet {
    pub fn new() -> Self {
        Self { dict: HashMap::new(), skiplist: Skiplist::new() }
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    /// Insert or update `member`'s score. Returns `true` only when `member`
    /// is genuinely new — a score change on an existing member returns
    /// `false`, matching the original's `Add`.
    pub fn add(&mut self, member: &str, score: f64) -> bool {
        match self.dict.get(member).copied() {
            Some(old_score) => {
                if old_score != score {
                    self.skiplist.remove(member, old_score);
                    self.skiplist.insert(member.to_owned(), score);
                    self.dict.insert(member.to_owned(), score);
                }
                false
            }
            None => {
                self.skiplist.insert(member.to_owned(), score);
                self.dict.insert(member.to_owned(), score);
                true
            }
        }
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.dict.get(member).copied()
    }

    pub fn remove(&mut self, member: &str) -> bool {
        match self.dict.remove(member) {
            Some(score) => {
                self.skiplist.remove(member, score);
                true
            }
            None => false,
        }
    }

    pub fn rank(&self, member: &str) -> Option<u64> {
        let score = self.dict.get(member).copied()?;
        self.skiplist.rank_of(member, score)
    }

    pub fn by_rank(&self, rank: u64) -> Option<(String, f64)> {
        self.skiplist.by_rank(rank)
    }

    pub fn range_by_score(&self, min: &ScoreBorder, max: &ScoreBorder, limit: usize) -> Vec<(String, f64)> {
        self.skiplist.range_by_score(min, max, limit)
    }

    pub fn range_by_lex(&self, min: &LexBorder, max: &LexBorder, limit: usize) -> Vec<(String, f64)> {
        self.skiplist.range_by_lex(min, max, limit)
    }

    pub fn remove_range_by_rank(&mut self, start: u64, stop: u64) -> Vec<(String, f64)> {
        let removed = self.skiplist.remove_range_by_rank(start, stop);
        for (member, _) in &removed {
            self.dict.remove(member);
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.dict.iter()
    }
}
