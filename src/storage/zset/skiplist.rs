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

//! Skiplist with per-level span, giving O(log N) rank/`ZRANGE`-by-index
//! queries alongside the usual O(log N) insert/search by (score, member).
//!
//! Grounded in
//! `examples/original_source/internal/datastruct/sortedset/skiplist.go`.
//! The original links nodes with raw pointers (`forward *node`, `backward
//! *node`); this rewrite uses an arena (`Vec<Option<Node>>`) of indices
//! instead, with a free list for reuse on removal, so the structure has no
//! unsafe code and no possibility of a dangling reference.

use rand::Rng;

use super::border::{LexBorder, ScoreBorder};

const MAX_LEVEL: usize = 32;
const LEVEL_UP_PROBABILITY: f64 = 0.25;

type NodeIdx = usize;

#[derive(Debug, Clone, Copy)]
struct LevelEntry {
    forward: Option<NodeIdx>,
    span: u64,
}

#[derive(Debug, Clone)]
struct Node {
    member: String,
    score: f64,
    backward: Option<NodeIdx>,
    levels: Vec<LevelEntry>,
}

#[derive(Debug)]
pub struct Skiplist {
    arena: Vec<Option<Node>>,
    free: Vec<NodeIdx>,
    head: NodeIdx,
    tail: Option<NodeIdx>,
    level: usize,
    length: u64,
}

fn random_level(rng: &mut impl Rng) -> usize {
    let mut level = 1;
    while level < MAX_LEVEL && rng.gen_bool(LEVEL_UP_PROBABILITY) {
        level += 1;
    }
    level
}

impl Default for Skiplist {
    fn default() -> Self {
        Self::new()
    }
}

impl Skiplist {
    pub fn new() -> Self {
        let head_node = Node {
            member: String::new(),
            score: 0.0,
            backward: None,
            levels: vec![LevelEntry { forward: None, span: 0 }; MAX_LEVEL],
        };
        Self { arena: vec![Some(head_node)], free: Vec::new(), head: 0, tail: None, level: 1, length: 0 }
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    fn node(&self, idx: NodeIdx) -> &Node {
        self.arena[idx].as_ref().expect("dangling skiplist node index")
    }

    fn node_mut(&mut self, idx: NodeIdx) -> &mut Node {
        self.arena[idx].as_mut().expect("dangling skiplist node index")
    }

    fn alloc(&mut self, level: usize, score: f64, member: String) -> NodeIdx {
        let node = Node {
            member,
            score,
            backward: None,
            levels: vec![LevelEntry { forward: None, span: 0 }; level],
        };
        if let Some(idx) = self.free.pop() {
            self.arena[idx] = Some(node);
            idx
        } else {
            self.arena.push(Some(node));
            self.arena.len() - 1
        }
    }

    fn free(&mut self, idx: NodeIdx) {
        self.arena[idx] = None;
        self.free.push(idx);
    }

    fn less_than(score: f64, member: &str, other_score: f64, other_member: &str) -> bool {
        other_score < score || (other_score == score && other_member < member)
    }

    /// Insert a fresh (score, member) pair. The caller (`SortedSet`) is
    /// responsible for removing any existing node for `member` first.
    pub fn insert(&mut self, member: String, score: f64) -> NodeIdx {
        let mut update = [0usize; MAX_LEVEL];
        let mut rank = [0u64; MAX_LEVEL];

        let mut cur = self.head;
        for i in (0..self.level).rev() {
            rank[i] = if i == self.level - 1 { 0 } else { rank[i + 1] };
            while let Some(fwd) = self.node(cur).levels[i].forward {
                let fwd_node = self.node(fwd);
                if Self::less_than(score, &member, fwd_node.score, &fwd_node.member) {
                    rank[i] += self.node(cur).levels[i].span;
                    cur = fwd;
                } else {
                    break;
                }
            }
            update[i] = cur;
        }

        let level = random_level(&mut rand::thread_rng());
        if level > self.level {
            for i in self.level..level {
                rank[i] = 0;
                update[i] = self.head;
                self.node_mut(self.head).levels[i].span = self.length;
            }
            self.level = level;
        }

        let new_idx = self.alloc(level, score, member);
        for i in 0..level {
            let update_node_span = self.node(update[i]).levels[i].span;
            let update_forward = self.node(update[i]).levels[i].forward;
            self.node_mut(new_idx).levels[i].forward = update_forward;
            self.node_mut(update[i]).levels[i].forward = Some(new_idx);
            self.node_mut(new_idx).levels[i].span = update_node_span - (rank[0] - rank[i]);
            self.node_mut(update[i]).levels[i].span = (rank[0] - rank[i]) + 1;
        }

        for i in level..self.level {
            self.node_mut(update[i]).levels[i].span += 1;
        }

        self.node_mut(new_idx).backward = if update[0] == self.head { None } else { Some(update[0]) };
        let new_forward = self.node(new_idx).levels[0].forward;
        match new_forward {
            Some(fwd) => self.node_mut(fwd).backward = Some(new_idx),
            None => self.tail = Some(new_idx),
        }
        self.length += 1;
        new_idx
    }

    /// Remove the node with the given (score, member), if present.
    pub fn remove(&mut self, member: &str, score: f64) -> bool {
        let mut update = [0usize; MAX_LEVEL];
        let mut cur = self.head;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.node(cur).levels[i].forward {
                let fwd_node = self.node(fwd);
                if Self::less_than(score, member, fwd_node.score, &fwd_node.member) {
                    cur = fwd;
                } else {
                    break;
                }
            }
            update[i] = cur;
        }
        let target = self.node(cur).levels[0].forward;
        match target {
            Some(idx) if self.node(idx).member == member && self.node(idx).score == score => {
                self.remove_node(idx, &update);
                true
            }
            _ => false,
        }
    }

    fn remove_node(&mut self, idx: NodeIdx, update: &[NodeIdx; MAX_LEVEL]) {
        for i in 0..self.level {
            if self.node(update[i]).levels[i].forward == Some(idx) {
                let node_span = self.node(idx).levels[i].span;
                let node_forward = self.node(idx).levels[i].forward;
                self.node_mut(update[i]).levels[i].span += node_span - 1;
                self.node_mut(update[i]).levels[i].forward = node_forward;
            } else {
                self.node_mut(update[i]).levels[i].span -= 1;
            }
        }
        let forward0 = self.node(idx).levels[0].forward;
        let backward = self.node(idx).backward;
        match forward0 {
            Some(fwd) => self.node_mut(fwd).backward = backward,
            None => self.tail = backward,
        }
        while self.level > 1 && self.node(self.head).levels[self.level - 1].forward.is_none() {
            self.level -= 1;
        }
        self.length -= 1;
        self.free(idx);
    }

    /// 0-based rank of (member, score), or `None` if absent.
    pub fn rank_of(&self, member: &str, score: f64) -> Option<u64> {
        let mut rank = 0u64;
        let mut cur = self.head;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.node(cur).levels[i].forward {
                let fwd_node = self.node(fwd);
                let before_or_eq = fwd_node.score < score
                    || (fwd_node.score == score && fwd_node.member.as_str() <= member);
                if before_or_eq {
                    rank += self.node(cur).levels[i].span;
                    cur = fwd;
                } else {
                    break;
                }
            }
        }
        if cur != self.head && self.node(cur).member == member && self.node(cur).score == score {
            Some(rank - 1)
        } else {
            None
        }
    }

    /// 0-based rank lookup: the member/score at position `rank`.
    pub fn by_rank(&self, rank: u64) -> Option<(String, f64)> {
        let target = rank + 1; // internal traversal counts 1-based
        let mut traversed = 0u64;
        let mut cur = self.head;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.node(cur).levels[i].forward {
                let next_traversed = traversed + self.node(cur).levels[i].span;
                if next_traversed <= target {
                    traversed = next_traversed;
                    cur = fwd;
                } else {
                    break;
                }
            }
            if traversed == target {
                break;
            }
        }
        if traversed == target && cur != self.head {
            let n = self.node(cur);
            Some((n.member.clone(), n.score))
        } else {
            None
        }
    }

    fn first_node(&self) -> Option<NodeIdx> {
        self.node(self.head).levels[0].forward
    }

    fn last_node(&self) -> Option<NodeIdx> {
        self.tail
    }

    pub fn has_in_score_range(&self, min: &ScoreBorder, max: &ScoreBorder) -> bool {
        if min.value > max.value && min.inf == super::border::Inf::None && max.inf == super::border::Inf::None
        {
            return false;
        }
        match (self.last_node(), self.first_node()) {
            (Some(last), Some(first)) => {
                min.greater(self.node(last).score) && max.less(self.node(first).score)
            }
            _ => false,
        }
    }

    pub fn first_in_score_range(&self, min: &ScoreBorder, max: &ScoreBorder) -> Option<(String, f64)> {
        if !self.has_in_score_range(min, max) {
            return None;
        }
        let mut cur = self.head;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.node(cur).levels[i].forward {
                if !min.greater(self.node(fwd).score) {
                    cur = fwd;
                } else {
                    break;
                }
            }
        }
        let result = self.node(cur).levels[0].forward?;
        let n = self.node(result);
        if !max.less(n.score) {
            None
        } else {
            Some((n.member.clone(), n.score))
        }
    }

    pub fn last_in_score_range(&self, min: &ScoreBorder, max: &ScoreBorder) -> Option<(String, f64)> {
        if !self.has_in_score_range(min, max) {
            return None;
        }
        let mut cur = self.head;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.node(cur).levels[i].forward {
                if max.less(self.node(fwd).score) {
                    cur = fwd;
                } else {
                    break;
                }
            }
        }
        if cur == self.head {
            return None;
        }
        let n = self.node(cur);
        if !min.greater(n.score) {
            None
        } else {
            Some((n.member.clone(), n.score))
        }
    }

    /// All (member, score) pairs with `min <= score <= max` (honoring
    /// exclusivity), in ascending order, capped at `limit` (0 = unbounded).
    pub fn range_by_score(&self, min: &ScoreBorder, max: &ScoreBorder, limit: usize) -> Vec<(String, f64)> {
        let mut out = Vec::new();
        let Some((m, s)) = self.first_in_score_range(min, max) else { return out };
        let mut cur = self.find_exact(&m, s);
        while let Some(idx) = cur {
            let n = self.node(idx);
            if !max.less(n.score) {
                break;
            }
            out.push((n.member.clone(), n.score));
            if limit != 0 && out.len() >= limit {
                break;
            }
            cur = n.levels[0].forward;
        }
        out
    }

    /// Every (member, score) pair within `[min, max]` by lexicographic
    /// member ordering, assuming a same-score sorted set.
    pub fn range_by_lex(&self, min: &LexBorder, max: &LexBorder, limit: usize) -> Vec<(String, f64)> {
        let mut out = Vec::new();
        let mut cur = self.first_node();
        while let Some(idx) = cur {
            let n = self.node(idx);
            if min.greater(&n.member) && max.less(&n.member) {
                out.push((n.member.clone(), n.score));
                if limit != 0 && out.len() >= limit {
                    break;
                }
            }
            cur = n.levels[0].forward;
        }
        out
    }

    fn find_exact(&self, member: &str, score: f64) -> Option<NodeIdx> {
        let mut cur = self.head;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.node(cur).levels[i].forward {
                let fwd_node = self.node(fwd);
                if Self::less_than(score, member, fwd_node.score, &fwd_node.member) {
                    cur = fwd;
                } else {
                    break;
                }
            }
        }
        let candidate = self.node(cur).levels[0].forward?;
        let n = self.node(candidate);
        if n.member == member && n.score == score {
            Some(candidate)
        } else {
            None
        }
    }

    /// Remove nodes at ranks `[start, stop)` (0-based, stop exclusive).
    /// Returns the removed (member, score) pairs in ascending order.
    pub fn remove_range_by_rank(&mut self, start: u64, stop: u64) -> Vec<(String, f64)> {
        let mut removed = Vec::new();
        if start >= stop {
            return removed;
        }
        let target_pos = start + 1; // 1-based position of the first node to remove
        let mut update = [0usize; MAX_LEVEL];
        let mut cur = self.head;
        let mut traversed = 0u64;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.node(cur).levels[i].forward {
                let next_traversed = traversed + self.node(cur).levels[i].span;
                if next_traversed < target_pos {
                    traversed = next_traversed;
                    cur = fwd;
                } else {
                    break;
                }
            }
            update[i] = cur;
        }
        let mut pos = traversed + 1;
        let mut next = self.node(cur).levels[0].forward;
        while let Some(idx) = next {
            if pos > stop {
                break;
            }
            let n = self.node(idx);
            removed.push((n.member.clone(), n.score));
            let after = n.levels[0].forward;
            self.remove_node(idx, &update);
            next = after;
            pos += 1;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::zset::border::Inf;

    #[test]
    fn insert_and_rank_are_consistent() {
        let mut sl = Skiplist::new();
        for (m, s) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
            sl.insert(m.to_owned(), s);
        }
        assert_eq!(sl.rank_of("a", 1.0), Some(0));
        assert_eq!(sl.rank_of("b", 2.0), Some(1));
        assert_eq!(sl.rank_of("c", 3.0), Some(2));
        assert_eq!(sl.rank_of("missing", 9.0), None);
    }

    #[test]
    fn by_rank_matches_insertion_order() {
        let mut sl = Skiplist::new();
        for (m, s) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
            sl.insert(m.to_owned(), s);
        }
        assert_eq!(sl.by_rank(0), Some(("a".to_owned(), 1.0)));
        assert_eq!(sl.by_rank(2), Some(("c".to_owned(), 3.0)));
        assert_eq!(sl.by_rank(3), None);
    }

    #[test]
    fn remove_shrinks_and_rebalances() {
        let mut sl = Skiplist::new();
        for (m, s) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
            sl.insert(m.to_owned(), s);
        }
        assert!(sl.remove("b", 2.0));
        assert_eq!(sl.len(), 2);
        assert_eq!(sl.rank_of("c", 3.0), Some(1));
        assert!(!sl.remove("b", 2.0));
    }

    #[test]
    fn range_by_score_respects_exclusivity() {
        let mut sl = Skiplist::new();
        for (m, s) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)] {
            sl.insert(m.to_owned(), s);
        }
        let min = ScoreBorder { inf: Inf::None, value: 1.0, exclude: true };
        let max = ScoreBorder { inf: Inf::None, value: 4.0, exclude: false };
        let got = sl.range_by_score(&min, &max, 0);
        assert_eq!(got, vec![("b".to_owned(), 2.0), ("c".to_owned(), 3.0), ("d".to_owned(), 4.0)]);
    }

    #[test]
    fn remove_range_by_rank_is_stop_exclusive() {
        let mut sl = Skiplist::new();
        for (m, s) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)] {
            sl.insert(m.to_owned(), s);
        }
        let removed = sl.remove_range_by_rank(1, 3);
        assert_eq!(removed, vec![("b".to_owned(), 2.0), ("c".to_owned(), 3.0)]);
        assert_eq!(sl.len(), 2);
        assert_eq!(sl.by_rank(0), Some(("a".to_owned(), 1.0)));
        assert_eq!(sl.by_rank(1), Some(("d".to_owned(), 4.0)));
    }
}
