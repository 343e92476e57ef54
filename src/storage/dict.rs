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

//! Sharded concurrent dictionary.
//!
//! Grounded in `examples/original_source/internal/datastruct/dict/concurrent.go`:
//! keys are routed to one of a power-of-two number of shards by FNV-1a/32,
//! each shard guarded by its own lock, and multi-key operations acquire
//! shards in ascending index order (release in descending order) to avoid
//! deadlocks between concurrently executing commands that touch overlapping
//! key sets. The original exposes this as paired `RWLocks`/`RWUnLocks`
//! calls; here it is a single `lock_many` call returning an RAII guard whose
//! `Drop` releases shards in descending order, which makes "forgot to
//! unlock" impossible instead of merely disciplined.

use bytes::Bytes;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::HashMap;

use crate::util::{fnv1a_32, next_pow2_at_least};

const MIN_SHARDS: usize = 16;

pub struct ShardedDict<V> {
    shards: Vec<RwLock<HashMap<Bytes, V>>>,
}

impl<V> ShardedDict<V> {
    /// Build a dict with `next_pow2_at_least(hint, 16)` shards.
    pub fn new(shard_hint: usize) -> Self {
        let count = next_pow2_at_least(shard_hint, MIN_SHARDS);
        let mut shards = Vec::with_capacity(count);
        shards.resize_with(count, || RwLock::new(HashMap::new()));
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_index(&self, key: &[u8]) -> usize {
        (fnv1a_32(key) as usize) & (self.shards.len() - 1)
    }

    pub fn get(&self, key: &[u8]) -> Option<V>
    where
        V: Clone,
    {
        self.shards[self.shard_index(key)].read().get(key).cloned()
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.shards[self.shard_index(key)].read().contains_key(key)
    }

    pub fn insert(&self, key: Bytes, val: V) -> Option<V> {
        let idx = self.shard_index(&key);
        self.shards[idx].write().insert(key, val)
    }

    pub fn remove(&self, key: &[u8]) -> Option<V> {
        self.shards[self.shard_index(key)].write().remove(key)
    }

    pub fn with_read<R>(&self, key: &[u8], f: impl FnOnce(Option<&V>) -> R) -> R {
        let guard = self.shards[self.shard_index(key)].read();
        f(guard.get(key))
    }

    pub fn with_write<R>(&self, key: &[u8], f: impl FnOnce(&mut HashMap<Bytes, V>) -> R) -> R {
        let mut guard = self.shards[self.shard_index(key)].write();
        f(&mut guard)
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.write().clear();
        }
    }

    pub fn for_each(&self, mut f: impl FnMut(&Bytes, &V)) {
        for shard in &self.shards {
            let guard = shard.read();
            for (k, v) in guard.iter() {
                f(k, v);
            }
        }
    }

    pub fn keys(&self) -> Vec<Bytes> {
        let mut out = Vec::new();
        self.for_each(|k, _| out.push(k.clone()));
        out
    }

    /// Direct access to one shard by index, for the background sampling
    /// expirer, which picks shards at random rather than going through a
    /// specific key.
    pub fn with_shard_write<R>(
        &self,
        shard_idx: usize,
        f: impl FnOnce(&mut HashMap<Bytes, V>) -> R,
    ) -> R {
        f(&mut self.shards[shard_idx].write())
    }

    /// Acquire a set of shards for a multi-key operation: shards touched by
    /// `write_keys` exclusively, shards touched (only) by `read_keys`
    /// shared. Shards are acquired in ascending index order; if a shard is
    /// needed for both a write and a read key it is acquired for write.
    /// Releasing (via `Drop`) happens in descending order.
    pub fn lock_many<'a>(&'a self, write_keys: &[&[u8]], read_keys: &[&[u8]]) -> ShardLockGuard<'a, V> {
        let mut write_idx: Vec<usize> = write_keys.iter().map(|k| self.shard_index(k)).collect();
        write_idx.sort_unstable();
        write_idx.dedup();

        let mut read_idx: Vec<usize> = read_keys
            .iter()
            .map(|k| self.shard_index(k))
            .filter(|i| !write_idx.contains(i))
            .collect();
        read_idx.sort_unstable();
        read_idx.dedup();

        let mut all: Vec<(usize, bool)> = write_idx
            .iter()
            .map(|&i| (i, true))
            .chain(read_idx.iter().map(|&i| (i, false)))
            .collect();
        all.sort_unstable_by_key(|&(i, _)| i);
        // acquire ascending, then store descending so Drop releases in
        // descending order (Vec drops front-to-back).
        let mut slots: Vec<LockSlot<'a, V>> = all
            .iter()
            .map(|&(idx, is_write)| {
                if is_write {
                    LockSlot::Write(idx, self.shards[idx].write())
                } else {
                    LockSlot::Read(idx, self.shards[idx].read())
                }
            })
            .collect();
        slots.reverse();
        ShardLockGuard { slots }
    }

    fn slot_index_for(&self, key: &[u8]) -> usize {
        self.shard_index(key)
    }
}

enum LockSlot<'a, V> {
    Write(usize, RwLockWriteGuard<'a, HashMap<Bytes, V>>),
    Read(usize, RwLockReadGuard<'a, HashMap<Bytes, V>>),
}

impl<V> LockSlot<'_, V> {
    fn index(&self) -> usize {
        match self {
            Self::Write(i, _) => *i,
            Self::Read(i, _) => *i,
        }
    }
}

/// RAII handle over a set of locked shards, acquired in ascending order and
/// released (on `Drop`) in descending order.
pub struct ShardLockGuard<'a, V> {
    slots: Vec<LockSlot<'a, V>>,
}

impl<'a, V> ShardLockGuard<'a, V> {
    fn find(&self, dict: &ShardedDict<V>, key: &[u8]) -> usize {
        let want = dict.slot_index_for(key);
        self.slots
            .iter()
            .position(|s| s.index() == want)
            .expect("lock_many: key's shard was not locked by this guard")
    }

    pub fn get<'b>(&'b self, dict: &ShardedDict<V>, key: &[u8]) -> Option<&'b V> {
        let pos = self.find(dict, key);
        match &self.slots[pos] {
            LockSlot::Write(_, g) => g.get(key),
            LockSlot::Read(_, g) => g.get(key),
        }
    }

    pub fn get_mut<'b>(&'b mut self, dict: &ShardedDict<V>, key: &[u8]) -> Option<&'b mut V> {
        let pos = self.find(dict, key);
        match &mut self.slots[pos] {
            LockSlot::Write(_, g) => g.get_mut(key),
            LockSlot::Read(_, _) => panic!("lock_many: key was only locked for read"),
        }
    }

    pub fn insert(&mut self, dict: &ShardedDict<V>, key: Bytes, val: V) -> Option<V> {
        let pos = self.find(dict, &key);
        match &mut self.slots[pos] {
            LockSlot::Write(_, g) => g.insert(key, val),
            LockSlot::Read(_, _) => panic!("lock_many: key was only locked for read"),
        }
    }

    pub fn remove(&mut self, dict: &ShardedDict<V>, key: &[u8]) -> Option<V> {
        let pos = self.find(dict, key);
        match &mut self.slots[pos] {
            LockSlot::Write(_, g) => g.remove(key),
            LockSlot::Read(_, _) => panic!("lock_many: key was only locked for read"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shard_count_is_power_of_two_floor_16() {
        let d: ShardedDict<i32> = ShardedDict::new(1);
        assert_eq!(d.shard_count(), 16);
        let d: ShardedDict<i32> = ShardedDict::new(20);
        assert_eq!(d.shard_count(), 32);
    }

    #[test]
    fn insert_get_remove() {
        let d: ShardedDict<i32> = ShardedDict::new(16);
        d.insert(Bytes::from_static(b"a"), 1);
        assert_eq!(d.get(b"a"), Some(1));
        assert_eq!(d.len(), 1);
        assert_eq!(d.remove(b"a"), Some(1));
        assert_eq!(d.get(b"a"), None);
    }

    #[test]
    fn lock_many_sees_consistent_snapshot() {
        let d: ShardedDict<i32> = ShardedDict::new(16);
        d.insert(Bytes::from_static(b"a"), 1);
        d.insert(Bytes::from_static(b"b"), 2);
        let mut guard = d.lock_many(&[b"a"], &[b"b"]);
        assert_eq!(guard.get(&d, b"b"), Some(&2));
        *guard.get_mut(&d, b"a").unwrap() = 42;
        drop(guard);
        assert_eq!(d.get(b"a"), Some(42));
    }

    #[test]
    fn for_each_visits_every_shard() {
        let d: ShardedDict<i32> = ShardedDict::new(16);
        for i in 0..50 {
            d.insert(Bytes::from(i.to_string()), i);
        }
        let mut seen = 0;
        d.for_each(|_, _| seen += 1);
        assert_eq!(seen, 50);
    }
}
