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

//! A single numbered keyspace (one of the 16 selected by `SELECT`).
//!
//! Expiry is lazy-plus-sampled, grounded in
//! `examples/original_source/internal/database/multidb.go`: a `GET`-path
//! check does a read-lock probe and, only if the key looks expired,
//! re-checks under a write lock before removing it (the TOCTOU recheck
//! matters because another thread could have refreshed the expiry between
//! the probe and the removal). The background sweep in `Engine` samples
//! shards at random and calls [`Keyspace::sample_expired`] directly.

use bytes::Bytes;
use rand::Rng;
use std::time::{Duration, Instant};

use super::dict::ShardedDict;
use super::value::Value;
use crate::error::DbError;

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

fn is_expired(entry: &Entry, now: Instant) -> bool {
    entry.expires_at.is_some_and(|at| at <= now)
}

pub struct Keyspace {
    dict: ShardedDict<Entry>,
}

/// Result of [`Keyspace::rename_if_absent`] — distinguishes "source
/// missing" from "destination already taken" so callers can return the
/// right wire error for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Moved,
    NoSuchKey,
    DestinationExists,
}

impl Keyspace {
    pub fn new(shard_hint: usize) -> Self {
        Self { dict: ShardedDict::new(shard_hint) }
    }

    pub fn shard_count(&self) -> usize {
        self.dict.shard_count()
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    /// Fetch a live value, performing the lazy-expiry check and, if
    /// necessary, removing the key under a write lock. Returns `None` for
    /// both "absent" and "expired" — callers that need to distinguish use
    /// [`Keyspace::exists`] first.
    pub fn get(&self, key: &[u8]) -> Option<Value> {
        let now = Instant::now();
        let probe = self.dict.with_read(key, |e| e.map(|e| (e.value.clone(), is_expired(e, now))));
        match probe {
            None => None,
            Some((_, true)) => {
                self.expire_if_still_due(key);
                None
            }
            Some((value, false)) => Some(value),
        }
    }

    fn expire_if_still_due(&self, key: &[u8]) {
        self.dict.with_write(key, |map| {
            let now = Instant::now();
            if map.get(key).is_some_and(|e| is_expired(e, now)) {
                map.remove(key);
            }
        });
    }

    pub fn exists(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Overwrite `key`, clearing any existing TTL (matches `SET`'s default
    /// behavior).
    pub fn set(&self, key: Bytes, value: Value) {
        self.dict.insert(key, Entry { value, expires_at: None });
    }

    /// Overwrite `key` while preserving whatever TTL (if any) it already
    /// had — used by in-place mutators like `APPEND`/`SETBIT`/list pushes.
    pub fn set_preserving_ttl(&self, key: Bytes, value: Value) {
        let existing_ttl = self.dict.get(&key).and_then(|e| e.expires_at);
        self.dict.insert(key, Entry { value, expires_at: existing_ttl });
    }

    pub fn remove(&self, key: &[u8]) -> bool {
        self.dict.remove(key).is_some()
    }

    /// Move `src` to `dst` atomically: both shards are held for the whole
    /// operation via [`ShardedDict::lock_many`] so no other command can
    /// observe a moment where neither key is present.
    pub fn rename(&self, src: &[u8], dst: Bytes) -> bool {
        let mut guard = self.dict.lock_many(&[src, dst.as_ref()], &[]);
        match guard.remove(&self.dict, src) {
            Some(entry) => {
                guard.insert(&self.dict, dst, entry);
                true
            }
            None => false,
        }
    }

    /// Duplicate `src`'s value (and TTL) under `dst`, atomically. `src` is
    /// only read-locked, `dst` write-locked.
    pub fn copy(&self, src: &[u8], dst: Bytes) -> bool {
        let mut guard = self.dict.lock_many(&[dst.as_ref()], &[src]);
        match guard.get(&self.dict, src).cloned() {
            Some(entry) => {
                guard.insert(&self.dict, dst, entry);
                true
            }
            None => false,
        }
    }

    /// `rename`, but only if `dst` is absent — the absence check and the
    /// move share the one `lock_many` guard, so no writer can observe or
    /// create `dst` between the check and the move.
    pub fn rename_if_absent(&self, src: &[u8], dst: Bytes) -> RenameOutcome {
        let mut guard = self.dict.lock_many(&[src, dst.as_ref()], &[]);
        if guard.get(&self.dict, src).is_none() {
            return RenameOutcome::NoSuchKey;
        }
        if guard.get(&self.dict, dst.as_ref()).is_some() {
            return RenameOutcome::DestinationExists;
        }
        let entry = guard.remove(&self.dict, src).expect("presence just checked under the same guard");
        guard.insert(&self.dict, dst, entry);
        RenameOutcome::Moved
    }

    /// `copy`, but only if `dst` is absent, checked and acted on under one
    /// guard for the same reason as [`Keyspace::rename_if_absent`].
    pub fn copy_if_absent(&self, src: &[u8], dst: Bytes) -> bool {
        let mut guard = self.dict.lock_many(&[dst.as_ref()], &[src]);
        if guard.get(&self.dict, dst.as_ref()).is_some() {
            return false;
        }
        match guard.get(&self.dict, src).cloned() {
            Some(entry) => {
                guard.insert(&self.dict, dst, entry);
                true
            }
            None => false,
        }
    }

    /// Run `f` against the live value at `key`, if present and not
    /// expired, replacing it with whatever `f` returns. `f` returning
    /// `Err` aborts the mutation.
    pub fn with_value_mut<R>(
        &self,
        key: &[u8],
        f: impl FnOnce(Option<&Value>) -> Result<(R, Option<Value>), DbError>,
    ) -> Result<R, DbError> {
        let current = self.get(key);
        let (result, replacement) = f(current.as_ref())?;
        match replacement {
            Some(v) => self.set_preserving_ttl(Bytes::copy_from_slice(key), v),
            None => {
                self.dict.remove(key);
            }
        }
        Ok(result)
    }

    pub fn set_expiration(&self, key: &[u8], ttl: Duration) -> bool {
        self.dict.with_write(key, |map| match map.get_mut(key) {
            Some(e) if !is_expired(e, Instant::now()) => {
                e.expires_at = Some(Instant::now() + ttl);
                true
            }
            _ => false,
        })
    }

    pub fn rm_expiration(&self, key: &[u8]) -> bool {
        self.dict.with_write(key, |map| match map.get_mut(key) {
            Some(e) if e.expires_at.is_some() => {
                e.expires_at = None;
                true
            }
            _ => false,
        })
    }

    /// `None` if the key doesn't exist; otherwise the remaining TTL
    /// (`None` within means persistent).
    pub fn ttl(&self, key: &[u8]) -> Option<Option<Duration>> {
        let now = Instant::now();
        self.dict.with_read(key, |e| match e {
            None => None,
            Some(e) if is_expired(e, now) => None,
            Some(e) => Some(e.expires_at.map(|at| at.saturating_duration_since(now))),
        })
    }

    pub fn keys_matching(&self, matcher: &crate::glob::Matcher) -> Vec<Bytes> {
        let now = Instant::now();
        let mut out = Vec::new();
        self.dict.for_each(|k, e| {
            if !is_expired(e, now) && matcher.is_match(k) {
                out.push(k.clone());
            }
        });
        out
    }

    pub fn flush(&self) {
        self.dict.clear();
    }

    /// Sample one randomly chosen shard for expired keys, removing what it
    /// finds. Returns `(examined, removed)`. Mirrors the original's
    /// adaptive sampling sweep, one shard per call so the engine's ticker
    /// controls the loop-until-below-threshold behavior.
    pub fn sample_expired(&self, sample_size: usize) -> (usize, usize) {
        let shard_idx = rand::thread_rng().gen_range(0..self.dict.shard_count());
        let now = Instant::now();
        self.dict.with_shard_write(shard_idx, |map| {
            let expired_keys: Vec<Bytes> = map
                .iter()
                .take(sample_size)
                .filter(|(_, e)| is_expired(e, now))
                .map(|(k, _)| k.clone())
                .collect();
            let examined = map.len().min(sample_size);
            let removed = expired_keys.len();
            for k in expired_keys {
                map.remove(&k);
            }
            (examined, removed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_roundtrip() {
        let ks = Keyspace::new(16);
        ks.set(Bytes::from_static(b"k"), Value::String(Bytes::from_static(b"v")));
        assert!(ks.exists(b"k"));
        assert_eq!(ks.get(b"k").unwrap().as_string(), Some(&Bytes::from_static(b"v")));
    }

    #[test]
    fn expired_key_reads_as_absent_and_is_evicted() {
        let ks = Keyspace::new(16);
        ks.set(Bytes::from_static(b"k"), Value::String(Bytes::from_static(b"v")));
        ks.set_expiration(b"k", Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert!(ks.get(b"k").is_none());
        assert_eq!(ks.len(), 0);
    }

    #[test]
    fn rm_expiration_makes_key_persistent() {
        let ks = Keyspace::new(16);
        ks.set(Bytes::from_static(b"k"), Value::String(Bytes::from_static(b"v")));
        ks.set_expiration(b"k", Duration::from_secs(100));
        assert!(ks.rm_expiration(b"k"));
        assert_eq!(ks.ttl(b"k"), Some(None));
    }

    #[test]
    fn rename_moves_value_and_ttl() {
        let ks = Keyspace::new(16);
        ks.set(Bytes::from_static(b"a"), Value::String(Bytes::from_static(b"1")));
        assert!(ks.rename(b"a", Bytes::from_static(b"b")));
        assert!(!ks.exists(b"a"));
        assert!(ks.exists(b"b"));
    }

    #[test]
    fn rename_if_absent_reports_each_outcome() {
        let ks = Keyspace::new(16);
        assert_eq!(ks.rename_if_absent(b"missing", Bytes::from_static(b"x")), RenameOutcome::NoSuchKey);

        ks.set(Bytes::from_static(b"a"), Value::String(Bytes::from_static(b"1")));
        ks.set(Bytes::from_static(b"b"), Value::String(Bytes::from_static(b"2")));
        assert_eq!(ks.rename_if_absent(b"a", Bytes::from_static(b"b")), RenameOutcome::DestinationExists);
        assert!(ks.exists(b"a"));

        assert_eq!(ks.rename_if_absent(b"a", Bytes::from_static(b"c")), RenameOutcome::Moved);
        assert!(!ks.exists(b"a"));
        assert!(ks.exists(b"c"));
    }

    #[test]
    fn copy_if_absent_refuses_to_overwrite() {
        let ks = Keyspace::new(16);
        ks.set(Bytes::from_static(b"a"), Value::String(Bytes::from_static(b"1")));
        ks.set(Bytes::from_static(b"b"), Value::String(Bytes::from_static(b"2")));
        assert!(!ks.copy_if_absent(b"a", Bytes::from_static(b"b")));
        assert_eq!(ks.get(b"b").unwrap().as_string(), Some(&Bytes::from_static(b"2")));

        assert!(ks.copy_if_absent(b"a", Bytes::from_static(b"c")));
        assert_eq!(ks.get(b"c").unwrap().as_string(), Some(&Bytes::from_static(b"1")));
        assert!(ks.exists(b"a"));
    }
}
