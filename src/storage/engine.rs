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

//! The multi-keyspace engine: 16 numbered [`Keyspace`]s, process-wide
//! stats, and the background TTL sweeper.
//!
//! The `Arc<Shared> + Notify`-based background-task lifecycle is grounded
//! in the teacher's `coredb::CoreDB`
//! (`examples/skytable-skytable/server/src/coredb/mod.rs`): a shared handle
//! owns a `Notify` that the background task selects against, so shutdown is
//! a single `notify_waiters()` call rather than a channel the task has to
//! poll. The sweep algorithm itself — sample a bounded batch, keep
//! resampling while the expired fraction stays above a threshold, give up
//! after a fixed number of rounds — is grounded in
//! `examples/original_source/internal/database/multidb.go`'s
//! `cleanupExpiredKeys`.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::keyspace::Keyspace;
use super::value::Value;
use super::NUM_KEYSPACES;

const SAMPLE_SIZE: usize = 20;
const EXPIRED_FRACTION_THRESHOLD: f64 = 0.25;
const MAX_SAMPLE_LOOPS: usize = 10;
const SWEEP_INTERVAL: Duration = Duration::from_millis(100);

/// Process-wide counters rendered by the `INFO` command.
#[derive(Debug)]
pub struct Stats {
    pub connected_clients: AtomicI64,
    pub total_commands_processed: AtomicU64,
    pub keyspace_hits: AtomicU64,
    pub keyspace_misses: AtomicU64,
    start: Instant,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            connected_clients: AtomicI64::new(0),
            total_commands_processed: AtomicU64::new(0),
            keyspace_hits: AtomicU64::new(0),
            keyspace_misses: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn record_command(&self) {
        self.total_commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.keyspace_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.keyspace_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn client_connected(&self) {
        self.connected_clients.fetch_add(1, Ordering::Relaxed);
    }

    pub fn client_disconnected(&self) {
        self.connected_clients.fetch_sub(1, Ordering::Relaxed);
    }
}

pub struct Engine {
    keyspaces: Vec<Keyspace>,
    pub stats: Stats,
    shutdown: Notify,
}

impl Engine {
    pub fn new(shard_hint: usize) -> Arc<Self> {
        let keyspaces = (0..NUM_KEYSPACES).map(|_| Keyspace::new(shard_hint)).collect();
        Arc::new(Self { keyspaces, stats: Stats::new(), shutdown: Notify::new() })
    }

    pub fn keyspace(&self, db: usize) -> &Keyspace {
        &self.keyspaces[db]
    }

    pub fn num_keyspaces(&self) -> usize {
        self.keyspaces.len()
    }

    /// Fetch a value, recording a keyspace hit or miss.
    pub fn get(&self, db: usize, key: &[u8]) -> Option<Value> {
        let result = self.keyspaces[db].get(key);
        match &result {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        result
    }

    pub fn set(&self, db: usize, key: Bytes, value: Value) {
        self.keyspaces[db].set(key, value);
    }

    pub fn flush_db(&self, db: usize) {
        self.keyspaces[db].flush();
    }

    pub fn flush_all(&self) {
        for ks in &self.keyspaces {
            ks.flush();
        }
    }

    pub fn total_keys(&self) -> usize {
        self.keyspaces.iter().map(Keyspace::len).sum()
    }

    /// Spawn the background TTL sweeper. Stopped by calling
    /// [`Engine::shutdown`] on the same `Arc`.
    pub fn spawn_expirer(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.sweep_once(),
                    _ = self.shutdown.notified() => {
                        log::trace!("ttl sweeper shutting down");
                        break;
                    }
                }
            }
        })
    }

    fn sweep_once(&self) {
        for ks in &self.keyspaces {
            let mut expired_total = 0usize;
            for _ in 0..MAX_SAMPLE_LOOPS {
                let (examined, removed) = ks.sample_expired(SAMPLE_SIZE);
                expired_total += removed;
                if examined == 0 || (removed as f64) < (examined as f64) * EXPIRED_FRACTION_THRESHOLD {
                    break;
                }
            }
            if expired_total > 0 {
                log::trace!("expired {expired_total} keys in one keyspace sweep");
            }
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}
