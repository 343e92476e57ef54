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

//! `RENAME`/`COPY` take more than one shard lock at once
//! (`ShardedDict::lock_many`). The only way that's safe is if every caller
//! acquires shards in a fixed (ascending) order regardless of which key the
//! command names first. These tests hammer `RENAME` with two keys swapped
//! back and forth from many concurrent connections, in both argument orders,
//! and require the whole run to finish well inside a timeout — a
//! lock-ordering bug here would show up as a hang, not a panic.

use std::time::Duration;

use super::start_server;
use crate::protocol::Frame;

#[tokio::test]
async fn concurrent_opposing_renames_do_not_deadlock() {
    let (_engine, addr) = start_server().await;

    // seed both keys so every RENAME has something to move
    {
        let mut seed = super::TestClient::connect(addr).await;
        seed.send(&["SET", "a", "1"]).await;
        seed.send(&["SET", "b", "2"]).await;
    }

    const TASKS: usize = 16;
    const ROUNDS: usize = 50;
    let mut handles = Vec::new();

    for i in 0..TASKS {
        handles.push(tokio::spawn(async move {
            let mut c = super::TestClient::connect(addr).await;
            for _ in 0..ROUNDS {
                // half the tasks rename a->tmp->a, half rename b->tmp->b, so
                // shards for "a" and "b" are contended from both directions
                if i % 2 == 0 {
                    c.send(&["RENAME", "a", "b"]).await;
                    c.send(&["RENAME", "b", "a"]).await;
                } else {
                    c.send(&["COPY", "a", "b"]).await;
                    c.send(&["COPY", "b", "a"]).await;
                }
            }
        }));
    }

    let all = tokio::time::timeout(Duration::from_secs(10), futures_join_all(handles)).await;
    assert!(all.is_ok(), "concurrent RENAME/COPY traffic did not finish in time (possible deadlock)");

    // exactly one of the two keys survives a RENAME-heavy workload, and it
    // still holds a value
    let mut check = super::TestClient::connect(addr).await;
    let a_exists = matches!(check.send(&["EXISTS", "a"]).await, Frame::Integer(1));
    let b_exists = matches!(check.send(&["EXISTS", "b"]).await, Frame::Integer(1));
    assert!(a_exists || b_exists, "both keys vanished, a RENAME must have lost data");
}

async fn futures_join_all(handles: Vec<tokio::task::JoinHandle<()>>) {
    for h in handles {
        h.await.expect("task panicked");
    }
}
