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

//! End-to-end tests driven over a real bound TCP listener, speaking RESP
//! the same way `redis-cli` or a client library would. Unit tests for
//! individual data structures live next to their implementation; this
//! module is for behavior that only shows up once the whole stack
//! (protocol, command dispatch, connection handling) is wired together.

mod concurrency;
mod lists_hashes_sets;
mod strings_and_expiry;
mod zsets;

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, Semaphore};

use crate::connection::ConnectionHandler;
use crate::protocol::{encode_command, Frame, RespReader};
use crate::storage::Engine;

/// Bind an ephemeral port and accept connections against a fresh [`Engine`]
/// for the rest of the test. No AOF is attached; persistence is exercised
/// directly against `AofEngine` in `aof.rs`'s own unit tests instead.
async fn start_server() -> (Arc<Engine>, SocketAddr) {
    let engine = Engine::new(4);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let limiter = Arc::new(Semaphore::new(64));
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let engine_for_task = Arc::clone(&engine);

    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(pair) => pair,
                Err(_) => return,
            };
            let permit = Arc::clone(&limiter).try_acquire_owned().unwrap();
            let handler = ConnectionHandler::new(
                stream,
                Arc::clone(&engine_for_task),
                None,
                shutdown_tx.subscribe(),
                permit,
            );
            tokio::spawn(handler.run());
        }
    });

    (engine, addr)
}

/// One client connection: send a command as plain strings, read back one
/// reply frame.
struct TestClient {
    stream: TcpStream,
    reader: RespReader,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        Self { stream: TcpStream::connect(addr).await.unwrap(), reader: RespReader::new() }
    }

    async fn send(&mut self, argv: &[&str]) -> Frame {
        let encoded: Vec<Bytes> = argv.iter().map(|s| Bytes::copy_from_slice(s.as_bytes())).collect();
        self.stream.write_all(&encode_command(&encoded)).await.unwrap();
        self.read_frame().await
    }

    async fn read_frame(&mut self) -> Frame {
        let mut buf = [0u8; 4096];
        loop {
            if let Some(frame) = self.reader.try_parse_frame().unwrap() {
                return frame;
            }
            let n = self.stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "peer closed the connection while a reply was expected");
            self.reader.feed(&buf[..n]);
        }
    }
}

fn bulk(s: &str) -> Frame {
    Frame::Bulk(Bytes::copy_from_slice(s.as_bytes()))
}
