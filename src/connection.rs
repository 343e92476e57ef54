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

//! Per-connection RESP request/response loop.
//!
//! Grounded in `examples/skytable-skytable/server/src/dbnet/mod.rs`'s
//! `ConnectionHandler`: a `tokio::select!` between reading off the socket
//! and a shutdown broadcast receiver, with a `Drop` impl that releases a
//! connection-limiting semaphore permit so the limit self-heals even if the
//! task panics.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, OwnedSemaphorePermit};

use crate::aof::AofEngine;
use crate::commands::{self, tx, CommandCtx};
use crate::error::CommandError;
use crate::protocol::{Frame, ProtocolError, RespReader, RespWriter};
use crate::storage::Engine;

const READ_CHUNK: usize = 4096;

/// Per-connection transaction/selection state that a [`CommandCtx`]
/// (engine + current db only) cannot hold, since it's rebuilt per command.
struct ConnState {
    db: usize,
    in_transaction: bool,
    queued: Vec<Vec<Bytes>>,
    /// Set once a command fails to queue (bad arity or unknown command)
    /// during the open transaction. `EXEC` checks this and aborts the
    /// whole transaction rather than running whatever did queue, matching
    /// real Redis's `EXECABORT` behavior.
    queue_error: bool,
}

impl ConnState {
    fn new() -> Self {
        Self { db: 0, in_transaction: false, queued: Vec::new(), queue_error: false }
    }
}

pub struct ConnectionHandler {
    stream: TcpStream,
    engine: Arc<Engine>,
    aof: Option<Arc<AofEngine>>,
    shutdown: broadcast::Receiver<()>,
    _permit: OwnedSemaphorePermit,
}

impl ConnectionHandler {
    pub fn new(
        stream: TcpStream,
        engine: Arc<Engine>,
        aof: Option<Arc<AofEngine>>,
        shutdown: broadcast::Receiver<()>,
        permit: OwnedSemaphorePermit,
    ) -> Self {
        Self { stream, engine, aof, shutdown, _permit: permit }
    }

    pub async fn run(mut self) {
        self.engine.stats.client_connected();
        let mut reader = RespReader::new();
        let mut state = ConnState::new();
        let mut read_buf = vec![0u8; READ_CHUNK];

        loop {
            tokio::select! {
                result = self.stream.read(&mut read_buf) => {
                    match result {
                        Ok(0) => break,
                        Ok(n) => {
                            reader.feed(&read_buf[..n]);
                            if !self.drain_commands(&mut reader, &mut state).await {
                                break;
                            }
                        }
                        Err(e) => {
                            log::warn!("connection read error: {e}");
                            break;
                        }
                    }
                }
                _ = self.shutdown.recv() => {
                    log::trace!("connection closing for server shutdown");
                    break;
                }
            }
        }
        self.engine.stats.client_disconnected();
    }

    /// Parse and handle every complete command currently buffered. Returns
    /// `false` if the connection should close (protocol error or write
    /// failure).
    async fn drain_commands(&mut self, reader: &mut RespReader, state: &mut ConnState) -> bool {
        loop {
            match reader.try_parse_command() {
                Ok(Some(argv)) => {
                    if argv.is_empty() {
                        continue;
                    }
                    let reply = self.handle_command(state, argv);
                    if !self.send(&reply).await {
                        return false;
                    }
                }
                Ok(None) => return true,
                Err(e) => {
                    let _ = self.send(&protocol_error_frame(e)).await;
                    return false;
                }
            }
        }
    }

    async fn send(&mut self, frame: &Frame) -> bool {
        let mut writer = RespWriter::new();
        writer.write(frame);
        self.stream.write_all(&writer.take()).await.is_ok()
    }

    fn handle_command(&self, state: &mut ConnState, argv: Vec<Bytes>) -> Frame {
        let name = &argv[0];

        if name.eq_ignore_ascii_case(b"SELECT") {
            return self.handle_select(state, &argv);
        }
        if name.eq_ignore_ascii_case(tx::MULTI) {
            state.in_transaction = true;
            state.queued.clear();
            state.queue_error = false;
            return Frame::ok();
        }
        if name.eq_ignore_ascii_case(tx::DISCARD) {
            if !state.in_transaction {
                return Frame::error("ERR DISCARD without MULTI");
            }
            state.in_transaction = false;
            state.queued.clear();
            state.queue_error = false;
            return Frame::ok();
        }
        if name.eq_ignore_ascii_case(tx::EXEC) {
            return self.handle_exec(state);
        }

        if state.in_transaction {
            match commands::lookup(name) {
                Some(spec) if spec.check_arity(argv.len()) => {
                    state.queued.push(argv);
                    Frame::Simple("QUEUED".to_owned())
                }
                Some(_) => {
                    state.queue_error = true;
                    Frame::error(CommandError::arity(&String::from_utf8_lossy(name)).message())
                }
                None => {
                    state.queue_error = true;
                    Frame::error(format!(
                        "ERR unknown command '{}'",
                        String::from_utf8_lossy(name)
                    ))
                }
            }
        } else {
            self.dispatch(state.db, argv)
        }
    }

    fn handle_select(&self, state: &mut ConnState, argv: &[Bytes]) -> Frame {
        if argv.len() != 2 {
            return Frame::error(CommandError::arity("select").message());
        }
        match std::str::from_utf8(&argv[1]).ok().and_then(|s| s.parse::<usize>().ok()) {
            Some(n) if n < self.engine.num_keyspaces() => {
                state.db = n;
                Frame::ok()
            }
            _ => Frame::error("ERR DB index is out of range"),
        }
    }

    fn handle_exec(&self, state: &mut ConnState) -> Frame {
        if !state.in_transaction {
            return Frame::error("ERR EXEC without MULTI");
        }
        state.in_transaction = false;
        let queued = std::mem::take(&mut state.queued);
        if std::mem::take(&mut state.queue_error) {
            return Frame::error("EXECABORT Transaction discarded because of previous errors.");
        }
        let replies = queued.into_iter().map(|argv| self.dispatch(state.db, argv)).collect();
        Frame::Array(replies)
    }

    /// Run one command against the engine, logging it to the AOF on
    /// successful write commands.
    fn dispatch(&self, db: usize, argv: Vec<Bytes>) -> Frame {
        let name = &argv[0];
        let spec = match commands::lookup(name) {
            Some(spec) => spec,
            None => {
                return Frame::error(format!(
                    "ERR unknown command '{}'",
                    String::from_utf8_lossy(name)
                ))
            }
        };
        if !spec.check_arity(argv.len()) {
            return Frame::error(CommandError::arity(spec.name).message());
        }

        self.engine.stats.record_command();
        let ctx = CommandCtx { engine: &self.engine, db };
        match (spec.handler)(&ctx, &argv) {
            Ok(frame) => {
                // PERSIST only logs when it actually removed a TTL; every
                // other write command logs unconditionally on success.
                let should_log = spec.is_write
                    && !(name.eq_ignore_ascii_case(b"PERSIST") && frame == Frame::Integer(0));
                if should_log {
                    if let Some(aof) = &self.aof {
                        if let Err(e) = aof.log(&argv) {
                            log::error!("aof write failed: {e}");
                        }
                    }
                }
                frame
            }
            Err(e) => Frame::error(e.message()),
        }
    }
}

fn protocol_error_frame(e: ProtocolError) -> Frame {
    Frame::error(format!("ERR Protocol error: {e}"))
}
