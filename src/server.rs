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

//! TCP accept loop and startup/shutdown sequencing.
//!
//! Grounded in `examples/skytable-skytable/server/src/dbnet/mod.rs`: a
//! `Semaphore` bounds concurrent connections, a `broadcast` channel signals
//! every live connection to stop, and `main` (mirroring
//! `examples/skytable-skytable/server/src/main.rs`) waits on
//! `tokio::signal::ctrl_c()` before tearing down.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};

use crate::aof::AofEngine;
use crate::commands::{self, CommandCtx};
use crate::config::Config;
use crate::connection::ConnectionHandler;
use crate::storage::Engine;

pub struct Server {
    engine: Arc<Engine>,
    aof: Option<Arc<AofEngine>>,
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> std::io::Result<Self> {
        let engine = Engine::new(config.shard_hint);

        let aof = if config.appendonly {
            let aof = AofEngine::open(&config.appendfilename, config.appendfsync)?;
            replay_aof(&engine, &aof);
            Some(aof)
        } else {
            None
        };

        Ok(Self { engine, aof, config })
    }

    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        log::info!("listening on {}", self.config.bind_addr());

        let expirer = Arc::clone(&self.engine).spawn_expirer();
        let fsync_ticker = self.aof.clone().and_then(AofEngine::spawn_fsync_ticker);

        let (shutdown_tx, _) = broadcast::channel(1);
        let connection_limit = Arc::new(Semaphore::new(self.config.max_connections));

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, addr) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            log::warn!("accept failed: {e}");
                            continue;
                        }
                    };
                    let permit = match Arc::clone(&connection_limit).try_acquire_owned() {
                        Ok(permit) => permit,
                        Err(_) => {
                            log::warn!("connection limit reached, rejecting {addr}");
                            continue;
                        }
                    };
                    log::trace!("accepted connection from {addr}");
                    let handler = ConnectionHandler::new(
                        stream,
                        Arc::clone(&self.engine),
                        self.aof.clone(),
                        shutdown_tx.subscribe(),
                        permit,
                    );
                    tokio::spawn(handler.run());
                }
                _ = tokio::signal::ctrl_c() => {
                    log::info!("received shutdown signal");
                    break;
                }
            }
        }

        let _ = shutdown_tx.send(());
        self.engine.shutdown();
        if let Some(aof) = &self.aof {
            aof.shutdown();
        }
        expirer.abort();
        if let Some(h) = fsync_ticker {
            h.abort();
        }
        Ok(())
    }
}

fn replay_aof(engine: &Arc<Engine>, aof: &Arc<AofEngine>) {
    let mut replayed = 0u64;
    // SELECT is never persisted, so every replayed command runs in db 0.
    let result = aof.replay(|argv| {
        if argv.is_empty() {
            return;
        }
        if let Some(spec) = commands::lookup(&argv[0]) {
            if spec.check_arity(argv.len()) {
                let ctx = CommandCtx { engine, db: 0 };
                if (spec.handler)(&ctx, &argv).is_ok() {
                    replayed += 1;
                }
            }
        }
    });
    match result {
        Ok(()) => log::info!("replayed {replayed} commands from {}", aof.path().display()),
        Err(e) => log::error!("aof replay failed: {e}"),
    }
}
