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

//! Entry point: parse the config file path off argv, boot logging, and run
//! the server until `Ctrl+C`.
//!
//! The `env_logger::Builder::new().parse_filters(..).init()` startup
//! sequence is grounded in
//! `examples/skytable-skytable/server/src/main.rs`.

mod aof;
mod commands;
mod config;
mod connection;
mod error;
mod glob;
mod protocol;
mod server;
mod storage;
#[cfg(test)]
mod tests;
mod util;

use config::Config;

fn parse_args() -> Config {
    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(path) => match Config::from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("failed to read config file {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    }
}

fn main() {
    let config = parse_args();

    env_logger::Builder::new().parse_filters(&config.loglevel).init();

    log::info!("godis starting, version {}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to start tokio runtime");

    runtime.block_on(async {
        let server = match server::Server::new(config) {
            Ok(s) => s,
            Err(e) => {
                log::error!("failed to initialize server: {e}");
                std::process::exit(1);
            }
        };
        if let Err(e) = server.run().await {
            log::error!("server exited with error: {e}");
            std::process::exit(1);
        }
    });
}
