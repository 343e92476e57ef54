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

//! Server configuration.
//!
//! Deliberately a plain line-oriented `key value` reader rather than the
//! teacher's multi-source `clap` + config-file + env layering
//! (`examples/skytable-skytable/server/src/config/mod.rs`) — that
//! complexity belongs to a much larger product. This instead matches the
//! scope of the original `internal/config/config.go`, which is a handful of
//! hardcoded fields read from one small file.

use std::fs;
use std::path::Path;

use crate::aof::FsyncPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub loglevel: String,
    pub max_connections: usize,
    pub appendonly: bool,
    pub appendfilename: String,
    pub appendfsync: FsyncPolicy,
    pub shard_hint: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 6399,
            loglevel: "info".to_owned(),
            max_connections: 10_000,
            appendonly: false,
            appendfilename: "appendonly.aof".to_owned(),
            appendfsync: FsyncPolicy::EverySec,
            shard_hint: num_cpus::get() * 4,
        }
    }
}

impl Config {
    /// Parse a config file of `key value` lines; blank lines and lines
    /// starting with `#` are ignored. Unknown keys are logged and skipped
    /// rather than treated as a hard error, since a config file written
    /// for a future version shouldn't crash an older binary.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut cfg = Self::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(char::is_whitespace) else {
                log::warn!("ignoring malformed config line: {line}");
                continue;
            };
            let value = value.trim();
            match key.to_ascii_lowercase().as_str() {
                "host" => cfg.host = value.to_owned(),
                "port" => cfg.port = value.parse().unwrap_or(cfg.port),
                "loglevel" => cfg.loglevel = value.to_owned(),
                "maxconnections" => cfg.max_connections = value.parse().unwrap_or(cfg.max_connections),
                "appendonly" => cfg.appendonly = value.eq_ignore_ascii_case("yes"),
                "appendfilename" => cfg.appendfilename = value.to_owned(),
                "appendfsync" => {
                    cfg.appendfsync = FsyncPolicy::parse(value).unwrap_or(cfg.appendfsync);
                }
                other => log::warn!("unknown config key: {other}"),
            }
        }
        Ok(cfg)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_ignores_unknown() {
        let path = std::env::temp_dir().join(format!("godis-config-test-{}.conf", std::process::id()));
        fs::write(
            &path,
            "port 7000\nloglevel debug\n# a comment\nunknownkey 1\nappendonly yes\nappendfsync always\n",
        )
        .unwrap();
        let cfg = Config::from_file(&path).unwrap();
        assert_eq!(cfg.port, 7000);
        assert_eq!(cfg.loglevel, "debug");
        assert!(cfg.appendonly);
        assert_eq!(cfg.appendfsync, FsyncPolicy::Always);
        fs::remove_file(&path).ok();
    }
}
