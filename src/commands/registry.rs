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

//! The command table: name → arity, read/write flag, handler.
//!
//! Arity follows Redis convention: a positive number is the exact argument
//! count including the command name itself; a negative number is a
//! minimum. Grounded in the original's per-command dispatch
//! (`internal/commands/*.go`, each registering name/arity/flags) and the
//! teacher's habit of keeping dispatch data-driven rather than a giant
//! `match` (`examples/skytable-skytable/server/src/actions/mod.rs` routes
//! through an `ActionTable`).

use super::{bitmap, expire, generic, hash, list, set, string, system, zset, Handler};

pub struct CommandSpec {
    pub name: &'static str,
    pub arity: i32,
    pub is_write: bool,
    pub handler: Handler,
}

impl CommandSpec {
    pub fn check_arity(&self, argc: usize) -> bool {
        if self.arity >= 0 {
            argc as i32 == self.arity
        } else {
            argc as i32 >= -self.arity
        }
    }
}

macro_rules! spec {
    ($name:literal, $arity:expr, $write:expr, $handler:path) => {
        CommandSpec { name: $name, arity: $arity, is_write: $write, handler: $handler }
    };
}

static TABLE: &[CommandSpec] = &[
    // generic
    spec!("DEL", -2, true, generic::del),
    spec!("EXISTS", -2, false, generic::exists),
    spec!("TYPE", 2, false, generic::type_cmd),
    spec!("KEYS", 2, false, generic::keys),
    spec!("RENAME", 3, true, generic::rename),
    spec!("RENAMENX", 3, true, generic::renamenx),
    spec!("COPY", 3, true, generic::copy),
    spec!("FLUSHDB", 1, true, generic::flushdb),
    spec!("FLUSHALL", 1, true, generic::flushall),
    spec!("DBSIZE", 1, false, generic::dbsize),
    // string
    spec!("SET", 3, true, string::set),
    spec!("GET", 2, false, string::get),
    spec!("GETSET", 3, true, string::getset),
    spec!("SETNX", 3, true, string::setnx),
    spec!("MSET", -3, true, string::mset),
    spec!("MGET", -2, false, string::mget),
    spec!("STRLEN", 2, false, string::strlen),
    spec!("APPEND", 3, true, string::append),
    spec!("INCR", 2, true, string::incr),
    spec!("DECR", 2, true, string::decr),
    spec!("INCRBY", 3, true, string::incrby),
    spec!("DECRBY", 3, true, string::decrby),
    // expire
    spec!("EXPIRE", 3, true, expire::expire),
    spec!("PEXPIRE", 3, true, expire::pexpire),
    spec!("EXPIREAT", 3, true, expire::expireat),
    spec!("TTL", 2, false, expire::ttl),
    spec!("PTTL", 2, false, expire::pttl),
    spec!("PERSIST", 2, true, expire::persist),
    // bitmap
    spec!("SETBIT", 4, true, bitmap::setbit),
    spec!("GETBIT", 3, false, bitmap::getbit),
    spec!("BITCOUNT", -2, false, bitmap::bitcount),
    // list
    spec!("LPUSH", -3, true, list::lpush),
    spec!("RPUSH", -3, true, list::rpush),
    spec!("LPOP", 2, true, list::lpop),
    spec!("RPOP", 2, true, list::rpop),
    spec!("LLEN", 2, false, list::llen),
    spec!("LINDEX", 3, false, list::lindex),
    spec!("LSET", 4, true, list::lset),
    spec!("LINSERT", 5, true, list::linsert),
    spec!("LRANGE", 4, false, list::lrange),
    spec!("LREM", 4, true, list::lrem),
    // hash
    spec!("HSET", -4, true, hash::hset),
    spec!("HGET", 3, false, hash::hget),
    spec!("HMGET", -3, false, hash::hmget),
    spec!("HDEL", -3, true, hash::hdel),
    spec!("HEXISTS", 3, false, hash::hexists),
    spec!("HLEN", 2, false, hash::hlen),
    spec!("HKEYS", 2, false, hash::hkeys),
    spec!("HVALS", 2, false, hash::hvals),
    spec!("HGETALL", 2, false, hash::hgetall),
    // set
    spec!("SADD", -3, true, set::sadd),
    spec!("SREM", -3, true, set::srem),
    spec!("SISMEMBER", 3, false, set::sismember),
    spec!("SCARD", 2, false, set::scard),
    spec!("SMEMBERS", 2, false, set::smembers),
    spec!("SPOP", 2, true, set::spop),
    spec!("SRANDMEMBER", -2, false, set::srandmember),
    // zset
    spec!("ZADD", -4, true, zset::zadd),
    spec!("ZSCORE", 3, false, zset::zscore),
    spec!("ZREM", -3, true, zset::zrem),
    spec!("ZCARD", 2, false, zset::zcard),
    spec!("ZRANK", 3, false, zset::zrank),
    spec!("ZREVRANK", 3, false, zset::zrevrank),
    spec!("ZRANGE", -4, false, zset::zrange),
    spec!("ZREVRANGE", -4, false, zset::zrevrange),
    spec!("ZRANGEBYSCORE", -4, false, zset::zrangebyscore),
    spec!("ZRANGEBYLEX", -4, false, zset::zrangebylex),
    spec!("ZREMRANGEBYRANK", 4, true, zset::zremrangebyrank),
    // system
    spec!("PING", -1, false, system::ping),
    spec!("ECHO", 2, false, system::echo),
    spec!("INFO", -1, false, system::info),
];

/// Look up a command by name (case-insensitive). `SELECT`/`MULTI`/`EXEC`/
/// `DISCARD` are deliberately absent — see `commands::tx` and
/// `commands::system`.
pub fn lookup(name: &[u8]) -> Option<&'static CommandSpec> {
    TABLE.iter().find(|spec| name.eq_ignore_ascii_case(spec.name.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(lookup(b"get").is_some());
        assert!(lookup(b"GeT").is_some());
        assert!(lookup(b"nonexistent").is_none());
    }

    #[test]
    fn arity_checks() {
        let get = lookup(b"GET").unwrap();
        assert!(get.check_arity(2));
        assert!(!get.check_arity(3));
        let del = lookup(b"DEL").unwrap();
        assert!(!del.check_arity(1));
        assert!(del.check_arity(2));
        assert!(del.check_arity(5));
    }
}
