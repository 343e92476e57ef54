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

use super::{bulk, start_server, TestClient};
use crate::protocol::Frame;

#[tokio::test]
async fn list_push_pop_range() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    assert_eq!(c.send(&["RPUSH", "l", "a", "b", "c"]).await, Frame::Integer(3));
    assert_eq!(c.send(&["LPUSH", "l", "z"]).await, Frame::Integer(4));
    assert_eq!(c.send(&["LLEN", "l"]).await, Frame::Integer(4));

    match c.send(&["LRANGE", "l", "0", "-1"]).await {
        Frame::Array(items) => {
            assert_eq!(items, vec![bulk("z"), bulk("a"), bulk("b"), bulk("c")]);
        }
        other => panic!("expected array, got {other:?}"),
    }

    assert_eq!(c.send(&["LPOP", "l"]).await, bulk("z"));
    assert_eq!(c.send(&["RPOP", "l"]).await, bulk("c"));
    assert_eq!(c.send(&["LLEN", "l"]).await, Frame::Integer(2));
}

#[tokio::test]
async fn list_set_index_and_insert() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["RPUSH", "l", "a", "b", "c"]).await;
    assert_eq!(c.send(&["LINDEX", "l", "1"]).await, bulk("b"));
    assert_eq!(c.send(&["LINDEX", "l", "-1"]).await, bulk("c"));

    assert_eq!(c.send(&["LSET", "l", "1", "B"]).await, Frame::ok());
    assert_eq!(c.send(&["LINDEX", "l", "1"]).await, bulk("B"));

    assert_eq!(c.send(&["LINSERT", "l", "BEFORE", "B", "x"]).await, Frame::Integer(4));
    match c.send(&["LRANGE", "l", "0", "-1"]).await {
        Frame::Array(items) => assert_eq!(items, vec![bulk("a"), bulk("x"), bulk("B"), bulk("c")]),
        other => panic!("expected array, got {other:?}"),
    }
}

#[tokio::test]
async fn list_rem_counts_direction() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["RPUSH", "l", "a", "x", "a", "x", "a"]).await;
    assert_eq!(c.send(&["LREM", "l", "2", "a"]).await, Frame::Integer(2));
    match c.send(&["LRANGE", "l", "0", "-1"]).await {
        Frame::Array(items) => assert_eq!(items, vec![bulk("x"), bulk("x"), bulk("a")]),
        other => panic!("expected array, got {other:?}"),
    }
}

#[tokio::test]
async fn hash_basic_operations() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    assert_eq!(c.send(&["HSET", "h", "f1", "v1", "f2", "v2"]).await, Frame::Integer(2));
    assert_eq!(c.send(&["HGET", "h", "f1"]).await, bulk("v1"));
    assert_eq!(c.send(&["HEXISTS", "h", "f2"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["HLEN", "h"]).await, Frame::Integer(2));
    assert_eq!(c.send(&["HDEL", "h", "f1"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["HEXISTS", "h", "f1"]).await, Frame::Integer(0));

    match c.send(&["HGETALL", "h"]).await {
        Frame::Array(items) => assert_eq!(items, vec![bulk("f2"), bulk("v2")]),
        other => panic!("expected array, got {other:?}"),
    }
}

#[tokio::test]
async fn hash_disappears_once_its_last_field_is_deleted() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["HSET", "h", "only", "v"]).await;
    c.send(&["HDEL", "h", "only"]).await;
    assert_eq!(c.send(&["EXISTS", "h"]).await, Frame::Integer(0));
    assert_eq!(c.send(&["TYPE", "h"]).await, Frame::Simple("none".to_owned()));
}

#[tokio::test]
async fn set_basic_operations() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    assert_eq!(c.send(&["SADD", "s", "a", "b", "a"]).await, Frame::Integer(2));
    assert_eq!(c.send(&["SCARD", "s"]).await, Frame::Integer(2));
    assert_eq!(c.send(&["SISMEMBER", "s", "a"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["SISMEMBER", "s", "z"]).await, Frame::Integer(0));
    assert_eq!(c.send(&["SREM", "s", "a"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["SCARD", "s"]).await, Frame::Integer(1));
}

#[tokio::test]
async fn spop_removes_the_member_it_returns() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["SADD", "s", "only"]).await;
    assert_eq!(c.send(&["SPOP", "s"]).await, bulk("only"));
    assert_eq!(c.send(&["SCARD", "s"]).await, Frame::Integer(0));
    assert_eq!(c.send(&["EXISTS", "s"]).await, Frame::Integer(0));
}
