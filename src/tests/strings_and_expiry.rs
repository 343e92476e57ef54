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
async fn incr_decr_family() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    assert_eq!(c.send(&["INCR", "counter"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["INCRBY", "counter", "9"]).await, Frame::Integer(10));
    assert_eq!(c.send(&["DECR", "counter"]).await, Frame::Integer(9));
    assert_eq!(c.send(&["DECRBY", "counter", "4"]).await, Frame::Integer(5));
    assert_eq!(c.send(&["GET", "counter"]).await, bulk("5"));
}

#[tokio::test]
async fn incr_on_non_integer_string_is_an_error() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;
    c.send(&["SET", "k", "not-a-number"]).await;
    match c.send(&["INCR", "k"]).await {
        Frame::Error(msg) => assert!(msg.contains("not an integer")),
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn setnx_only_sets_when_absent() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    assert_eq!(c.send(&["SETNX", "k", "first"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["SETNX", "k", "second"]).await, Frame::Integer(0));
    assert_eq!(c.send(&["GET", "k"]).await, bulk("first"));
}

#[tokio::test]
async fn mset_and_mget_roundtrip() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    assert_eq!(c.send(&["MSET", "a", "1", "b", "2", "c", "3"]).await, Frame::ok());
    match c.send(&["MGET", "a", "nosuch", "c"]).await {
        Frame::Array(items) => assert_eq!(items, vec![bulk("1"), Frame::Null, bulk("3")]),
        other => panic!("expected array, got {other:?}"),
    }
}

#[tokio::test]
async fn append_grows_an_existing_or_absent_string() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    assert_eq!(c.send(&["APPEND", "k", "foo"]).await, Frame::Integer(3));
    assert_eq!(c.send(&["APPEND", "k", "bar"]).await, Frame::Integer(6));
    assert_eq!(c.send(&["GET", "k"]).await, bulk("foobar"));
}

#[tokio::test]
async fn wrongtype_on_string_ops_against_a_list() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;
    c.send(&["LPUSH", "l", "a"]).await;
    match c.send(&["GET", "l"]).await {
        Frame::Error(msg) => assert!(msg.starts_with("WRONGTYPE")),
        other => panic!("expected WRONGTYPE error, got {other:?}"),
    }
}

#[tokio::test]
async fn expire_ttl_and_persist() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["SET", "k", "v"]).await;
    assert_eq!(c.send(&["TTL", "k"]).await, Frame::Integer(-1));

    assert_eq!(c.send(&["EXPIRE", "k", "100"]).await, Frame::Integer(1));
    match c.send(&["TTL", "k"]).await {
        Frame::Integer(n) => assert!((1..=100).contains(&n), "ttl was {n}"),
        other => panic!("expected integer, got {other:?}"),
    }

    assert_eq!(c.send(&["PERSIST", "k"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["TTL", "k"]).await, Frame::Integer(-1));

    assert_eq!(c.send(&["TTL", "nosuch"]).await, Frame::Integer(-2));
}

#[tokio::test]
async fn zero_or_negative_expire_is_rejected() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;
    c.send(&["SET", "k", "v"]).await;

    match c.send(&["EXPIRE", "k", "0"]).await {
        Frame::Error(_) => {}
        other => panic!("expected a syntax error, got {other:?}"),
    }
    match c.send(&["EXPIRE", "k", "-5"]).await {
        Frame::Error(_) => {}
        other => panic!("expected a syntax error, got {other:?}"),
    }
    // the rejected EXPIRE must not have touched the key or its TTL
    assert_eq!(c.send(&["TTL", "k"]).await, Frame::Integer(-1));
}

#[tokio::test]
async fn expired_key_is_observably_gone_after_a_short_ttl() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["SET", "k", "v"]).await;
    assert_eq!(c.send(&["PEXPIRE", "k", "50"]).await, Frame::Integer(1));
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert_eq!(c.send(&["GET", "k"]).await, Frame::Null);
    assert_eq!(c.send(&["EXISTS", "k"]).await, Frame::Integer(0));
}

#[tokio::test]
async fn setbit_getbit_bitcount() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    assert_eq!(c.send(&["SETBIT", "bm", "7", "1"]).await, Frame::Integer(0));
    assert_eq!(c.send(&["GETBIT", "bm", "7"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["GETBIT", "bm", "6"]).await, Frame::Integer(0));
    assert_eq!(c.send(&["SETBIT", "bm", "100", "1"]).await, Frame::Integer(0));
    assert_eq!(c.send(&["BITCOUNT", "bm"]).await, Frame::Integer(2));
    // byte 0 holds the bit set at offset 7; byte 12 (offset 100 / 8) holds the other
    assert_eq!(c.send(&["BITCOUNT", "bm", "0", "0"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["BITCOUNT", "bm", "1", "11"]).await, Frame::Integer(0));
    assert_eq!(c.send(&["BITCOUNT", "bm", "-1", "-1"]).await, Frame::Integer(1));
}
