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
async fn zadd_reports_only_newly_inserted_members() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    assert_eq!(c.send(&["ZADD", "z", "1", "a", "2", "b"]).await, Frame::Integer(2));
    // re-adding "a" with a new score updates it but isn't a new member
    assert_eq!(c.send(&["ZADD", "z", "5", "a", "3", "c"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["ZCARD", "z"]).await, Frame::Integer(3));
    assert_eq!(c.send(&["ZSCORE", "z", "a"]).await, bulk("5"));
}

#[tokio::test]
async fn zrange_is_ordered_by_score_then_member() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["ZADD", "z", "3", "c", "1", "a", "2", "b"]).await;
    match c.send(&["ZRANGE", "z", "0", "-1"]).await {
        Frame::Array(items) => assert_eq!(items, vec![bulk("a"), bulk("b"), bulk("c")]),
        other => panic!("expected array, got {other:?}"),
    }

    match c.send(&["ZRANGE", "z", "0", "-1", "WITHSCORES"]).await {
        Frame::Array(items) => {
            assert_eq!(items, vec![bulk("a"), bulk("1"), bulk("b"), bulk("2"), bulk("c"), bulk("3")]);
        }
        other => panic!("expected array, got {other:?}"),
    }
}

#[tokio::test]
async fn zrevrange_is_the_mirror_of_zrange() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["ZADD", "z", "1", "a", "2", "b", "3", "c"]).await;
    match c.send(&["ZREVRANGE", "z", "0", "-1"]).await {
        Frame::Array(items) => assert_eq!(items, vec![bulk("c"), bulk("b"), bulk("a")]),
        other => panic!("expected array, got {other:?}"),
    }
}

#[tokio::test]
async fn zrank_and_zrem() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["ZADD", "z", "1", "a", "2", "b", "3", "c"]).await;
    assert_eq!(c.send(&["ZRANK", "z", "b"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["ZRANK", "z", "nosuch"]).await, Frame::Null);
    assert_eq!(c.send(&["ZREVRANK", "z", "a"]).await, Frame::Integer(2));
    assert_eq!(c.send(&["ZREVRANK", "z", "nosuch"]).await, Frame::Null);
    assert_eq!(c.send(&["ZREM", "z", "b"]).await, Frame::Integer(1));
    assert_eq!(c.send(&["ZRANK", "z", "c"]).await, Frame::Integer(1));
}

#[tokio::test]
async fn zrangebyscore_respects_exclusive_borders() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["ZADD", "z", "1", "a", "2", "b", "3", "c"]).await;
    match c.send(&["ZRANGEBYSCORE", "z", "(1", "3"]).await {
        Frame::Array(items) => assert_eq!(items, vec![bulk("b"), bulk("c")]),
        other => panic!("expected array, got {other:?}"),
    }
}

#[tokio::test]
async fn zremrangebyrank_is_stop_inclusive_in_the_wire_protocol() {
    let (_engine, addr) = start_server().await;
    let mut c = TestClient::connect(addr).await;

    c.send(&["ZADD", "z", "1", "a", "2", "b", "3", "c", "4", "d"]).await;
    assert_eq!(c.send(&["ZREMRANGEBYRANK", "z", "1", "2"]).await, Frame::Integer(2));
    match c.send(&["ZRANGE", "z", "0", "-1"]).await {
        Frame::Array(items) => assert_eq!(items, vec![bulk("a"), bulk("d")]),
        other => panic!("expected array, got {other:?}"),
    }
}
