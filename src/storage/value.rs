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

//! The tagged-union value object stored under every key.

use bytes::Bytes;
use std::collections::HashMap;

use super::bitmap::Bitmap;
use super::list::PagedList;
use super::zset::SortedSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    List,
    Hash,
    Set,
    ZSet,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::List => "list",
            Self::Hash => "hash",
            Self::Set => "set",
            Self::ZSet => "zset",
        }
    }
}

/// The five value containers a key can hold. Bitmaps are not a distinct
/// kind: `SETBIT`/`GETBIT` operate on `Value::String`, exactly as in real
/// Redis, where a bitmap is just a string interpreted bit-wise.
#[derive(Debug, Clone)]
pub enum Value {
    String(Bytes),
    List(PagedList),
    Hash(HashMap<Bytes, Bytes>),
    Set(HashMap<Bytes, ()>),
    ZSet(SortedSet),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::List(_) => ValueKind::List,
            Self::Hash(_) => ValueKind::Hash,
            Self::Set(_) => ValueKind::Set,
            Self::ZSet(_) => ValueKind::ZSet,
        }
    }

    pub fn as_string(&self) -> Option<&Bytes> {
        match self {
            Self::String(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_string_mut(&mut self) -> Option<&mut Bytes> {
        match self {
            Self::String(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&PagedList> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut PagedList> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&HashMap<Bytes, Bytes>> {
        match self {
            Self::Hash(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_hash_mut(&mut self) -> Option<&mut HashMap<Bytes, Bytes>> {
        match self {
            Self::Hash(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&HashMap<Bytes, ()>> {
        match self {
            Self::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set_mut(&mut self) -> Option<&mut HashMap<Bytes, ()>> {
        match self {
            Self::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_zset(&self) -> Option<&SortedSet> {
        match self {
            Self::ZSet(z) => Some(z),
            _ => None,
        }
    }

    pub fn as_zset_mut(&mut self) -> Option<&mut SortedSet> {
        match self {
            Self::ZSet(z) => Some(z),
            _ => None,
        }
    }

    /// Read a string value as a bitmap view, honoring the `SETBIT`
    /// growth-in-place semantics.
    pub fn as_bitmap(&self) -> Option<Bitmap> {
        self.as_string().map(|b| Bitmap::from_bytes(b.to_vec()))
    }
}
