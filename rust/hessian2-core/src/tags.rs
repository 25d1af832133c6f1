// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hessian 2.0 wire tags, compact band boundaries and their bias formulas.
//!
//! Compact forms pack small values into the tag byte itself. Each band is a
//! contiguous tag range whose bias constant (`*_ZERO`) is the tag that
//! encodes zero; the formulas below recover the value from the tag and the
//! trailing bytes.

pub const BC_NULL: u8 = b'N';
pub const BC_TRUE: u8 = b'T';
pub const BC_FALSE: u8 = b'F';

pub const BC_INT: u8 = b'I';
pub const BC_INT_ZERO: u8 = 0x90;
pub const BC_INT_BYTE_ZERO: u8 = 0xc8;
pub const BC_INT_SHORT_ZERO: u8 = 0xd4;
pub const INT_DIRECT_MIN: i32 = -0x10;
pub const INT_DIRECT_MAX: i32 = 0x2f;
pub const INT_BYTE_MIN: i32 = -0x800;
pub const INT_BYTE_MAX: i32 = 0x7ff;
pub const INT_SHORT_MIN: i32 = -0x40000;
pub const INT_SHORT_MAX: i32 = 0x3ffff;

pub const BC_LONG: u8 = b'L';
pub const BC_LONG_ZERO: u8 = 0xe0;
pub const BC_LONG_BYTE_ZERO: u8 = 0xf8;
pub const BC_LONG_SHORT_ZERO: u8 = 0x3c;
pub const BC_LONG_INT: u8 = 0x59;
pub const LONG_DIRECT_MIN: i64 = -0x08;
pub const LONG_DIRECT_MAX: i64 = 0x0f;

pub const BC_DOUBLE: u8 = b'D';
pub const BC_DOUBLE_ZERO: u8 = 0x5b;
pub const BC_DOUBLE_ONE: u8 = 0x5c;
pub const BC_DOUBLE_BYTE: u8 = 0x5d;
pub const BC_DOUBLE_SHORT: u8 = 0x5e;
pub const BC_DOUBLE_MILL: u8 = 0x5f;

pub const BC_DATE: u8 = 0x4a;
pub const BC_DATE_MINUTE: u8 = 0x4b;

pub const BC_STRING: u8 = b'S';
pub const BC_STRING_CHUNK: u8 = b'R';
pub const BC_STRING_DIRECT: u8 = 0x00;
pub const BC_STRING_SHORT: u8 = 0x30;
pub const STRING_DIRECT_MAX: usize = 0x1f;
pub const STRING_SHORT_MAX: usize = 0x3ff;

pub const BC_BINARY: u8 = b'B';
pub const BC_BINARY_CHUNK: u8 = b'A';
pub const BC_BINARY_DIRECT: u8 = 0x20;
pub const BC_BINARY_SHORT: u8 = 0x34;
pub const BINARY_DIRECT_MAX: usize = 0x0f;
pub const BINARY_SHORT_MAX: usize = 0x3ff;

/// Largest chunk of a string (in UTF-16 units) or binary (in bytes).
pub const MAX_CHUNK_SIZE: usize = 0x8000;

pub const BC_LIST_VARIABLE: u8 = b'U';
pub const BC_LIST_FIXED: u8 = b'V';
pub const BC_LIST_VARIABLE_UNTYPED: u8 = b'W';
pub const BC_LIST_FIXED_UNTYPED: u8 = b'X';
pub const BC_LIST_DIRECT: u8 = 0x70;
pub const BC_LIST_DIRECT_UNTYPED: u8 = 0x78;
pub const LIST_DIRECT_MAX: usize = 0x07;

pub const BC_MAP: u8 = b'M';
pub const BC_MAP_UNTYPED: u8 = b'H';
pub const BC_END: u8 = b'Z';

pub const BC_OBJECT_DEF: u8 = b'C';
pub const BC_OBJECT: u8 = b'O';
pub const BC_OBJECT_DIRECT: u8 = 0x60;
pub const OBJECT_DIRECT_MAX: usize = 0x0f;

pub const BC_REF: u8 = b'Q';

#[inline(always)]
pub const fn int_direct(tag: u8) -> i32 {
    tag as i32 - BC_INT_ZERO as i32
}

#[inline(always)]
pub const fn int_byte(tag: u8, b0: u8) -> i32 {
    ((tag as i32 - BC_INT_BYTE_ZERO as i32) << 8) + b0 as i32
}

#[inline(always)]
pub const fn int_short(tag: u8, b1: u8, b0: u8) -> i32 {
    ((tag as i32 - BC_INT_SHORT_ZERO as i32) << 16) + ((b1 as i32) << 8) + b0 as i32
}

#[inline(always)]
pub const fn long_direct(tag: u8) -> i64 {
    tag as i64 - BC_LONG_ZERO as i64
}

#[inline(always)]
pub const fn long_byte(tag: u8, b0: u8) -> i64 {
    ((tag as i64 - BC_LONG_BYTE_ZERO as i64) << 8) + b0 as i64
}

#[inline(always)]
pub const fn long_short(tag: u8, b1: u8, b0: u8) -> i64 {
    ((tag as i64 - BC_LONG_SHORT_ZERO as i64) << 16) + ((b1 as i64) << 8) + b0 as i64
}

#[inline(always)]
pub fn is_string_tag(tag: u8) -> bool {
    matches!(tag, 0x00..=0x1f | 0x30..=0x33 | BC_STRING | BC_STRING_CHUNK)
}

#[inline(always)]
pub fn is_binary_tag(tag: u8) -> bool {
    matches!(tag, 0x20..=0x2f | 0x34..=0x37 | BC_BINARY | BC_BINARY_CHUNK)
}

#[inline(always)]
pub fn is_int_tag(tag: u8) -> bool {
    matches!(tag, 0x80..=0xd7 | BC_INT)
}

#[inline(always)]
pub fn is_list_tag(tag: u8) -> bool {
    matches!(tag, 0x55..=0x58 | 0x70..=0x7f)
}

#[inline(always)]
pub fn is_map_tag(tag: u8) -> bool {
    matches!(tag, BC_MAP | BC_MAP_UNTYPED)
}

#[inline(always)]
pub fn is_object_tag(tag: u8) -> bool {
    matches!(tag, BC_OBJECT_DEF | BC_OBJECT | 0x60..=0x6f)
}
