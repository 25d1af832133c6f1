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

//! Numeric type ids of the object model and the open ranges reserved for
//! runtime-registered extensions.

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[allow(non_camel_case_types)]
#[repr(u32)]
pub enum TypeId {
    NULL = 0,
    BOOLEAN = 1,
    INTEGER = 2,
    LONG = 3,
    DOUBLE = 4,
    DATE = 5,
    STRING = 6,
    BYTE_ARRAY = 7,
    WEAK_REF = 8,
    LIST = 9,
    MAP = 10,
    // first id of the extension object range, never assigned itself
    EXT_OBJECT = 11,
    EXT_LIST = 100,
    EXT_MAP = 200,
    EXCEPTION = 201,
}

pub const NULL: u32 = TypeId::NULL as u32;
pub const BOOLEAN: u32 = TypeId::BOOLEAN as u32;
pub const INTEGER: u32 = TypeId::INTEGER as u32;
pub const LONG: u32 = TypeId::LONG as u32;
pub const DOUBLE: u32 = TypeId::DOUBLE as u32;
pub const DATE: u32 = TypeId::DATE as u32;
pub const STRING: u32 = TypeId::STRING as u32;
pub const BYTE_ARRAY: u32 = TypeId::BYTE_ARRAY as u32;
pub const WEAK_REF: u32 = TypeId::WEAK_REF as u32;
pub const LIST: u32 = TypeId::LIST as u32;
pub const MAP: u32 = TypeId::MAP as u32;
pub const EXT_OBJECT: u32 = TypeId::EXT_OBJECT as u32;
pub const EXT_LIST: u32 = TypeId::EXT_LIST as u32;
pub const EXT_MAP: u32 = TypeId::EXT_MAP as u32;
pub const EXCEPTION: u32 = TypeId::EXCEPTION as u32;

/// Extension categories, each owning a contiguous range of type ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    ExtObject,
    ExtList,
    ExtMap,
}

impl Category {
    /// Category of a type id, `None` for the built-in scalar and container ids.
    pub fn of(type_id: u32) -> Option<Category> {
        match type_id {
            EXT_OBJECT..=99 => Some(Category::ExtObject),
            EXT_LIST..=199 => Some(Category::ExtList),
            EXT_MAP.. => Some(Category::ExtMap),
            _ => None,
        }
    }

    /// Exclusive upper bound of the category's id range.
    pub(crate) fn limit(self) -> u32 {
        match self {
            Category::ExtObject => EXT_LIST,
            Category::ExtList => EXT_MAP,
            Category::ExtMap => u32::MAX,
        }
    }
}

#[inline(always)]
pub fn is_list_type(type_id: u32) -> bool {
    type_id == LIST || (EXT_LIST..EXT_MAP).contains(&type_id)
}

#[inline(always)]
pub fn is_map_type(type_id: u32) -> bool {
    type_id == MAP || type_id >= EXT_MAP
}

pub mod classname {
    pub const NULL: &str = "null";
    pub const BOOLEAN: &str = "boolean";
    pub const INTEGER: &str = "int";
    pub const LONG: &str = "long";
    pub const DOUBLE: &str = "double";
    pub const DATE: &str = "java.util.Date";
    pub const STRING: &str = "java.lang.String";
    pub const BYTE_ARRAY: &str = "[B";
    pub const LIST: &str = "java.util.ArrayList";
    pub const MAP: &str = "java.util.HashMap";
    pub const EXCEPTION: &str = "java.lang.RuntimeException";
}
