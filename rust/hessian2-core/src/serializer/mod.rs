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

//! Built-in serializers and the exception codec, installed into a
//! [`Registry`] through its public registration interface.

pub mod collection;
pub mod exception;
pub mod scalar;

use crate::error::Error;
use crate::resolver::registry::Registry;
use crate::types::{self, Category};

pub use exception::StackFrame;

/// Installs the serializers of every built-in type id plus the exception
/// codec under `*Exception` and `*Error`.
pub fn register_builtins(registry: &mut Registry) -> Result<(), Error> {
    registry.register_serializer(types::NULL, scalar::write_null);
    registry.register_serializer(types::BOOLEAN, scalar::write_bool);
    registry.register_serializer(types::INTEGER, scalar::write_int);
    registry.register_serializer(types::LONG, scalar::write_long);
    registry.register_serializer(types::DOUBLE, scalar::write_double);
    registry.register_serializer(types::DATE, scalar::write_date);
    registry.register_serializer(types::STRING, scalar::write_string);
    registry.register_serializer(types::BYTE_ARRAY, scalar::write_byte_array);
    registry.register_serializer(types::WEAK_REF, collection::write_reference);
    registry.register_serializer(types::LIST, collection::write_list);
    registry.register_serializer(types::MAP, collection::write_map);
    registry.register_serializer(types::EXCEPTION, exception::write_exception);
    for pattern in ["*Exception", "*Error"] {
        registry.register_deserializer(Category::ExtMap, pattern, exception::read_exception)?;
    }
    Ok(())
}
