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

//! Hessian 2.0 encoder.
//!
//! Scalars are written in their canonical long forms; strings and binaries
//! are chunked; composite values are deduplicated by identity so a value
//! reachable twice is written once and referenced with `Q` afterwards.
//! Everything except null is dispatched through the [`Registry`] by type id.

use crate::buffer::Writer;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::Error;
use crate::object::Object;
use crate::resolver::ref_resolver::{self, RefWriter};
use crate::resolver::registry::Registry;
use crate::tags::*;
use crate::types::{self, classname};

pub struct Encoder<'a> {
    pub writer: &'a mut Writer,
    registry: &'a Registry,
    refs: RefWriter,
    track_ref: bool,
    max_depth: u32,
    depth: u32,
}

impl<'a> Encoder<'a> {
    pub fn new(writer: &'a mut Writer, registry: &'a Registry) -> Encoder<'a> {
        Encoder {
            writer,
            registry,
            refs: RefWriter::new(),
            track_ref: true,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// With tracking off, repeated composites are written in full.
    pub fn with_track_ref(mut self, track_ref: bool) -> Self {
        self.track_ref = track_ref;
        self
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.writer.len()
    }

    /// Forgets the values written so far; later repeats are written in full.
    pub fn clear(&mut self) {
        self.refs.clear();
    }

    pub fn write_null(&mut self) {
        self.writer.write_u8(BC_NULL);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.writer.write_u8(if value { BC_TRUE } else { BC_FALSE });
    }

    pub fn write_int32(&mut self, value: i32) {
        self.writer.write_u8(BC_INT);
        self.writer.write_i32(value);
    }

    pub fn write_int64(&mut self, value: i64) {
        self.writer.write_u8(BC_LONG);
        self.writer.write_i64(value);
    }

    pub fn write_double(&mut self, value: f64) {
        self.writer.write_u8(BC_DOUBLE);
        self.writer.write_f64(value);
    }

    /// Milliseconds since the epoch.
    pub fn write_utc_date(&mut self, millis: i64) {
        self.writer.write_u8(BC_DATE);
        self.writer.write_i64(millis);
    }

    /// Writes a string in chunks of at most 32768 UTF-16 units.
    ///
    /// Characters outside the BMP are written as surrogate pairs of 3-byte
    /// sequences, the form Java readers expect, and never straddle a chunk.
    pub fn write_utf8_string(&mut self, value: &str) {
        let mut start = 0;
        let mut units = 0;
        for (index, ch) in value.char_indices() {
            let width = ch.len_utf16();
            if units + width > MAX_CHUNK_SIZE {
                self.writer.write_u8(BC_STRING_CHUNK);
                self.writer.write_u16(units as u16);
                self.write_utf8_payload(&value[start..index]);
                start = index;
                units = 0;
            }
            units += width;
        }
        if units <= STRING_DIRECT_MAX {
            self.writer.write_u8(BC_STRING_DIRECT + units as u8);
        } else if units <= STRING_SHORT_MAX {
            self.writer.write_u8(BC_STRING_SHORT + (units >> 8) as u8);
            self.writer.write_u8(units as u8);
        } else {
            self.writer.write_u8(BC_STRING);
            self.writer.write_u16(units as u16);
        }
        self.write_utf8_payload(&value[start..]);
    }

    fn write_utf8_payload(&mut self, chunk: &str) {
        // only 4-byte sequences differ from the Java form
        if !chunk.bytes().any(|b| b >= 0xf0) {
            self.writer.write_bytes(chunk.as_bytes());
            return;
        }
        let mut utf8 = [0u8; 4];
        let mut utf16 = [0u16; 2];
        for ch in chunk.chars() {
            if ch.len_utf16() == 1 {
                self.writer.write_bytes(ch.encode_utf8(&mut utf8).as_bytes());
                continue;
            }
            for &unit in ch.encode_utf16(&mut utf16).iter() {
                self.writer.write_u8(0xe0 | (unit >> 12) as u8);
                self.writer.write_u8(0x80 | ((unit >> 6) & 0x3f) as u8);
                self.writer.write_u8(0x80 | (unit & 0x3f) as u8);
            }
        }
    }

    /// Writes a byte array in chunks of at most 32768 bytes.
    pub fn write_bytes(&mut self, value: &[u8]) {
        let mut rest = value;
        while rest.len() > MAX_CHUNK_SIZE {
            let (chunk, tail) = rest.split_at(MAX_CHUNK_SIZE);
            self.writer.write_u8(BC_BINARY_CHUNK);
            self.writer.write_u16(MAX_CHUNK_SIZE as u16);
            self.writer.write_bytes(chunk);
            rest = tail;
        }
        let len = rest.len();
        if len <= BINARY_DIRECT_MAX {
            self.writer.write_u8(BC_BINARY_DIRECT + len as u8);
        } else if len <= BINARY_SHORT_MAX {
            self.writer.write_u8(BC_BINARY_SHORT + (len >> 8) as u8);
            self.writer.write_u8(len as u8);
        } else {
            self.writer.write_u8(BC_BINARY);
            self.writer.write_u16(len as u16);
        }
        self.writer.write_bytes(rest);
    }

    pub fn write_length(&mut self, length: u32) {
        self.write_int32(length as i32);
    }

    pub fn write_type(&mut self, name: &str) {
        self.write_utf8_string(name);
    }

    /// `X len` for plain lists, `V type len` for typed ones.
    pub fn write_list_begin(&mut self, length: u32, list_classname: &str) {
        if list_classname.is_empty() || list_classname == classname::LIST {
            self.writer.write_u8(BC_LIST_FIXED_UNTYPED);
        } else {
            self.writer.write_u8(BC_LIST_FIXED);
            self.write_type(list_classname);
        }
        self.write_length(length);
    }

    /// `H` for plain maps, `M type` for typed ones. Entries follow, then
    /// [`Encoder::write_map_end`].
    pub fn write_map_begin(&mut self, map_classname: &str) {
        if map_classname.is_empty() || map_classname == classname::MAP {
            self.writer.write_u8(BC_MAP_UNTYPED);
        } else {
            self.writer.write_u8(BC_MAP);
            self.write_type(map_classname);
        }
    }

    pub fn write_map_end(&mut self) {
        self.writer.write_u8(BC_END);
    }

    /// Writes `Q` + index if `obj` was written before and returns `true`;
    /// otherwise records it and returns `false`.
    pub fn write_ref(&mut self, obj: &Object) -> bool {
        self.refs.try_write_ref(self.writer, obj)
    }

    pub fn write_ref_id(&mut self, ref_id: u32) {
        ref_resolver::write_ref_id(self.writer, ref_id);
    }

    /// Reserves the next reference index for a value the peer will
    /// register but which is not tracked by identity here.
    pub fn add_ref(&mut self) -> u32 {
        self.refs.reserve_ref_id()
    }

    pub fn write_object(&mut self, obj: &Object) -> Result<(), Error> {
        if obj.is_null() {
            self.write_null();
            return Ok(());
        }
        let type_id = obj.type_id();
        if type_id > types::WEAK_REF && self.track_ref && self.write_ref(obj) {
            return Ok(());
        }
        let serializer = self.registry.get_serializer(type_id).ok_or_else(|| {
            Error::io(
                self.position(),
                format!(
                    "no serializer registered for type id {} ({})",
                    type_id,
                    obj.classname()
                ),
            )
        })?;
        if type_id <= types::WEAK_REF {
            return serializer(obj, self);
        }
        if self.depth >= self.max_depth {
            return Err(Error::io(
                self.position(),
                format!("nesting deeper than {} levels", self.max_depth),
            ));
        }
        self.depth += 1;
        let result = serializer(obj, self);
        self.depth -= 1;
        result
    }
}
