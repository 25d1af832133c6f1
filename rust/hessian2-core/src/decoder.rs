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

//! Hessian 2.0 decoder.
//!
//! The decoder walks a caller-owned byte slice. Every compact band of the
//! grammar is accepted, typed reads apply the usual weak coercions, and
//! lists, maps and object instances are entered into the reference table
//! before their children so shared and cyclic graphs resolve. Typed maps and
//! object instances are routed through the [`Registry`] by classname.

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::Reader;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::Error;
use crate::object::{self, List, Map, Object};
use crate::resolver::ref_resolver::RefReader;
use crate::resolver::registry::Registry;
use crate::tags::*;
use crate::types::{classname, Category};

/// Field layout announced by a `C` class definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub classname: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone)]
enum Layout {
    /// `M`/`H` entries: string keys until `Z`.
    Keyed,
    /// `O` instance: one value per declared field.
    Declared(Rc<ClassDef>),
    /// List elements, keyed by their decimal index.
    Indexed(ListHeader),
}

/// Cursor over the field names of a typed map or object instance.
///
/// A deserializer calls [`Fields::next_key`] until it returns `None` and
/// reads (or skips) exactly one value per key.
#[derive(Debug, Clone)]
pub struct Fields {
    layout: Layout,
    next: usize,
}

impl Fields {
    pub(crate) fn keyed() -> Fields {
        Fields {
            layout: Layout::Keyed,
            next: 0,
        }
    }

    pub(crate) fn declared(def: Rc<ClassDef>) -> Fields {
        Fields {
            layout: Layout::Declared(def),
            next: 0,
        }
    }

    fn indexed(header: ListHeader) -> Fields {
        Fields {
            layout: Layout::Indexed(header),
            next: 0,
        }
    }

    /// Next field name, `None` once every field has been visited. For the
    /// map and variable-length list forms the terminating `Z` is consumed
    /// here.
    pub fn next_key(&mut self, dec: &mut Decoder<'_>) -> Result<Option<String>, Error> {
        match &self.layout {
            Layout::Keyed => {
                let tag = dec.peek()?;
                if tag == BC_END {
                    dec.parse_8bit()?;
                    return Ok(None);
                }
                if !is_string_tag(tag) {
                    return Err(Error::expect(dec.position(), "string field name", tag));
                }
                dec.read_utf8_string()
            }
            Layout::Declared(def) => {
                let key = def.fields.get(self.next).cloned();
                if key.is_some() {
                    self.next += 1;
                }
                Ok(key)
            }
            Layout::Indexed(header) => {
                if !header.has_more(dec, self.next as u32)? {
                    return Ok(None);
                }
                self.next += 1;
                Ok(Some((self.next - 1).to_string()))
            }
        }
    }

    /// Skips every remaining field value.
    pub fn skip_rest(&mut self, dec: &mut Decoder<'_>) -> Result<(), Error> {
        while self.next_key(dec)?.is_some() {
            dec.skip_object()?;
        }
        Ok(())
    }
}

/// Header of a list: its classname and, for fixed-length forms, the length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListHeader {
    pub classname: String,
    pub length: Option<u32>,
}

impl ListHeader {
    /// Whether another element follows after `read` elements. The `Z` of a
    /// variable-length list is consumed here.
    pub fn has_more(&self, dec: &mut Decoder<'_>, read: u32) -> Result<bool, Error> {
        match self.length {
            Some(n) => Ok(read < n),
            None => {
                if dec.peek()? == BC_END {
                    dec.parse_8bit()?;
                    Ok(false)
                } else {
                    Ok(true)
                }
            }
        }
    }
}

enum Number {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
}

/// Collects UTF-16 units into a `String`, pairing surrogates even when
/// the halves arrive in different chunks.
#[derive(Default)]
struct Utf16Sink {
    out: String,
    high: Option<u16>,
}

impl Utf16Sink {
    fn push_unit(&mut self, unit: u16) {
        match unit {
            0xd800..=0xdbff => {
                self.flush_high();
                self.high = Some(unit);
            }
            0xdc00..=0xdfff => match self.high.take() {
                Some(high) => {
                    let cp = 0x10000 + (((high - 0xd800) as u32) << 10) + (unit - 0xdc00) as u32;
                    self.out
                        .push(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                None => self.unpaired(),
            },
            _ => {
                self.flush_high();
                self.out
                    .push(char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }

    fn push_char(&mut self, c: char) {
        self.flush_high();
        self.out.push(c);
    }

    fn flush_high(&mut self) {
        if self.high.take().is_some() {
            self.unpaired();
        }
    }

    fn unpaired(&mut self) {
        log::warn!("unpaired surrogate in string replaced by U+FFFD");
        self.out.push(char::REPLACEMENT_CHARACTER);
    }

    fn finish(mut self) -> String {
        self.flush_high();
        self.out
    }
}

pub struct Decoder<'a> {
    reader: Reader<'a>,
    registry: &'a Registry,
    refs: RefReader,
    types: Vec<String>,
    class_defs: Vec<Rc<ClassDef>>,
    max_depth: u32,
    depth: u32,
}

impl<'a> Decoder<'a> {
    pub fn new(bf: &'a [u8], registry: &'a Registry) -> Decoder<'a> {
        Decoder {
            reader: Reader::new(bf),
            registry,
            refs: RefReader::new(),
            types: Vec::new(),
            class_defs: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.reader.get_cursor()
    }

    pub fn eof(&self) -> bool {
        self.reader.is_eof()
    }

    /// Forgets references, type names and class definitions seen so far.
    /// Values already returned are unaffected.
    pub fn clear(&mut self) {
        self.refs.clear();
        self.types.clear();
        self.class_defs.clear();
    }

    #[inline(always)]
    pub fn peek(&self) -> Result<u8, Error> {
        self.reader.peek_u8()
    }

    #[inline(always)]
    pub fn parse_8bit(&mut self) -> Result<u8, Error> {
        self.reader.read_u8()
    }

    #[inline(always)]
    pub fn parse_16bit(&mut self) -> Result<u16, Error> {
        self.reader.read_u16()
    }

    #[inline(always)]
    pub fn parse_32bit(&mut self) -> Result<u32, Error> {
        self.reader.read_u32()
    }

    #[inline(always)]
    pub fn parse_64bit(&mut self) -> Result<u64, Error> {
        self.reader.read_u64()
    }

    #[inline(always)]
    pub fn parse_double(&mut self) -> Result<f64, Error> {
        self.reader.read_f64()
    }

    fn read_number(&mut self, expected: &str) -> Result<Number, Error> {
        let pos = self.position();
        let tag = self.parse_8bit()?;
        Ok(match tag {
            BC_NULL => Number::Null,
            BC_TRUE => Number::Bool(true),
            BC_FALSE => Number::Bool(false),
            0x80..=0xbf => Number::Int(int_direct(tag)),
            0xc0..=0xcf => {
                let b0 = self.parse_8bit()?;
                Number::Int(int_byte(tag, b0))
            }
            0xd0..=0xd7 => {
                let b1 = self.parse_8bit()?;
                let b0 = self.parse_8bit()?;
                Number::Int(int_short(tag, b1, b0))
            }
            BC_INT => Number::Int(self.parse_32bit()? as i32),
            0xd8..=0xef => Number::Long(long_direct(tag)),
            0xf0..=0xff => {
                let b0 = self.parse_8bit()?;
                Number::Long(long_byte(tag, b0))
            }
            0x38..=0x3f => {
                let b1 = self.parse_8bit()?;
                let b0 = self.parse_8bit()?;
                Number::Long(long_short(tag, b1, b0))
            }
            BC_LONG_INT => Number::Long(self.parse_32bit()? as i32 as i64),
            BC_LONG => Number::Long(self.parse_64bit()? as i64),
            BC_DOUBLE_ZERO => Number::Double(0.0),
            BC_DOUBLE_ONE => Number::Double(1.0),
            BC_DOUBLE_BYTE => Number::Double(self.parse_8bit()? as i8 as f64),
            BC_DOUBLE_SHORT => Number::Double(self.parse_16bit()? as i16 as f64),
            BC_DOUBLE_MILL => Number::Double(self.parse_32bit()? as i32 as f64 * 0.001),
            BC_DOUBLE => Number::Double(self.parse_double()?),
            _ => return Err(Error::expect(pos, expected, tag)),
        })
    }

    pub fn read_null(&mut self) -> Result<(), Error> {
        let pos = self.position();
        let tag = self.parse_8bit()?;
        if tag != BC_NULL {
            return Err(Error::expect(pos, "null", tag));
        }
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        Ok(match self.read_number("boolean")? {
            Number::Null => false,
            Number::Bool(b) => b,
            Number::Int(v) => v != 0,
            Number::Long(v) => v != 0,
            Number::Double(v) => v != 0.0,
        })
    }

    pub fn read_int32(&mut self) -> Result<i32, Error> {
        Ok(match self.read_number("int")? {
            Number::Null => 0,
            Number::Bool(b) => b as i32,
            Number::Int(v) => v,
            Number::Long(v) => v as i32,
            Number::Double(v) => v as i32,
        })
    }

    pub fn read_int64(&mut self) -> Result<i64, Error> {
        Ok(match self.read_number("long")? {
            Number::Null => 0,
            Number::Bool(b) => b as i64,
            Number::Int(v) => v as i64,
            Number::Long(v) => v,
            Number::Double(v) => v as i64,
        })
    }

    pub fn read_double(&mut self) -> Result<f64, Error> {
        Ok(match self.read_number("double")? {
            Number::Null => 0.0,
            Number::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Number::Int(v) => v as f64,
            Number::Long(v) => v as f64,
            Number::Double(v) => v,
        })
    }

    /// Milliseconds since the epoch, from either date form.
    pub fn read_utc_date(&mut self) -> Result<i64, Error> {
        let pos = self.position();
        let tag = self.parse_8bit()?;
        match tag {
            BC_DATE => Ok(self.parse_64bit()? as i64),
            BC_DATE_MINUTE => Ok(self.parse_32bit()? as i32 as i64 * 60000),
            _ => Err(Error::expect(pos, "date", tag)),
        }
    }

    /// A string, or `None` for null. Numbers and booleans are rendered as
    /// text.
    pub fn read_utf8_string(&mut self) -> Result<Option<String>, Error> {
        let tag = self.peek()?;
        if is_string_tag(tag) {
            return self.read_string_chunks().map(Some);
        }
        Ok(match self.read_number("string")? {
            Number::Null => None,
            Number::Bool(b) => Some(b.to_string()),
            Number::Int(v) => Some(v.to_string()),
            Number::Long(v) => Some(v.to_string()),
            Number::Double(v) => Some(object::format_double(v)),
        })
    }

    fn read_string_chunks(&mut self) -> Result<String, Error> {
        let mut sink = Utf16Sink::default();
        loop {
            let pos = self.position();
            let tag = self.parse_8bit()?;
            let (len, last) = match tag {
                0x00..=0x1f => (tag as usize, true),
                0x30..=0x33 => {
                    let b0 = self.parse_8bit()?;
                    ((((tag - BC_STRING_SHORT) as usize) << 8) + b0 as usize, true)
                }
                BC_STRING => (self.parse_16bit()? as usize, true),
                BC_STRING_CHUNK => (self.parse_16bit()? as usize, false),
                _ => return Err(Error::expect(pos, "string chunk", tag)),
            };
            self.parse_utf8_units(len, &mut sink)?;
            if last {
                return Ok(sink.finish());
            }
        }
    }

    /// Reads `units` UTF-16 code units of modified UTF-8.
    fn parse_utf8_units(&mut self, units: usize, sink: &mut Utf16Sink) -> Result<(), Error> {
        let mut remaining = units;
        while remaining > 0 {
            let pos = self.position();
            let b0 = self.parse_8bit()?;
            match b0 {
                0x00..=0x7f => sink.push_unit(b0 as u16),
                0xc0..=0xdf => {
                    let c1 = self.parse_continuation()?;
                    sink.push_unit((((b0 & 0x1f) as u16) << 6) | c1 as u16);
                }
                0xe0..=0xef => {
                    let c1 = self.parse_continuation()?;
                    let c2 = self.parse_continuation()?;
                    sink.push_unit((((b0 & 0x0f) as u16) << 12) | ((c1 as u16) << 6) | c2 as u16);
                }
                0xf0..=0xf7 if remaining >= 2 => {
                    let c1 = self.parse_continuation()? as u32;
                    let c2 = self.parse_continuation()? as u32;
                    let c3 = self.parse_continuation()? as u32;
                    let cp = (((b0 & 0x07) as u32) << 18) | (c1 << 12) | (c2 << 6) | c3;
                    let c = char::from_u32(cp)
                        .ok_or_else(|| Error::io(pos, "bad utf-8 encoding"))?;
                    sink.push_char(c);
                    remaining -= 1;
                }
                _ => return Err(Error::io(pos, format!("bad utf-8 encoding at 0x{b0:02x}"))),
            }
            remaining -= 1;
        }
        Ok(())
    }

    #[inline(always)]
    fn parse_continuation(&mut self) -> Result<u8, Error> {
        let pos = self.position();
        let b = self.parse_8bit()?;
        if b & 0xc0 != 0x80 {
            return Err(Error::io(pos, format!("bad utf-8 continuation byte 0x{b:02x}")));
        }
        Ok(b & 0x3f)
    }

    /// A byte array, or `None` for null.
    pub fn read_bytes(&mut self) -> Result<Option<Vec<u8>>, Error> {
        let pos = self.position();
        let tag = self.peek()?;
        if tag == BC_NULL {
            self.parse_8bit()?;
            return Ok(None);
        }
        if !is_binary_tag(tag) {
            return Err(Error::expect(pos, "binary", tag));
        }
        self.read_binary_chunks().map(Some)
    }

    fn read_binary_chunks(&mut self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        loop {
            let pos = self.position();
            let tag = self.parse_8bit()?;
            let (len, last) = match tag {
                0x20..=0x2f => ((tag - BC_BINARY_DIRECT) as usize, true),
                0x34..=0x37 => {
                    let b0 = self.parse_8bit()?;
                    ((((tag - BC_BINARY_SHORT) as usize) << 8) + b0 as usize, true)
                }
                BC_BINARY => (self.parse_16bit()? as usize, true),
                BC_BINARY_CHUNK => (self.parse_16bit()? as usize, false),
                _ => return Err(Error::expect(pos, "binary chunk", tag)),
            };
            out.extend_from_slice(self.reader.read_bytes(len)?);
            if last {
                return Ok(out);
            }
        }
    }

    /// A non-negative list length.
    pub fn read_length(&mut self) -> Result<u32, Error> {
        let pos = self.position();
        match self.read_number("length")? {
            Number::Int(v) if v >= 0 => Ok(v as u32),
            Number::Int(v) => Err(Error::io(pos, format!("negative length {v}"))),
            _ => Err(Error::io(pos, "length must be an int")),
        }
    }

    /// A type name, either inline (and remembered) or as an index into the
    /// names seen so far.
    pub fn read_type(&mut self) -> Result<String, Error> {
        let pos = self.position();
        let tag = self.peek()?;
        if is_string_tag(tag) {
            let name = self.read_string_chunks()?;
            self.types.push(name.clone());
            return Ok(name);
        }
        if is_int_tag(tag) {
            let index = self.read_int32()?;
            return usize::try_from(index)
                .ok()
                .and_then(|i| self.types.get(i))
                .cloned()
                .ok_or_else(|| Error::io(pos, format!("type reference {index} out of range")));
        }
        Err(Error::expect(pos, "type", tag))
    }

    /// Stores a value in the reference table and returns its index.
    pub fn add_ref(&mut self, obj: Object) -> u32 {
        let id = self.refs.store_ref(obj);
        log::trace!("reference #{id} registered");
        id
    }

    /// Replaces a table entry, e.g. once a placeholder is complete.
    pub fn replace_ref(&mut self, ref_id: u32, obj: Object) -> bool {
        self.refs.replace_ref(ref_id, obj)
    }

    /// The value a back-reference to `ref_id` decodes to.
    pub fn get_ref_object(&self, ref_id: u32) -> Option<Object> {
        self.refs.resolve_ref(ref_id)
    }

    pub fn ref_count(&self) -> usize {
        self.refs.len()
    }

    /// `Q` + index.
    pub fn read_ref(&mut self) -> Result<Object, Error> {
        let pos = self.position();
        let tag = self.parse_8bit()?;
        if tag != BC_REF {
            return Err(Error::expect(pos, "ref", tag));
        }
        let index = self.read_int32()?;
        u32::try_from(index)
            .ok()
            .and_then(|i| self.refs.resolve_ref(i))
            .ok_or_else(|| {
                Error::io(
                    pos,
                    format!(
                        "reference {} out of range, {} values seen",
                        index,
                        self.refs.len()
                    ),
                )
            })
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= self.max_depth {
            return Err(Error::io(
                self.position(),
                format!("nesting deeper than {} levels", self.max_depth),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn read_class_defs(&mut self) -> Result<(), Error> {
        while self.peek()? == BC_OBJECT_DEF {
            self.parse_8bit()?;
            let pos = self.position();
            let classname = self
                .read_utf8_string()?
                .ok_or_else(|| Error::io(pos, "class definition without a name"))?;
            let count = self.read_length()?;
            let mut fields = Vec::new();
            for _ in 0..count {
                let pos = self.position();
                let field = self
                    .read_utf8_string()?
                    .ok_or_else(|| Error::io(pos, "null field name"))?;
                fields.push(field);
            }
            log::trace!("class definition #{} {classname} {fields:?}", self.class_defs.len());
            self.class_defs.push(Rc::new(ClassDef { classname, fields }));
        }
        Ok(())
    }

    /// Any value.
    pub fn read_object(&mut self) -> Result<Object, Error> {
        self.read_class_defs()?;
        let pos = self.position();
        let tag = self.peek()?;
        match tag {
            BC_NULL => {
                self.parse_8bit()?;
                Ok(Object::Null)
            }
            BC_TRUE | BC_FALSE => Ok(Object::Bool(self.parse_8bit()? == BC_TRUE)),
            0x80..=0xd7 | BC_INT => Ok(Object::Int(self.read_int32()?)),
            0xd8..=0xff | 0x38..=0x3f | BC_LONG_INT | BC_LONG => {
                Ok(Object::Long(self.read_int64()?))
            }
            0x5b..=0x5f | BC_DOUBLE => Ok(Object::Double(self.read_double()?)),
            BC_DATE | BC_DATE_MINUTE => Ok(Object::Date(self.read_utc_date()?)),
            BC_REF => self.read_ref(),
            _ if is_string_tag(tag) => Ok(Object::String(self.read_string_chunks()?)),
            _ if is_binary_tag(tag) => Ok(Object::Bytes(self.read_binary_chunks()?)),
            _ if is_list_tag(tag) => self.nested(Self::read_list_body),
            _ if is_map_tag(tag) => self.nested(Self::read_map_body),
            BC_OBJECT | 0x60..=0x6f => self.nested(Self::read_instance),
            _ => Err(Error::io(pos, format!("unknown tag 0x{tag:02x}"))),
        }
    }

    /// Reads and discards one value, keeping the reference table in step.
    pub fn skip_object(&mut self) -> Result<(), Error> {
        self.read_object().map(drop)
    }

    /// A list in any of its forms, null, or a back-reference.
    pub fn read_list(&mut self) -> Result<Object, Error> {
        let pos = self.position();
        let tag = self.peek()?;
        match tag {
            BC_NULL => {
                self.parse_8bit()?;
                Ok(Object::Null)
            }
            BC_REF => self.read_ref(),
            _ if is_list_tag(tag) => self.nested(Self::read_list_body),
            _ => Err(Error::expect(pos, "list", tag)),
        }
    }

    /// The header of a list; the caller reads the elements.
    pub fn read_list_header(&mut self) -> Result<ListHeader, Error> {
        let pos = self.position();
        let tag = self.parse_8bit()?;
        let (classname, length) = match tag {
            BC_LIST_FIXED => {
                let t = self.read_type()?;
                (t, Some(self.read_length()?))
            }
            BC_LIST_FIXED_UNTYPED => (String::new(), Some(self.read_length()?)),
            BC_LIST_VARIABLE => (self.read_type()?, None),
            BC_LIST_VARIABLE_UNTYPED => (String::new(), None),
            0x70..=0x77 => (self.read_type()?, Some((tag - BC_LIST_DIRECT) as u32)),
            0x78..=0x7f => (String::new(), Some((tag - BC_LIST_DIRECT_UNTYPED) as u32)),
            _ => return Err(Error::expect(pos, "list", tag)),
        };
        let classname = if classname.is_empty() {
            classname::LIST.to_owned()
        } else {
            classname
        };
        Ok(ListHeader { classname, length })
    }

    fn read_list_body(&mut self) -> Result<Object, Error> {
        let header = self.read_list_header()?;
        if let Some(f) = self.registry.get_deserializer(Category::ExtList, &header.classname) {
            let t = header.classname.clone();
            let mut fields = Fields::indexed(header);
            return f(&t, &mut fields, self);
        }
        let list = Rc::new(RefCell::new(List::with_classname(header.classname.clone())));
        let obj = Object::List(list.clone());
        self.add_ref(obj.clone());
        let mut read = 0;
        while header.has_more(self, read)? {
            let item = self.read_object()?;
            list.borrow_mut().push(item);
            read += 1;
        }
        Ok(obj)
    }

    /// A map (typed maps may be built by a registered deserializer), an
    /// object instance, null, or a back-reference.
    pub fn read_map(&mut self) -> Result<Object, Error> {
        self.read_class_defs()?;
        let pos = self.position();
        let tag = self.peek()?;
        match tag {
            BC_NULL => {
                self.parse_8bit()?;
                Ok(Object::Null)
            }
            BC_REF => self.read_ref(),
            BC_MAP | BC_MAP_UNTYPED => self.nested(Self::read_map_body),
            BC_OBJECT | 0x60..=0x6f => self.nested(Self::read_instance),
            _ => Err(Error::expect(pos, "map", tag)),
        }
    }

    fn read_map_body(&mut self) -> Result<Object, Error> {
        let tag = self.parse_8bit()?;
        let classname = if tag == BC_MAP {
            let t = self.read_type()?;
            if let Some(f) = self.registry.get_deserializer(Category::ExtMap, &t) {
                let mut fields = Fields::keyed();
                return f(&t, &mut fields, self);
            }
            if t.is_empty() {
                classname::MAP.to_owned()
            } else {
                log::debug!("no deserializer for {t}, decoding as a generic map");
                t
            }
        } else {
            classname::MAP.to_owned()
        };
        let map = Rc::new(RefCell::new(Map::with_classname(classname)));
        let obj = Object::Map(map.clone());
        self.add_ref(obj.clone());
        while self.peek()? != BC_END {
            let key = self.read_object()?;
            let value = self.read_object()?;
            map.borrow_mut().put(key, value);
        }
        self.parse_8bit()?;
        Ok(obj)
    }

    /// Opens a typed structure, `M type` or an object instance, and returns
    /// its classname with a cursor over its fields. The caller adds its
    /// value to the reference table and drains the fields.
    pub fn read_struct_begin(&mut self) -> Result<(String, Fields), Error> {
        self.read_class_defs()?;
        let pos = self.position();
        let tag = self.peek()?;
        match tag {
            BC_MAP => {
                self.parse_8bit()?;
                Ok((self.read_type()?, Fields::keyed()))
            }
            BC_MAP_UNTYPED => {
                self.parse_8bit()?;
                Ok((classname::MAP.to_owned(), Fields::keyed()))
            }
            BC_OBJECT | 0x60..=0x6f => {
                let def = self.read_instance_def()?;
                Ok((def.classname.clone(), Fields::declared(def)))
            }
            _ => Err(Error::expect(pos, "map or object", tag)),
        }
    }

    fn read_instance_def(&mut self) -> Result<Rc<ClassDef>, Error> {
        let pos = self.position();
        let tag = self.parse_8bit()?;
        let index = match tag {
            BC_OBJECT => {
                let index = self.read_int32()?;
                usize::try_from(index).map_err(|_| {
                    Error::io(pos, format!("negative class definition index {index}"))
                })?
            }
            0x60..=0x6f => (tag - BC_OBJECT_DIRECT) as usize,
            _ => return Err(Error::expect(pos, "object", tag)),
        };
        self.class_defs.get(index).cloned().ok_or_else(|| {
            Error::io(
                pos,
                format!("class definition {index} out of range, {} defined", self.class_defs.len()),
            )
        })
    }

    fn read_instance(&mut self) -> Result<Object, Error> {
        let def = self.read_instance_def()?;
        if let Some(f) = self.registry.get_deserializer(Category::ExtMap, &def.classname) {
            let mut fields = Fields::declared(def.clone());
            return f(&def.classname, &mut fields, self);
        }
        log::debug!(
            "no deserializer for {}, decoding as a generic map",
            def.classname
        );
        let map = Rc::new(RefCell::new(Map::with_classname(def.classname.clone())));
        let obj = Object::Map(map.clone());
        self.add_ref(obj.clone());
        for field in def.fields.iter() {
            let value = self.read_object()?;
            map.borrow_mut().put(field.as_str(), value);
        }
        Ok(obj)
    }
}
