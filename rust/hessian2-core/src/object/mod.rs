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

//! The closed object model shared by the decoder, the encoder and
//! application code.
//!
//! Scalars are held by value. Lists, maps, exceptions and extension values
//! live behind `Rc<RefCell<_>>` so a graph can share them, and every
//! back-edge is a [`Reference`], a `Weak` pointer that never keeps its
//! target alive. Dropping the root of a decoded graph therefore frees every
//! node exactly once, cycles included.
//!
//! Accessors such as [`Object::to_int`] implement Java-style weak coercion
//! and fail with [`Error::ClassCast`] when no rule applies.

mod exception;
mod ext;
mod list;
mod map;
mod reference;

use std::borrow::Cow;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::Error;
use crate::types::{self, classname};

pub use exception::Exception;
pub use ext::ExtObject;
pub use list::List;
pub use map::{Iter as MapIter, Map, MapKey};
pub use reference::{Reference, WeakObject};

pub type ListRef = Rc<RefCell<List>>;
pub type MapRef = Rc<RefCell<Map>>;
pub type ExceptionRef = Rc<RefCell<Exception>>;
pub type ExtRef = Rc<RefCell<ExtObject>>;

#[derive(Clone, Debug, Default)]
pub enum Object {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    /// Milliseconds since the Unix epoch, UTC.
    Date(i64),
    String(String),
    Bytes(Vec<u8>),
    Ref(Reference),
    List(ListRef),
    Map(MapRef),
    Exception(ExceptionRef),
    Ext(ExtRef),
}

impl Object {
    pub fn type_id(&self) -> u32 {
        match self {
            Object::Null => types::NULL,
            Object::Bool(_) => types::BOOLEAN,
            Object::Int(_) => types::INTEGER,
            Object::Long(_) => types::LONG,
            Object::Double(_) => types::DOUBLE,
            Object::Date(_) => types::DATE,
            Object::String(_) => types::STRING,
            Object::Bytes(_) => types::BYTE_ARRAY,
            Object::Ref(_) => types::WEAK_REF,
            Object::List(l) => l.borrow().type_id(),
            Object::Map(m) => m.borrow().type_id(),
            Object::Exception(_) => types::EXCEPTION,
            Object::Ext(x) => x.borrow().type_id(),
        }
    }

    pub fn classname(&self) -> Cow<'static, str> {
        match self {
            Object::Null => Cow::Borrowed(classname::NULL),
            Object::Bool(_) => Cow::Borrowed(classname::BOOLEAN),
            Object::Int(_) => Cow::Borrowed(classname::INTEGER),
            Object::Long(_) => Cow::Borrowed(classname::LONG),
            Object::Double(_) => Cow::Borrowed(classname::DOUBLE),
            Object::Date(_) => Cow::Borrowed(classname::DATE),
            Object::String(_) => Cow::Borrowed(classname::STRING),
            Object::Bytes(_) => Cow::Borrowed(classname::BYTE_ARRAY),
            Object::Ref(r) => Cow::Owned(r.classname().to_owned()),
            Object::List(l) => Cow::Owned(l.borrow().classname().to_owned()),
            Object::Map(m) => Cow::Owned(m.borrow().classname().to_owned()),
            Object::Exception(e) => Cow::Owned(e.borrow().classname().to_owned()),
            Object::Ext(x) => Cow::Owned(x.borrow().classname().to_owned()),
        }
    }

    /// Renames a composite value; scalars have fixed classnames.
    pub fn set_classname<S: Into<String>>(&self, name: S) -> Result<(), Error> {
        match self {
            Object::List(l) => l.borrow_mut().set_classname(name),
            Object::Map(m) => m.borrow_mut().set_classname(name),
            Object::Exception(e) => e.borrow_mut().set_classname(name),
            Object::Ext(x) => x.borrow_mut().set_classname(name),
            _ => {
                return Err(Error::class_cast(format!(
                    "can not rename {}",
                    self.classname()
                )))
            }
        }
        Ok(())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Object::Ref(_))
    }

    /// List-like by type range, following references.
    pub fn is_list(&self) -> bool {
        match self {
            Object::Ref(r) => matches!(r.target(), WeakObject::List(_)),
            _ => types::is_list_type(self.type_id()),
        }
    }

    /// Map-like by type range (exceptions included), following references.
    pub fn is_map(&self) -> bool {
        match self {
            Object::Ref(r) => matches!(
                r.target(),
                WeakObject::Map(_) | WeakObject::Exception(_)
            ),
            _ => types::is_map_type(self.type_id()),
        }
    }

    pub fn is_exception(&self) -> bool {
        match self {
            Object::Exception(_) => true,
            Object::Ref(r) => matches!(r.target(), WeakObject::Exception(_)),
            _ => false,
        }
    }

    /// Identity of a composite value or of the target of a reference.
    pub(crate) fn addr(&self) -> Option<usize> {
        match self {
            Object::List(l) => Some(Rc::as_ptr(l) as *const () as usize),
            Object::Map(m) => Some(Rc::as_ptr(m) as *const () as usize),
            Object::Exception(e) => Some(Rc::as_ptr(e) as *const () as usize),
            Object::Ext(x) => Some(Rc::as_ptr(x) as *const () as usize),
            Object::Ref(r) => Some(r.addr()),
            _ => None,
        }
    }

    /// Whether both values are the same composite instance.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        match (self.addr(), other.addr()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Total order used for map keys: type id first, then value for
    /// scalars, then identity for composites.
    pub fn total_cmp(&self, other: &Object) -> Ordering {
        self.type_id()
            .cmp(&other.type_id())
            .then_with(|| match (self, other) {
                (Object::Bool(a), Object::Bool(b)) => a.cmp(b),
                (Object::Int(a), Object::Int(b)) => a.cmp(b),
                (Object::Long(a), Object::Long(b)) => a.cmp(b),
                (Object::Double(a), Object::Double(b)) => a.total_cmp(b),
                (Object::Date(a), Object::Date(b)) => a.cmp(b),
                (Object::String(a), Object::String(b)) => a.cmp(b),
                (Object::Bytes(a), Object::Bytes(b)) => a.cmp(b),
                _ => self.addr().cmp(&other.addr()),
            })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Object::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn to_bool(&self) -> Result<bool, Error> {
        match self {
            Object::Bool(b) => Ok(*b),
            Object::Int(v) => Ok(*v != 0),
            Object::Long(v) => Ok(*v != 0),
            Object::Double(v) => Ok(*v != 0.0),
            Object::String(s) => Ok(s == "true"),
            _ => Err(self.cast_error("boolean")),
        }
    }

    pub fn to_int(&self) -> Result<i32, Error> {
        match self {
            Object::Int(v) => Ok(*v),
            Object::Long(v) => Ok(*v as i32),
            Object::Double(v) => Ok(*v as i32),
            Object::Bool(b) => Ok(*b as i32),
            Object::String(s) => parse_integer(s)
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| Error::class_cast(format!("can not cast \"{s}\" to int"))),
            _ => Err(self.cast_error("int")),
        }
    }

    pub fn to_long(&self) -> Result<i64, Error> {
        match self {
            Object::Long(v) | Object::Date(v) => Ok(*v),
            Object::Int(v) => Ok(*v as i64),
            Object::Double(v) => Ok(*v as i64),
            Object::Bool(b) => Ok(*b as i64),
            Object::String(s) => parse_integer(s)
                .ok_or_else(|| Error::class_cast(format!("can not cast \"{s}\" to long"))),
            _ => Err(self.cast_error("long")),
        }
    }

    pub fn to_double(&self) -> Result<f64, Error> {
        match self {
            Object::Double(v) => Ok(*v),
            Object::Int(v) => Ok(*v as f64),
            Object::Long(v) => Ok(*v as f64),
            Object::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Object::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::class_cast(format!("can not cast \"{s}\" to double"))),
            _ => Err(self.cast_error("double")),
        }
    }

    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> Result<String, Error> {
        match self {
            Object::String(s) => Ok(s.clone()),
            Object::Bool(b) => Ok(b.to_string()),
            Object::Int(v) => Ok(v.to_string()),
            Object::Long(v) | Object::Date(v) => Ok(v.to_string()),
            Object::Double(v) => Ok(format_double(*v)),
            Object::Bytes(b) => String::from_utf8(b.clone())
                .map_err(|_| Error::class_cast("byte array is not valid UTF-8")),
            _ => Err(self.cast_error("java.lang.String")),
        }
    }

    pub fn into_string(self) -> Result<String, Error> {
        match self {
            Object::String(s) => Ok(s),
            other => other.to_string(),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self {
            Object::Bytes(b) => Ok(b),
            Object::String(s) => Ok(s.into_bytes()),
            other => Err(other.cast_error(classname::BYTE_ARRAY)),
        }
    }

    pub fn to_list(&self) -> Result<ListRef, Error> {
        match self {
            Object::List(l) => Ok(l.clone()),
            Object::Ref(r) => r.upgrade_list().ok_or_else(|| self.cast_error("List")),
            _ => Err(self.cast_error("List")),
        }
    }

    /// Map view of map-like values; an exception yields its field map.
    pub fn to_map(&self) -> Result<MapRef, Error> {
        match self {
            Object::Map(m) => Ok(m.clone()),
            Object::Exception(e) => Ok(e.borrow().fields().clone()),
            Object::Ref(r) => match r.upgrade() {
                Some(target @ (Object::Map(_) | Object::Exception(_))) => target.to_map(),
                _ => Err(self.cast_error("Map")),
            },
            _ => Err(self.cast_error("Map")),
        }
    }

    pub fn to_exception(&self) -> Result<ExceptionRef, Error> {
        match self {
            Object::Exception(e) => Ok(e.clone()),
            Object::Ref(r) => r
                .upgrade_exception()
                .ok_or_else(|| self.cast_error("Throwable")),
            _ => Err(self.cast_error("Throwable")),
        }
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Object::Date(ms) => Utc.timestamp_millis_opt(*ms).single(),
            _ => None,
        }
    }

    /// Follows a live reference to its target; other values are cloned.
    pub fn resolve(&self) -> Object {
        match self {
            Object::Ref(r) => r.upgrade().unwrap_or(Object::Null),
            other => other.clone(),
        }
    }

    fn cast_error(&self, target: &str) -> Error {
        Error::class_cast(format!("can not cast {} to {}", self.classname(), target))
    }
}

/// Decimal or `0x` hexadecimal integer with an optional sign.
fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => {
            if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            let magnitude = i64::from_str_radix(hex, 16).ok()?;
            Some(if negative { -magnitude } else { magnitude })
        }
        None => s.parse::<i64>().ok(),
    }
}

/// Renders a double the way `java.lang.Double.toString` does.
pub(crate) fn format_double(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    let abs = v.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        if v.fract() == 0.0 {
            format!("{v:.1}")
        } else {
            format!("{v}")
        }
    } else {
        let sci = format!("{v:e}");
        match sci.split_once('e') {
            Some((mantissa, exp)) if mantissa.contains('.') => format!("{mantissa}E{exp}"),
            Some((mantissa, exp)) => format!("{mantissa}.0E{exp}"),
            None => sci,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Null, Object::Null) => true,
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::Int(a), Object::Int(b)) => a == b,
            (Object::Long(a), Object::Long(b)) => a == b,
            (Object::Double(a), Object::Double(b)) => a == b,
            (Object::Date(a), Object::Date(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Bytes(a), Object::Bytes(b)) => a == b,
            (Object::Ref(a), Object::Ref(b)) => a.addr() == b.addr(),
            (Object::List(a), Object::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Object::Map(a), Object::Map(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Object::Exception(a), Object::Exception(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Object::Ext(a), Object::Ext(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Object {
    fn from(v: bool) -> Self {
        Object::Bool(v)
    }
}

impl From<i8> for Object {
    fn from(v: i8) -> Self {
        Object::Int(v as i32)
    }
}

impl From<i16> for Object {
    fn from(v: i16) -> Self {
        Object::Int(v as i32)
    }
}

impl From<i32> for Object {
    fn from(v: i32) -> Self {
        Object::Int(v)
    }
}

impl From<i64> for Object {
    fn from(v: i64) -> Self {
        Object::Long(v)
    }
}

impl From<f32> for Object {
    fn from(v: f32) -> Self {
        Object::Double(v as f64)
    }
}

impl From<f64> for Object {
    fn from(v: f64) -> Self {
        Object::Double(v)
    }
}

impl From<&str> for Object {
    fn from(v: &str) -> Self {
        Object::String(v.to_owned())
    }
}

impl From<String> for Object {
    fn from(v: String) -> Self {
        Object::String(v)
    }
}

impl From<&[u8]> for Object {
    fn from(v: &[u8]) -> Self {
        Object::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Object {
    fn from(v: Vec<u8>) -> Self {
        Object::Bytes(v)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Object {
    fn from(v: DateTime<Tz>) -> Self {
        Object::Date(v.timestamp_millis())
    }
}

impl<T: Into<Object>> From<Option<T>> for Object {
    fn from(v: Option<T>) -> Self {
        v.map_or(Object::Null, Into::into)
    }
}

impl From<List> for Object {
    fn from(v: List) -> Self {
        Object::List(v.into_ref())
    }
}

impl From<Map> for Object {
    fn from(v: Map) -> Self {
        Object::Map(v.into_ref())
    }
}

impl From<Exception> for Object {
    fn from(v: Exception) -> Self {
        Object::Exception(v.into_ref())
    }
}

impl From<ExtObject> for Object {
    fn from(v: ExtObject) -> Self {
        Object::Ext(Rc::new(RefCell::new(v)))
    }
}

impl From<Reference> for Object {
    fn from(v: Reference) -> Self {
        Object::Ref(v)
    }
}

impl From<ListRef> for Object {
    fn from(v: ListRef) -> Self {
        Object::List(v)
    }
}

impl From<MapRef> for Object {
    fn from(v: MapRef) -> Self {
        Object::Map(v)
    }
}

impl From<ExceptionRef> for Object {
    fn from(v: ExceptionRef) -> Self {
        Object::Exception(v)
    }
}
