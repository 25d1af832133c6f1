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

use crate::buffer::Writer;
use crate::config::Config;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::Error;
use crate::object::Object;
use crate::resolver::registry::{DeserializeFn, Registry, SerializeFn};
use crate::types::Category;

/// Entry point bundling a [`Registry`] with a [`Config`].
///
/// # Examples
///
/// ```rust
/// use hessian2_core::hessian::Hessian;
/// use hessian2_core::object::{Map, Object};
///
/// let hessian = Hessian::default().max_depth(64);
/// let mut map = Map::with_classname("com.example.Point");
/// map.put("x", 1);
/// map.put("y", 2);
/// let bytes = hessian.serialize(&Object::from(map)).unwrap();
/// let decoded = hessian.deserialize(&bytes).unwrap();
/// assert_eq!(decoded.classname(), "com.example.Point");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Hessian {
    config: Config,
    registry: Registry,
}

impl Hessian {
    pub fn new(registry: Registry) -> Self {
        Hessian {
            config: Config::default(),
            registry,
        }
    }

    /// Sets the nesting limit applied to both directions.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Enables or disables back-references for repeated values on encode.
    pub fn track_ref(mut self, track_ref: bool) -> Self {
        self.config.track_ref = track_ref;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn register_serializer(&mut self, type_id: u32, f: SerializeFn) {
        self.registry.register_serializer(type_id, f);
    }

    pub fn register_deserializer(
        &mut self,
        category: Category,
        pattern: &str,
        f: DeserializeFn,
    ) -> Result<(), Error> {
        self.registry.register_deserializer(category, pattern, f)
    }

    pub fn generate_type_id(&mut self, category: Category) -> Result<u32, Error> {
        self.registry.generate_type_id(category)
    }

    pub fn serialize(&self, obj: &Object) -> Result<Vec<u8>, Error> {
        let mut writer = Writer::default();
        self.serialize_to(obj, &mut writer)?;
        Ok(writer.into_vec())
    }

    /// Appends the encoding of `obj` to `writer`.
    ///
    /// Every call starts a fresh reference table, so each appended value must
    /// be read back with its own [`Hessian::deserialize`]. Use
    /// [`Hessian::serialize_all`] for a stream read by
    /// [`Hessian::deserialize_all`].
    pub fn serialize_to(&self, obj: &Object, writer: &mut Writer) -> Result<(), Error> {
        self.encoder(writer).write_object(obj)
    }

    /// Encodes `objs` back to back, sharing one reference table.
    pub fn serialize_all(&self, objs: &[Object]) -> Result<Vec<u8>, Error> {
        let mut writer = Writer::default();
        let mut encoder = self.encoder(&mut writer);
        for obj in objs {
            encoder.write_object(obj)?;
        }
        drop(encoder);
        Ok(writer.into_vec())
    }

    fn encoder<'a>(&'a self, writer: &'a mut Writer) -> Encoder<'a> {
        Encoder::new(writer, &self.registry)
            .with_max_depth(self.config.max_depth())
            .with_track_ref(self.config.is_track_ref())
    }

    /// Decodes the first value of `bf`.
    pub fn deserialize(&self, bf: &[u8]) -> Result<Object, Error> {
        let mut decoder =
            Decoder::new(bf, &self.registry).with_max_depth(self.config.max_depth());
        decoder.read_object()
    }

    /// Decodes every value of `bf`, sharing one reference table. This is the
    /// reading side of [`Hessian::serialize_all`].
    pub fn deserialize_all(&self, bf: &[u8]) -> Result<Vec<Object>, Error> {
        let mut decoder =
            Decoder::new(bf, &self.registry).with_max_depth(self.config.max_depth());
        let mut values = Vec::new();
        while !decoder.eof() {
            values.push(decoder.read_object()?);
        }
        Ok(values)
    }
}
