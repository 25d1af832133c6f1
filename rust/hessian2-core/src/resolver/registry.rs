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

//! Extension registry: type id → serializer, classname pattern →
//! deserializer, and the counters that mint extension type ids.
//!
//! A registry is built once (usually through [`Registry::default`], which
//! installs every built-in serializer and the exception codec) and then
//! shared by reference with every [`Encoder`] and [`Decoder`]. Registration
//! needs `&mut Registry`; once built the registry is `Send + Sync`.

use std::fmt;

use crate::decoder::{Decoder, Fields};
use crate::encoder::Encoder;
use crate::ensure_registration;
use crate::error::Error;
use crate::object::Object;
use crate::serializer;
use crate::types::{self, Category};

/// Writes the body of a value whose type id the function is registered for.
pub type SerializeFn = fn(&Object, &mut Encoder<'_>) -> Result<(), Error>;

/// Builds a value from the fields of a typed map or object instance.
///
/// Receives the wire classname and a cursor over the field keys; the
/// function reads each value from the decoder and is responsible for
/// registering the value it builds with [`Decoder::add_ref`] before reading
/// nested values.
pub type DeserializeFn = fn(&str, &mut Fields, &mut Decoder<'_>) -> Result<Object, Error>;

#[derive(Clone)]
pub struct Registry {
    serializers: Vec<Option<SerializeFn>>,
    exact_deserializers: Vec<(String, DeserializeFn)>,
    suffix_deserializers: Vec<(String, DeserializeFn)>,
    last_ext_object_id: u32,
    last_ext_list_id: u32,
    last_ext_map_id: u32,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_ids: Vec<usize> = self
            .serializers
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.map(|_| id))
            .collect();
        let patterns: Vec<&str> = self
            .exact_deserializers
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(self.suffix_deserializers.iter().map(|(suffix, _)| suffix.as_str()))
            .collect();
        f.debug_struct("Registry")
            .field("serializers", &type_ids)
            .field("deserializers", &patterns)
            .field("last_ext_object_id", &self.last_ext_object_id)
            .field("last_ext_list_id", &self.last_ext_list_id)
            .field("last_ext_map_id", &self.last_ext_map_id)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::empty();
        serializer::register_builtins(&mut registry)
            .expect("built-in classname patterns are valid");
        registry
    }
}

impl Registry {
    /// A registry without any serializer or deserializer installed.
    pub fn empty() -> Registry {
        Registry {
            serializers: Vec::new(),
            exact_deserializers: Vec::new(),
            suffix_deserializers: Vec::new(),
            last_ext_object_id: types::EXT_OBJECT,
            last_ext_list_id: types::EXT_LIST,
            last_ext_map_id: types::EXCEPTION,
        }
    }

    /// Installs (or replaces) the serializer for `type_id`.
    pub fn register_serializer(&mut self, type_id: u32, f: SerializeFn) {
        let index = type_id as usize;
        if index >= self.serializers.len() {
            self.serializers.resize(index + 1, None);
        }
        self.serializers[index] = Some(f);
        log::debug!("registered serializer for type id {type_id}");
    }

    /// Installs a deserializer for a classname pattern.
    ///
    /// The pattern is either an exact classname or `*Suffix`, matching every
    /// classname ending in `Suffix`. Only the `ExtMap` category accepts
    /// deserializers. Exact patterns win over suffix patterns; among equal
    /// patterns the first registration wins.
    pub fn register_deserializer(
        &mut self,
        category: Category,
        pattern: &str,
        f: DeserializeFn,
    ) -> Result<(), Error> {
        ensure_registration!(
            category == Category::ExtMap,
            "deserializers can only be registered for the map category, got {:?}",
            category
        );
        ensure_registration!(!pattern.is_empty(), "empty classname pattern");
        match pattern.strip_prefix('*') {
            Some(suffix) => {
                ensure_registration!(
                    !suffix.is_empty() && !suffix.contains('*'),
                    "invalid classname pattern {}",
                    pattern
                );
                self.suffix_deserializers.push((suffix.to_owned(), f));
            }
            None => {
                ensure_registration!(
                    !pattern.contains('*'),
                    "wildcard is only allowed as the first character: {}",
                    pattern
                );
                self.exact_deserializers.push((pattern.to_owned(), f));
            }
        }
        log::debug!("registered deserializer for {pattern}");
        Ok(())
    }

    #[inline(always)]
    pub fn get_serializer(&self, type_id: u32) -> Option<SerializeFn> {
        self.serializers.get(type_id as usize).copied().flatten()
    }

    pub fn get_deserializer(&self, category: Category, classname: &str) -> Option<DeserializeFn> {
        if category != Category::ExtMap {
            return None;
        }
        self.exact_deserializers
            .iter()
            .find(|(name, _)| name == classname)
            .or_else(|| {
                self.suffix_deserializers
                    .iter()
                    .find(|(suffix, _)| classname.ends_with(suffix.as_str()))
            })
            .map(|(_, f)| *f)
    }

    /// Mints the next unused type id of a category.
    pub fn generate_type_id(&mut self, category: Category) -> Result<u32, Error> {
        let last = match category {
            Category::ExtObject => &mut self.last_ext_object_id,
            Category::ExtList => &mut self.last_ext_list_id,
            Category::ExtMap => &mut self.last_ext_map_id,
        };
        let next = *last + 1;
        ensure_registration!(
            next < category.limit(),
            "type id range of {:?} is exhausted",
            category
        );
        *last = next;
        Ok(next)
    }
}
