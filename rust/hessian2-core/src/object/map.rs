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

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::object::{Object, Reference};
use crate::types::{self, classname};

/// Map key ordered by [`Object::total_cmp`].
#[derive(Clone, Debug)]
pub struct MapKey(Object);

impl MapKey {
    pub fn as_object(&self) -> &Object {
        &self.0
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MapKey {}

impl PartialOrd for MapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Associative container, the model of a Java `Map` or of a typed object
/// decoded without a registered constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    type_id: u32,
    classname: String,
    entries: BTreeMap<MapKey, Object>,
}

impl Default for Map {
    fn default() -> Self {
        Map::new()
    }
}

impl Map {
    pub fn new() -> Map {
        Map::with_classname(classname::MAP)
    }

    pub fn with_classname<S: Into<String>>(classname: S) -> Map {
        Map::with_type_id(types::MAP, classname)
    }

    /// Map carrying an extension type id from the `EXT_MAP` range.
    pub fn with_type_id<S: Into<String>>(type_id: u32, classname: S) -> Map {
        Map {
            type_id,
            classname: classname.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn type_id(&self) -> u32 {
        self.type_id
    }

    pub fn classname(&self) -> &str {
        &self.classname
    }

    pub fn set_classname<S: Into<String>>(&mut self, classname: S) {
        self.classname = classname.into();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry, returning the value previously stored under the key.
    pub fn put<K: Into<Object>, V: Into<Object>>(&mut self, key: K, value: V) -> Option<Object> {
        self.entries.insert(MapKey(key.into()), value.into())
    }

    pub fn get(&self, key: &Object) -> Option<&Object> {
        self.entries.get(&MapKey(key.clone()))
    }

    pub fn get_mut(&mut self, key: &Object) -> Option<&mut Object> {
        self.entries.get_mut(&MapKey(key.clone()))
    }

    /// Lookup by string key, the common case for decoded Java objects.
    pub fn get_str(&self, key: &str) -> Option<&Object> {
        self.get(&Object::from(key))
    }

    pub fn contains_key(&self, key: &Object) -> bool {
        self.entries.contains_key(&MapKey(key.clone()))
    }

    pub fn remove(&mut self, key: &Object) -> Option<Object> {
        self.entries.remove(&MapKey(key.clone()))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Object> {
        self.entries.keys().map(MapKey::as_object)
    }

    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.entries.values()
    }

    /// Takes ownership of the composite stored under `key`, leaving a
    /// non-owning reference to it in the entry.
    pub fn detach(&mut self, key: &Object) -> Option<Object> {
        let slot = self.entries.get_mut(&MapKey(key.clone()))?;
        match Reference::to(slot) {
            Some(r) if !matches!(slot, Object::Ref(_)) => {
                Some(std::mem::replace(slot, Object::Ref(r)))
            }
            _ => Some(slot.clone()),
        }
    }

    pub fn into_ref(self) -> Rc<RefCell<Map>> {
        Rc::new(RefCell::new(self))
    }
}

pub struct Iter<'a> {
    inner: btree_map::Iter<'a, MapKey, Object>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Object, &'a Object);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&k.0, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Object, &'a Object);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<Object>, V: Into<Object>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.put(k, v);
        }
        map
    }
}
