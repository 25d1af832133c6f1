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
use std::rc::Rc;

use crate::object::{Object, Reference};
use crate::types::{self, classname};

/// Ordered sequence of objects, the model of a Java `List` or array.
#[derive(Clone, Debug, PartialEq)]
pub struct List {
    type_id: u32,
    classname: String,
    items: Vec<Object>,
}

impl Default for List {
    fn default() -> Self {
        List::new()
    }
}

impl List {
    pub fn new() -> List {
        List::with_classname(classname::LIST)
    }

    pub fn with_classname<S: Into<String>>(classname: S) -> List {
        List::with_type_id(types::LIST, classname)
    }

    /// List carrying an extension type id from the `EXT_LIST` range.
    pub fn with_type_id<S: Into<String>>(type_id: u32, classname: S) -> List {
        List {
            type_id,
            classname: classname.into(),
            items: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> List {
        let mut list = List::new();
        list.items.reserve(capacity);
        list
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
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Object> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.items.get_mut(index)
    }

    pub fn push<T: Into<Object>>(&mut self, value: T) {
        self.items.push(value.into());
    }

    pub fn insert<T: Into<Object>>(&mut self, index: usize, value: T) {
        self.items.insert(index, value.into());
    }

    pub fn remove(&mut self, index: usize) -> Option<Object> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Object> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[Object] {
        &self.items
    }

    /// Takes ownership of the composite at `index`, leaving a non-owning
    /// reference to it in the slot. Scalars are copied out and stay in place.
    pub fn detach(&mut self, index: usize) -> Option<Object> {
        let slot = self.items.get_mut(index)?;
        match Reference::to(slot) {
            Some(r) if !matches!(slot, Object::Ref(_)) => {
                Some(std::mem::replace(slot, Object::Ref(r)))
            }
            _ => Some(slot.clone()),
        }
    }

    pub fn into_ref(self) -> Rc<RefCell<List>> {
        Rc::new(RefCell::new(self))
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Object;
    type IntoIter = std::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for List {
    type Item = Object;
    type IntoIter = std::vec::IntoIter<Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Into<Object>> FromIterator<T> for List {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        list.items.extend(iter.into_iter().map(Into::into));
        list
    }
}
