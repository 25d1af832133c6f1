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

use std::collections::HashMap;

use crate::buffer::Writer;
use crate::object::{Object, Reference};
use crate::tags::{BC_INT, BC_REF};

/// Reference writer for tracking shared values during encoding.
///
/// RefWriter maps the identity of every composite value written so far to
/// its sequential reference id. The ids follow first-sighting order, which
/// is the same order in which a decoder fills its reference table.
///
/// # Examples
///
/// ```rust
/// use hessian2_core::buffer::Writer;
/// use hessian2_core::object::{List, Object};
/// use hessian2_core::resolver::ref_resolver::RefWriter;
///
/// let mut ref_writer = RefWriter::new();
/// let mut writer = Writer::default();
/// let list = Object::from(List::new());
///
/// // First encounter: nothing written, the body must follow
/// assert!(!ref_writer.try_write_ref(&mut writer, &list));
/// assert!(writer.is_empty());
///
/// // Second encounter: `Q` + id 0 written
/// assert!(ref_writer.try_write_ref(&mut writer, &list.clone()));
/// assert_eq!(writer.as_slice(), &[b'Q', b'I', 0, 0, 0, 0]);
/// ```
#[derive(Default, Debug)]
pub struct RefWriter {
    /// Maps pointer addresses to reference ids. The held value keeps the
    /// address from being handed out again while the writer is alive.
    refs: HashMap<usize, (u32, Object)>,
    /// Next reference id to assign
    next_ref_id: u32,
}

impl RefWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a back-reference for a value seen before and returns `true`.
    ///
    /// On first sighting the value is recorded under the next id and `false`
    /// is returned, meaning the caller must write the body. Scalars are never
    /// tracked.
    pub fn try_write_ref(&mut self, writer: &mut Writer, obj: &Object) -> bool {
        let Some(ptr_addr) = obj.addr() else {
            return false;
        };
        if let Some((ref_id, _)) = self.refs.get(&ptr_addr) {
            write_ref_id(writer, *ref_id);
            true
        } else {
            let ref_id = self.reserve_ref_id();
            self.refs.insert(ptr_addr, (ref_id, obj.resolve()));
            false
        }
    }

    /// Consumes an id for a value the decoder will register without it
    /// being tracked here.
    pub fn reserve_ref_id(&mut self) -> u32 {
        let ref_id = self.next_ref_id;
        self.next_ref_id += 1;
        ref_id
    }

    pub fn len(&self) -> usize {
        self.next_ref_id as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_ref_id == 0
    }

    /// Clear all stored references.
    pub fn clear(&mut self) {
        self.refs.clear();
        self.next_ref_id = 0;
    }
}

/// `Q` followed by the id as a canonical 32-bit int.
pub(crate) fn write_ref_id(writer: &mut Writer, ref_id: u32) {
    writer.write_u8(BC_REF);
    writer.write_u8(BC_INT);
    writer.write_i32(ref_id as i32);
}

/// Reference reader for resolving back-references during decoding.
///
/// Every composite value is stored before its children are decoded, so a
/// child may refer back to any ancestor.
#[derive(Default, Debug)]
pub struct RefReader {
    refs: Vec<Object>,
}

impl RefReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value and returns its reference id.
    pub fn store_ref(&mut self, obj: Object) -> u32 {
        self.refs.push(obj);
        (self.refs.len() - 1) as u32
    }

    pub fn replace_ref(&mut self, ref_id: u32, obj: Object) -> bool {
        match self.refs.get_mut(ref_id as usize) {
            Some(slot) => {
                *slot = obj;
                true
            }
            None => false,
        }
    }

    pub fn get_ref(&self, ref_id: u32) -> Option<&Object> {
        self.refs.get(ref_id as usize)
    }

    /// The value a wire back-reference decodes to: a non-owning
    /// [`Reference`] for composites, a copy for plain values.
    pub fn resolve_ref(&self, ref_id: u32) -> Option<Object> {
        let target = self.get_ref(ref_id)?;
        Some(match Reference::to(target) {
            Some(r) => Object::Ref(r),
            None => target.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Drops the table's handles; values already returned stay alive.
    pub fn clear(&mut self) {
        self.refs.clear();
    }
}
