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
use std::rc::{Rc, Weak};

use crate::object::{ExceptionRef, ExtObject, ExtRef, List, ListRef, Map, MapRef, Object};
use crate::object::Exception;

/// Weak handle to one of the composite object kinds.
#[derive(Clone, Debug)]
pub enum WeakObject {
    List(Weak<RefCell<List>>),
    Map(Weak<RefCell<Map>>),
    Exception(Weak<RefCell<Exception>>),
    Ext(Weak<RefCell<ExtObject>>),
}

impl WeakObject {
    fn addr(&self) -> usize {
        match self {
            WeakObject::List(w) => w.as_ptr() as *const () as usize,
            WeakObject::Map(w) => w.as_ptr() as *const () as usize,
            WeakObject::Exception(w) => w.as_ptr() as *const () as usize,
            WeakObject::Ext(w) => w.as_ptr() as *const () as usize,
        }
    }
}

/// Non-owning back-edge to a composite value.
///
/// Decoding yields a `Reference` for every wire back-reference to a list, map,
/// exception or extension value, so shared and cyclic graphs never form
/// strong cycles. The classname is captured when the reference is created.
#[derive(Clone, Debug)]
pub struct Reference {
    target: WeakObject,
    classname: String,
}

impl Reference {
    /// Creates a reference to a composite value. Referencing a reference
    /// yields a copy of it; scalars cannot be referenced.
    pub fn to(target: &Object) -> Option<Reference> {
        let weak = match target {
            Object::List(l) => WeakObject::List(Rc::downgrade(l)),
            Object::Map(m) => WeakObject::Map(Rc::downgrade(m)),
            Object::Exception(e) => WeakObject::Exception(Rc::downgrade(e)),
            Object::Ext(x) => WeakObject::Ext(Rc::downgrade(x)),
            Object::Ref(r) => return Some(r.clone()),
            _ => return None,
        };
        Some(Reference {
            target: weak,
            classname: target.classname().into_owned(),
        })
    }

    pub fn classname(&self) -> &str {
        &self.classname
    }

    /// The referenced value while any owner keeps it alive.
    pub fn upgrade(&self) -> Option<Object> {
        match &self.target {
            WeakObject::List(w) => w.upgrade().map(Object::List),
            WeakObject::Map(w) => w.upgrade().map(Object::Map),
            WeakObject::Exception(w) => w.upgrade().map(Object::Exception),
            WeakObject::Ext(w) => w.upgrade().map(Object::Ext),
        }
    }

    pub fn is_dangling(&self) -> bool {
        match &self.target {
            WeakObject::List(w) => w.strong_count() == 0,
            WeakObject::Map(w) => w.strong_count() == 0,
            WeakObject::Exception(w) => w.strong_count() == 0,
            WeakObject::Ext(w) => w.strong_count() == 0,
        }
    }

    pub fn target(&self) -> &WeakObject {
        &self.target
    }

    pub fn upgrade_list(&self) -> Option<ListRef> {
        match &self.target {
            WeakObject::List(w) => w.upgrade(),
            _ => None,
        }
    }

    pub fn upgrade_map(&self) -> Option<MapRef> {
        match &self.target {
            WeakObject::Map(w) => w.upgrade(),
            _ => None,
        }
    }

    pub fn upgrade_exception(&self) -> Option<ExceptionRef> {
        match &self.target {
            WeakObject::Exception(w) => w.upgrade(),
            _ => None,
        }
    }

    pub fn upgrade_ext(&self) -> Option<ExtRef> {
        match &self.target {
            WeakObject::Ext(w) => w.upgrade(),
            _ => None,
        }
    }

    /// Whether this reference points at `obj` (or at the target of `obj`
    /// when `obj` is itself a reference).
    pub fn points_to(&self, obj: &Object) -> bool {
        obj.addr() == Some(self.addr())
    }

    pub(crate) fn addr(&self) -> usize {
        self.target.addr()
    }
}
