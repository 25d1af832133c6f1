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

use crate::error::Error;
use crate::object::{ExceptionRef, Map, MapRef, Object};
use crate::types::{self, classname};

/// A Java throwable: detail message, formatted stack trace, optional cause,
/// plus the generic fields of its map form.
///
/// The field map shares the exception's classname and carries the
/// `EXCEPTION` type id, so an exception is map-like to the rest of the model.
#[derive(Debug)]
pub struct Exception {
    classname: String,
    fields: MapRef,
    detail_message: Option<String>,
    stack_trace: Option<Object>,
    cause: Option<Object>,
}

impl Default for Exception {
    fn default() -> Self {
        Exception::new(classname::EXCEPTION)
    }
}

impl Clone for Exception {
    fn clone(&self) -> Self {
        Exception {
            classname: self.classname.clone(),
            fields: Rc::new(RefCell::new(self.fields.borrow().clone())),
            detail_message: self.detail_message.clone(),
            stack_trace: self.stack_trace.clone(),
            cause: self.cause.clone(),
        }
    }
}

impl PartialEq for Exception {
    fn eq(&self, other: &Self) -> bool {
        self.classname == other.classname
            && self.detail_message == other.detail_message
            && self.stack_trace == other.stack_trace
            && self.cause == other.cause
            && (Rc::ptr_eq(&self.fields, &other.fields)
                || *self.fields.borrow() == *other.fields.borrow())
    }
}

impl Exception {
    pub fn new<S: Into<String>>(classname: S) -> Exception {
        let classname = classname.into();
        Exception {
            fields: Map::with_type_id(types::EXCEPTION, classname.clone()).into_ref(),
            classname,
            detail_message: None,
            stack_trace: None,
            cause: None,
        }
    }

    pub fn with_message<S: Into<String>, M: Into<String>>(classname: S, message: M) -> Exception {
        let mut e = Exception::new(classname);
        e.detail_message = Some(message.into());
        e
    }

    pub fn type_id(&self) -> u32 {
        types::EXCEPTION
    }

    pub fn classname(&self) -> &str {
        &self.classname
    }

    pub fn set_classname<S: Into<String>>(&mut self, classname: S) {
        self.classname = classname.into();
        self.fields.borrow_mut().set_classname(self.classname.clone());
    }

    pub fn detail_message(&self) -> Option<&str> {
        self.detail_message.as_deref()
    }

    pub fn set_detail_message(&mut self, message: Option<String>) {
        self.detail_message = message;
    }

    /// The detail message, empty when unset.
    pub fn what(&self) -> &str {
        self.detail_message.as_deref().unwrap_or("")
    }

    pub fn stack_trace(&self) -> Option<&Object> {
        self.stack_trace.as_ref()
    }

    pub fn set_stack_trace(&mut self, stack_trace: Option<Object>) {
        self.stack_trace = stack_trace;
    }

    /// Formatted stack frames, following a shared (referenced) trace.
    pub fn stack_trace_lines(&self) -> Vec<String> {
        let list = match self.stack_trace.as_ref().map(Object::to_list) {
            Some(Ok(list)) => list,
            _ => return Vec::new(),
        };
        let list = list.borrow();
        list.iter()
            .filter_map(|frame| frame.as_str().map(str::to_owned))
            .collect()
    }

    pub fn cause(&self) -> Option<&Object> {
        self.cause.as_ref()
    }

    /// Sets the cause, which must be an exception or a reference to one.
    pub fn set_cause(&mut self, cause: Option<Object>) -> Result<(), Error> {
        match cause {
            Some(Object::Null) | None => self.cause = None,
            Some(c) if c.is_exception() => self.cause = Some(c),
            Some(c) => {
                return Err(Error::class_cast(format!(
                    "can not cast {} to a throwable cause of {}",
                    c.classname(),
                    self.classname
                )))
            }
        }
        Ok(())
    }

    /// The cause, resolved through a back-reference when needed.
    pub fn cause_exception(&self) -> Option<ExceptionRef> {
        match self.cause.as_ref()? {
            Object::Exception(e) => Some(e.clone()),
            Object::Ref(r) => r.upgrade_exception(),
            _ => None,
        }
    }

    pub fn fields(&self) -> &MapRef {
        &self.fields
    }

    pub fn put<K: Into<Object>, V: Into<Object>>(&self, key: K, value: V) -> Option<Object> {
        self.fields.borrow_mut().put(key, value)
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        self.fields.borrow().get_str(key).cloned()
    }

    pub fn into_ref(self) -> Rc<RefCell<Exception>> {
        Rc::new(RefCell::new(self))
    }
}
