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

use std::any::Any;
use std::fmt;

/// Value of a runtime-registered `EXT_OBJECT` type.
///
/// The payload is opaque to the codec; the serializer registered for the
/// type id downcasts it and writes the wire form.
pub struct ExtObject {
    type_id: u32,
    classname: String,
    value: Box<dyn Any>,
}

impl ExtObject {
    pub fn new<S: Into<String>, T: Any>(type_id: u32, classname: S, value: T) -> ExtObject {
        ExtObject {
            type_id,
            classname: classname.into(),
            value: Box::new(value),
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

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }
}

impl fmt::Debug for ExtObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtObject")
            .field("type_id", &self.type_id)
            .field("classname", &self.classname)
            .finish_non_exhaustive()
    }
}
