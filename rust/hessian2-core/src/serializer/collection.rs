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

use crate::encoder::Encoder;
use crate::error::Error;
use crate::object::Object;

/// Writes the target of a back-edge, which becomes a `Q` back-reference
/// when the target was written before. A dangling reference is null.
pub fn write_reference(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    match obj {
        Object::Ref(r) => match r.upgrade() {
            Some(target) => enc.write_object(&target),
            None => {
                enc.write_null();
                Ok(())
            }
        },
        other => enc.write_object(other),
    }
}

/// Serializer for `LIST` and any `EXT_LIST` type id.
pub fn write_list(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    let list = obj.to_list()?;
    let list = list.borrow();
    enc.write_list_begin(list.len() as u32, list.classname());
    for item in list.iter() {
        enc.write_object(item)?;
    }
    Ok(())
}

/// Serializer for `MAP` and any `EXT_MAP` type id holding a generic map.
pub fn write_map(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    let map = obj.to_map()?;
    let map = map.borrow();
    enc.write_map_begin(map.classname());
    for (key, value) in map.iter() {
        enc.write_object(key)?;
        enc.write_object(value)?;
    }
    enc.write_map_end();
    Ok(())
}
