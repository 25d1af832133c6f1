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

pub fn write_null(_obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    enc.write_null();
    Ok(())
}

pub fn write_bool(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    enc.write_bool(obj.to_bool()?);
    Ok(())
}

pub fn write_int(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    enc.write_int32(obj.to_int()?);
    Ok(())
}

pub fn write_long(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    enc.write_int64(obj.to_long()?);
    Ok(())
}

pub fn write_double(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    enc.write_double(obj.to_double()?);
    Ok(())
}

pub fn write_date(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    enc.write_utc_date(obj.to_long()?);
    Ok(())
}

pub fn write_string(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    match obj.as_str() {
        Some(s) => enc.write_utf8_string(s),
        None => enc.write_utf8_string(&obj.to_string()?),
    }
    Ok(())
}

pub fn write_byte_array(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    match obj {
        Object::Bytes(b) => enc.write_bytes(b),
        Object::String(s) => enc.write_bytes(s.as_bytes()),
        _ => {
            return Err(Error::class_cast(format!(
                "can not cast {} to [B",
                obj.classname()
            )))
        }
    }
    Ok(())
}
