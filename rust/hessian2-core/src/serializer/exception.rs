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

//! Codec for Java throwables.
//!
//! Decoding accepts the map form and the object-instance form, and folds
//! each `StackTraceElement` into its `toString()` line. Encoding writes the
//! classname, detail message, cause and generic fields; stack traces are
//! not written.

use std::fmt;

use crate::decoder::{Decoder, Fields};
use crate::encoder::Encoder;
use crate::error::Error;
use crate::object::{Exception, List, Object};
use crate::tags::{is_list_tag, BC_MAP, BC_NULL, BC_REF};

const DETAIL_MESSAGE: &str = "detailMessage";
const CAUSE: &str = "cause";
const STACK_TRACE: &str = "stackTrace";

const NATIVE_METHOD_LINE: i32 = -2;

/// One decoded `java.lang.StackTraceElement`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackFrame {
    pub declaring_class: String,
    pub method_name: String,
    pub file_name: Option<String>,
    pub line_number: i32,
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_class, self.method_name)?;
        if self.line_number == NATIVE_METHOD_LINE {
            return f.write_str("(Native Method)");
        }
        match self.file_name.as_deref() {
            None | Some("") => f.write_str("(Unknown Source)"),
            Some(file) if self.line_number >= 0 => write!(f, "({}:{})", file, self.line_number),
            Some(file) => write!(f, "({})", file),
        }
    }
}

pub fn read_exception(
    classname: &str,
    fields: &mut Fields,
    dec: &mut Decoder<'_>,
) -> Result<Object, Error> {
    let exception = Exception::new(classname).into_ref();
    let obj = Object::Exception(exception.clone());
    dec.add_ref(obj.clone());
    while let Some(key) = fields.next_key(dec)? {
        match key.as_str() {
            DETAIL_MESSAGE => {
                let message = dec.read_utf8_string()?;
                exception.borrow_mut().set_detail_message(message);
            }
            CAUSE => {
                let pos = dec.position();
                let cause = dec.read_object()?;
                if !cause.is_null() && !cause.is_exception() {
                    return Err(Error::io(
                        pos,
                        format!(
                            "fail to parse field 'cause' of {}: {} is not a throwable",
                            classname,
                            cause.classname()
                        ),
                    ));
                }
                exception.borrow_mut().set_cause(Some(cause))?;
            }
            STACK_TRACE => {
                let trace = read_stack_trace(dec)?;
                exception.borrow_mut().set_stack_trace(trace);
            }
            _ => {
                let value = dec.read_object()?;
                exception.borrow().put(key, value);
            }
        }
    }
    Ok(obj)
}

fn read_stack_trace(dec: &mut Decoder<'_>) -> Result<Option<Object>, Error> {
    let pos = dec.position();
    let tag = dec.peek()?;
    if tag == BC_NULL {
        dec.parse_8bit()?;
        return Ok(None);
    }
    if tag == BC_REF {
        return dec.read_ref().map(Some);
    }
    if !is_list_tag(tag) {
        return Err(Error::io(
            pos,
            format!("fail to parse field 'stackTrace', encounter value tag 0x{tag:02x}"),
        ));
    }
    let header = dec.read_list_header()?;
    let list = List::with_classname(header.classname.clone()).into_ref();
    dec.add_ref(Object::List(list.clone()));
    let mut read = 0;
    while header.has_more(dec, read)? {
        let frame = read_stack_frame(dec)?;
        list.borrow_mut().push(frame);
        read += 1;
    }
    Ok(Some(Object::List(list)))
}

fn read_stack_frame(dec: &mut Decoder<'_>) -> Result<Object, Error> {
    match dec.peek()? {
        BC_NULL => {
            dec.parse_8bit()?;
            Ok(Object::Null)
        }
        BC_REF => dec.read_ref(),
        _ => {
            let (_, mut fields) = dec.read_struct_begin()?;
            let ref_id = dec.add_ref(Object::Null);
            let mut frame = StackFrame::default();
            while let Some(key) = fields.next_key(dec)? {
                match key.as_str() {
                    "declaringClass" => {
                        frame.declaring_class = dec.read_utf8_string()?.unwrap_or_default()
                    }
                    "methodName" => frame.method_name = dec.read_utf8_string()?.unwrap_or_default(),
                    "fileName" => frame.file_name = dec.read_utf8_string()?,
                    "lineNumber" => frame.line_number = dec.read_int32()?,
                    _ => dec.skip_object()?,
                }
            }
            let line = Object::String(frame.to_string());
            dec.replace_ref(ref_id, line.clone());
            Ok(line)
        }
    }
}

pub fn write_exception(obj: &Object, enc: &mut Encoder<'_>) -> Result<(), Error> {
    let exception = obj.to_exception()?;
    let exception = exception.borrow();
    // always the typed form, even for a classname a peer would read as a plain map
    enc.writer.write_u8(BC_MAP);
    enc.write_type(exception.classname());
    enc.write_utf8_string(DETAIL_MESSAGE);
    match exception.detail_message() {
        Some(message) => enc.write_utf8_string(message),
        None => enc.write_null(),
    }
    enc.write_utf8_string(CAUSE);
    match exception.cause() {
        Some(cause) => enc.write_object(cause)?,
        None => enc.write_null(),
    }
    let fields = exception.fields().borrow();
    for (key, value) in fields.iter() {
        enc.write_object(key)?;
        enc.write_object(value)?;
    }
    enc.write_map_end();
    Ok(())
}
