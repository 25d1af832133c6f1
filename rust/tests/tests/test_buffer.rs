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

use hessian2_core::buffer::{Reader, Writer};
use hessian2_core::object::{List, Object};
use hessian2_core::Hessian;

#[test]
fn test_fixed_width() {
    let mut writer = Writer::default();
    writer.write_u8(0xab);
    writer.write_i16(-2);
    writer.write_i32(i32::MIN);
    writer.write_i64(-1);
    writer.write_f64(1.5);
    let binding = writer.dump();
    assert_eq!(binding.len(), 1 + 2 + 4 + 8 + 8);
    assert_eq!(&binding[..3], &[0xab, 0xff, 0xfe]);
    assert_eq!(&binding[3..7], &[0x80, 0, 0, 0]);

    let mut reader = Reader::new(binding.as_slice());
    assert_eq!(reader.peek_u8().unwrap(), 0xab);
    assert_eq!(reader.read_u8().unwrap(), 0xab);
    assert_eq!(reader.read_i16().unwrap(), -2);
    assert_eq!(reader.read_i32().unwrap(), i32::MIN);
    assert_eq!(reader.read_i64().unwrap(), -1);
    assert_eq!(reader.read_f64().unwrap(), 1.5);
    assert!(reader.is_eof());
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_reader_bounds() {
    let data = [1u8, 2, 3];
    let mut reader = Reader::new(&data);
    assert_eq!(reader.read_bytes(2).unwrap(), &[1, 2]);
    assert_eq!(reader.get_cursor(), 2);
    assert_eq!(reader.slice_after_cursor(), &[3]);
    let err = reader.read_u16().unwrap_err();
    assert_eq!(err.offset(), Some(2));
    // a failed read leaves the cursor in place
    assert_eq!(reader.read_u8().unwrap(), 3);
    assert!(reader.peek_u8().is_err());
    assert!(reader.read_bytes(1).is_err());
    assert_eq!(Reader::new(&data).read_bytes(3).unwrap(), &data);
}

#[test]
fn test_serialize_appends() {
    let hessian = Hessian::default();
    let mut writer = Writer::from_vec(vec![0xca, 0xfe]);
    hessian.serialize_to(&Object::Int(0), &mut writer).unwrap();
    hessian.serialize_to(&Object::from("a"), &mut writer).unwrap();
    assert_eq!(writer.as_slice(), &[0xca, 0xfe, b'I', 0, 0, 0, 0, 0x01, b'a']);

    writer.reset();
    assert!(writer.is_empty());
    hessian.serialize_to(&Object::Bool(true), &mut writer).unwrap();
    assert_eq!(writer.into_vec(), vec![b'T']);
}

#[test]
fn test_deserialize_all() {
    let hessian = Hessian::default();
    let values = hessian
        .deserialize_all(&[b'T', 0x91, 0x78, b'Q', 0x90, b'N'])
        .unwrap();
    assert_eq!(values.len(), 5);
    assert_eq!(values[0], Object::Bool(true));
    assert_eq!(values[1], Object::Int(1));
    // one reference table for the whole stream
    assert!(values[3].ptr_eq(&values[2]));
    assert!(values[4].is_null());
    assert!(hessian.deserialize_all(&[]).unwrap().is_empty());
    assert!(hessian.deserialize_all(&[0x91, b'I']).unwrap_err().is_io());
}

#[test]
fn test_serialize_all_shares_references() {
    let hessian = Hessian::default();
    let x = Object::from(List::from_iter(["x"]));
    let y = Object::from(List::from_iter(["y"]));
    let a = Object::from(List::from_iter([x.clone(), x]));
    let b = Object::from(List::from_iter([y.clone(), y]));
    let bytes = hessian.serialize_all(&[a, b]).unwrap();
    // a = 0, x = 1, b = 2, y = 3
    assert!(bytes.ends_with(&[b'Q', b'I', 0, 0, 0, 3]));

    let values = hessian.deserialize_all(&bytes).unwrap();
    assert_eq!(values.len(), 2);
    let b = values[1].to_list().unwrap();
    let b = b.borrow();
    assert!(b.get(1).unwrap().ptr_eq(b.get(0).unwrap()));
    let y = b.get(1).unwrap().to_list().unwrap();
    assert_eq!(y.borrow().get(0), Some(&Object::from("y")));
}
