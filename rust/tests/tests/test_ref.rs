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

use hessian2_core::buffer::Writer;
use hessian2_core::decoder::Decoder;
use hessian2_core::encoder::Encoder;
use hessian2_core::object::{List, Map, Object, Reference};
use hessian2_core::resolver::ref_resolver::{RefReader, RefWriter};
use hessian2_core::{Hessian, Registry};

fn self_cycle() -> Object {
    let list = Rc::new(RefCell::new(List::new()));
    let obj = Object::List(list.clone());
    list.borrow_mut().push(Reference::to(&obj).unwrap());
    obj
}

#[test]
fn test_shared_value_encoding() {
    let shared = Object::from(List::new());
    let mut root = List::new();
    root.push(shared.clone());
    root.push(shared);
    let bytes = Hessian::default().serialize(&Object::from(root)).unwrap();
    assert_eq!(
        bytes,
        vec![
            b'X', b'I', 0, 0, 0, 2, // root, id 0
            b'X', b'I', 0, 0, 0, 0, // shared, id 1
            b'Q', b'I', 0, 0, 0, 1,
        ]
    );
}

#[test]
fn test_shared_value_decoding() {
    let hessian = Hessian::default();
    let mut inner = Map::new();
    inner.put("k", 1);
    let shared = Object::from(inner);
    let mut root = List::new();
    root.push(shared.clone());
    root.push(shared);
    let bytes = hessian.serialize(&Object::from(root)).unwrap();

    let decoded = hessian.deserialize(&bytes).unwrap();
    let list = decoded.to_list().unwrap();
    let list = list.borrow();
    let first = list.get(0).unwrap();
    let second = list.get(1).unwrap();
    assert!(first.is_map());
    assert!(second.is_ref());
    assert!(second.ptr_eq(first));
    assert_eq!(
        second.to_map().unwrap().borrow().get_str("k"),
        Some(&Object::Int(1))
    );
}

#[test]
fn test_self_cycle() {
    let hessian = Hessian::default();
    let root = self_cycle();
    let bytes = hessian.serialize(&root).unwrap();
    assert_eq!(
        bytes,
        vec![b'X', b'I', 0, 0, 0, 1, b'Q', b'I', 0, 0, 0, 0]
    );

    let decoded = hessian.deserialize(&bytes).unwrap();
    let list = decoded.to_list().unwrap();
    let item = list.borrow().get(0).cloned().unwrap();
    match &item {
        Object::Ref(r) => assert!(r.points_to(&decoded)),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(item.classname(), "java.util.ArrayList");
}

#[test]
fn test_map_cycle_from_wire() {
    let decoded = Hessian::default()
        .deserialize(&[b'H', 0x01, b'a', b'Q', 0x90, b'Z'])
        .unwrap();
    let map = decoded.to_map().unwrap();
    let value = map.borrow().get_str("a").cloned().unwrap();
    assert!(value.ptr_eq(&decoded));
    // re-encoding keeps the cycle
    let bytes = Hessian::default().serialize(&decoded).unwrap();
    assert_eq!(
        bytes,
        vec![b'H', 0x01, b'a', b'Q', b'I', 0, 0, 0, 0, b'Z']
    );
}

#[test]
fn test_ref_out_of_range() {
    let hessian = Hessian::default();
    let err = hessian.deserialize(&[0x79, b'Q', 0x91]).unwrap_err();
    assert!(err.is_io());
    assert_eq!(err.offset(), Some(1));
    assert!(hessian.deserialize(&[b'Q', 0x90]).unwrap_err().is_io());
    assert!(hessian.deserialize(&[b'Q', 0x8f]).unwrap_err().is_io());
}

#[test]
fn test_track_ref_disabled() {
    let hessian = Hessian::default().track_ref(false);
    let shared = Object::from(List::new());
    let mut root = List::new();
    root.push(shared.clone());
    root.push(shared);
    let bytes = hessian.serialize(&Object::from(root)).unwrap();
    assert_eq!(
        bytes,
        vec![
            b'X', b'I', 0, 0, 0, 2, b'X', b'I', 0, 0, 0, 0, b'X', b'I', 0, 0, 0, 0,
        ]
    );
    let decoded = hessian.deserialize(&bytes).unwrap();
    let list = decoded.to_list().unwrap();
    let list = list.borrow();
    assert!(!list.get(0).unwrap().ptr_eq(list.get(1).unwrap()));

    // a cycle can only end at the nesting limit
    let err = Hessian::default()
        .track_ref(false)
        .max_depth(32)
        .serialize(&self_cycle())
        .unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_temporaries_through_one_encoder() {
    let registry = Registry::default();
    let mut writer = Writer::default();
    let mut enc = Encoder::new(&mut writer, &registry);
    for i in 0..4 {
        let tmp = Object::from(List::from_iter([Object::Int(i)]));
        enc.write_object(&tmp).unwrap();
    }
    drop(enc);

    let bytes = writer.into_vec();
    assert!(!bytes.contains(&b'Q'));
    let mut dec = Decoder::new(&bytes, &registry);
    for i in 0..4 {
        let list = dec.read_object().unwrap();
        assert!(list.is_list());
        assert_eq!(list.to_list().unwrap().borrow().get(0), Some(&Object::Int(i)));
    }
    assert!(dec.eof());
}

#[test]
fn test_dangling_reference() {
    let target = Object::from(Map::new());
    let mut list = List::new();
    list.push(Reference::to(&target).unwrap());
    drop(target);
    let bytes = Hessian::default().serialize(&Object::from(list)).unwrap();
    assert_eq!(bytes, vec![b'X', b'I', 0, 0, 0, 1, b'N']);
}

#[test]
fn test_nesting_limit() {
    let mut bytes = vec![0x79; 300];
    bytes.push(0x90);
    let err = Hessian::default().deserialize(&bytes).unwrap_err();
    assert!(err.is_io());

    let mut bytes = vec![0x79; 100];
    bytes.push(0x90);
    assert!(Hessian::default().deserialize(&bytes).is_ok());
    assert!(Hessian::default().max_depth(50).deserialize(&bytes).is_err());
}

#[test]
fn test_reference_table_order() {
    // [list, map, list] each registered before its children
    let registry = Registry::default();
    let bytes = [0x7a, b'H', 0x01, b'k', 0x78, b'Z', b'Q', 0x92];
    let mut dec = Decoder::new(&bytes, &registry);
    let root = dec.read_object().unwrap();
    assert_eq!(dec.ref_count(), 3);
    assert!(dec.get_ref_object(0).unwrap().ptr_eq(&root));
    let list = root.to_list().unwrap();
    let list = list.borrow();
    let map = list.get(0).unwrap().to_map().unwrap();
    let inner = map.borrow().get_str("k").cloned().unwrap();
    assert!(list.get(1).unwrap().ptr_eq(&inner));
}

#[test]
fn test_ref_writer() {
    let mut refs = RefWriter::new();
    let mut writer = Writer::default();
    let a = Object::from(List::new());
    let b = Object::from(Map::new());
    assert!(!refs.try_write_ref(&mut writer, &Object::Int(1)));
    assert!(refs.is_empty());
    assert!(!refs.try_write_ref(&mut writer, &a));
    assert!(!refs.try_write_ref(&mut writer, &b));
    assert_eq!(refs.reserve_ref_id(), 2);
    assert!(refs.try_write_ref(&mut writer, &b));
    assert_eq!(writer.as_slice(), &[b'Q', b'I', 0, 0, 0, 1]);
    assert_eq!(refs.len(), 3);
    refs.clear();
    assert!(refs.is_empty());
    assert!(!refs.try_write_ref(&mut writer, &b));
}

#[test]
fn test_ref_reader() {
    let mut refs = RefReader::new();
    let list = Object::from(List::new());
    assert_eq!(refs.store_ref(Object::Null), 0);
    assert_eq!(refs.store_ref(list.clone()), 1);
    assert!(refs.replace_ref(0, Object::from("frame")));
    assert!(!refs.replace_ref(5, Object::Null));
    assert_eq!(refs.resolve_ref(0), Some(Object::from("frame")));
    let back = refs.resolve_ref(1).unwrap();
    assert!(back.is_ref());
    assert!(back.ptr_eq(&list));
    assert!(refs.resolve_ref(2).is_none());
    refs.clear();
    assert!(refs.is_empty());
}
