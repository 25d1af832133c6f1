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

use hessian2_core::decoder::Decoder;
use hessian2_core::object::{List, Map, Object};
use hessian2_core::{Hessian, Registry};

fn decode(bytes: &[u8]) -> Object {
    Hessian::default().deserialize(bytes).unwrap()
}

fn ints(obj: &Object) -> Vec<i32> {
    let list = obj.to_list().unwrap();
    let list = list.borrow();
    list.iter().map(|v| v.to_int().unwrap()).collect()
}

#[test]
fn test_list_encoding() {
    let hessian = Hessian::default();
    let list: List = [1, 2].into_iter().collect();
    assert_eq!(
        hessian.serialize(&Object::from(list)).unwrap(),
        vec![b'X', b'I', 0, 0, 0, 2, b'I', 0, 0, 0, 1, b'I', 0, 0, 0, 2]
    );

    let mut typed = List::with_classname("[int");
    typed.push(7);
    assert_eq!(
        hessian.serialize(&Object::from(typed)).unwrap(),
        vec![b'V', 0x04, b'[', b'i', b'n', b't', b'I', 0, 0, 0, 1, b'I', 0, 0, 0, 7]
    );
}

#[test]
fn test_list_forms() {
    // variable length, untyped
    let obj = decode(&[b'W', 0x91, 0x92, b'Z']);
    assert_eq!(ints(&obj), vec![1, 2]);
    assert_eq!(obj.classname(), "java.util.ArrayList");

    // variable length, typed
    let obj = decode(&[b'U', 0x04, b'[', b'i', b'n', b't', 0x91, b'Z']);
    assert_eq!(ints(&obj), vec![1]);
    assert_eq!(obj.classname(), "[int");

    // fixed length, typed and untyped
    let obj = decode(&[b'V', 0x04, b'[', b'i', b'n', b't', 0x92, 0x91, 0x92]);
    assert_eq!(ints(&obj), vec![1, 2]);
    let obj = decode(&[b'X', 0x93, 0x91, 0x92, 0x93]);
    assert_eq!(ints(&obj), vec![1, 2, 3]);

    // compact length, typed and untyped
    let obj = decode(&[0x72, 0x04, b'[', b'i', b'n', b't', 0x91, 0x92]);
    assert_eq!(ints(&obj), vec![1, 2]);
    assert_eq!(obj.classname(), "[int");
    let obj = decode(&[0x7a, 0x91, 0x92]);
    assert_eq!(ints(&obj), vec![1, 2]);
    let obj = decode(&[0x78]);
    assert!(obj.to_list().unwrap().borrow().is_empty());
}

#[test]
fn test_type_reference() {
    // the second list refers to the first type name by index
    let bytes = [
        0x7a, 0x72, 0x04, b'[', b'i', b'n', b't', 0x91, 0x92, 0x71, 0x90, 0x93,
    ];
    let obj = decode(&bytes);
    let outer = obj.to_list().unwrap();
    let outer = outer.borrow();
    assert_eq!(outer.get(1).unwrap().classname(), "[int");
    assert_eq!(ints(outer.get(1).unwrap()), vec![3]);

    let err = Hessian::default().deserialize(&[0x71, 0x91, 0x90]).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_map_encoding() {
    let hessian = Hessian::default();
    let mut map = Map::new();
    map.put(1, "a");
    assert_eq!(
        hessian.serialize(&Object::from(map)).unwrap(),
        vec![b'H', b'I', 0, 0, 0, 1, 0x01, b'a', b'Z']
    );

    let mut typed = Map::with_classname("com.example.Car");
    typed.put("model", "ford");
    let mut expected = vec![b'M', 0x0f];
    expected.extend_from_slice(b"com.example.Car");
    expected.push(0x05);
    expected.extend_from_slice(b"model");
    expected.push(0x04);
    expected.extend_from_slice(b"ford");
    expected.push(b'Z');
    assert_eq!(hessian.serialize(&Object::from(typed)).unwrap(), expected);
}

#[test]
fn test_unknown_classname_decodes_to_map() {
    let mut bytes = vec![b'M', 0x0b];
    bytes.extend_from_slice(b"com.foo.Bar");
    bytes.extend_from_slice(&[0x01, b'x', 0x91, 0x01, b'y', 0x01, b's', 0x91, 0x92, b'Z']);
    let obj = decode(&bytes);
    assert_eq!(obj.classname(), "com.foo.Bar");
    let map = obj.to_map().unwrap();
    let map = map.borrow();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get_str("x"), Some(&Object::Int(1)));
    assert_eq!(map.get_str("y"), Some(&Object::from("s")));
    assert_eq!(map.get(&Object::Int(1)), Some(&Object::Int(2)));
}

#[test]
fn test_list_ignores_map_deserializers() {
    // the classname matches the `*Exception` map pattern
    let mut bytes = vec![b'V', 0x14];
    bytes.extend_from_slice(b"com.foo.BarException");
    bytes.extend_from_slice(&[0x91, 0x92, b'Z']);
    let obj = decode(&bytes);
    assert!(obj.is_list());
    assert_eq!(obj.classname(), "com.foo.BarException");
    assert_eq!(ints(&obj), vec![1, 2]);

    let registry = Registry::default();
    let mut dec = Decoder::new(&bytes, &registry);
    assert!(dec.read_list().unwrap().is_list());
    assert!(dec.eof());
}

#[test]
fn test_object_instances() {
    let mut bytes = vec![0x7a, b'C', 0x0b];
    bytes.extend_from_slice(b"com.foo.Car");
    bytes.extend_from_slice(&[0x92, 0x05]);
    bytes.extend_from_slice(b"color");
    bytes.push(0x05);
    bytes.extend_from_slice(b"model");
    // compact instance of definition 0
    bytes.extend_from_slice(&[0x60, 0x03, b'r', b'e', b'd', 0x04, b'f', b'o', b'r', b'd']);
    // long form instance of definition 0
    bytes.extend_from_slice(&[b'O', 0x90, 0x04, b'b', b'l', b'u', b'e', b'N']);

    let obj = decode(&bytes);
    let list = obj.to_list().unwrap();
    let list = list.borrow();
    let red = list.get(0).unwrap().to_map().unwrap();
    assert_eq!(red.borrow().classname(), "com.foo.Car");
    assert_eq!(red.borrow().get_str("color"), Some(&Object::from("red")));
    assert_eq!(red.borrow().get_str("model"), Some(&Object::from("ford")));
    let blue = list.get(1).unwrap().to_map().unwrap();
    assert_eq!(blue.borrow().get_str("model"), Some(&Object::Null));

    // undefined class definition
    assert!(Hessian::default().deserialize(&[0x61]).unwrap_err().is_io());
}

#[test]
fn test_nested_round_trip() {
    let hessian = Hessian::default();
    let mut inner = Map::with_classname("com.example.Item");
    inner.put("name", "widget");
    inner.put("price", 9.99);
    inner.put("tags", List::from_iter(["a", "b"]));
    inner.put("raw", vec![1u8, 2, 3]);
    inner.put("when", Object::Date(1_600_000_000_000));
    let mut root = List::with_classname("[java.lang.Object");
    root.push(inner);
    root.push(Object::Null);
    root.push(true);
    root.push(i64::MAX);
    let root = Object::from(root);

    let bytes = hessian.serialize(&root).unwrap();
    let decoded = hessian.deserialize(&bytes).unwrap();
    assert_eq!(decoded, root);
    assert_eq!(decoded.type_id(), root.type_id());
    assert_eq!(decoded.classname(), "[java.lang.Object");
}

#[test]
fn test_read_list_and_map() {
    let registry = Registry::default();
    let mut dec = Decoder::new(&[b'N', 0x79, 0x91, b'H', b'Z', b'N'], &registry);
    assert!(dec.read_list().unwrap().is_null());
    assert_eq!(ints(&dec.read_list().unwrap()), vec![1]);
    assert!(dec.read_map().unwrap().to_map().unwrap().borrow().is_empty());
    assert!(dec.read_map().unwrap().is_null());

    let mut dec = Decoder::new(&[0x91], &registry);
    assert!(dec.read_list().unwrap_err().is_io());
    let mut dec = Decoder::new(&[0x78], &registry);
    assert!(dec.read_map().unwrap_err().is_io());
}

#[test]
fn test_detach() {
    let child = Object::from(Map::new());
    let mut list = List::new();
    list.push(child);
    list.push(5);

    let owned = list.detach(0).unwrap();
    assert!(list.get(0).unwrap().is_ref());
    assert!(list.get(0).unwrap().ptr_eq(&owned));
    assert_eq!(list.detach(1), Some(Object::Int(5)));
    assert_eq!(list.get(1), Some(&Object::Int(5)));

    drop(owned);
    match list.get(0).unwrap() {
        Object::Ref(r) => assert!(r.is_dangling()),
        other => panic!("unexpected {other:?}"),
    }

    let mut map = Map::new();
    map.put("k", List::new());
    let owned = map.detach(&Object::from("k")).unwrap();
    assert!(map.get_str("k").unwrap().ptr_eq(&owned));
}
