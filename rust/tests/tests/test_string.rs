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
use hessian2_core::object::Object;
use hessian2_core::{Hessian, Registry};

fn encode(s: &str) -> Vec<u8> {
    Hessian::default().serialize(&Object::from(s)).unwrap()
}

fn decode(bytes: &[u8]) -> String {
    Hessian::default()
        .deserialize(bytes)
        .unwrap()
        .into_string()
        .unwrap()
}

#[test]
fn test_short_forms() {
    assert_eq!(encode(""), vec![0x00]);
    assert_eq!(encode("hello"), vec![0x05, b'h', b'e', b'l', b'l', b'o']);

    let s31 = "a".repeat(31);
    assert_eq!(encode(&s31)[0], 0x1f);
    assert_eq!(encode(&s31).len(), 32);

    let s32 = "a".repeat(32);
    assert_eq!(&encode(&s32)[..2], &[0x30, 0x20]);

    let s1023 = "a".repeat(1023);
    assert_eq!(&encode(&s1023)[..2], &[0x33, 0xff]);

    let s1024 = "a".repeat(1024);
    assert_eq!(&encode(&s1024)[..3], &[b'S', 0x04, 0x00]);

    for s in [s31, s32, s1023, s1024] {
        assert_eq!(decode(&encode(&s)), s);
    }
    assert_eq!(decode(&[0x00]), "");
}

#[test]
fn test_chunked_string() {
    let s = "a".repeat(40000);
    let bytes = encode(&s);
    assert_eq!(bytes.len(), 3 + 32768 + 3 + 7232);
    assert_eq!(&bytes[..3], &[b'R', 0x80, 0x00]);
    // 7232 = 0x1c40
    assert_eq!(&bytes[3 + 32768..3 + 32768 + 3], &[b'S', 0x1c, 0x40]);
    assert_eq!(decode(&bytes), s);
}

#[test]
fn test_exact_chunk_size_is_not_split() {
    let s = "b".repeat(32768);
    let bytes = encode(&s);
    assert_eq!(&bytes[..3], &[b'S', 0x80, 0x00]);
    assert_eq!(bytes.len(), 3 + 32768);
    assert_eq!(decode(&bytes), s);

    let s = "b".repeat(32769);
    let bytes = encode(&s);
    assert_eq!(&bytes[..3], &[b'R', 0x80, 0x00]);
    assert_eq!(&bytes[3 + 32768..3 + 32768 + 2], &[0x01, b'b']);
    assert_eq!(decode(&bytes), s);
}

#[test]
fn test_multibyte_chars() {
    assert_eq!(encode("é"), vec![0x01, 0xc3, 0xa9]);
    assert_eq!(encode("中"), vec![0x01, 0xe4, 0xb8, 0xad]);

    // two-byte characters: chunk counts stay in characters
    let s = "é".repeat(40000);
    let bytes = encode(&s);
    assert_eq!(&bytes[..3], &[b'R', 0x80, 0x00]);
    assert_eq!(
        &bytes[3 + 2 * 32768..3 + 2 * 32768 + 3],
        &[b'S', 0x1c, 0x40]
    );
    assert_eq!(decode(&bytes), s);
}

#[test]
fn test_supplementary_chars() {
    // U+1F600 is written as the surrogate pair D83D DE00
    assert_eq!(
        encode("😀"),
        vec![0x02, 0xed, 0xa0, 0xbd, 0xed, 0xb8, 0x80]
    );
    assert_eq!(decode(&[0x02, 0xed, 0xa0, 0xbd, 0xed, 0xb8, 0x80]), "😀");
    // plain 4-byte UTF-8 is accepted as well
    assert_eq!(decode(&[0x02, 0xf0, 0x9f, 0x98, 0x80]), "😀");
}

#[test]
fn test_surrogate_pair_never_straddles_chunk() {
    let s = format!("{}😀b", "a".repeat(32767));
    let bytes = encode(&s);
    // the pair would end one unit past the limit, so the chunk stops short
    assert_eq!(&bytes[..3], &[b'R', 0x7f, 0xff]);
    assert_eq!(bytes[3 + 32767], 0x03);
    assert_eq!(decode(&bytes), s);
}

#[test]
fn test_java_chunks() {
    // chunk followed by a compact final chunk
    assert_eq!(decode(&[b'R', 0x00, 0x02, b'a', b'b', 0x01, b'c']), "abc");
    // surrogate pair split across chunks, as a Java writer may produce
    assert_eq!(
        decode(&[b'R', 0x00, 0x01, 0xed, 0xa0, 0xbd, 0x01, 0xed, 0xb8, 0x80]),
        "😀"
    );
    // an unpaired surrogate survives as a replacement character
    assert_eq!(decode(&[0x01, 0xed, 0xa0, 0xbd]), "\u{fffd}");
}

#[test]
fn test_bad_utf8() {
    let hessian = Hessian::default();
    let err = hessian.deserialize(&[0x01, 0xff]).unwrap_err();
    assert!(err.is_io());
    assert_eq!(err.offset(), Some(1));
    assert!(hessian.deserialize(&[0x01, 0xc3, 0x41]).unwrap_err().is_io());
    // a 4-byte sequence needs two units
    assert!(hessian
        .deserialize(&[0x01, 0xf0, 0x9f, 0x98, 0x80])
        .unwrap_err()
        .is_io());
}

#[test]
fn test_read_utf8_string_null() {
    let registry = Registry::default();
    let mut dec = Decoder::new(&[b'N', 0x00], &registry);
    assert_eq!(dec.read_utf8_string().unwrap(), None);
    assert_eq!(dec.read_utf8_string().unwrap().as_deref(), Some(""));
}

#[test]
fn test_string_round_trip() {
    let hessian = Hessian::default();
    for s in [
        "",
        "hello, world",
        "\u{0}",
        "naïve café",
        "日本語のテキスト",
        "mixed 😀 and 𝄞 symbols",
    ] {
        let bytes = hessian.serialize(&Object::from(s)).unwrap();
        assert_eq!(hessian.deserialize(&bytes).unwrap(), Object::from(s));
    }
}
