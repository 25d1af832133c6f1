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

//! # hessian2-core
//!
//! A Hessian 2.0 binary object codec, wire compatible with the Java
//! `com.caucho.hessian` implementation used by Dubbo and similar RPC
//! frameworks.
//!
//! ## Architecture
//!
//! - **`object`**: The closed object model (`Object`, `List`, `Map`,
//!   `Exception`, `Reference`, `ExtObject`) and its weak coercions
//! - **`resolver`**: The extension `Registry` and the reference tables used
//!   while encoding and decoding
//! - **`decoder`** / **`encoder`**: The two halves of the codec
//! - **`serializer`**: Built-in serializers and the exception codec
//! - **`buffer`**: Big-endian `Reader`/`Writer`
//! - **`tags`**: Wire tags, compact bands and bias formulas
//! - **`types`**: Type ids and extension categories
//! - **`hessian`**: The `Hessian` facade pairing a registry with a config
//! - **`error`**: Error handling
//!
//! ## Object graphs
//!
//! Composite values live behind `Rc<RefCell<_>>`. When the same value is
//! reachable twice, the encoder writes it once and emits a back-reference
//! for every later occurrence; the decoder turns back-references into
//! [`object::Reference`] values, weak pointers that never keep their target
//! alive, so cyclic graphs are freed when their root is dropped.
//!
//! ## Usage
//!
//! ```rust
//! use hessian2_core::buffer::Writer;
//! use hessian2_core::decoder::Decoder;
//! use hessian2_core::encoder::Encoder;
//! use hessian2_core::object::{List, Object};
//! use hessian2_core::resolver::registry::Registry;
//!
//! let registry = Registry::default();
//! let shared = Object::from(List::from_iter(["a", "b"]));
//! let mut root = List::new();
//! root.push(shared.clone());
//! root.push(shared);
//!
//! let mut writer = Writer::default();
//! Encoder::new(&mut writer, &registry)
//!     .write_object(&Object::from(root))
//!     .unwrap();
//!
//! let bytes = writer.dump();
//! let decoded = Decoder::new(&bytes, &registry).read_object().unwrap();
//! let list = decoded.to_list().unwrap();
//! let list = list.borrow();
//! assert!(list.get(1).unwrap().is_ref());
//! assert!(list.get(0).unwrap().ptr_eq(list.get(1).unwrap()));
//! ```

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod hessian;
pub mod object;
pub mod resolver;
pub mod serializer;
pub mod tags;
pub mod types;

pub use error::Error;
pub use hessian::Hessian;
pub use object::Object;
pub use resolver::registry::Registry;
