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

//! # Fury Core
//!
//! This is the core implementation of the Fury serialization framework: a
//! schema-aware binary encoding of dynamically typed object graphs that
//! peers written in other languages can read back.
//!
//! ## Architecture
//!
//! The core library is organized into several key modules:
//!
//! - **`fury`**: Main serialization engine and public API
//! - **`buffer`**: Little-endian binary buffers with Reader/Writer
//! - **`value`**: The dynamic value model (`Value`, `Object`, `OpaqueObject`)
//! - **`meta`**: Class schemas and field type tags
//! - **`resolver`**: Type registry, reference tracking and per-call contexts
//! - **`serializer`**: Payload encoders, one per type id
//! - **`types`**: Type ids, languages and format constants
//! - **`config`**: Settings shared by both directions of a call
//! - **`error`**: Error handling and result types
//!
//! ## Wire Format
//!
//! A stream is `[u8 language][u8 format version]` followed by exactly one
//! tagged value. A tagged value is a varuint type id and the payload of
//! that type; type id `0` instead marks a back-reference to a list, map or
//! object that appeared earlier in the same stream.
//!
//! User classes are registered with an ordered list of typed fields and
//! get ids from `100` upwards. A class payload is its field values in
//! declaration order, without names.
//!
//! ## Usage
//!
//! This crate is typically used through the higher-level `fury` crate,
//! which re-exports the public API.
//!
//! ```rust
//! use fury_core::meta::{field, TypeTag};
//! use fury_core::value::{Object, Value};
//! use fury_core::Fury;
//!
//! let mut fury = Fury::default();
//! fury.register_class(
//!     "Node",
//!     vec![field("id", TypeTag::Int32), field("next", TypeTag::struct_ref("Node"))],
//! )
//! .unwrap();
//! fury.seal().unwrap();
//!
//! // a node pointing at itself
//! let node = Value::object(Object::new("Node").with("id", 1).with("next", Value::None));
//! node.as_object().unwrap().borrow_mut().set("next", node.clone());
//!
//! let bytes = fury.serialize(&node).unwrap();
//! let decoded = fury.deserialize(&bytes).unwrap();
//! assert!(decoded.field("next").unwrap().ptr_eq(&decoded));
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod fury;
pub mod meta;
pub mod resolver;
pub mod serializer;
pub mod types;
pub mod util;
pub mod value;

pub use buffer::{Reader, Writer};
pub use config::Config;
pub use error::Error;
pub use fury::Fury;
pub use meta::{field, ClassInfo, FieldSpec, TypeTag};
pub use serializer::{OpaqueSerializer, Serializer, StructSerializer};
pub use types::Language;
pub use value::{Object, OpaqueObject, Value};
