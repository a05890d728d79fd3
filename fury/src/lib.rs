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

//! # Fury
//!
//! Fury is a cross-language object serializer. Object graphs built from
//! [`Value`]s are encoded into a compact binary stream that other Fury
//! implementations can decode, and back.
//!
//! ## Key Features
//!
//! - **Schema-aware**: classes are registered by name with an ordered list
//!   of typed fields; field values travel without names
//! - **Shared and circular references**: a list, map or object that appears
//!   twice in a graph is written once and referenced afterwards
//! - **Inheritance**: objects of an unregistered subclass are written with
//!   the schema of their nearest registered ancestor
//! - **Opaque passthrough**: values with no schema on this side are kept as
//!   raw blobs and written back unchanged
//! - **Thread safe**: a configured [`Fury`] can be shared behind an `Arc`
//!
//! ## Object Serialization
//!
//! ```rust
//! use fury::{field, Error, Fury, Object, TypeTag, Value};
//!
//! # fn main() -> Result<(), Error> {
//! let mut fury = Fury::default();
//! fury.register_class(
//!     "Address",
//!     vec![field("street", TypeTag::String), field("city", TypeTag::String)],
//! )?;
//! fury.register_class(
//!     "Person",
//!     vec![
//!         field("name", TypeTag::String),
//!         field("age", TypeTag::Int32),
//!         field("address", TypeTag::struct_ref("Address")),
//!         field("hobbies", TypeTag::array_of(TypeTag::String)),
//!         field("metadata", TypeTag::map_of(TypeTag::String, TypeTag::String)),
//!     ],
//! )?;
//! fury.seal()?;
//!
//! let address = Object::new("Address")
//!     .with("street", "123 Main St")
//!     .with("city", "New York");
//! let person = Value::object(
//!     Object::new("Person")
//!         .with("name", "John Doe")
//!         .with("age", 30)
//!         .with("address", address)
//!         .with("hobbies", vec![Value::from("reading"), Value::from("coding")])
//!         .with(
//!             "metadata",
//!             Value::map(vec![(Value::from("level"), Value::from("senior"))]),
//!         ),
//! );
//!
//! let bytes = fury.serialize(&person)?;
//! let decoded = fury.deserialize(&bytes)?;
//! assert_eq!(person, decoded);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use fury::{Fury, Language};
//!
//! let fury = Fury::default()
//!     .language(Language::Java)
//!     .check_struct_hash(true)
//!     .opaque_fallback(true)
//!     .max_depth(64);
//! assert!(fury.get_config().is_opaque_fallback());
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result`] with [`Error`]. Decoding never panics
//! on malformed input:
//!
//! ```rust
//! use fury::{Error, Fury};
//!
//! let fury = Fury::default();
//! assert!(matches!(
//!     fury.deserialize(&[6, 2, 40]),
//!     Err(Error::IncompatibleVersion(1, 2))
//! ));
//! ```

pub use fury_core::{
    error::Error, field, meta::TypeDescriptor, resolver::TypeRegistry, types::TypeId, ClassInfo,
    Config, FieldSpec, Fury, Language, Object, OpaqueObject, OpaqueSerializer, Reader, Serializer,
    StructSerializer, TypeTag, Value, Writer,
};
