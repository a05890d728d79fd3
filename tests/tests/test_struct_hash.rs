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

use fury_core::error::Error;
use fury_core::meta::{field, FieldSpec, TypeTag};
use fury_core::value::{Object, Value};
use fury_core::Fury;

fn fury_with(fields: Vec<FieldSpec>) -> Fury {
    let mut fury = Fury::default().check_struct_hash(true);
    fury.register_class("Point", fields).unwrap();
    fury
}

#[test]
fn test_struct_hash_roundtrip() {
    let fury = fury_with(vec![field("x", TypeTag::Int32), field("y", TypeTag::Int32)]);
    let point = Value::object(Object::new("Point").with("x", 1).with("y", 2));
    let bytes = fury.serialize(&point).unwrap();
    // header, type id, i32 hash, two i32 fields
    assert_eq!(bytes.len(), 2 + 1 + 4 + 8);
    let hash = fury.get_type_registry().class_by_name("Point").unwrap().struct_hash();
    assert_eq!(&bytes[3..7], &(hash as i32).to_le_bytes());
    assert_eq!(fury.deserialize(&bytes).unwrap(), point);
}

#[test]
fn test_struct_hash_mismatch() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let writer = fury_with(vec![field("x", TypeTag::Int32), field("y", TypeTag::Int32)]);
    let reader = fury_with(vec![field("x", TypeTag::Int32), field("y", TypeTag::Int64)]);
    let point = Value::object(Object::new("Point").with("x", 1).with("y", 2));
    let bytes = writer.serialize(&point).unwrap();
    assert!(matches!(
        reader.deserialize(&bytes),
        Err(Error::StructVersionMismatch(_))
    ));
}

#[test]
fn test_struct_hash_ignores_field_names() {
    let a = fury_with(vec![field("x", TypeTag::Int32)]);
    let b = fury_with(vec![field("renamed", TypeTag::Int32)]);
    let hash_a = a.get_type_registry().class_by_name("Point").unwrap().struct_hash();
    let hash_b = b.get_type_registry().class_by_name("Point").unwrap().struct_hash();
    assert_eq!(hash_a, hash_b);
}

#[test]
fn test_struct_hash_depends_on_referenced_class_name() {
    let a = fury_with(vec![field("next", TypeTag::struct_ref("Point"))]);
    let b = fury_with(vec![field("next", TypeTag::struct_ref("Other"))]);
    let hash_a = a.get_type_registry().class_by_name("Point").unwrap().struct_hash();
    let hash_b = b.get_type_registry().class_by_name("Point").unwrap().struct_hash();
    assert_ne!(hash_a, hash_b);
}

#[test]
fn test_hash_disabled_by_default() {
    let mut fury = Fury::default();
    fury.register_class("Point", vec![field("x", TypeTag::Int32)])
        .unwrap();
    let bytes = fury
        .serialize(&Value::object(Object::new("Point").with("x", 5)))
        .unwrap();
    assert_eq!(bytes, vec![6, 1, 100, 5, 0, 0, 0]);
}
