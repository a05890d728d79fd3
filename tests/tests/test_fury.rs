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
use fury_core::meta::{field, TypeTag};
use fury_core::types::{Language, FORMAT_VERSION};
use fury_core::value::{Object, Value};
use fury_core::Fury;

fn point(x: i32, y: i32) -> Value {
    Value::object(Object::new("Point").with("x", x).with("y", y))
}

#[test]
fn test_point_bytes() {
    let mut fury = Fury::default();
    fury.register_class(
        "Point",
        vec![field("x", TypeTag::Int32), field("y", TypeTag::Int32)],
    )
    .unwrap();
    let bytes = fury.serialize(&point(3, 4)).unwrap();
    assert_eq!(bytes, vec![6, 1, 100, 3, 0, 0, 0, 4, 0, 0, 0]);
    assert_eq!(fury.deserialize(&bytes).unwrap(), point(3, 4));
}

#[test]
fn test_string_bytes() {
    let fury = Fury::default();
    let bytes = fury.serialize(&Value::from("hi")).unwrap();
    assert_eq!(bytes, vec![6, 1, 12, 2, b'h', b'i']);
    assert_eq!(fury.deserialize(&bytes).unwrap(), Value::from("hi"));
}

#[test]
fn test_primitive_roundtrip() {
    let fury = Fury::default();
    let values = vec![
        Value::None,
        Value::Bool(false),
        Value::Int8(-8),
        Value::Int16(i16::MIN),
        Value::Int32(i32::MAX),
        Value::Int64(-1),
        Value::Float32(1.25),
        Value::Float64(f64::NAN),
        Value::from(""),
        Value::from("héllo wörld"),
        Value::Binary(vec![0, 255, 7]),
    ];
    for value in values {
        let bytes = fury.serialize(&value).unwrap();
        assert_eq!(fury.deserialize(&bytes).unwrap(), value);
    }
}

#[test]
fn test_none_bytes() {
    let fury = Fury::default();
    assert_eq!(fury.serialize(&Value::None).unwrap(), vec![6, 1, 40]);
}

#[test]
fn test_header_language() {
    let fury = Fury::default().language(Language::Go);
    let bytes = fury.serialize(&Value::Int8(5)).unwrap();
    assert_eq!(bytes[0], Language::Go as u8);
    assert_eq!(bytes[1], FORMAT_VERSION);
    // any known language is accepted on read
    assert_eq!(Fury::default().deserialize(&bytes).unwrap(), Value::Int8(5));
}

#[test]
fn test_header_errors() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let fury = Fury::default();
    assert!(matches!(
        fury.deserialize(&[6, 2, 40]),
        Err(Error::IncompatibleVersion(1, 2))
    ));
    assert!(matches!(
        fury.deserialize(&[9, 1, 40]),
        Err(Error::MalformedStream(_))
    ));
    assert!(matches!(
        fury.deserialize(&[]),
        Err(Error::BufferUnderflow(..))
    ));
}

#[test]
fn test_trailing_bytes() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let fury = Fury::default();
    assert!(matches!(
        fury.deserialize(&[6, 1, 40, 0]),
        Err(Error::MalformedStream(_))
    ));
}

#[test]
fn test_unregistered_class() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let fury = Fury::default();
    assert!(matches!(
        fury.serialize(&point(1, 2)),
        Err(Error::UnsupportedType(_))
    ));
}
