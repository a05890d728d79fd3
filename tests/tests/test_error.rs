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

use chrono::NaiveDate;
use fury_core::error::Error;
use fury_core::meta::{field, TypeTag};
use fury_core::value::{Object, OpaqueObject, Value};
use fury_core::types::Language;
use fury_core::Fury;

fn sample() -> (Fury, Vec<u8>) {
    let mut fury = Fury::default().check_struct_hash(true);
    fury.register_class(
        "Record",
        vec![
            field("id", TypeTag::Int64),
            field("name", TypeTag::String),
            field("day", TypeTag::Date),
            field("values", TypeTag::array_of(TypeTag::Float64)),
            field("attrs", TypeTag::map_of(TypeTag::String, TypeTag::Any)),
            field("blob", TypeTag::Opaque),
            field("parent", TypeTag::struct_ref("Record")),
        ],
    )
    .unwrap();
    let parent = Value::object(
        Object::new("Record")
            .with("id", 1i64)
            .with("name", "root")
            .with("day", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .with("values", Value::None)
            .with("attrs", Value::None)
            .with("blob", Value::None)
            .with("parent", Value::None),
    );
    let record = Value::object(
        Object::new("Record")
            .with("id", 2i64)
            .with("name", "child")
            .with("day", NaiveDate::from_ymd_opt(2021, 6, 30).unwrap())
            .with("values", vec![Value::Float64(0.5), Value::Float64(-2.0)])
            .with(
                "attrs",
                Value::map(vec![(Value::from("k"), Value::Binary(vec![1, 2]))]),
            )
            .with("blob", OpaqueObject::new(Language::Cpp, "ns::Raw", vec![7, 7]))
            .with("parent", parent),
    );
    let bytes = fury.serialize(&record).unwrap();
    (fury, bytes)
}

#[test]
fn test_every_truncation_fails_cleanly() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let (fury, bytes) = sample();
    assert!(fury.deserialize(&bytes).is_ok());
    for len in 0..bytes.len() {
        let err = fury.deserialize(&bytes[..len]).unwrap_err();
        assert!(
            err.is_corrupt_input(),
            "prefix of {} bytes gave {:?}",
            len,
            err
        );
    }
}

#[test]
fn test_unknown_type_id() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let fury = Fury::default();
    assert!(matches!(
        fury.deserialize(&[6, 1, 99]),
        Err(Error::UnknownType(_))
    ));
    assert!(matches!(
        fury.deserialize(&[6, 1, 100]),
        Err(Error::UnknownType(_))
    ));
}

#[test]
fn test_oversized_lengths() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let fury = Fury::default();
    // list and map lengths larger than the input
    assert!(matches!(
        fury.deserialize(&[6, 1, 21, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
        Err(Error::MalformedStream(_))
    ));
    assert!(matches!(
        fury.deserialize(&[6, 1, 23, 3, 40, 40]),
        Err(Error::MalformedStream(_))
    ));
    // string length past the end
    assert!(matches!(
        fury.deserialize(&[6, 1, 12, 10, b'a']),
        Err(Error::BufferUnderflow(..))
    ));
    // varint that never terminates
    assert!(matches!(
        fury.deserialize(&[6, 1, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
        Err(Error::MalformedStream(_))
    ));
}

#[test]
fn test_invalid_payloads() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let fury = Fury::default();
    assert!(matches!(
        fury.deserialize(&[6, 1, 1, 2]),
        Err(Error::MalformedStream(_))
    ));
    assert!(matches!(
        fury.deserialize(&[6, 1, 12, 2, 0xC3, 0x28]),
        Err(Error::MalformedStream(_))
    ));
    // opaque value with an unknown language byte
    assert!(matches!(
        fury.deserialize(&[6, 1, 41, 42, 0, 0, 0, 0, 0]),
        Err(Error::MalformedStream(_))
    ));
}
