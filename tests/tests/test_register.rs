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
use fury_core::types::{FIRST_USER_TYPE_ID, STRING};
use fury_core::value::{Object, Value};
use fury_core::Fury;

#[test]
fn test_sequential_ids() {
    let mut fury = Fury::default();
    let a = fury.register_class("A", vec![]).unwrap();
    let b = fury.register_class("B", vec![field("a", TypeTag::struct_ref("A"))]).unwrap();
    assert_eq!(a.type_id(), FIRST_USER_TYPE_ID);
    assert_eq!(b.type_id(), FIRST_USER_TYPE_ID + 1);

    let registry = fury.get_type_registry();
    assert_eq!(registry.class_count(), 2);
    assert_eq!(registry.resolve_by_name("B").unwrap().id(), 101);
    assert_eq!(registry.resolve_by_id(STRING).unwrap().name(), "string");
    assert_eq!(registry.class_by_id(100).unwrap().name(), "A");
}

#[test]
fn test_register_is_idempotent() {
    let mut fury = Fury::default();
    let fields = vec![field("x", TypeTag::Int32)];
    let first = fury.register_class("P", fields.clone()).unwrap();
    let second = fury.register_class("P", fields).unwrap();
    assert_eq!(first.type_id(), second.type_id());
    assert_eq!(fury.get_type_registry().class_count(), 1);
}

#[test]
fn test_explicit_ids() {
    let mut fury = Fury::default();
    let a = fury.register_class_with_id("A", 200, vec![]).unwrap();
    let b = fury.register_class("B", vec![]).unwrap();
    assert_eq!(a.type_id(), 200);
    assert_eq!(b.type_id(), 100);
    // the counter skips ids that were taken explicitly
    fury.register_class_with_id("C", 101, vec![]).unwrap();
    assert_eq!(fury.register_class("D", vec![]).unwrap().type_id(), 102);
}

#[test]
fn test_register_rejections() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let mut fury = Fury::default();
    fury.register_class("P", vec![field("x", TypeTag::Int32)]).unwrap();

    let conflicting = fury.register_class("P", vec![field("x", TypeTag::Int64)]);
    assert!(matches!(conflicting, Err(Error::NotAllowed(_))));
    let reserved = fury.register_class_with_id("Q", 99, vec![]);
    assert!(matches!(reserved, Err(Error::NotAllowed(_))));
    let taken = fury.register_class_with_id("Q", 100, vec![]);
    assert!(matches!(taken, Err(Error::NotAllowed(_))));
    let builtin = fury.register_class("string", vec![]);
    assert!(matches!(builtin, Err(Error::NotAllowed(_))));
    let empty = fury.register_class("", vec![]);
    assert!(matches!(empty, Err(Error::NotAllowed(_))));
    let duplicate = fury.register_class(
        "R",
        vec![field("a", TypeTag::Bool), field("a", TypeTag::Int8)],
    );
    assert!(matches!(duplicate, Err(Error::NotAllowed(_))));
    // failed registrations leave no trace
    assert_eq!(fury.get_type_registry().class_count(), 1);
}

#[test]
fn test_seal() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let mut fury = Fury::default();
    fury.register_class(
        "Tree",
        vec![
            field("children", TypeTag::array_of(TypeTag::struct_ref("Tree"))),
            field("owner", TypeTag::struct_ref("Owner")),
        ],
    )
    .unwrap();
    assert!(matches!(fury.seal(), Err(Error::UnknownType(_))));
    assert!(!fury.get_type_registry().is_sealed());

    fury.register_class("Owner", vec![field("name", TypeTag::String)])
        .unwrap();
    fury.seal().unwrap();
    assert!(fury.get_type_registry().is_sealed());
    // sealing twice is harmless
    fury.seal().unwrap();

    assert!(matches!(
        fury.register_class("Late", vec![]),
        Err(Error::NotAllowed(_))
    ));
    assert!(matches!(
        fury.declare_parent("Late", "Tree"),
        Err(Error::NotAllowed(_))
    ));
    // re-registering an existing class with the same schema still succeeds
    fury.register_class("Owner", vec![field("name", TypeTag::String)])
        .unwrap();
}

#[test]
fn test_class_info() {
    let mut fury = Fury::default();
    let info = fury
        .register_class(
            "Point",
            vec![field("x", TypeTag::Int32), field("y", TypeTag::Float64)],
        )
        .unwrap();
    assert_eq!(info.name(), "Point");
    assert_eq!(info.fields().len(), 2);
    assert_eq!(info.field("y").unwrap().ordinal(), 1);
    assert_eq!(info.field("y").unwrap().type_tag(), &TypeTag::Float64);
    assert!(info.field("z").is_none());
    assert_ne!(info.struct_hash(), 0);
}

#[test]
fn test_factory_registered_once() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let mut fury = Fury::default();
    let fields = vec![field("id", TypeTag::Int64)];
    fury.register_class_with_factory("Tagged", fields.clone(), |info| {
        Object::new(info.name()).with("id", 1i64)
    })
    .unwrap();

    let replaced = fury.register_class_with_factory("Tagged", fields.clone(), |info| {
        Object::new(info.name()).with("id", 2i64)
    });
    assert!(matches!(replaced, Err(Error::NotAllowed(_))));
    // registering without a factory returns the class as first registered
    fury.register_class("Tagged", fields).unwrap();
    let object = fury.new_object("Tagged").unwrap();
    assert_eq!(object.get("id"), Some(&Value::Int64(1)));
}
