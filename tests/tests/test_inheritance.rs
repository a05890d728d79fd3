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
use fury_core::value::{Object, Value};
use fury_core::Fury;

fn zoo_fury() -> Fury {
    let mut fury = Fury::default();
    fury.register_class("Animal", vec![field("name", TypeTag::String)])
        .unwrap();
    fury.register_class(
        "Zoo",
        vec![field("animals", TypeTag::array_of(TypeTag::struct_ref("Animal")))],
    )
    .unwrap();
    fury.declare_parent("Dog", "Animal").unwrap();
    fury.declare_parent("Puppy", "Dog").unwrap();
    fury.seal().unwrap();
    fury
}

#[test]
fn test_hierarchy_queries() {
    let fury = zoo_fury();
    let registry = fury.get_type_registry();
    let ancestors: Vec<&str> = registry.ancestors("Puppy").collect();
    assert_eq!(ancestors, vec!["Dog", "Animal"]);
    assert!(registry.is_subclass_of("Puppy", "Animal"));
    assert!(registry.is_subclass_of("Animal", "Animal"));
    assert!(!registry.is_subclass_of("Animal", "Dog"));

    let (class_info, via_ancestor) = registry.resolve_class("Puppy").unwrap();
    assert_eq!(class_info.name(), "Animal");
    assert!(via_ancestor);
    assert!(registry.resolve_class("Cat").is_none());
}

#[test]
fn test_subclass_written_as_ancestor() {
    let fury = zoo_fury();
    let puppy = Value::object(
        Object::new("Puppy")
            .with("name", "Rex")
            .with("breed", "beagle"),
    );
    let bytes = fury.serialize(&puppy).unwrap();
    assert_eq!(bytes[2], 100);
    let decoded = fury.deserialize(&bytes).unwrap();
    let decoded = decoded.as_object().unwrap().borrow();
    assert_eq!(decoded.class_name(), "Animal");
    assert_eq!(decoded.get("name"), Some(&Value::from("Rex")));
    assert!(decoded.get("breed").is_none());
}

#[test]
fn test_subclass_in_declared_field() {
    let fury = zoo_fury();
    let zoo = Value::object(Object::new("Zoo").with(
        "animals",
        vec![
            Value::object(Object::new("Animal").with("name", "Generic")),
            Value::object(Object::new("Dog").with("name", "Fido")),
        ],
    ));
    let decoded = fury.deserialize(&fury.serialize(&zoo).unwrap()).unwrap();
    let animals = decoded.field("animals").unwrap();
    let animals = animals.as_list().unwrap().borrow();
    assert_eq!(animals[1].field("name"), Some(Value::from("Fido")));
}

#[test]
fn test_non_subclass_in_declared_field() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let mut fury = zoo_fury_unsealed();
    fury.register_class("Rock", vec![]).unwrap();
    let zoo = Value::object(Object::new("Zoo").with(
        "animals",
        vec![Value::object(Object::new("Rock"))],
    ));
    assert!(matches!(fury.serialize(&zoo), Err(Error::TypeMismatch(_))));
}

fn zoo_fury_unsealed() -> Fury {
    let mut fury = Fury::default();
    fury.register_class("Animal", vec![field("name", TypeTag::String)])
        .unwrap();
    fury.register_class(
        "Zoo",
        vec![field("animals", TypeTag::array_of(TypeTag::struct_ref("Animal")))],
    )
    .unwrap();
    fury
}

#[test]
fn test_declare_parent_rejections() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let mut fury = zoo_fury_unsealed();
    fury.declare_parent("Dog", "Animal").unwrap();
    // repeating a declaration is fine
    fury.declare_parent("Dog", "Animal").unwrap();
    assert!(matches!(
        fury.declare_parent("Dog", "Zoo"),
        Err(Error::NotAllowed(_))
    ));
    assert!(matches!(
        fury.declare_parent("Animal", "Dog"),
        Err(Error::NotAllowed(_))
    ));
    assert!(matches!(
        fury.declare_parent("Cat", "Cat"),
        Err(Error::NotAllowed(_))
    ));
}

#[test]
fn test_ancestor_preferred_over_opaque_fallback() {
    let mut fury = zoo_fury_unsealed().opaque_fallback(true);
    fury.declare_parent("Dog", "Animal").unwrap();
    let dog = Value::object(Object::new("Dog").with("name", "Fido"));
    let cat = Value::object(Object::new("Cat").with("name", "Tom"));
    let decoded = fury.deserialize(&fury.serialize(&dog).unwrap()).unwrap();
    assert_eq!(decoded.field("name"), Some(Value::from("Fido")));
    let decoded = fury.deserialize(&fury.serialize(&cat).unwrap()).unwrap();
    assert_eq!(decoded.as_opaque().unwrap().class_name(), "Cat");
}
