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

use crate::types::{compute_string_hash, TypeId};
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Declared type of a struct field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Binary,
    Date,
    Timestamp,
    ArrayOf(Box<TypeTag>),
    MapOf(Box<TypeTag>, Box<TypeTag>),
    /// A registered class, or any of its declared descendants.
    StructRef(String),
    Opaque,
    /// Any value; the element type of heterogeneous containers.
    Any,
}

impl TypeTag {
    pub fn array_of(elem: TypeTag) -> TypeTag {
        TypeTag::ArrayOf(Box::new(elem))
    }

    pub fn map_of(key: TypeTag, value: TypeTag) -> TypeTag {
        TypeTag::MapOf(Box::new(key), Box::new(value))
    }

    pub fn struct_ref<S: Into<String>>(name: S) -> TypeTag {
        TypeTag::StructRef(name.into())
    }

    /// Fixed-width tags, written inside structs without a type id and never null.
    #[inline(always)]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeTag::Bool
                | TypeTag::Int8
                | TypeTag::Int16
                | TypeTag::Int32
                | TypeTag::Int64
                | TypeTag::Float32
                | TypeTag::Float64
                | TypeTag::Date
                | TypeTag::Timestamp
        )
    }

    /// Built-in type id of the tag. `StructRef` and `Any` have none.
    pub fn type_id(&self) -> Option<TypeId> {
        let id = match self {
            TypeTag::Bool => TypeId::BOOL,
            TypeTag::Int8 => TypeId::INT8,
            TypeTag::Int16 => TypeId::INT16,
            TypeTag::Int32 => TypeId::INT32,
            TypeTag::Int64 => TypeId::INT64,
            TypeTag::Float32 => TypeId::FLOAT32,
            TypeTag::Float64 => TypeId::FLOAT64,
            TypeTag::String => TypeId::STRING,
            TypeTag::Binary => TypeId::BINARY,
            TypeTag::Date => TypeId::LOCAL_DATE,
            TypeTag::Timestamp => TypeId::TIMESTAMP,
            TypeTag::ArrayOf(_) => TypeId::LIST,
            TypeTag::MapOf(..) => TypeId::MAP,
            TypeTag::Opaque => TypeId::OPAQUE,
            TypeTag::StructRef(_) | TypeTag::Any => return None,
        };
        Some(id)
    }

    /// Contribution of this tag to a struct hash. Class references hash their
    /// name so that the value does not depend on registration order.
    pub fn hash_id(&self) -> u32 {
        match self {
            TypeTag::StructRef(name) => compute_string_hash(name),
            TypeTag::Any => 0,
            other => other.type_id().map(|id| id as u32).unwrap_or(0),
        }
    }

    /// Value a freshly constructed instance holds for a field of this type.
    pub fn default_value(&self) -> Value {
        match self {
            TypeTag::Bool => Value::Bool(false),
            TypeTag::Int8 => Value::Int8(0),
            TypeTag::Int16 => Value::Int16(0),
            TypeTag::Int32 => Value::Int32(0),
            TypeTag::Int64 => Value::Int64(0),
            TypeTag::Float32 => Value::Float32(0.0),
            TypeTag::Float64 => Value::Float64(0.0),
            TypeTag::Date => Value::Date(NaiveDate::default()),
            TypeTag::Timestamp => Value::Timestamp(NaiveDateTime::default()),
            _ => Value::None,
        }
    }

    /// Class names referenced anywhere inside this tag.
    pub(crate) fn collect_struct_refs<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            TypeTag::StructRef(name) => names.push(name),
            TypeTag::ArrayOf(elem) => elem.collect_struct_refs(names),
            TypeTag::MapOf(key, value) => {
                key.collect_struct_refs(names);
                value.collect_struct_refs(names);
            }
            _ => {}
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::ArrayOf(elem) => write!(f, "array<{}>", elem),
            TypeTag::MapOf(key, value) => write!(f, "map<{}, {}>", key, value),
            TypeTag::StructRef(name) => write!(f, "struct {}", name),
            TypeTag::Any => write!(f, "any"),
            other => match other.type_id() {
                Some(id) => write!(f, "{}", id.type_name()),
                None => write!(f, "{:?}", other),
            },
        }
    }
}
