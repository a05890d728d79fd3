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

use crate::meta::TypeTag;
use crate::types::{compute_field_hash, TypeKind};
use crate::value::Object;
use std::fmt;
use std::sync::Arc;

/// Builds an empty instance of a class before its fields are read.
pub type Factory = Arc<dyn Fn(&ClassInfo) -> Object + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    id: u32,
    name: String,
    kind: TypeKind,
}

impl TypeDescriptor {
    pub fn new<S: Into<String>>(id: u32, name: S, kind: TypeKind) -> Self {
        TypeDescriptor {
            id,
            name: name.into(),
            kind,
        }
    }

    #[inline(always)]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }
}

/// A field as declared by the caller at registration time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub type_tag: TypeTag,
}

impl FieldSpec {
    pub fn new<S: Into<String>>(name: S, type_tag: TypeTag) -> Self {
        FieldSpec {
            name: name.into(),
            type_tag,
        }
    }
}

/// Shorthand for [`FieldSpec::new`].
///
/// ```rust
/// use fury_core::meta::{field, TypeTag};
///
/// let fields = vec![field("x", TypeTag::Int32), field("y", TypeTag::Int32)];
/// assert_eq!(fields[1].name, "y");
/// ```
pub fn field<S: Into<String>>(name: S, type_tag: TypeTag) -> FieldSpec {
    FieldSpec::new(name, type_tag)
}

/// A registered field. `ordinal` is its position on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSchema {
    name: String,
    type_tag: TypeTag,
    ordinal: usize,
}

impl FieldSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// Static metadata of one user class: descriptor, ordered fields and factory.
pub struct ClassInfo {
    descriptor: TypeDescriptor,
    fields: Vec<FieldSchema>,
    factory: Factory,
    struct_hash: u32,
}

impl ClassInfo {
    pub(crate) fn new(
        id: u32,
        name: &str,
        specs: Vec<FieldSpec>,
        factory: Option<Factory>,
    ) -> Self {
        let fields: Vec<FieldSchema> = specs
            .into_iter()
            .enumerate()
            .map(|(ordinal, spec)| FieldSchema {
                name: spec.name,
                type_tag: spec.type_tag,
                ordinal,
            })
            .collect();
        let struct_hash = compute_struct_hash(&fields);
        ClassInfo {
            descriptor: TypeDescriptor::new(id, name, TypeKind::Struct),
            fields,
            factory: factory.unwrap_or_else(|| Arc::new(default_instance) as Factory),
            struct_hash,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    #[inline(always)]
    pub fn type_id(&self) -> u32 {
        self.descriptor.id()
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[inline(always)]
    pub fn struct_hash(&self) -> u32 {
        self.struct_hash
    }

    /// Creates an instance through the class factory.
    pub fn new_instance(&self) -> Object {
        (self.factory)(self)
    }

    pub(crate) fn has_factory(&self, factory: &Factory) -> bool {
        Arc::ptr_eq(&self.factory, factory)
    }

    /// Whether `specs` declares exactly the registered fields, in order.
    pub(crate) fn same_fields(&self, specs: &[FieldSpec]) -> bool {
        self.fields.len() == specs.len()
            && self
                .fields
                .iter()
                .zip(specs)
                .all(|(f, s)| f.name == s.name && f.type_tag == s.type_tag)
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("descriptor", &self.descriptor)
            .field("fields", &self.fields)
            .field("struct_hash", &self.struct_hash)
            .finish()
    }
}

fn default_instance(class_info: &ClassInfo) -> Object {
    let mut object = Object::new(class_info.name());
    for field in class_info.fields() {
        object.set(field.name(), field.type_tag().default_value());
    }
    object
}

fn compute_struct_hash(fields: &[FieldSchema]) -> u32 {
    let mut hash = 17;
    for field in fields {
        hash = compute_field_hash(hash, field.type_tag().hash_id());
    }
    if hash == 0 {
        hash = 1;
    }
    hash
}
