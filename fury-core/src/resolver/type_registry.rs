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

use crate::error::Error;
use crate::meta::{ClassInfo, Factory, FieldSpec, TypeDescriptor, TypeTag};
use crate::types::{FIRST_USER_TYPE_ID, BUILTIN_TYPES, REF_TAG};
use crate::value::Value;
use crate::{ensure, not_allowed};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Maps type ids and qualified names to descriptors, and holds the schema of
/// every registered user class.
///
/// Built-in descriptors are present from construction. User classes get ids
/// from [`FIRST_USER_TYPE_ID`] upwards; ids are never reused.
pub struct TypeRegistry {
    descriptors_by_id: HashMap<u32, TypeDescriptor>,
    ids_by_name: HashMap<String, u32>,
    classes_by_id: HashMap<u32, Arc<ClassInfo>>,
    parents: HashMap<String, String>,
    next_type_id: u32,
    sealed: bool,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = TypeRegistry {
            descriptors_by_id: HashMap::new(),
            ids_by_name: HashMap::new(),
            classes_by_id: HashMap::new(),
            parents: HashMap::new(),
            next_type_id: FIRST_USER_TYPE_ID,
            sealed: false,
        };
        registry.register_builtin_types();
        registry
    }
}

impl TypeRegistry {
    fn register_builtin_types(&mut self) {
        for type_id in BUILTIN_TYPES {
            let id = type_id as u32;
            let descriptor = TypeDescriptor::new(id, type_id.type_name(), type_id.kind());
            self.ids_by_name.insert(type_id.type_name().to_string(), id);
            self.descriptors_by_id.insert(id, descriptor);
        }
    }

    /// Registers a class under the next free id.
    ///
    /// Registering a name again with the same fields returns the existing
    /// class; different fields are rejected. So is a factory other than the
    /// one the class was first registered with.
    pub fn register(
        &mut self,
        name: &str,
        fields: Vec<FieldSpec>,
        factory: Option<Factory>,
    ) -> Result<Arc<ClassInfo>, Error> {
        self.register_class(name, None, fields, factory)
    }

    /// Registers a class under an explicit id, as agreed with peers.
    pub fn register_with_id(
        &mut self,
        name: &str,
        id: u32,
        fields: Vec<FieldSpec>,
        factory: Option<Factory>,
    ) -> Result<Arc<ClassInfo>, Error> {
        self.register_class(name, Some(id), fields, factory)
    }

    fn register_class(
        &mut self,
        name: &str,
        id: Option<u32>,
        fields: Vec<FieldSpec>,
        factory: Option<Factory>,
    ) -> Result<Arc<ClassInfo>, Error> {
        if let Some(existing) = self.get_class(name) {
            if existing.same_fields(&fields) && id.map_or(true, |id| id == existing.type_id()) {
                if let Some(factory) = &factory {
                    if !existing.has_factory(factory) {
                        not_allowed!(
                            "class {} is already registered with another factory",
                            name
                        );
                    }
                }
                return Ok(existing.clone());
            }
            not_allowed!(
                "class {} is already registered with id {} and a different schema",
                name,
                existing.type_id()
            );
        }
        if self.sealed {
            not_allowed!("type registry is sealed, cannot register class {}", name);
        }
        ensure!(
            !name.is_empty(),
            Error::not_allowed("class name must not be empty")
        );
        if self.ids_by_name.contains_key(name) {
            not_allowed!("{} is the name of a built-in type", name);
        }
        let mut seen = HashSet::new();
        for spec in &fields {
            if !seen.insert(spec.name.as_str()) {
                not_allowed!("class {} declares field {} twice", name, spec.name);
            }
        }

        let id = match id {
            Some(id) => {
                ensure!(
                    id >= FIRST_USER_TYPE_ID,
                    Error::not_allowed(format!(
                        "type id {} is reserved, user ids start at {}",
                        id, FIRST_USER_TYPE_ID
                    ))
                );
                if let Some(taken) = self.descriptors_by_id.get(&id) {
                    not_allowed!("type id {} is already taken by {}", id, taken.name());
                }
                if id >= self.next_type_id {
                    warn!(
                        "type id {} for {} is ahead of the automatic id counter ({})",
                        id, name, self.next_type_id
                    );
                }
                id
            }
            None => self.allocate_type_id(),
        };

        let class_info = Arc::new(ClassInfo::new(id, name, fields, factory));
        self.descriptors_by_id
            .insert(id, class_info.descriptor().clone());
        self.ids_by_name.insert(name.to_string(), id);
        self.classes_by_id.insert(id, class_info.clone());
        debug!(
            "registered class {} with id {} and {} fields",
            name,
            id,
            class_info.fields().len()
        );
        Ok(class_info)
    }

    fn allocate_type_id(&mut self) -> u32 {
        while self.descriptors_by_id.contains_key(&self.next_type_id) {
            self.next_type_id += 1;
        }
        let id = self.next_type_id;
        self.next_type_id += 1;
        id
    }

    /// Declares `parent` as the direct ancestor of `child`.
    ///
    /// Neither class has to be registered. Objects of an unregistered class
    /// are written with the schema of their nearest registered ancestor.
    pub fn declare_parent(&mut self, child: &str, parent: &str) -> Result<(), Error> {
        if let Some(existing) = self.parents.get(child) {
            if existing == parent {
                return Ok(());
            }
            not_allowed!(
                "{} already has parent {}, cannot declare {}",
                child,
                existing,
                parent
            );
        }
        if self.sealed {
            not_allowed!("type registry is sealed, cannot declare parent of {}", child);
        }
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            not_allowed!("declaring {} as parent of {} forms a cycle", parent, child);
        }
        self.parents.insert(child.to_string(), parent.to_string());
        Ok(())
    }

    /// Declared ancestors of `name`, nearest first.
    pub fn ancestors<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut current = name;
        std::iter::from_fn(move || {
            let parent = self.parents.get(current)?;
            current = parent.as_str();
            Some(current)
        })
    }

    /// Whether `name` is `ancestor` or one of its declared descendants.
    pub fn is_subclass_of(&self, name: &str, ancestor: &str) -> bool {
        name == ancestor || self.ancestors(name).any(|a| a == ancestor)
    }

    /// Finds the class used to write an instance of `name`: the class itself
    /// if registered, else its nearest registered ancestor. The flag tells
    /// whether an ancestor was chosen.
    pub fn resolve_class(&self, name: &str) -> Option<(&Arc<ClassInfo>, bool)> {
        if let Some(class_info) = self.get_class(name) {
            return Some((class_info, false));
        }
        self.ancestors(name)
            .find_map(|ancestor| self.get_class(ancestor))
            .map(|class_info| (class_info, true))
    }

    /// Checks every class reference in every schema and freezes the registry.
    pub fn seal(&mut self) -> Result<(), Error> {
        if self.sealed {
            return Ok(());
        }
        for class_info in self.classes_by_id.values() {
            for field in class_info.fields() {
                let mut names = Vec::new();
                field.type_tag().collect_struct_refs(&mut names);
                if let Some(missing) = names.into_iter().find(|n| self.get_class(n).is_none()) {
                    return Err(Error::unknown_type(format!(
                        "field {}.{} references unregistered class {}",
                        class_info.name(),
                        field.name(),
                        missing
                    )));
                }
            }
        }
        self.sealed = true;
        debug!(
            "type registry sealed with {} classes",
            self.classes_by_id.len()
        );
        Ok(())
    }

    #[inline(always)]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn resolve_by_id(&self, id: u32) -> Result<&TypeDescriptor, Error> {
        match self.descriptors_by_id.get(&id) {
            Some(descriptor) => Ok(descriptor),
            None if id == REF_TAG => Err(Error::unknown_type("type id 0 marks references")),
            None => Err(Error::unknown_type(format!(
                "type id {} is not registered",
                id
            ))),
        }
    }

    pub fn resolve_by_name(&self, name: &str) -> Result<&TypeDescriptor, Error> {
        self.ids_by_name
            .get(name)
            .and_then(|id| self.descriptors_by_id.get(id))
            .ok_or_else(|| Error::unknown_type(format!("type {} is not registered", name)))
    }

    pub fn class_by_id(&self, id: u32) -> Result<&Arc<ClassInfo>, Error> {
        self.classes_by_id.get(&id).ok_or_else(|| {
            Error::unknown_type(format!("type id {} is not a registered class", id))
        })
    }

    pub fn class_by_name(&self, name: &str) -> Result<&Arc<ClassInfo>, Error> {
        self.get_class(name)
            .ok_or_else(|| Error::unknown_type(format!("class {} is not registered", name)))
    }

    #[inline(always)]
    pub fn get_class(&self, name: &str) -> Option<&Arc<ClassInfo>> {
        self.ids_by_name
            .get(name)
            .and_then(|id| self.classes_by_id.get(id))
    }

    /// Number of registered user classes.
    pub fn class_count(&self) -> usize {
        self.classes_by_id.len()
    }

    /// Whether `value` may be stored in a field declared as `tag`.
    pub fn conforms(&self, tag: &TypeTag, value: &Value) -> bool {
        match (tag, value) {
            (TypeTag::Any, _) => true,
            (tag, Value::None) => !tag.is_primitive(),
            (TypeTag::Bool, Value::Bool(_))
            | (TypeTag::Int8, Value::Int8(_))
            | (TypeTag::Int16, Value::Int16(_))
            | (TypeTag::Int32, Value::Int32(_))
            | (TypeTag::Int64, Value::Int64(_))
            | (TypeTag::Float32, Value::Float32(_))
            | (TypeTag::Float64, Value::Float64(_))
            | (TypeTag::String, Value::String(_))
            | (TypeTag::Binary, Value::Binary(_))
            | (TypeTag::Date, Value::Date(_))
            | (TypeTag::Timestamp, Value::Timestamp(_))
            | (TypeTag::Opaque, Value::Opaque(_))
            | (TypeTag::StructRef(_), Value::Opaque(_)) => true,
            (TypeTag::ArrayOf(elem), Value::List(list)) => {
                let elem = elem.as_ref();
                matches!(elem, TypeTag::Any)
                    || list.borrow().iter().all(|v| self.conforms(elem, v))
            }
            (TypeTag::MapOf(key, val), Value::Map(map)) => map
                .borrow()
                .iter()
                .all(|(k, v)| self.conforms(key, k) && self.conforms(val, v)),
            (TypeTag::StructRef(name), Value::Struct(obj)) => {
                self.is_subclass_of(obj.borrow().class_name(), name)
            }
            // unregistered objects in an opaque field go through the opaque fallback
            (TypeTag::Opaque, Value::Struct(obj)) => {
                self.resolve_class(obj.borrow().class_name()).is_none()
            }
            _ => false,
        }
    }
}
