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
use crate::meta::ClassInfo;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{field_mismatch, value_mismatch, Serializer, SerializerTable};
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Payload of a registered class: an optional i32 struct hash, then every
/// field in ordinal order without names.
///
/// Fields declared with a fixed-width tag are written as the bare payload of
/// that type. All other fields are tagged values, so they may be null,
/// shared, or an instance of a subclass.
pub struct StructSerializer {
    class_info: Arc<ClassInfo>,
    // per field, the payload serializer of fixed-width fields
    primitives: Vec<Option<Arc<dyn Serializer>>>,
}

impl StructSerializer {
    pub fn new(class_info: Arc<ClassInfo>, table: &SerializerTable) -> Result<Self, Error> {
        let primitives = class_info
            .fields()
            .iter()
            .map(|field| {
                let tag = field.type_tag();
                match tag.type_id() {
                    Some(type_id) if tag.is_primitive() => {
                        table.get(type_id as u32).cloned().map(Some)
                    }
                    _ => Ok(None),
                }
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(StructSerializer {
            class_info,
            primitives,
        })
    }

    pub fn class_info(&self) -> &Arc<ClassInfo> {
        &self.class_info
    }
}

impl Serializer for StructSerializer {
    fn type_id(&self) -> u32 {
        self.class_info.type_id()
    }

    fn write_data(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error> {
        let Value::Struct(obj) = value else {
            return Err(value_mismatch(self.class_info.name(), value));
        };
        let fury = context.get_fury();
        let registry = fury.get_type_registry();
        let obj = obj.borrow();
        if !registry.is_subclass_of(obj.class_name(), self.class_info.name()) {
            return Err(Error::type_mismatch(format!(
                "{} is not a subclass of {}",
                obj.class_name(),
                self.class_info.name()
            )));
        }
        if fury.get_config().is_check_struct_hash() {
            context.writer.write_i32(self.class_info.struct_hash() as i32);
        }
        for (field, primitive) in self.class_info.fields().iter().zip(&self.primitives) {
            let field_value = obj.get(field.name()).ok_or_else(|| {
                Error::type_mismatch(format!(
                    "{} object has no field {}",
                    obj.class_name(),
                    field.name()
                ))
            })?;
            if !registry.conforms(field.type_tag(), field_value) {
                return Err(Error::type_mismatch(format!(
                    "field {}.{} is declared {}, got {}",
                    self.class_info.name(),
                    field.name(),
                    field.type_tag(),
                    field_value.type_name()
                )));
            }
            match primitive {
                Some(serializer) => serializer.write_data(field_value, context)?,
                None => context.write_value(field_value)?,
            }
        }
        Ok(())
    }

    fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error> {
        let fury = context.get_fury();
        if fury.get_config().is_check_struct_hash() {
            let read_hash = context.reader.read_i32()? as u32;
            if read_hash != self.class_info.struct_hash() {
                return Err(Error::struct_version_mismatch(format!(
                    "struct hash of {} is {} in the stream but {} locally",
                    self.class_info.name(),
                    read_hash,
                    self.class_info.struct_hash()
                )));
            }
        }
        let obj = Rc::new(RefCell::new(self.class_info.new_instance()));
        let value = Value::Struct(obj.clone());
        context.ref_reader.reference(&value);
        let registry = fury.get_type_registry();
        for (field, primitive) in self.class_info.fields().iter().zip(&self.primitives) {
            let field_value = match primitive {
                Some(serializer) => serializer.read_data(context)?,
                None => context.read_value()?,
            };
            if context.ref_reader.is_being_read(&field_value) {
                // contents are known only once the referenced value is complete
                context.defer_field_check(&self.class_info, field.ordinal(), field_value.clone());
            } else if !registry.conforms(field.type_tag(), &field_value) {
                return Err(field_mismatch(&self.class_info, field, &field_value));
            }
            obj.borrow_mut().set(field.name(), field_value);
        }
        Ok(value)
    }
}
