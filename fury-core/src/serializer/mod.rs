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
use crate::meta::{ClassInfo, FieldSchema};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

mod datetime;
mod list;
mod map;
mod none;
mod number;
mod opaque;
mod string;
mod struct_;

pub use datetime::{DateSerializer, TimestampSerializer};
pub use list::ListSerializer;
pub use map::MapSerializer;
pub use none::NoneSerializer;
pub use number::{
    BoolSerializer, Float32Serializer, Float64Serializer, Int16Serializer, Int32Serializer,
    Int64Serializer, Int8Serializer,
};
pub use opaque::OpaqueSerializer;
pub use string::{BinarySerializer, StringSerializer};
pub use struct_::StructSerializer;

pub(crate) use string::{read_string, write_string};

/// Encodes and decodes the payload of one type.
///
/// The type id in front of the payload is handled by the contexts; a
/// serializer only sees the bytes after it. Serializers of container types
/// recurse through [`WriteContext::write_value`] and
/// [`ReadContext::read_value`].
pub trait Serializer: Send + Sync {
    /// Type id written in front of payloads produced by this serializer.
    fn type_id(&self) -> u32;

    fn write_data(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error>;

    fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error>;
}

/// Maps type ids to serializers. Built-in serializers are present from
/// construction; one [`StructSerializer`] is added per registered class.
pub struct SerializerTable {
    serializers: HashMap<u32, Arc<dyn Serializer>>,
}

impl Default for SerializerTable {
    fn default() -> Self {
        let mut table = SerializerTable {
            serializers: HashMap::new(),
        };
        table.insert(Arc::new(NoneSerializer));
        table.insert(Arc::new(BoolSerializer));
        table.insert(Arc::new(Int8Serializer));
        table.insert(Arc::new(Int16Serializer));
        table.insert(Arc::new(Int32Serializer));
        table.insert(Arc::new(Int64Serializer));
        table.insert(Arc::new(Float32Serializer));
        table.insert(Arc::new(Float64Serializer));
        table.insert(Arc::new(StringSerializer));
        table.insert(Arc::new(BinarySerializer));
        table.insert(Arc::new(DateSerializer));
        table.insert(Arc::new(TimestampSerializer));
        table.insert(Arc::new(ListSerializer));
        table.insert(Arc::new(MapSerializer));
        table.insert(Arc::new(OpaqueSerializer));
        table
    }
}

impl SerializerTable {
    pub fn insert(&mut self, serializer: Arc<dyn Serializer>) {
        self.serializers.insert(serializer.type_id(), serializer);
    }

    #[inline(always)]
    pub fn get(&self, type_id: u32) -> Result<&Arc<dyn Serializer>, Error> {
        self.serializers
            .get(&type_id)
            .ok_or_else(|| Error::unknown_type(format!("no serializer for type id {}", type_id)))
    }

    pub fn contains(&self, type_id: u32) -> bool {
        self.serializers.contains_key(&type_id)
    }
}

#[cold]
pub(crate) fn value_mismatch(expected: &str, value: &Value) -> Error {
    Error::type_mismatch(format!(
        "expected a {} value, got {}",
        expected,
        value.type_name()
    ))
}

/// A field read from the stream does not match its declared type.
#[cold]
pub(crate) fn field_mismatch(
    class_info: &ClassInfo,
    field: &FieldSchema,
    value: &Value,
) -> Error {
    Error::malformed_stream(format!(
        "field {}.{} is declared {}, read {}",
        class_info.name(),
        field.name(),
        field.type_tag(),
        value.type_name()
    ))
}
