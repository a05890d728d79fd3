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

use crate::ensure;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{read_string, value_mismatch, write_string, Serializer};
use crate::types::{Language, OPAQUE};
use crate::value::{Object, OpaqueObject, Value};

/// Passthrough for values without a schema.
///
/// Payload: `[u8 language][string class name][u32 blob length][blob]`. An
/// [`OpaqueObject`] is written back verbatim. An object of an unregistered
/// class (with `opaque_fallback` enabled) becomes a blob holding its field
/// count, then each field name followed by the tagged field value. The blob
/// has its own reference scope, so readers can skip it without losing track
/// of reference ids.
pub struct OpaqueSerializer;

impl OpaqueSerializer {
    fn write_object_blob(object: &Object, context: &mut WriteContext) -> Result<(), Error> {
        let field_count = u32::try_from(object.len()).map_err(|_| {
            Error::unsupported_type(format!(
                "{} object has {} fields, too many for an opaque blob",
                object.class_name(),
                object.len()
            ))
        })?;
        let offset = context.writer.len();
        context.writer.skip(4);
        context.with_fresh_refs(|context| {
            context.writer.write_varuint32(field_count);
            for (name, value) in object.fields() {
                write_string(context.writer, name)?;
                context.write_value(value)?;
            }
            Ok(())
        })?;
        let blob_len = context.writer.len() - offset - 4;
        let blob_len = u32::try_from(blob_len).map_err(|_| {
            Error::unsupported_type(format!("opaque blob of {} bytes is too long", blob_len))
        })?;
        context.writer.set_bytes(offset, &blob_len.to_le_bytes())
    }

    /// Decodes a blob written for an unregistered object back into its fields.
    pub(crate) fn read_object_blob(
        class_name: &str,
        context: &mut ReadContext,
    ) -> Result<Object, Error> {
        let count = context.reader.read_varuint32()? as usize;
        let remaining = context.reader.remaining();
        ensure!(
            count <= remaining,
            "field count {} exceeds the {} remaining bytes",
            count,
            remaining
        );
        let mut object = Object::new(class_name);
        for _ in 0..count {
            let name = read_string(&mut context.reader)?;
            let value = context.read_value()?;
            object.set(name, value);
        }
        Ok(object)
    }
}

impl Serializer for OpaqueSerializer {
    fn type_id(&self) -> u32 {
        OPAQUE
    }

    fn write_data(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error> {
        match value {
            Value::Opaque(opaque) => {
                let len = u32::try_from(opaque.data().len()).map_err(|_| {
                    Error::unsupported_type("opaque blob is longer than u32::MAX bytes")
                })?;
                context.writer.write_u8(opaque.language() as u8);
                write_string(context.writer, opaque.class_name())?;
                context.writer.write_u32(len);
                context.writer.write_bytes(opaque.data());
                Ok(())
            }
            Value::Struct(obj) => {
                let language = context.get_fury().get_config().language();
                let object = obj.borrow();
                context.writer.write_u8(language as u8);
                write_string(context.writer, object.class_name())?;
                Self::write_object_blob(&object, context)
            }
            other => Err(value_mismatch("opaque", other)),
        }
    }

    fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error> {
        let language = Language::from_tag(context.reader.read_u8()?)?;
        let class_name = read_string(&mut context.reader)?;
        let len = context.reader.read_u32()? as usize;
        let data = context.reader.read_bytes(len)?.to_vec();
        Ok(Value::Opaque(OpaqueObject::new(language, class_name, data)))
    }
}
