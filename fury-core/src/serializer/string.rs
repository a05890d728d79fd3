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

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{value_mismatch, Serializer};
use crate::types::{BINARY, STRING};
use crate::value::Value;

/// Writes a varuint byte length followed by the UTF-8 bytes.
#[inline(always)]
pub(crate) fn write_string(writer: &mut Writer, s: &str) -> Result<(), Error> {
    let len = u32::try_from(s.len()).map_err(|_| {
        Error::unsupported_type(format!("string of {} bytes is too long", s.len()))
    })?;
    writer.write_varuint32(len);
    writer.write_utf8_string(s);
    Ok(())
}

#[inline(always)]
pub(crate) fn read_string(reader: &mut Reader) -> Result<String, Error> {
    let len = reader.read_varuint32()? as usize;
    reader.read_utf8_string(len)
}

pub struct StringSerializer;

impl Serializer for StringSerializer {
    fn type_id(&self) -> u32 {
        STRING
    }

    #[inline]
    fn write_data(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error> {
        match value {
            Value::String(s) => write_string(context.writer, s),
            other => Err(value_mismatch("string", other)),
        }
    }

    #[inline]
    fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error> {
        Ok(Value::String(read_string(&mut context.reader)?))
    }
}

/// Raw bytes: varuint length, then the bytes.
pub struct BinarySerializer;

impl Serializer for BinarySerializer {
    fn type_id(&self) -> u32 {
        BINARY
    }

    fn write_data(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error> {
        match value {
            Value::Binary(bytes) => {
                let len = u32::try_from(bytes.len()).map_err(|_| {
                    Error::unsupported_type(format!("binary of {} bytes is too long", bytes.len()))
                })?;
                context.writer.write_varuint32(len);
                context.writer.write_bytes(bytes);
                Ok(())
            }
            other => Err(value_mismatch("binary", other)),
        }
    }

    fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error> {
        let len = context.reader.read_varuint32()? as usize;
        Ok(Value::Binary(context.reader.read_bytes(len)?.to_vec()))
    }
}
