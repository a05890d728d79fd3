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
use crate::serializer::{value_mismatch, Serializer};
use crate::types::MAP;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Varuint entry count followed by tagged key/value pairs, in entry order.
pub struct MapSerializer;

impl Serializer for MapSerializer {
    fn type_id(&self) -> u32 {
        MAP
    }

    fn write_data(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error> {
        let Value::Map(map) = value else {
            return Err(value_mismatch("map", value));
        };
        let entries = map.borrow();
        let len = u32::try_from(entries.len()).map_err(|_| {
            Error::unsupported_type(format!("map of {} entries is too long", entries.len()))
        })?;
        context.writer.write_varuint32(len);
        for (key, val) in entries.iter() {
            context.write_value(key)?;
            context.write_value(val)?;
        }
        Ok(())
    }

    fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error> {
        let len = context.reader.read_varuint32()? as usize;
        let remaining = context.reader.remaining();
        ensure!(
            len <= remaining / 2,
            "map size {} exceeds the {} remaining bytes",
            len,
            remaining
        );
        let map = Rc::new(RefCell::new(Vec::with_capacity(len)));
        let value = Value::Map(map.clone());
        context.ref_reader.reference(&value);
        for _ in 0..len {
            let key = context.read_value()?;
            let val = context.read_value()?;
            map.borrow_mut().push((key, val));
        }
        Ok(value)
    }
}
