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
use crate::types::LIST;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Varuint length followed by every element as a tagged value.
pub struct ListSerializer;

impl Serializer for ListSerializer {
    fn type_id(&self) -> u32 {
        LIST
    }

    fn write_data(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error> {
        let Value::List(list) = value else {
            return Err(value_mismatch("list", value));
        };
        let items = list.borrow();
        let len = u32::try_from(items.len()).map_err(|_| {
            Error::unsupported_type(format!("list of {} items is too long", items.len()))
        })?;
        context.writer.write_varuint32(len);
        for item in items.iter() {
            context.write_value(item)?;
        }
        Ok(())
    }

    fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error> {
        let len = context.reader.read_varuint32()? as usize;
        let remaining = context.reader.remaining();
        // every element takes at least one byte
        ensure!(
            len <= remaining,
            "list length {} exceeds the {} remaining bytes",
            len,
            remaining
        );
        let list = Rc::new(RefCell::new(Vec::with_capacity(len)));
        let value = Value::List(list.clone());
        context.ref_reader.reference(&value);
        for _ in 0..len {
            let item = context.read_value()?;
            list.borrow_mut().push(item);
        }
        Ok(value)
    }
}
