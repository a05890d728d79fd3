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
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{value_mismatch, Serializer};
use crate::types::TypeId;
use crate::value::Value;

macro_rules! impl_num_serializer {
    ($variant:ident, $ty:ident, $type_id:expr) => {
        paste::paste! {
            #[doc = "Fixed-width little-endian `" $ty "` payload."]
            pub struct [<$variant Serializer>];

            impl Serializer for [<$variant Serializer>] {
                #[inline(always)]
                fn type_id(&self) -> u32 {
                    $type_id as u32
                }

                #[inline(always)]
                fn write_data(
                    &self,
                    value: &Value,
                    context: &mut WriteContext,
                ) -> Result<(), Error> {
                    match value {
                        Value::$variant(v) => {
                            context.writer.[<write_ $ty>](*v);
                            Ok(())
                        }
                        other => Err(value_mismatch($type_id.type_name(), other)),
                    }
                }

                #[inline(always)]
                fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error> {
                    Ok(Value::$variant(context.reader.[<read_ $ty>]()?))
                }
            }
        }
    };
}

impl_num_serializer!(Bool, bool, TypeId::BOOL);
impl_num_serializer!(Int8, i8, TypeId::INT8);
impl_num_serializer!(Int16, i16, TypeId::INT16);
impl_num_serializer!(Int32, i32, TypeId::INT32);
impl_num_serializer!(Int64, i64, TypeId::INT64);
impl_num_serializer!(Float32, f32, TypeId::FLOAT32);
impl_num_serializer!(Float64, f64, TypeId::FLOAT64);
