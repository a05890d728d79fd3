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
use crate::types::{LOCAL_DATE, TIMESTAMP};
use crate::util::EPOCH;
use crate::value::Value;
use chrono::{NaiveDateTime, TimeDelta};

/// Days since 1970-01-01 as a little-endian i32.
pub struct DateSerializer;

impl Serializer for DateSerializer {
    fn type_id(&self) -> u32 {
        LOCAL_DATE
    }

    fn write_data(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error> {
        let Value::Date(date) = value else {
            return Err(value_mismatch("date", value));
        };
        let days = date.signed_duration_since(EPOCH).num_days();
        let days = i32::try_from(days).map_err(|_| {
            Error::unsupported_type(format!("date {} is out of the i32 day range", date))
        })?;
        context.writer.write_i32(days);
        Ok(())
    }

    fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error> {
        let days = context.reader.read_i32()?;
        EPOCH
            .checked_add_signed(TimeDelta::days(days as i64))
            .map(Value::Date)
            .ok_or_else(|| Error::malformed_stream(format!("date offset {} is out of range", days)))
    }
}

/// Microseconds since the epoch as a little-endian i64.
pub struct TimestampSerializer;

impl Serializer for TimestampSerializer {
    fn type_id(&self) -> u32 {
        TIMESTAMP
    }

    fn write_data(&self, value: &Value, context: &mut WriteContext) -> Result<(), Error> {
        let Value::Timestamp(ts) = value else {
            return Err(value_mismatch("timestamp", value));
        };
        let micros = ts
            .signed_duration_since(NaiveDateTime::default())
            .num_microseconds()
            .ok_or_else(|| {
                Error::unsupported_type(format!("timestamp {} overflows i64 microseconds", ts))
            })?;
        context.writer.write_i64(micros);
        Ok(())
    }

    fn read_data(&self, context: &mut ReadContext) -> Result<Value, Error> {
        let micros = context.reader.read_i64()?;
        NaiveDateTime::default()
            .checked_add_signed(TimeDelta::microseconds(micros))
            .map(Value::Timestamp)
            .ok_or_else(|| {
                Error::malformed_stream(format!("timestamp {}us is out of range", micros))
            })
    }
}
