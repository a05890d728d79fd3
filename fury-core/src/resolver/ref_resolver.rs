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

use crate::buffer::Writer;
use crate::error::Error;
use crate::types::REF_TAG;
use crate::value::Value;
use std::collections::HashMap;

/// Reference writer for tracking shared references during serialization.
///
/// RefWriter maps the allocation address of every list, map and struct
/// instance written so far to a sequential reference id. When an instance is
/// met again, a back-reference is written instead of the instance, which is
/// what makes shared and circular graphs serializable.
///
/// # Examples
///
/// ```rust
/// use fury_core::buffer::Writer;
/// use fury_core::resolver::ref_resolver::RefWriter;
/// use fury_core::value::Value;
///
/// let mut ref_writer = RefWriter::new();
/// let mut writer = Writer::default();
/// let list = Value::list(vec![]);
///
/// // First encounter: nothing written, the caller serializes the value
/// assert!(!ref_writer.try_write_ref(&mut writer, &list));
/// assert!(writer.is_empty());
///
/// // Second encounter: back-reference [REF_TAG, id 0]
/// assert!(ref_writer.try_write_ref(&mut writer, &list.clone()));
/// assert_eq!(writer.as_slice(), &[0, 0]);
/// ```
#[derive(Default)]
pub struct RefWriter {
    /// Maps pointer addresses to reference IDs
    refs: HashMap<usize, u32>,
    /// Next reference ID to assign
    next_ref_id: u32,
}

impl RefWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `value` was seen before and a back-reference has been
    /// written. Otherwise the value gets the next id and false is returned.
    /// Values without identity always return false.
    pub fn try_write_ref(&mut self, writer: &mut Writer, value: &Value) -> bool {
        let Some(ptr_addr) = value.ref_address() else {
            return false;
        };
        if let Some(&ref_id) = self.refs.get(&ptr_addr) {
            writer.write_varuint32(REF_TAG);
            writer.write_varuint32(ref_id);
            true
        } else {
            self.refs.insert(ptr_addr, self.next_ref_id);
            self.next_ref_id += 1;
            false
        }
    }

    /// Number of ids handed out so far.
    pub fn len(&self) -> usize {
        self.next_ref_id as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_ref_id == 0
    }

    /// Clear all stored references.
    pub fn clear(&mut self) {
        self.refs.clear();
        self.next_ref_id = 0;
    }
}

/// Reference reader for resolving back-references during deserialization.
///
/// A slot is reserved when the type tag of a tracked value is read, and
/// filled as soon as the serializer has allocated the (still empty)
/// container. Children read afterwards can therefore refer back to their
/// parent.
///
/// ```rust
/// use fury_core::resolver::ref_resolver::RefReader;
/// use fury_core::value::Value;
///
/// let mut ref_reader = RefReader::new();
/// let id = ref_reader.reserve_ref_id();
/// let list = Value::list(vec![]);
/// ref_reader.reference(&list);
/// assert!(ref_reader.get_ref(id).unwrap().ptr_eq(&list));
/// assert!(ref_reader.get_ref(id + 1).is_err());
/// assert!(ref_reader.is_being_read(&list));
///
/// ref_reader.set_ref(id, &list);
/// assert!(!ref_reader.is_being_read(&list));
/// ```
#[derive(Default)]
pub struct RefReader {
    refs: Vec<Option<Value>>,
    // reserved slots not yet published
    pending: Vec<u32>,
    // reserved slots whose value is not completely read
    open: Vec<u32>,
}

impl RefReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next reference id for a value about to be read.
    pub fn reserve_ref_id(&mut self) -> u32 {
        let ref_id = self.refs.len() as u32;
        self.refs.push(None);
        self.pending.push(ref_id);
        self.open.push(ref_id);
        ref_id
    }

    /// Publishes the most recently reserved, not yet filled slot.
    pub fn reference(&mut self, value: &Value) {
        if let Some(ref_id) = self.pending.pop() {
            self.refs[ref_id as usize] = Some(value.clone());
        }
    }

    /// Fills slot `ref_id` once its value is complete. Does nothing when the
    /// serializer already published the value.
    pub fn set_ref(&mut self, ref_id: u32, value: &Value) {
        if self.pending.last() == Some(&ref_id) {
            self.pending.pop();
        }
        if self.open.last() == Some(&ref_id) {
            self.open.pop();
        }
        let slot = &mut self.refs[ref_id as usize];
        if slot.is_none() {
            *slot = Some(value.clone());
        }
    }

    /// Resolves a back-reference.
    pub fn get_ref(&self, ref_id: u32) -> Result<Value, Error> {
        match self.refs.get(ref_id as usize) {
            Some(Some(value)) => Ok(value.clone()),
            Some(None) => Err(Error::malformed_stream(format!(
                "reference {} points to an object that is still being read",
                ref_id
            ))),
            None => Err(Error::dangling_reference(ref_id, self.refs.len())),
        }
    }

    /// Whether `value` is a container or object published early whose
    /// contents are still being read.
    pub fn is_being_read(&self, value: &Value) -> bool {
        self.open.iter().any(|&ref_id| {
            matches!(&self.refs[ref_id as usize], Some(open) if open.ptr_eq(value))
        })
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn reset(&mut self) {
        self.refs.clear();
        self.pending.clear();
        self.open.clear();
    }
}
