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
use crate::fury::Fury;
use crate::meta::ClassInfo;
use crate::resolver::ref_resolver::{RefReader, RefWriter};
use crate::serializer::{field_mismatch, Serializer};
use crate::types::{Language, TypeKind, OPAQUE, REF_TAG};
use crate::value::Value;
use std::collections::HashSet;
use std::mem;
use std::sync::Arc;

pub struct WriteContext<'se> {
    pub writer: &'se mut Writer,
    fury: &'se Fury,
    pub ref_writer: RefWriter,
    current_depth: u32,
    // classes already reported as written through a fallback
    fallback_logged: HashSet<String>,
}

impl<'se> WriteContext<'se> {
    pub fn new(fury: &'se Fury, writer: &'se mut Writer) -> WriteContext<'se> {
        WriteContext {
            writer,
            fury,
            ref_writer: RefWriter::new(),
            current_depth: 0,
            fallback_logged: HashSet::new(),
        }
    }

    pub fn get_fury(&self) -> &'se Fury {
        self.fury
    }

    /// Writes `value` as a tagged value: a back-reference when the same list,
    /// map or struct instance was written before, otherwise its type id
    /// followed by the payload.
    pub fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        let (serializer, kind) = self.resolve_serializer(value)?;
        if kind.is_ref_tracked()
            && self.fury.get_config().is_track_ref()
            && self.ref_writer.try_write_ref(self.writer, value)
        {
            return Ok(());
        }
        self.writer.write_varuint32(serializer.type_id());
        self.inc_depth()?;
        let result = serializer.write_data(value, self);
        self.dec_depth();
        result
    }

    /// Runs `f` with an empty reference table, restoring the current one
    /// afterwards.
    pub fn with_fresh_refs<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, Error>,
    ) -> Result<R, Error> {
        let saved = mem::take(&mut self.ref_writer);
        let result = f(self);
        self.ref_writer = saved;
        result
    }

    fn resolve_serializer(
        &mut self,
        value: &Value,
    ) -> Result<(&'se Arc<dyn Serializer>, TypeKind), Error> {
        let fury = self.fury;
        let table = fury.get_serializer_table();
        if let Some(type_id) = value.builtin_type_id() {
            return Ok((table.get(type_id as u32)?, type_id.kind()));
        }
        let Value::Struct(obj) = value else {
            return Err(Error::unsupported_type(format!(
                "no serializer for {}",
                value.type_name()
            )));
        };
        let class_name = obj.borrow().class_name().to_string();
        let registry = fury.get_type_registry();
        if let Some((class_info, via_ancestor)) = registry.resolve_class(&class_name) {
            if via_ancestor && self.fallback_logged.insert(class_name.clone()) {
                log::info!(
                    "class {} is not registered, writing it as its ancestor {}",
                    class_name,
                    class_info.name()
                );
            }
            return Ok((table.get(class_info.type_id())?, TypeKind::Struct));
        }
        if fury.get_config().is_opaque_fallback() {
            if self.fallback_logged.insert(class_name.clone()) {
                log::info!(
                    "class {} has no registered ancestor, writing it as an opaque value",
                    class_name
                );
            }
            return Ok((table.get(OPAQUE)?, TypeKind::Opaque));
        }
        Err(Error::unsupported_type(format!(
            "class {} is not registered and has no registered ancestor",
            class_name
        )))
    }

    fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        let max_depth = self.fury.get_config().max_depth();
        if self.current_depth > max_depth {
            return Err(Error::depth_exceeded(format!(
                "nesting depth exceeds the limit of {} while writing; \
                 a cycle written without reference tracking ends up here",
                max_depth
            )));
        }
        Ok(())
    }

    fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}

/// A typed field whose value was still being read when the field was set.
struct DeferredFieldCheck {
    class_info: Arc<ClassInfo>,
    ordinal: usize,
    value: Value,
}

pub struct ReadContext<'de, 'bf: 'de> {
    pub reader: Reader<'bf>,
    fury: &'de Fury,
    pub ref_reader: RefReader,
    peer_language: Language,
    current_depth: u32,
    deferred_checks: Vec<DeferredFieldCheck>,
}

impl<'de, 'bf: 'de> ReadContext<'de, 'bf> {
    pub fn new(fury: &'de Fury, reader: Reader<'bf>) -> ReadContext<'de, 'bf> {
        ReadContext {
            reader,
            fury,
            ref_reader: RefReader::new(),
            peer_language: Language::default(),
            current_depth: 0,
            deferred_checks: Vec::new(),
        }
    }

    pub fn get_fury(&self) -> &'de Fury {
        self.fury
    }

    /// Language of the peer that wrote the stream, as found in its header.
    pub fn peer_language(&self) -> Language {
        self.peer_language
    }

    pub(crate) fn set_peer_language(&mut self, language: Language) {
        self.peer_language = language;
    }

    /// Postpones the type check of field `ordinal` of `class_info` until the
    /// outermost tagged value has been read.
    pub(crate) fn defer_field_check(
        &mut self,
        class_info: &Arc<ClassInfo>,
        ordinal: usize,
        value: Value,
    ) {
        self.deferred_checks.push(DeferredFieldCheck {
            class_info: class_info.clone(),
            ordinal,
            value,
        });
    }

    fn check_deferred_fields(&mut self) -> Result<(), Error> {
        let fury = self.fury;
        let registry = fury.get_type_registry();
        for check in self.deferred_checks.drain(..) {
            let field = &check.class_info.fields()[check.ordinal];
            if !registry.conforms(field.type_tag(), &check.value) {
                return Err(field_mismatch(&check.class_info, field, &check.value));
            }
        }
        Ok(())
    }

    /// Reads one tagged value. Once the outermost value is complete, fields
    /// that pointed back at unfinished values are checked against their
    /// declared types.
    pub fn read_value(&mut self) -> Result<Value, Error> {
        let type_id = self.reader.read_varuint32()?;
        if type_id == REF_TAG {
            let ref_id = self.reader.read_varuint32()?;
            return self.ref_reader.get_ref(ref_id);
        }
        let fury = self.fury;
        let kind = fury.get_type_registry().resolve_by_id(type_id)?.kind();
        let serializer = fury.get_serializer_table().get(type_id)?;
        self.inc_depth()?;
        let result = if kind.is_ref_tracked() {
            let ref_id = self.ref_reader.reserve_ref_id();
            let result = serializer.read_data(self);
            if let Ok(value) = &result {
                self.ref_reader.set_ref(ref_id, value);
            }
            result
        } else {
            serializer.read_data(self)
        };
        self.dec_depth();
        let value = result?;
        if self.current_depth == 0 {
            self.check_deferred_fields()?;
        }
        Ok(value)
    }

    fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        let max_depth = self.fury.get_config().max_depth();
        if self.current_depth > max_depth {
            return Err(Error::depth_exceeded(format!(
                "nesting depth exceeds the limit of {} while reading",
                max_depth
            )));
        }
        Ok(())
    }

    fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}
