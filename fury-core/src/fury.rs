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
use crate::config::Config;
use crate::ensure;
use crate::error::Error;
use crate::meta::{ClassInfo, Factory, FieldSpec};
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::pool::Pool;
use crate::resolver::type_registry::TypeRegistry;
use crate::serializer::{OpaqueSerializer, SerializerTable, StructSerializer};
use crate::types::{Language, FORMAT_VERSION};
use crate::value::{Object, OpaqueObject, Value};
use log::debug;
use std::sync::Arc;

/// Pooled writers that grew past this capacity are released instead of kept.
const MAX_POOLED_WRITER_CAPACITY: usize = 1 << 20;

/// The main Fury serialization instance.
///
/// `Fury` owns the type registry, the serializer table and the
/// configuration. Classes are registered through `&mut self`; once the
/// instance is shared (for example behind an `Arc`), `serialize` and
/// `deserialize` only read it, so any number of threads can call them
/// concurrently.
///
/// # Examples
///
/// ```rust
/// use fury_core::meta::{field, TypeTag};
/// use fury_core::value::{Object, Value};
/// use fury_core::Fury;
///
/// let mut fury = Fury::default();
/// fury.register_class("Point", vec![field("x", TypeTag::Int32), field("y", TypeTag::Int32)])
///     .unwrap();
///
/// let point = Value::object(Object::new("Point").with("x", 3).with("y", 4));
/// let bytes = fury.serialize(&point).unwrap();
/// assert_eq!(bytes, vec![6, 1, 100, 3, 0, 0, 0, 4, 0, 0, 0]);
/// assert_eq!(fury.deserialize(&bytes).unwrap(), point);
/// ```
///
/// Custom configuration:
///
/// ```rust
/// use fury_core::types::Language;
/// use fury_core::Fury;
///
/// let fury = Fury::default()
///     .language(Language::Xlang)
///     .track_ref(false)
///     .max_depth(16);
/// assert_eq!(fury.get_config().max_depth(), 16);
/// ```
pub struct Fury {
    config: Config,
    type_registry: TypeRegistry,
    serializer_table: SerializerTable,
    writer_pool: Pool<Writer>,
}

impl Default for Fury {
    fn default() -> Self {
        Fury::with_config(Config::default())
    }
}

impl Fury {
    pub fn with_config(config: Config) -> Self {
        Fury {
            config,
            type_registry: TypeRegistry::default(),
            serializer_table: SerializerTable::default(),
            writer_pool: Pool::with_recycle(Writer::default, |writer: &mut Writer| {
                writer.reset();
                writer.bf.capacity() <= MAX_POOLED_WRITER_CAPACITY
            }),
        }
    }

    /// Sets the language written into the header of every stream.
    pub fn language(mut self, language: Language) -> Self {
        self.config.language = language;
        self
    }

    /// Enables or disables reference tracking on write.
    ///
    /// With tracking disabled a shared list, map or object is written once
    /// per occurrence and a cyclic graph fails with `DepthExceeded`. Readers
    /// handle both kinds of stream regardless of their own setting.
    pub fn track_ref(mut self, track_ref: bool) -> Self {
        self.config.track_ref = track_ref;
        self
    }

    /// Sets the maximum nesting depth of values. The default is 128.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Prefixes every struct payload with a hash of its field types, and
    /// rejects payloads whose hash differs from the local schema.
    pub fn check_struct_hash(mut self, check_struct_hash: bool) -> Self {
        self.config.check_struct_hash = check_struct_hash;
        self
    }

    /// Writes objects of unregistered classes without a registered
    /// ancestor as opaque values instead of failing.
    pub fn opaque_fallback(mut self, opaque_fallback: bool) -> Self {
        self.config.opaque_fallback = opaque_fallback;
        self
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn get_type_registry(&self) -> &TypeRegistry {
        &self.type_registry
    }

    pub fn get_serializer_table(&self) -> &SerializerTable {
        &self.serializer_table
    }

    /// Registers a class under the next free type id.
    ///
    /// Fields are written in declaration order. Registering the same name
    /// again with identical fields returns the existing class.
    pub fn register_class(
        &mut self,
        name: &str,
        fields: Vec<FieldSpec>,
    ) -> Result<Arc<ClassInfo>, Error> {
        let class_info = self.type_registry.register(name, fields, None)?;
        self.install(class_info)
    }

    /// Registers a class under an id agreed with the peers, which must be at
    /// least [`FIRST_USER_TYPE_ID`](crate::types::FIRST_USER_TYPE_ID).
    pub fn register_class_with_id(
        &mut self,
        name: &str,
        id: u32,
        fields: Vec<FieldSpec>,
    ) -> Result<Arc<ClassInfo>, Error> {
        let class_info = self.type_registry.register_with_id(name, id, fields, None)?;
        self.install(class_info)
    }

    /// Registers a class whose instances are created by `factory` before
    /// their fields are read. A class can be given a factory only once:
    /// registering it again with a factory fails with `NotAllowed`.
    ///
    /// ```rust
    /// use fury_core::meta::{field, TypeTag};
    /// use fury_core::value::Object;
    /// use fury_core::Fury;
    ///
    /// let mut fury = Fury::default();
    /// fury.register_class_with_factory("Tagged", vec![field("id", TypeTag::Int64)], |info| {
    ///     Object::new(info.name()).with("id", 0i64).with("source", "decoded")
    /// })
    /// .unwrap();
    /// let object = fury.new_object("Tagged").unwrap();
    /// assert_eq!(object.get("source").and_then(|v| v.as_str()), Some("decoded"));
    /// ```
    pub fn register_class_with_factory<F>(
        &mut self,
        name: &str,
        fields: Vec<FieldSpec>,
        factory: F,
    ) -> Result<Arc<ClassInfo>, Error>
    where
        F: Fn(&ClassInfo) -> Object + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(factory);
        let class_info = self.type_registry.register(name, fields, Some(factory))?;
        self.install(class_info)
    }

    fn install(&mut self, class_info: Arc<ClassInfo>) -> Result<Arc<ClassInfo>, Error> {
        let serializer = StructSerializer::new(class_info.clone(), &self.serializer_table)?;
        self.serializer_table.insert(Arc::new(serializer));
        Ok(class_info)
    }

    /// Declares `parent` as the direct ancestor of `child`. See
    /// [`TypeRegistry::declare_parent`].
    pub fn declare_parent(&mut self, child: &str, parent: &str) -> Result<(), Error> {
        self.type_registry.declare_parent(child, parent)
    }

    /// Verifies that every class referenced by a field is registered and
    /// freezes registration.
    pub fn seal(&mut self) -> Result<(), Error> {
        self.type_registry.seal()
    }

    /// Builds an instance of a registered class through its factory.
    pub fn new_object(&self, class_name: &str) -> Result<Object, Error> {
        Ok(self.type_registry.class_by_name(class_name)?.new_instance())
    }

    fn write_head(&self, writer: &mut Writer) {
        writer.write_u8(self.config.language() as u8);
        writer.write_u8(FORMAT_VERSION);
    }

    fn read_head(&self, reader: &mut Reader) -> Result<Language, Error> {
        let language_tag = reader.read_u8()?;
        let version = reader.read_u8()?;
        ensure!(
            version == FORMAT_VERSION,
            Error::incompatible_version(FORMAT_VERSION, version)
        );
        let language = Language::from_tag(language_tag)?;
        debug!("reading stream written by {:?}", language);
        Ok(language)
    }

    /// Serializes `value` into a new byte vector.
    pub fn serialize(&self, value: &Value) -> Result<Vec<u8>, Error> {
        self.writer_pool.borrow_mut(|writer| {
            writer.reset();
            self.serialize_to(writer, value)?;
            Ok(writer.dump())
        })
    }

    /// Appends a complete stream (header and root value) to `writer`.
    pub fn serialize_to(&self, writer: &mut Writer, value: &Value) -> Result<(), Error> {
        self.write_head(writer);
        let mut context = WriteContext::new(self, writer);
        context.write_value(value)
    }

    /// Deserializes one stream. The whole input must be consumed.
    pub fn deserialize(&self, bf: &[u8]) -> Result<Value, Error> {
        let mut reader = Reader::new(bf);
        let language = self.read_head(&mut reader)?;
        let mut context = ReadContext::new(self, reader);
        context.set_peer_language(language);
        let value = context.read_value()?;
        let trailing = context.reader.remaining();
        ensure!(
            trailing == 0,
            "{} unread bytes after the root value",
            trailing
        );
        Ok(value)
    }

    /// Decodes the blob of an opaque value written by the opaque fallback
    /// into an [`Object`] of the recorded class.
    pub fn decode_opaque(&self, opaque: &OpaqueObject) -> Result<Object, Error> {
        let mut context = ReadContext::new(self, Reader::new(opaque.data()));
        context.set_peer_language(opaque.language());
        let object = OpaqueSerializer::read_object_blob(opaque.class_name(), &mut context)?;
        let trailing = context.reader.remaining();
        ensure!(
            trailing == 0,
            "{} unread bytes after the fields of opaque {}",
            trailing,
            opaque.class_name()
        );
        Ok(object)
    }
}
