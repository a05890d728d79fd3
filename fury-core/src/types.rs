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
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Version byte written after the language tag of every stream.
pub const FORMAT_VERSION: u8 = 1;

/// Type id marking a back-reference. Never assigned to a type.
pub const REF_TAG: u32 = 0;

/// Ids below this value are reserved for built-in types.
pub const FIRST_USER_TYPE_ID: u32 = 100;

/// Built-in type ids. These numbers are shared by every implementation of
/// the protocol and must never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[allow(non_camel_case_types)]
#[repr(u32)]
pub enum TypeId {
    BOOL = 1,
    INT8 = 2,
    INT16 = 3,
    INT32 = 4,
    INT64 = 6,
    FLOAT32 = 10,
    FLOAT64 = 11,
    STRING = 12,
    LIST = 21,
    MAP = 23,
    TIMESTAMP = 25,
    LOCAL_DATE = 26,
    BINARY = 28,
    NONE = 40,
    OPAQUE = 41,
}

pub const BOOL: u32 = TypeId::BOOL as u32;
pub const INT8: u32 = TypeId::INT8 as u32;
pub const INT16: u32 = TypeId::INT16 as u32;
pub const INT32: u32 = TypeId::INT32 as u32;
pub const INT64: u32 = TypeId::INT64 as u32;
pub const FLOAT32: u32 = TypeId::FLOAT32 as u32;
pub const FLOAT64: u32 = TypeId::FLOAT64 as u32;
pub const STRING: u32 = TypeId::STRING as u32;
pub const LIST: u32 = TypeId::LIST as u32;
pub const MAP: u32 = TypeId::MAP as u32;
pub const TIMESTAMP: u32 = TypeId::TIMESTAMP as u32;
pub const LOCAL_DATE: u32 = TypeId::LOCAL_DATE as u32;
pub const BINARY: u32 = TypeId::BINARY as u32;
pub const NONE: u32 = TypeId::NONE as u32;
pub const OPAQUE: u32 = TypeId::OPAQUE as u32;

impl TypeId {
    /// Name under which the built-in descriptor is registered.
    pub fn type_name(self) -> &'static str {
        match self {
            TypeId::BOOL => "bool",
            TypeId::INT8 => "int8",
            TypeId::INT16 => "int16",
            TypeId::INT32 => "int32",
            TypeId::INT64 => "int64",
            TypeId::FLOAT32 => "float32",
            TypeId::FLOAT64 => "float64",
            TypeId::STRING => "string",
            TypeId::LIST => "list",
            TypeId::MAP => "map",
            TypeId::TIMESTAMP => "timestamp",
            TypeId::LOCAL_DATE => "date",
            TypeId::BINARY => "binary",
            TypeId::NONE => "none",
            TypeId::OPAQUE => "opaque",
        }
    }

    pub fn kind(self) -> TypeKind {
        match self {
            TypeId::STRING => TypeKind::String,
            TypeId::BINARY => TypeKind::Binary,
            TypeId::LIST => TypeKind::Array,
            TypeId::MAP => TypeKind::Map,
            TypeId::OPAQUE => TypeKind::Opaque,
            _ => TypeKind::Primitive,
        }
    }
}

pub static BUILTIN_TYPES: [TypeId; 15] = [
    TypeId::BOOL,
    TypeId::INT8,
    TypeId::INT16,
    TypeId::INT32,
    TypeId::INT64,
    TypeId::FLOAT32,
    TypeId::FLOAT64,
    TypeId::STRING,
    TypeId::LIST,
    TypeId::MAP,
    TypeId::TIMESTAMP,
    TypeId::LOCAL_DATE,
    TypeId::BINARY,
    TypeId::NONE,
    TypeId::OPAQUE,
];

/// Closed set of descriptor kinds used for dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    String,
    Binary,
    Array,
    Map,
    Struct,
    Opaque,
}

impl TypeKind {
    /// Kinds whose instances carry identity and take part in reference tracking.
    #[inline(always)]
    pub fn is_ref_tracked(self) -> bool {
        matches!(self, TypeKind::Array | TypeKind::Map | TypeKind::Struct)
    }
}

/// Host language binding that produced a stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Language {
    Xlang = 0,
    Java = 1,
    Python = 2,
    Cpp = 3,
    Go = 4,
    Javascript = 5,
    #[default]
    Rust = 6,
    Dart = 7,
}

impl Language {
    /// Decodes the language byte of a stream header.
    pub fn from_tag(tag: u8) -> Result<Self, Error> {
        Language::try_from_primitive(tag)
            .map_err(|_| Error::malformed_stream(format!("unknown language tag {}", tag)))
    }
}

const MAX_UINT32: u64 = (1 << 31) - 1;

pub fn compute_string_hash(s: &str) -> u32 {
    let mut hash: u64 = 17;
    s.as_bytes().iter().for_each(|b| {
        hash = (hash * 31) + (*b as u64);
        while hash >= MAX_UINT32 {
            hash /= 7;
        }
    });
    hash as u32
}

pub fn compute_field_hash(hash: u32, id: u32) -> u32 {
    let mut new_hash: u64 = (hash as u64) * 31 + (id as u64);
    while new_hash >= MAX_UINT32 {
        new_hash /= 7;
    }
    new_hash as u32
}
