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

//! Dynamic object graph consumed and produced by [`crate::Fury`].
//!
//! Lists, maps and struct instances live behind `Rc<RefCell<..>>`, so one
//! instance can be reachable from several places (or from itself). The
//! serializer preserves that sharing: two `Value`s that point at the same
//! allocation before serialization point at the same allocation after
//! deserialization.
//!
//! ```rust
//! use fury_core::value::{Object, Value};
//!
//! let inner = Value::list(vec![Value::from(1), Value::from(2)]);
//! let outer = Value::list(vec![inner.clone(), inner.clone()]);
//! let items = outer.as_list().unwrap().borrow();
//! assert!(items[0].ptr_eq(&items[1]));
//!
//! let point = Object::new("example.Point").with("x", 3).with("y", 4);
//! assert_eq!(point.get("x"), Some(&Value::Int32(3)));
//! ```

use crate::types::{Language, TypeId};
use chrono::{NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

pub type ListRef = Rc<RefCell<Vec<Value>>>;
pub type MapRef = Rc<RefCell<Vec<(Value, Value)>>>;
pub type ObjectRef = Rc<RefCell<Object>>;

/// A node of a serializable object graph.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Binary(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    List(ListRef),
    /// Entries keep insertion order; keys may be any value.
    Map(MapRef),
    Struct(ObjectRef),
    Opaque(OpaqueObject),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn map(entries: Vec<(Value, Value)>) -> Value {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    pub fn object(object: Object) -> Value {
        Value::Struct(Rc::new(RefCell::new(object)))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Value::Int8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Value::Int16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueObject> {
        match self {
            Value::Opaque(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up `key` in a map value by structural equality.
    pub fn map_get(&self, key: &Value) -> Option<Value> {
        let map = self.as_map()?;
        let entries = map.borrow();
        entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Reads field `name` of a struct value.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.as_object()?.borrow().get(name).cloned()
    }

    /// Fixed type id of built-in values. Struct instances resolve through the
    /// type registry instead and yield `None` here.
    pub fn builtin_type_id(&self) -> Option<TypeId> {
        let id = match self {
            Value::None => TypeId::NONE,
            Value::Bool(_) => TypeId::BOOL,
            Value::Int8(_) => TypeId::INT8,
            Value::Int16(_) => TypeId::INT16,
            Value::Int32(_) => TypeId::INT32,
            Value::Int64(_) => TypeId::INT64,
            Value::Float32(_) => TypeId::FLOAT32,
            Value::Float64(_) => TypeId::FLOAT64,
            Value::String(_) => TypeId::STRING,
            Value::Binary(_) => TypeId::BINARY,
            Value::Date(_) => TypeId::LOCAL_DATE,
            Value::Timestamp(_) => TypeId::TIMESTAMP,
            Value::List(_) => TypeId::LIST,
            Value::Map(_) => TypeId::MAP,
            Value::Opaque(_) => TypeId::OPAQUE,
            Value::Struct(_) => return None,
        };
        Some(id)
    }

    /// Short description used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Struct(obj) => obj.borrow().class_name().to_string(),
            Value::Opaque(opaque) => format!("opaque {}", opaque.class_name()),
            other => other
                .builtin_type_id()
                .map(|id| id.type_name())
                .unwrap_or("unknown")
                .to_string(),
        }
    }

    /// Allocation address of lists, maps and struct instances.
    pub(crate) fn ref_address(&self) -> Option<usize> {
        match self {
            Value::List(v) => Some(Rc::as_ptr(v) as *const u8 as usize),
            Value::Map(v) => Some(Rc::as_ptr(v) as *const u8 as usize),
            Value::Struct(v) => Some(Rc::as_ptr(v) as *const u8 as usize),
            _ => None,
        }
    }

    /// Whether both values are the same list, map or struct instance.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self.ref_address(), other.ref_address()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Structural equality. Cyclic graphs compare equal when they unfold to the
/// same infinite tree; floats compare by bit pattern.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut visited = HashSet::new();
        value_eq(self, other, &mut visited)
    }
}

fn value_eq(a: &Value, b: &Value, visited: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::None, Value::None) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int8(x), Value::Int8(y)) => x == y,
        (Value::Int16(x), Value::Int16(y)) => x == y,
        (Value::Int32(x), Value::Int32(y)) => x == y,
        (Value::Int64(x), Value::Int64(y)) => x == y,
        (Value::Float32(x), Value::Float32(y)) => x.to_bits() == y.to_bits(),
        (Value::Float64(x), Value::Float64(y)) => x.to_bits() == y.to_bits(),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Binary(x), Value::Binary(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
        (Value::Opaque(x), Value::Opaque(y)) => x == y,
        (Value::List(x), Value::List(y)) => {
            if Rc::ptr_eq(x, y) || !visit(a, b, visited) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|(i, j)| value_eq(i, j, visited))
        }
        (Value::Map(x), Value::Map(y)) => {
            if Rc::ptr_eq(x, y) || !visit(a, b, visited) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|((k1, v1), (k2, v2))| {
                    value_eq(k1, k2, visited) && value_eq(v1, v2, visited)
                })
        }
        (Value::Struct(x), Value::Struct(y)) => {
            if Rc::ptr_eq(x, y) || !visit(a, b, visited) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.class_name == y.class_name
                && x.fields.len() == y.fields.len()
                && x.fields.iter().all(|(name, v1)| match y.get(name) {
                    Some(v2) => value_eq(v1, v2, visited),
                    None => false,
                })
        }
        _ => false,
    }
}

// Returns false when the pair is already being compared further up.
fn visit(a: &Value, b: &Value, visited: &mut HashSet<(usize, usize)>) -> bool {
    match (a.ref_address(), b.ref_address()) {
        (Some(x), Some(y)) => visited.insert((x, y)),
        _ => true,
    }
}

thread_local! {
    static FORMATTING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// Formats shared containers once per nesting path; a container reached from
/// inside itself prints as `<cycle>`.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(v) => write!(f, "Bool({:?})", v),
            Value::Int8(v) => write!(f, "Int8({:?})", v),
            Value::Int16(v) => write!(f, "Int16({:?})", v),
            Value::Int32(v) => write!(f, "Int32({:?})", v),
            Value::Int64(v) => write!(f, "Int64({:?})", v),
            Value::Float32(v) => write!(f, "Float32({:?})", v),
            Value::Float64(v) => write!(f, "Float64({:?})", v),
            Value::String(v) => write!(f, "String({:?})", v),
            Value::Binary(v) => write!(f, "Binary({:?})", v),
            Value::Date(v) => write!(f, "Date({})", v),
            Value::Timestamp(v) => write!(f, "Timestamp({})", v),
            Value::Opaque(v) => fmt::Debug::fmt(v, f),
            Value::List(_) | Value::Map(_) | Value::Struct(_) => {
                let Some(addr) = self.ref_address() else {
                    return Ok(());
                };
                let entered = FORMATTING.with(|active| active.borrow_mut().insert(addr));
                if !entered {
                    return write!(f, "<cycle>");
                }
                let result = match self {
                    Value::List(list) => f.debug_list().entries(list.borrow().iter()).finish(),
                    Value::Map(map) => f
                        .debug_map()
                        .entries(map.borrow().iter().map(|(k, v)| (k, v)))
                        .finish(),
                    Value::Struct(obj) => fmt::Debug::fmt(&*obj.borrow(), f),
                    _ => Ok(()),
                };
                FORMATTING.with(|active| active.borrow_mut().remove(&addr));
                result
            }
        }
    }
}

/// An instance of a user class: a class name plus named field values.
#[derive(Clone, Default)]
pub struct Object {
    class_name: String,
    fields: Vec<(String, Value)>,
}

impl Object {
    pub fn new<S: Into<String>>(class_name: S) -> Self {
        Object {
            class_name: class_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder form of [`Object::set`].
    pub fn with<S: Into<String>, V: Into<Value>>(mut self, name: S, value: V) -> Self {
        self.set(name, value);
        self
    }

    /// Sets field `name`, returning the previous value if the field existed.
    pub fn set<S: Into<String>, V: Into<Value>>(&mut self, name: S, value: V) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.class_name);
        for (name, value) in &self.fields {
            s.field(name, value);
        }
        s.finish()
    }
}

/// A value kept as an uninterpreted blob plus the language and class that
/// produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueObject {
    language: Language,
    class_name: String,
    data: Vec<u8>,
}

impl OpaqueObject {
    pub fn new<S: Into<String>>(language: Language, class_name: S, data: Vec<u8>) -> Self {
        OpaqueObject {
            language,
            class_name: class_name.into(),
            data,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Binary,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    ListRef => List,
    MapRef => Map,
    ObjectRef => Struct,
    OpaqueObject => Opaque,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::list(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::None,
        }
    }
}
