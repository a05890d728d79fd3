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

use crate::types::Language;

/// Configuration for Fury serialization.
///
/// Held by the `Fury` instance and read by `WriteContext`/`ReadContext` so
/// both directions of a call see the same settings.
#[derive(Clone, Debug)]
pub struct Config {
    /// Language tag written into the stream header.
    pub language: Language,
    /// Whether shared and circular references are written as back-references.
    /// When disabled every occurrence is written in full and a cycle fails
    /// with `DepthExceeded`.
    pub track_ref: bool,
    /// Maximum nesting depth of values, checked on write and on read.
    pub max_depth: u32,
    /// Whether struct payloads carry a hash of their field types.
    pub check_struct_hash: bool,
    /// Whether objects of unregistered classes are written as opaque blobs
    /// instead of failing with `UnsupportedType`.
    pub opaque_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            language: Language::Rust,
            track_ref: true,
            max_depth: 128,
            check_struct_hash: false,
            opaque_fallback: false,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Check if reference tracking is enabled.
    #[inline(always)]
    pub fn is_track_ref(&self) -> bool {
        self.track_ref
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Check if struct hash checking is enabled.
    #[inline(always)]
    pub fn is_check_struct_hash(&self) -> bool {
        self.check_struct_hash
    }

    #[inline(always)]
    pub fn is_opaque_fallback(&self) -> bool {
        self.opaque_fallback
    }
}
