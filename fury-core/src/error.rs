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

//! Error type shared by every serializer, resolver and buffer operation.
//!
//! Constructors are `#[cold]` so that the error paths stay out of the way of
//! the hot read/write loops that call them.

use std::borrow::Cow;

use thiserror::Error;

/// Set FURY_PANIC_ON_ERROR=1 at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("FURY_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for Fury serialization and deserialization operations.
///
/// Always build errors through the static constructors (`Error::unknown_type`,
/// `Error::malformed_stream`, ...) instead of the enum syntax. The
/// constructors accept anything convertible into `Cow<'static, str>` and
/// honour the `FURY_PANIC_ON_ERROR` debug switch:
///
/// ```bash
/// RUST_BACKTRACE=1 FURY_PANIC_ON_ERROR=1 cargo test
/// ```
///
/// ```rust
/// use fury_core::error::Error;
///
/// let err = Error::unknown_type(format!("type id {} is not registered", 130));
/// assert!(matches!(err, Error::UnknownType(_)));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A type id or class name is not registered.
    ///
    /// The caller may register the type and retry.
    #[error("{0}")]
    UnknownType(Cow<'static, str>),

    /// A value has no serializer and no opaque fallback applies.
    #[error("{0}")]
    UnsupportedType(Cow<'static, str>),

    /// A value does not conform to the declared type of the field holding it.
    #[error("{0}")]
    TypeMismatch(Cow<'static, str>),

    /// Tag, length or encoding inconsistency in the input.
    #[error("{0}")]
    MalformedStream(Cow<'static, str>),

    /// A back-reference points past the objects read so far.
    #[error("Dangling reference: index {0} but only {1} objects were read")]
    DanglingReference(u32, usize),

    /// A read would pass the end of the input.
    #[error("Buffer underflow: {0} + {1} > {2}")]
    BufferUnderflow(usize, usize, usize),

    /// A caller-supplied offset or length lies outside the buffer.
    #[error("{0}")]
    BufferBounds(Cow<'static, str>),

    /// The stream was produced with another format version.
    #[error("Incompatible format version: expected {0}, found {1}")]
    IncompatibleVersion(u8, u8),

    /// The object graph is nested deeper than the configured maximum.
    #[error("{0}")]
    DepthExceeded(Cow<'static, str>),

    /// The struct hash in the stream does not match the local schema.
    #[error("{0}")]
    StructVersionMismatch(Cow<'static, str>),

    /// Operation not allowed in the current state.
    #[error("{0}")]
    NotAllowed(Cow<'static, str>),
}

impl Error {
    /// Creates a new [`Error::UnknownType`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_type<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::UnknownType(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::UnsupportedType`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unsupported_type<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::UnsupportedType(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::TypeMismatch`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::TypeMismatch(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::MalformedStream`].
    ///
    /// # Example
    /// ```
    /// use fury_core::error::Error;
    ///
    /// let err = Error::malformed_stream("string payload is not valid utf-8");
    /// let err = Error::malformed_stream(format!("list length {} exceeds input", 1 << 30));
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn malformed_stream<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::MalformedStream(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DanglingReference`] for `index` against a table of `len` objects.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn dangling_reference(index: u32, len: usize) -> Self {
        let err = Error::DanglingReference(index, len);
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::BufferUnderflow`].
    ///
    /// # Example
    /// ```
    /// use fury_core::error::Error;
    ///
    /// // reading 4 bytes at cursor 10 of a 12 byte input
    /// let err = Error::buffer_underflow(10, 4, 12);
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_underflow(cursor: usize, needed: usize, len: usize) -> Self {
        let err = Error::BufferUnderflow(cursor, needed, len);
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::BufferBounds`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_bounds<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::BufferBounds(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::IncompatibleVersion`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn incompatible_version(expected: u8, actual: u8) -> Self {
        let err = Error::IncompatibleVersion(expected, actual);
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceeded`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceeded<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceeded(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::StructVersionMismatch`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn struct_version_mismatch<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::StructVersionMismatch(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::NotAllowed`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn not_allowed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::NotAllowed(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Whether the error was caused by corrupt or truncated input.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Error::MalformedStream(_)
                | Error::DanglingReference(..)
                | Error::BufferUnderflow(..)
                | Error::BufferBounds(_)
        )
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// A bare message becomes [`Error::MalformedStream`].
///
/// # Examples
/// ```
/// use fury_core::ensure;
/// use fury_core::error::Error;
///
/// fn check_len(n: usize, remaining: usize) -> Result<(), Error> {
///     ensure!(n > 0, "length must be positive");
///     ensure!(n <= remaining, "length {} exceeds {} remaining bytes", n, remaining);
///     ensure!(n < 1024, Error::not_allowed("length too large"));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::malformed_stream($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::malformed_stream(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::MalformedStream`].
///
/// # Examples
/// ```
/// use fury_core::bail;
/// use fury_core::error::Error;
///
/// fn fail_fast(tag: u32) -> Result<(), Error> {
///     bail!("unexpected tag {}", tag);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::malformed_stream($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::malformed_stream(format!($fmt, $($arg)*)))
    };
}

/// Returns early with a [`Error::NotAllowed`].
///
/// # Examples
/// ```
/// use fury_core::not_allowed;
/// use fury_core::error::Error;
///
/// fn check_operation(sealed: bool, name: &str) -> Result<(), Error> {
///     if sealed {
///         not_allowed!("registry is sealed, cannot register {}", name);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! not_allowed {
    ($err:expr) => {
        return Err($crate::error::Error::not_allowed($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::not_allowed(format!($fmt, $($arg)*)))
    };
}
