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

//! Error type shared by the object model, the registry and both codec halves.
//!
//! Errors fall into three kinds:
//!
//! - [`Error::Io`]: malformed or truncated input, unknown tags, out-of-range
//!   references and missing serializers. Always carries the byte offset at
//!   which the problem was detected.
//! - [`Error::ClassCast`]: a coercion accessor on [`crate::object::Object`]
//!   had no rule for the requested conversion.
//! - [`Error::Registration`]: misuse of the extension registry while it is
//!   being set up.
//!
//! ## Debug Mode: HESSIAN_PANIC_ON_ERROR
//!
//! Building with `HESSIAN_PANIC_ON_ERROR=1` makes every constructor panic at
//! the place the error was created, which combined with `RUST_BACKTRACE=1`
//! shows the full call stack of the failing read or write.

use std::borrow::Cow;

use thiserror::Error;

/// Set `HESSIAN_PANIC_ON_ERROR=1` at compile time to enable panic on error.
pub const PANIC_ON_ERROR: bool = option_env!("HESSIAN_PANIC_ON_ERROR").is_some();

/// Check if `HESSIAN_PANIC_ON_ERROR` was set at compile time.
#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for Hessian encoding and decoding.
///
/// Always build errors through the static constructors ([`Error::io`],
/// [`Error::expect`], [`Error::class_cast`], [`Error::registration`]) so the
/// panic-on-error switch applies.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed input, truncated buffer or unsupported wire feature.
    ///
    /// Do not construct this variant directly; use [`Error::io`] instead.
    #[error("{message} near position {offset}")]
    Io {
        offset: usize,
        message: Cow<'static, str>,
    },

    /// A coercion accessor had no rule for the held value.
    ///
    /// Do not construct this variant directly; use [`Error::class_cast`] instead.
    #[error("{0}")]
    ClassCast(Cow<'static, str>),

    /// Invalid use of the extension registry.
    ///
    /// Do not construct this variant directly; use [`Error::registration`] instead.
    #[error("{0}")]
    Registration(Cow<'static, str>),
}

impl Error {
    /// Creates a new [`Error::Io`] at the given byte offset.
    ///
    /// # Example
    /// ```
    /// use hessian2_core::error::Error;
    ///
    /// let err = Error::io(12, "unknown tag 0x40");
    /// assert_eq!(err.to_string(), "unknown tag 0x40 near position 12");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn io<S: Into<Cow<'static, str>>>(offset: usize, message: S) -> Self {
        let err = Error::Io {
            offset,
            message: message.into(),
        };
        if PANIC_ON_ERROR {
            panic!("HESSIAN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates an [`Error::Io`] describing an unexpected tag.
    ///
    /// # Example
    /// ```
    /// use hessian2_core::error::Error;
    ///
    /// let err = Error::expect(3, "string", 0x49);
    /// assert_eq!(
    ///     err.to_string(),
    ///     "expected string but actually met 0x49 near position 3"
    /// );
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn expect(offset: usize, expected: &str, tag: u8) -> Self {
        Error::io(
            offset,
            format!("expected {expected} but actually met 0x{tag:02x}"),
        )
    }

    /// Creates a new [`Error::ClassCast`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn class_cast<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::ClassCast(s.into());
        if PANIC_ON_ERROR {
            panic!("HESSIAN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Registration`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn registration<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Registration(s.into());
        if PANIC_ON_ERROR {
            panic!("HESSIAN_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Byte offset of an [`Error::Io`], `None` for the other kinds.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Io { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. })
    }

    pub fn is_class_cast(&self) -> bool {
        matches!(self, Error::ClassCast(_))
    }
}

/// Returns early with an [`Error::Io`] at the given offset.
///
/// # Examples
/// ```
/// use hessian2_core::bail_io;
/// use hessian2_core::error::Error;
///
/// fn reject(pos: usize, tag: u8) -> Result<(), Error> {
///     bail_io!(pos, "unknown tag 0x{:02x}", tag);
/// }
/// assert!(reject(0, 0x40).is_err());
/// ```
#[macro_export]
macro_rules! bail_io {
    ($offset:expr, $err:expr) => {
        return Err($crate::error::Error::io($offset, $err))
    };
    ($offset:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::io($offset, format!($fmt, $($arg)*)))
    };
}

/// Returns early with an [`Error::Registration`] if the condition is false.
///
/// # Examples
/// ```
/// use hessian2_core::ensure_registration;
/// use hessian2_core::error::Error;
///
/// fn check(pattern: &str) -> Result<(), Error> {
///     ensure_registration!(!pattern.is_empty(), "empty pattern");
///     Ok(())
/// }
/// assert!(check("").is_err());
/// ```
#[macro_export]
macro_rules! ensure_registration {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::registration($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::registration(format!($fmt, $($arg)*)));
        }
    };
}
