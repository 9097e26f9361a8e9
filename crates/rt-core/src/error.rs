//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` only covers the
//! validation done at request boundaries (coordinates, textual input).

use thiserror::Error;

/// Errors produced by `rt-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid location ({latitude}, {longitude}): {reason}")]
    InvalidLocation {
        latitude:  f64,
        longitude: f64,
        reason:    &'static str,
    },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `rt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
