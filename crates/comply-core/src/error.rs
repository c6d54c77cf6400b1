//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the compliance stack. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation errors name the offending value and the rule it broke.
//! - Status transition errors include the current and attempted states so
//!   callers can report them without re-deriving context.
//! - Storage and engine errors live in their own crates (`comply-store`,
//!   `comply-engine`) and wrap these where needed.

use thiserror::Error;

/// Top-level error type for the foundational crate.
#[derive(Error, Debug)]
pub enum ComplyError {
    /// A value failed domain validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A status transition was rejected.
    #[error("invalid status transition: {0}")]
    InvalidTransition(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
