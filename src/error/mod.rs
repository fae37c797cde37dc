//! Error types for validation failures.
//!
//! This module provides the closed taxonomy of failure reasons, the single
//! [`ValidationError`] carrying a path and a reason, and the path-keyed
//! [`ErrorAggregate`] produced by collect-mode validation.

mod validation_error;

pub use validation_error::{ErrorAggregate, ErrorKind, ValidateError, ValidationError};
