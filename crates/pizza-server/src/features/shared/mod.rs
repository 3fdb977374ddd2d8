//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **validation**: field-keyed request validation
//! - **error_helpers**: Database error handling utilities
//! - **test_helpers**: Test fixtures (test-only)

pub mod error_helpers;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use validation::{validate_name, validate_name_list, FieldErrors};
