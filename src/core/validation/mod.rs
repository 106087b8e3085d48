//! Input validation and sanitization for the security toolkit
//!
//! This module handles pattern-based threat detection (XSS, SQL injection,
//! path traversal, unsafe URLs) and field-specific structural validation.

pub mod input_validator;

// Re-export all public items from submodules
pub use input_validator::*;

use serde::{Deserialize, Serialize};

/// Outcome of a validation call
///
/// The verdict and the sanitized value are independent outputs: a sanitized
/// value may still be marked invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub sanitized_value: String,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>, sanitized_value: String) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            sanitized_value,
        }
    }
}
