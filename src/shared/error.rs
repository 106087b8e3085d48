//! Error handling for the security toolkit
//!
//! This module defines the error types used throughout the toolkit.

use crate::shared::types::Severity;
use thiserror::Error;

/// Toolkit error type
///
/// Each variant carries its severity by construction; the keyword heuristic
/// in the error handler only classifies untyped external messages.
#[derive(Error, Debug, Clone)]
pub enum SecurityError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Raised whenever AEAD tag verification fails during decryption.
    /// The message is fixed so callers cannot distinguish a wrong password
    /// from corrupted data.
    #[error("Decryption failed: authentication tag verification failed")]
    AuthenticationFailure,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Audit error: {0}")]
    Audit(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SecurityError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a cryptographic error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an audit error
    pub fn audit(message: impl Into<String>) -> Self {
        Self::Audit(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Severity assigned at construction time through the variant
    pub fn severity(&self) -> Severity {
        match self {
            Self::AuthenticationFailure => Severity::Critical,
            Self::Crypto(_) => Severity::High,
            Self::Validation(_) | Self::RateLimit(_) | Self::Storage(_) => Severity::Medium,
            Self::Config(_) | Self::Audit(_) | Self::Internal(_) => Severity::Low,
        }
    }

    /// Whether the variant belongs to the security-relevant error classes
    pub fn is_security_related(&self) -> bool {
        matches!(
            self,
            Self::Crypto(_) | Self::AuthenticationFailure | Self::Validation(_) | Self::RateLimit(_)
        )
    }

    /// Stable code prefix used when building error records
    pub fn code_prefix(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Crypto(_) => "CRYPTO",
            Self::AuthenticationFailure => "AUTH_TAG",
            Self::Validation(_) => "VALIDATION",
            Self::RateLimit(_) => "RATE_LIMIT",
            Self::Storage(_) => "STORAGE",
            Self::Audit(_) => "AUDIT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for SecurityError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for SecurityError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(format!("JSON error: {}", err))
    }
}

impl From<base64::DecodeError> for SecurityError {
    fn from(err: base64::DecodeError) -> Self {
        Self::validation(format!("Base64 decoding error: {}", err))
    }
}

impl From<hex::FromHexError> for SecurityError {
    fn from(err: hex::FromHexError) -> Self {
        Self::validation(format!("Hex decoding error: {}", err))
    }
}

impl From<tokio::task::JoinError> for SecurityError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", err))
    }
}

// Cryptographic error conversions
impl From<sha2::digest::InvalidLength> for SecurityError {
    fn from(err: sha2::digest::InvalidLength) -> Self {
        Self::crypto(format!("Digest error: {}", err))
    }
}

impl From<aes_gcm::Error> for SecurityError {
    fn from(err: aes_gcm::Error) -> Self {
        Self::crypto(format!("AES-GCM error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_error_creation() {
        let config_error = SecurityError::config("Invalid configuration");
        let crypto_error = SecurityError::crypto("Encryption failed");
        let validation_error = SecurityError::validation("Invalid input");

        assert!(matches!(config_error, SecurityError::Config(_)));
        assert!(matches!(crypto_error, SecurityError::Crypto(_)));
        assert!(matches!(validation_error, SecurityError::Validation(_)));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let security_error: SecurityError = io_error.into();

        assert!(matches!(security_error, SecurityError::Storage(_)));
    }

    #[test]
    fn test_error_display() {
        let error = SecurityError::crypto("Test error");
        let display = format!("{}", error);

        assert!(display.contains("Cryptographic error"));
        assert!(display.contains("Test error"));
    }

    #[test]
    fn test_severity_by_variant() {
        assert_eq!(SecurityError::AuthenticationFailure.severity(), Severity::Critical);
        assert_eq!(SecurityError::crypto("x").severity(), Severity::High);
        assert_eq!(SecurityError::validation("x").severity(), Severity::Medium);
        assert_eq!(SecurityError::config("x").severity(), Severity::Low);
    }

    #[test]
    fn test_authentication_failure_is_opaque() {
        let display = format!("{}", SecurityError::AuthenticationFailure);
        assert!(!display.to_lowercase().contains("password"));
        assert!(!display.to_lowercase().contains("salt"));
    }

    #[test]
    fn test_security_related_classes() {
        assert!(SecurityError::AuthenticationFailure.is_security_related());
        assert!(SecurityError::validation("x").is_security_related());
        assert!(!SecurityError::internal("x").is_security_related());
    }
}
