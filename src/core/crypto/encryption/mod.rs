//! Encryption functionality for the security toolkit
//!
//! This module handles password-based AES-256-GCM encryption of sensitive data.

pub mod encryption_manager;
pub mod encryption_profile;

// Re-export all public items from submodules
pub use encryption_manager::*;
pub use encryption_profile::*;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Result of a password-based encryption call
///
/// All byte fields are base64 encoded. The value is immutable once produced
/// and is consumed wholesale by decryption; there is no valid partial
/// reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptionResult {
    pub ciphertext: String,
    pub iv: String,
    pub salt: String,
    pub algorithm: EncryptionProfile,
}

/// Parameters for decryption
pub struct DecryptionParams {
    pub ciphertext: String,
    pub iv: String,
    pub salt: String,
    pub password: String,
    pub algorithm: EncryptionProfile,
}

impl DecryptionParams {
    /// Build decryption parameters from an encryption result and the password
    pub fn from_result(result: &EncryptionResult, password: impl Into<String>) -> Self {
        Self {
            ciphertext: result.ciphertext.clone(),
            iv: result.iv.clone(),
            salt: result.salt.clone(),
            password: password.into(),
            algorithm: result.algorithm,
        }
    }
}

impl Drop for DecryptionParams {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}
