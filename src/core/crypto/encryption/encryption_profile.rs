use crate::shared::constants::{
    ENHANCED_IV_SIZE, ENHANCED_SALT_SIZE, PBKDF2_ITERATIONS, PBKDF2_ITERATIONS_ENHANCED,
    STANDARD_IV_SIZE, STANDARD_SALT_SIZE,
};
use crate::shared::error::SecurityError;
use crate::shared::SecurityResult;
use serde::{Deserialize, Serialize};

/// Encryption profiles
///
/// Both profiles run AES-256-GCM; the enhanced profile widens the salt and
/// nonce and doubles the key-derivation work factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EncryptionProfile {
    #[serde(rename = "AES-256-GCM")]
    Standard,
    #[serde(rename = "AES-256-GCM-ENHANCED")]
    Enhanced,
}

impl EncryptionProfile {
    /// Salt length in bytes
    pub fn salt_len(&self) -> usize {
        match self {
            EncryptionProfile::Standard => STANDARD_SALT_SIZE,
            EncryptionProfile::Enhanced => ENHANCED_SALT_SIZE,
        }
    }

    /// IV/nonce length in bytes
    pub fn iv_len(&self) -> usize {
        match self {
            EncryptionProfile::Standard => STANDARD_IV_SIZE,
            EncryptionProfile::Enhanced => ENHANCED_IV_SIZE,
        }
    }

    /// PBKDF2 iteration count
    pub fn iterations(&self) -> u32 {
        match self {
            EncryptionProfile::Standard => PBKDF2_ITERATIONS,
            EncryptionProfile::Enhanced => PBKDF2_ITERATIONS_ENHANCED,
        }
    }

    /// Wire label of the profile
    pub fn label(&self) -> &'static str {
        match self {
            EncryptionProfile::Standard => "AES-256-GCM",
            EncryptionProfile::Enhanced => "AES-256-GCM-ENHANCED",
        }
    }

    /// Parse a profile from its wire label
    pub fn from_label(label: &str) -> SecurityResult<Self> {
        match label {
            "AES-256-GCM" => Ok(EncryptionProfile::Standard),
            "AES-256-GCM-ENHANCED" => Ok(EncryptionProfile::Enhanced),
            other => Err(SecurityError::validation(format!(
                "Unknown encryption algorithm: {}",
                other
            ))),
        }
    }
}

impl Default for EncryptionProfile {
    fn default() -> Self {
        EncryptionProfile::Standard
    }
}
