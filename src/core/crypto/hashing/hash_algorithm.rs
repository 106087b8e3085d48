use crate::shared::error::SecurityError;
use crate::shared::SecurityResult;
use serde::{Deserialize, Serialize};

/// Hash algorithms
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HashAlgorithm {
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }

    pub fn from_name(name: &str) -> SecurityResult<Self> {
        match name {
            "SHA-256" => Ok(HashAlgorithm::Sha256),
            "SHA-512" => Ok(HashAlgorithm::Sha512),
            other => Err(SecurityError::validation(format!(
                "Unknown hash algorithm: {}",
                other
            ))),
        }
    }

    /// Digest size in bytes
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Sha256
    }
}
