use crate::shared::SecurityResult;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256, Sha512};
use super::HashAlgorithm;

/// Hash manager
pub struct HashManager;

impl HashManager {
    pub fn new() -> Self {
        Self
    }

    /// Hash data with the specified algorithm
    pub fn hash(&self, data: &[u8], algorithm: HashAlgorithm) -> SecurityResult<Vec<u8>> {
        match algorithm {
            HashAlgorithm::Sha256 => self.sha256(data),
            HashAlgorithm::Sha512 => self.sha512(data),
        }
    }

    /// Hash data with SHA-256
    pub fn sha256(&self, data: &[u8]) -> SecurityResult<Vec<u8>> {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Ok(hasher.finalize().to_vec())
    }

    /// Hash data with SHA-512
    pub fn sha512(&self, data: &[u8]) -> SecurityResult<Vec<u8>> {
        let mut hasher = Sha512::new();
        hasher.update(data);
        Ok(hasher.finalize().to_vec())
    }

    /// Hash to base64 string
    pub fn hash_to_base64(&self, data: &[u8], algorithm: HashAlgorithm) -> SecurityResult<String> {
        let hash = self.hash(data, algorithm)?;
        Ok(BASE64.encode(hash))
    }

    /// Hash to hex string
    pub fn hash_to_hex(&self, data: &[u8], algorithm: HashAlgorithm) -> SecurityResult<String> {
        let hash = self.hash(data, algorithm)?;
        Ok(hex::encode(hash))
    }
}

impl Default for HashManager {
    fn default() -> Self {
        Self::new()
    }
}
