//! Cryptographic functionality for the security toolkit
//!
//! This module provides password-based authenticated encryption, hashing,
//! key generation and key-strength analysis.
//!
//! SECURITY: This module implements hardened cryptographic operations with:
//! - Memory zeroization for derived key material
//! - Fresh random salt and IV for every encryption
//! - Opaque authentication failures on decryption
//! - Cryptographic parameter validation

pub mod encryption;
pub mod hashing;
pub mod keys;

// Re-export all public items from submodules
pub use encryption::*;
pub use hashing::*;
pub use keys::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_module_imports() {
        let _manager = EncryptionManager::new();
        let _hasher = HashManager::new();
        let _generator = KeyGenerator::new();
        assert!(true); // If we get here, imports work
    }
}
