use crate::shared::constants::{KEY_SIZE, STANDARD_IV_SIZE, STANDARD_SALT_SIZE};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::Rng;
use rand_core::OsRng;
use rand_core::RngCore;
use crate::core::crypto::encryption::EncryptionProfile;

/// Printable charset for generated key strings
const KEY_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Secure random key material generator
pub struct KeyGenerator;

impl KeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate secure random bytes
    pub fn generate_random_bytes(&self, length: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; length];
        let mut rng = OsRng;
        rng.fill_bytes(&mut bytes);
        bytes
    }

    /// Generate a random key of the given byte length, base64 encoded
    pub fn generate_key(&self, length: usize) -> String {
        BASE64.encode(self.generate_random_bytes(length))
    }

    /// Generate a 256-bit key for an encryption profile, base64 encoded
    pub fn generate_key_for_profile(&self, _profile: EncryptionProfile) -> String {
        self.generate_key(KEY_SIZE)
    }

    /// Generate a random salt, base64 encoded
    pub fn generate_salt(&self, length: usize) -> String {
        BASE64.encode(self.generate_random_bytes(length))
    }

    /// Generate a random IV, base64 encoded
    pub fn generate_iv(&self, length: usize) -> String {
        BASE64.encode(self.generate_random_bytes(length))
    }

    /// Generate a random printable string over the key charset
    pub fn generate_random_string(&self, length: usize) -> String {
        let mut rng = OsRng;
        (0..length)
            .map(|_| KEY_CHARSET[rng.gen_range(0..KEY_CHARSET.len())] as char)
            .collect()
    }

    /// Default-sized salt for the standard profile
    pub fn generate_default_salt(&self) -> String {
        self.generate_salt(STANDARD_SALT_SIZE)
    }

    /// Default-sized IV for the standard profile
    pub fn generate_default_iv(&self) -> String {
        self.generate_iv(STANDARD_IV_SIZE)
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}
