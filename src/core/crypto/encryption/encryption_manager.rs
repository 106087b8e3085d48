use crate::shared::error::SecurityError;
use crate::shared::SecurityResult;
use aes_gcm::aead::generic_array::typenum::U16;
use aes_gcm::aead::Aead;
use aes_gcm::aes::Aes256;
use aes_gcm::{Aes256Gcm, AesGcm, Key, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2;
use rand_core::OsRng;
use rand_core::RngCore;
use zeroize::Zeroizing;
use super::{DecryptionParams, EncryptionProfile, EncryptionResult};

/// AES-256-GCM with the enhanced profile's 16-byte nonce
type Aes256GcmEnhanced = AesGcm<Aes256, U16>;

/// Secure password-based encryption manager
pub struct EncryptionManager {
    default_profile: EncryptionProfile,
}

impl EncryptionManager {
    pub fn new() -> Self {
        Self::with_profile(EncryptionProfile::Standard)
    }

    pub fn with_profile(default_profile: EncryptionProfile) -> Self {
        Self { default_profile }
    }

    /// Default profile used by `encrypt_default`
    pub fn default_profile(&self) -> EncryptionProfile {
        self.default_profile
    }

    /// Encrypt plaintext with a password under the manager's default profile
    pub fn encrypt_default(&self, plaintext: &str, password: &str) -> SecurityResult<EncryptionResult> {
        self.encrypt(plaintext, password, self.default_profile)
    }

    /// Encrypt plaintext with a password
    ///
    /// Generates a fresh random salt and IV per call, derives a 256-bit key
    /// via PBKDF2-HMAC-SHA256, then performs AES-256-GCM authenticated
    /// encryption.
    pub fn encrypt(
        &self,
        plaintext: &str,
        password: &str,
        profile: EncryptionProfile,
    ) -> SecurityResult<EncryptionResult> {
        let salt = Self::generate_random_bytes(profile.salt_len());
        let iv = Self::generate_random_bytes(profile.iv_len());
        let key = Self::derive_key(password, &salt, profile.iterations())?;

        let ciphertext = Self::seal(profile, &key, &iv, plaintext.as_bytes())?;

        Ok(EncryptionResult {
            ciphertext: BASE64.encode(&ciphertext),
            iv: BASE64.encode(&iv),
            salt: BASE64.encode(&salt),
            algorithm: profile,
        })
    }

    /// Decrypt data produced by `encrypt`
    ///
    /// Re-derives the key from the supplied password and salt, then performs
    /// AEAD decryption. Any tag mismatch (wrong password, wrong salt or IV,
    /// bit-level corruption) fails with `AuthenticationFailure`; no partial
    /// plaintext is ever returned.
    pub fn decrypt(&self, params: &DecryptionParams) -> SecurityResult<String> {
        let profile = params.algorithm;
        let salt = BASE64.decode(&params.salt)?;
        let iv = BASE64.decode(&params.iv)?;
        let ciphertext = BASE64.decode(&params.ciphertext)?;

        if salt.len() != profile.salt_len() {
            return Err(SecurityError::validation(format!(
                "Salt must be {} bytes for {}",
                profile.salt_len(),
                profile.label()
            )));
        }
        if iv.len() != profile.iv_len() {
            return Err(SecurityError::validation(format!(
                "IV must be {} bytes for {}",
                profile.iv_len(),
                profile.label()
            )));
        }

        let key = Self::derive_key(&params.password, &salt, profile.iterations())?;

        let plaintext = Self::open(profile, &key, &iv, &ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| SecurityError::AuthenticationFailure)
    }

    fn seal(
        profile: EncryptionProfile,
        key: &[u8; 32],
        iv: &[u8],
        data: &[u8],
    ) -> SecurityResult<Vec<u8>> {
        match profile {
            EncryptionProfile::Standard => {
                let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
                let nonce = Nonce::from_slice(iv);
                cipher
                    .encrypt(nonce, data)
                    .map_err(|e| SecurityError::crypto(format!("AES-GCM encryption failed: {}", e)))
            }
            EncryptionProfile::Enhanced => {
                let cipher = Aes256GcmEnhanced::new(Key::<Aes256GcmEnhanced>::from_slice(key));
                let nonce = Nonce::from_slice(iv);
                cipher
                    .encrypt(nonce, data)
                    .map_err(|e| SecurityError::crypto(format!("AES-GCM encryption failed: {}", e)))
            }
        }
    }

    fn open(
        profile: EncryptionProfile,
        key: &[u8; 32],
        iv: &[u8],
        ciphertext: &[u8],
    ) -> SecurityResult<Vec<u8>> {
        match profile {
            EncryptionProfile::Standard => {
                let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
                let nonce = Nonce::from_slice(iv);
                cipher
                    .decrypt(nonce, ciphertext)
                    .map_err(|_| SecurityError::AuthenticationFailure)
            }
            EncryptionProfile::Enhanced => {
                let cipher = Aes256GcmEnhanced::new(Key::<Aes256GcmEnhanced>::from_slice(key));
                let nonce = Nonce::from_slice(iv);
                cipher
                    .decrypt(nonce, ciphertext)
                    .map_err(|_| SecurityError::AuthenticationFailure)
            }
        }
    }

    /// Derive a 256-bit key from a password and salt with PBKDF2-HMAC-SHA256
    fn derive_key(password: &str, salt: &[u8], iterations: u32) -> SecurityResult<Zeroizing<[u8; 32]>> {
        let mut key = Zeroizing::new([0u8; 32]);
        pbkdf2::<hmac::Hmac<sha2::Sha256>>(password.as_bytes(), salt, iterations, &mut *key)
            .map_err(|e| SecurityError::crypto(format!("PBKDF2 error: {:?}", e)))?;
        Ok(key)
    }

    /// Generate secure random bytes
    fn generate_random_bytes(length: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; length];
        let mut rng = OsRng;
        rng.fill_bytes(&mut bytes);
        bytes
    }
}

impl Default for EncryptionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tampered(encoded: &str, index: usize) -> String {
        let mut bytes = BASE64.decode(encoded).unwrap();
        let len = bytes.len();
        bytes[index % len] ^= 0x01;
        BASE64.encode(&bytes)
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let manager = EncryptionManager::new();

        for profile in [EncryptionProfile::Standard, EncryptionProfile::Enhanced] {
            let encrypted = manager
                .encrypt("Hello, World!", "correct horse battery staple", profile)
                .expect("Failed to encrypt data");
            let decrypted = manager
                .decrypt(&DecryptionParams::from_result(&encrypted, "correct horse battery staple"))
                .expect("Failed to decrypt data");
            assert_eq!(decrypted, "Hello, World!");
        }
    }

    #[test]
    fn test_decrypt_with_wrong_password() {
        let manager = EncryptionManager::new();
        let encrypted = manager
            .encrypt("secret", "right password", EncryptionProfile::Standard)
            .expect("Failed to encrypt data");

        let result = manager.decrypt(&DecryptionParams::from_result(&encrypted, "wrong password"));
        assert!(matches!(result, Err(SecurityError::AuthenticationFailure)));
    }

    #[test]
    fn test_tampered_ciphertext_fails_authentication() {
        let manager = EncryptionManager::new();
        let encrypted = manager
            .encrypt("integrity matters", "password123!A", EncryptionProfile::Standard)
            .expect("Failed to encrypt data");

        for index in 0..BASE64.decode(&encrypted.ciphertext).unwrap().len() {
            let mut corrupted = encrypted.clone();
            corrupted.ciphertext = tampered(&encrypted.ciphertext, index);
            let result = manager.decrypt(&DecryptionParams::from_result(&corrupted, "password123!A"));
            assert!(matches!(result, Err(SecurityError::AuthenticationFailure)));
        }
    }

    #[test]
    fn test_tampered_iv_and_salt_fail_authentication() {
        let manager = EncryptionManager::new();
        let encrypted = manager
            .encrypt("integrity matters", "password123!A", EncryptionProfile::Enhanced)
            .expect("Failed to encrypt data");

        let mut bad_iv = encrypted.clone();
        bad_iv.iv = tampered(&encrypted.iv, 0);
        assert!(matches!(
            manager.decrypt(&DecryptionParams::from_result(&bad_iv, "password123!A")),
            Err(SecurityError::AuthenticationFailure)
        ));

        let mut bad_salt = encrypted.clone();
        bad_salt.salt = tampered(&encrypted.salt, 0);
        assert!(matches!(
            manager.decrypt(&DecryptionParams::from_result(&bad_salt, "password123!A")),
            Err(SecurityError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_encryption_is_non_deterministic() {
        let manager = EncryptionManager::new();
        let first = manager
            .encrypt("same input", "same password", EncryptionProfile::Standard)
            .unwrap();
        let second = manager
            .encrypt("same input", "same password", EncryptionProfile::Standard)
            .unwrap();

        assert_ne!(first.iv, second.iv);
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.ciphertext, second.ciphertext);

        for encrypted in [&first, &second] {
            let decrypted = manager
                .decrypt(&DecryptionParams::from_result(encrypted, "same password"))
                .unwrap();
            assert_eq!(decrypted, "same input");
        }
    }

    #[test]
    fn test_profile_parameter_sizes_on_wire() {
        let manager = EncryptionManager::new();

        let standard = manager
            .encrypt("data", "password", EncryptionProfile::Standard)
            .unwrap();
        assert_eq!(BASE64.decode(&standard.salt).unwrap().len(), 16);
        assert_eq!(BASE64.decode(&standard.iv).unwrap().len(), 12);

        let enhanced = manager
            .encrypt("data", "password", EncryptionProfile::Enhanced)
            .unwrap();
        assert_eq!(BASE64.decode(&enhanced.salt).unwrap().len(), 32);
        assert_eq!(BASE64.decode(&enhanced.iv).unwrap().len(), 16);
    }

    #[test]
    fn test_malformed_base64_is_a_validation_error() {
        let manager = EncryptionManager::new();
        let encrypted = manager
            .encrypt("data", "password", EncryptionProfile::Standard)
            .unwrap();

        let mut corrupted = encrypted.clone();
        corrupted.salt = "not-base64!!".to_string();
        let result = manager.decrypt(&DecryptionParams::from_result(&corrupted, "password"));
        assert!(matches!(result, Err(SecurityError::Validation(_))));
    }

    #[test]
    fn test_encrypt_empty_plaintext() {
        let manager = EncryptionManager::new();
        let encrypted = manager
            .encrypt("", "password", EncryptionProfile::Standard)
            .expect("Failed to encrypt empty data");
        let decrypted = manager
            .decrypt(&DecryptionParams::from_result(&encrypted, "password"))
            .expect("Failed to decrypt empty data");
        assert_eq!(decrypted, "");
    }

    #[test]
    fn test_encrypt_large_plaintext() {
        let manager = EncryptionManager::new();
        let data = "x".repeat(10_000);
        let encrypted = manager
            .encrypt(&data, "password", EncryptionProfile::Enhanced)
            .expect("Failed to encrypt large data");
        let decrypted = manager
            .decrypt(&DecryptionParams::from_result(&encrypted, "password"))
            .expect("Failed to decrypt large data");
        assert_eq!(decrypted, data);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 8, ..ProptestConfig::default() })]

        #[test]
        fn prop_round_trip_preserves_plaintext(plaintext in ".{0,200}", password in ".{1,40}") {
            let manager = EncryptionManager::new();
            for profile in [EncryptionProfile::Standard, EncryptionProfile::Enhanced] {
                let encrypted = manager.encrypt(&plaintext, &password, profile).unwrap();
                let decrypted = manager
                    .decrypt(&DecryptionParams::from_result(&encrypted, password.clone()))
                    .unwrap();
                prop_assert_eq!(&decrypted, &plaintext);
            }
        }
    }
}
