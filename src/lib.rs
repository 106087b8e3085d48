//! Aegis Core
//!
//! Client-side security toolkit.
//! Handles password-derived authenticated encryption, input validation,
//! rate limiting, error intake and security auditing in Rust.
//!
//! ## Architecture
//!
//! This library follows a simplified architecture focused on core functionality:
//!
//! - **Core**: Crypto, validation, rate limiting, error intake, auditing
//! - **Domain**: Capability traits for external collaborators
//! - **Shared**: Common types, constants, and utilities
//!
//! ## Security Features
//!
//! - AES-256-GCM authenticated encryption with PBKDF2 key stretching
//! - Zeroized key material
//! - Pattern-based threat detection for untrusted input
//! - Sliding-window rate limiting with escalating lockout
//!
//! ## Usage
//!
//! ```rust,no_run
//! use aegis_core::{init_security_core, EncryptionProfile};
//!
//! # async fn demo() -> Result<(), aegis_core::SecurityError> {
//! let core = init_security_core().await?;
//!
//! let encrypted = core.encrypt("sensitive data", "a passphrase", EncryptionProfile::Standard)?;
//! let plaintext = core.decrypt(&aegis_core::DecryptionParams::from_result(&encrypted, "a passphrase"))?;
//! assert_eq!(plaintext, "sensitive data");
//! # Ok(())
//! # }
//! ```

use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use std::time::Duration;

// Re-export main modules for easy access
pub mod core;
pub mod domain;
pub mod shared;

// Re-export specific components
pub use crate::core::audit::{SecurityAuditResult, SecurityAuditor, SecurityIssue};
pub use crate::core::crypto::encryption::{
    DecryptionParams, EncryptionManager, EncryptionProfile, EncryptionResult,
};
pub use crate::core::crypto::hashing::{HashAlgorithm, HashManager};
pub use crate::core::crypto::keys::{
    analyze_key_strength, calculate_entropy, validate_key_strength, KeyGenerator, KeyStrength,
    StrengthLevel,
};
pub use crate::core::error_handler::{ErrorContext, ErrorHandler, ErrorRecord, SecurityViolation};
pub use crate::core::rate_limit::{RateLimiter, RateLimiterConfig, RateLimitStats};
pub use crate::core::validation::{InputValidator, ValidationConfig, ValidationResult};
pub use crate::domain::repositories::{MemoryStorage, StorageRepository};
pub use crate::shared::error::SecurityError;
pub use crate::shared::types::Severity;
pub use crate::shared::SecurityResult;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize logging
pub fn init() {
    let _ = env_logger::try_init();
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Initialize the security core with configuration from .env or safe defaults
///
/// Recognized variables: `AEGIS_MAX_ATTEMPTS`, `AEGIS_WINDOW_MS`,
/// `AEGIS_BLOCK_DURATION_MS`, `AEGIS_MAX_ERRORS`, `AEGIS_MAX_TEXT_LENGTH`,
/// `AEGIS_DEFAULT_PROFILE` (`standard` or `enhanced`).
pub async fn init_security_core() -> Result<SecurityCore, SecurityError> {
    dotenv().ok(); // Load .env if present

    let rate_config = RateLimiterConfig {
        max_attempts: env_u64("AEGIS_MAX_ATTEMPTS", shared::constants::MAX_ATTEMPTS as u64) as u32,
        window: Duration::from_millis(env_u64("AEGIS_WINDOW_MS", shared::constants::RATE_LIMIT_WINDOW_MS)),
        block_duration: Duration::from_millis(env_u64(
            "AEGIS_BLOCK_DURATION_MS",
            shared::constants::BLOCK_DURATION_MS,
        )),
    };

    let max_errors = env_u64("AEGIS_MAX_ERRORS", shared::constants::MAX_ERRORS as u64) as usize;
    let max_text_length =
        env_u64("AEGIS_MAX_TEXT_LENGTH", shared::constants::MAX_TEXT_INPUT_LENGTH as u64) as usize;

    let default_profile = match env::var("AEGIS_DEFAULT_PROFILE").as_deref() {
        Ok("enhanced") => EncryptionProfile::Enhanced,
        _ => EncryptionProfile::Standard,
    };

    let rate_limiter = Arc::new(RateLimiter::new(rate_config));
    let error_handler = Arc::new(ErrorHandler::new(max_errors));
    let auditor = SecurityAuditor::new(Arc::clone(&rate_limiter), Arc::clone(&error_handler));

    Ok(SecurityCore {
        crypto: EncryptionManager::with_profile(default_profile),
        hasher: HashManager::new(),
        key_generator: KeyGenerator::new(),
        validator: InputValidator::new(ValidationConfig { max_text_length }),
        rate_limiter,
        error_handler,
        auditor,
    })
}

/// Main security core struct that provides access to all functionality
pub struct SecurityCore {
    pub crypto: EncryptionManager,
    pub hasher: HashManager,
    pub key_generator: KeyGenerator,
    pub validator: InputValidator,
    pub rate_limiter: Arc<RateLimiter>,
    pub error_handler: Arc<ErrorHandler>,
    pub auditor: SecurityAuditor,
}

impl SecurityCore {
    /// Encrypt plaintext with a password
    pub fn encrypt(
        &self,
        plaintext: &str,
        password: &str,
        profile: EncryptionProfile,
    ) -> SecurityResult<EncryptionResult> {
        self.crypto.encrypt(plaintext, password, profile)
    }

    /// Decrypt data produced by `encrypt`
    pub fn decrypt(&self, params: &DecryptionParams) -> SecurityResult<String> {
        self.crypto.decrypt(params)
    }

    /// Hash data, returning a base64 digest
    pub fn hash_data(&self, data: &str, algorithm: HashAlgorithm) -> SecurityResult<String> {
        self.hasher.hash_to_base64(data.as_bytes(), algorithm)
    }

    /// Generate a random key of the given byte length, base64 encoded
    pub fn generate_key(&self, length: usize) -> String {
        self.key_generator.generate_key(length)
    }

    /// Analyze the strength of a key string
    pub fn validate_key_strength(&self, key: &str) -> KeyStrength {
        validate_key_strength(key)
    }

    /// Whether the (identifier, action) pair is currently locked out
    pub async fn is_rate_limited(&self, identifier: &str, action: &str) -> bool {
        self.rate_limiter.is_rate_limited(identifier, action).await
    }

    /// Record an attempt for the (identifier, action) pair
    pub async fn record_attempt(&self, identifier: &str, action: &str) {
        self.rate_limiter.record_attempt(identifier, action).await;
    }

    /// Route a caught toolkit error through the error handler
    pub async fn report_error(&self, error: &SecurityError, context: Option<ErrorContext>) {
        self.error_handler.handle_error(error, context).await;
    }

    /// Run the composite security audit
    pub async fn run_full_audit(&self) -> SecurityAuditResult {
        self.auditor.run_full_audit().await
    }

    /// Persist an encryption result through an opaque storage collaborator
    pub async fn store_encrypted(
        &self,
        storage: &dyn StorageRepository,
        key: &str,
        result: &EncryptionResult,
    ) -> SecurityResult<()> {
        let payload = serde_json::to_vec(result)?;
        storage.set(key, &payload).await
    }

    /// Load an encryption result previously persisted with `store_encrypted`
    pub async fn load_encrypted(
        &self,
        storage: &dyn StorageRepository,
        key: &str,
    ) -> SecurityResult<EncryptionResult> {
        let payload = storage
            .get(key)
            .await?
            .ok_or_else(|| SecurityError::storage(format!("No stored value for key: {}", key)))?;
        Ok(serde_json::from_slice(&payload)?)
    }
}

// Implement Drop for secure cleanup
impl Drop for SecurityCore {
    fn drop(&mut self) {
        // Secure cleanup of sensitive data
        log::info!("SecurityCore dropped - performing secure cleanup");
    }
}
