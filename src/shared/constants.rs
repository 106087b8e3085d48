//! Constants for the security toolkit
//!
//! This module contains all constants used throughout the toolkit.

// Encryption parameter sizes (bytes)
pub const KEY_SIZE: usize = 32;
pub const TAG_SIZE: usize = 16;
pub const STANDARD_SALT_SIZE: usize = 16;
pub const STANDARD_IV_SIZE: usize = 12;
pub const ENHANCED_SALT_SIZE: usize = 32;
pub const ENHANCED_IV_SIZE: usize = 16;

// Key derivation
pub const PBKDF2_ITERATIONS: u32 = 100_000;
pub const PBKDF2_ITERATIONS_ENHANCED: u32 = 200_000;

// Password policy
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 128;
pub const PASSWORD_REQUIRE_UPPERCASE: bool = true;
pub const PASSWORD_REQUIRE_LOWERCASE: bool = true;
pub const PASSWORD_REQUIRE_NUMBERS: bool = true;
pub const PASSWORD_REQUIRE_SPECIAL: bool = true;
pub const MAX_REPEATED_CHAR_RUN: usize = 3;
pub const MAX_SEQUENTIAL_RUN: usize = 2;

// Encryption key policy
pub const ENCRYPTION_KEY_MIN_LENGTH: usize = 16;
pub const ENCRYPTION_KEY_MAX_LENGTH: usize = 256;

// Input validation limits
pub const MAX_TEXT_INPUT_LENGTH: usize = 1000;
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MAX_JSON_DEPTH: usize = 64;

// Rate limiting defaults
pub const MAX_ATTEMPTS: u32 = 5;
pub const RATE_LIMIT_WINDOW_MS: u64 = 60_000;
pub const BLOCK_DURATION_MS: u64 = 300_000;
pub const CLEANUP_INTERVAL_MS: u64 = 60_000;

// Error retention
pub const MAX_ERRORS: usize = 1000;
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

// Audit thresholds
pub const MIN_SECURITY_SCORE: u8 = 80;
pub const SESSION_TIMEOUT_SECS: u64 = 1800;
pub const MAX_SESSION_TIMEOUT_SECS: u64 = 3600;
pub const RECOMMENDED_PASSWORD_MIN_LENGTH: usize = 12;
pub const MAX_LOCKOUT_ATTEMPTS: u32 = 10;

// Algorithm posture lists
pub const APPROVED_ALGORITHMS: &[&str] = &["AES-256-GCM", "SHA-256", "SHA-512", "PBKDF2-HMAC-SHA256"];
pub const WEAK_ALGORITHMS: &[&str] = &["DES", "3DES", "RC4", "MD5", "SHA1"];

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

// Development and testing constants
pub const DEV_MODE: bool = cfg!(debug_assertions);
pub const TEST_MODE: bool = cfg!(test);
