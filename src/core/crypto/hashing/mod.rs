//! Hashing functionality for the security toolkit
//!
//! This module handles SHA-256 and SHA-512 digests used for verification and
//! fingerprinting, never on their own for password storage.

pub mod hash_algorithm;
pub mod hash_manager;

// Re-export all public items from submodules
pub use hash_algorithm::*;
pub use hash_manager::*;
