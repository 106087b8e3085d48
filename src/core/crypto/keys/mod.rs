//! Key generation and strength analysis for the security toolkit
//!
//! This module handles secure random key material generation and heuristic
//! key-strength scoring.

pub mod key_generator;
pub mod key_strength;

// Re-export all public items from submodules
pub use key_generator::*;
pub use key_strength::*;
