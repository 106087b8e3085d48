//! Rate limiting for the security toolkit
//!
//! This module handles per-(identifier, action) attempt counting with a
//! sliding window and escalating lockout.

pub mod rate_limiter;

// Re-export all public items from submodules
pub use rate_limiter::*;
