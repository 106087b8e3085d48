//! Composite security auditing for the security toolkit
//!
//! This module composes posture checks over the other core modules into one
//! scored report with recommendations.

pub mod security_auditor;

// Re-export all public items from submodules
pub use security_auditor::*;
