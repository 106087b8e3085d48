//! Error intake for the security toolkit
//!
//! This module handles severity classification and bounded retention of
//! error and violation records. Intake never fails and never interrupts the
//! caller.

pub mod error_handler;

// Re-export all public items from submodules
pub use error_handler::*;
