//! Core functionality of the security toolkit
//!
//! This module contains the cooperating security modules: cryptographic
//! primitives, input validation, rate limiting, error intake and the
//! composite security auditor.

pub mod audit;
pub mod crypto;
pub mod error_handler;
pub mod rate_limit;
pub mod validation;
