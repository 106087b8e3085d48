//! Domain capabilities for the security toolkit

pub mod repositories;

pub use repositories::*;
