//! Utility functions shared across the application.
//!
//! - [`code_generator`] - deterministic short code derivation

pub mod code_generator;
