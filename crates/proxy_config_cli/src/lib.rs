//! proxy-config CLI library exports for integration testing.
//!
//! This module exposes document loading and command implementations for use
//! in tests.

pub mod commands;
pub mod errors;
pub mod loader;
