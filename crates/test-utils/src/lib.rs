//! Shared test utilities for the OCADS retrieval workspace.
//!
//! This crate provides:
//! - Synthetic median-file generators (NetCDF with CF coordinates)
//! - A local HTTP stub that records every request it serves
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;
pub mod server;

// Re-export commonly used items at the crate root
pub use generators::*;
pub use server::*;
