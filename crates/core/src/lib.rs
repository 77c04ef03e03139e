//! Vitrine Core - Shared types library.
//!
//! This crate provides common types used across all Vitrine components:
//! - `client` - Marketing-API client (token chain, directory, catalog, leads)
//! - `cli` - Command-line tool driving the catalog and lead flows
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, access tokens, and phones

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
