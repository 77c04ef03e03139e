//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod token;

pub use id::*;
pub use phone::{Phone, PhoneError};
pub use token::{ScopedAccessToken, SiteToken, TokenScope};
