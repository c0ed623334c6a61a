//! Core types for Fleetdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod gid;
pub mod id;

pub use gid::NumericId;
pub use id::*;
