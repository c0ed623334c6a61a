//! Fleetdesk Core - Shared types and pure logic.
//!
//! This crate provides the pieces shared by every Fleetdesk component:
//! - `admin` - Merchant admin service for the car inventory
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Stores and handlers live in `admin`.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and Shopify identifier normalization
//! - [`cars`] - Car records, the listing query builder, filter options and input validation
//! - [`checkout`] - Long-delivery detection for the checkout banner

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cars;
pub mod checkout;
pub mod types;

pub use types::*;
