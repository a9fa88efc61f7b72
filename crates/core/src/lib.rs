//! Plaza Core - Shared types library.
//!
//! This crate provides common types used across all Plaza components:
//! - `api` - The marketplace HTTP API (both storage backends)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! HTTP handling. Every invariant from the data model (positive prices,
//! valid emails, role sets, order lifecycles) is enforced here by
//! validating constructors, so a value of one of these types is
//! well-formed by construction.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, usernames,
//!   prices, roles, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
