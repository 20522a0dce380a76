//! Integration test suite for heat-viz
//!
//! End-to-end tests that run the `heat-viz` binary against temporary
//! templates and role directories.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **template**: `heat-viz template` output, filters and tags
//! - **roles**: `heat-viz roles` page tree
//! - **config**: configuration file defaults and overrides
//! - **errors**: fatal conditions and their exit status

#[path = "../common/mod.rs"]
mod common;

mod config;
mod errors;
mod roles;
mod template;
