//! Core types shared by every stage of heat-viz.
//!
//! - [`HeatVizError`] - enumerated fatal conditions
//! - [`ErrorContext`] - error plus user-facing suggestion and details
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for CLI display

pub mod error;

pub use error::{ErrorContext, HeatVizError, user_friendly_error};
