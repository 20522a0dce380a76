//! heat-viz - dependency graphs of Heat templates and role manifests
//!
//! heat-viz reads an OpenStack Heat template (HOT or CloudFormation-style)
//! or a set of role manifest directories, builds the dependency graph,
//! decorates it and writes HTML pages that lay the graph out in the browser
//! from embedded DOT text.
//!
//! # Architecture Overview
//!
//! Templates go through a single forward pass:
//!
//! ```text
//! TemplateDocument
//!   -> Dialect::resolve        which of HOT / CFN field names apply
//!   -> select_resources        allow-listed deployments, configs, servers
//!   -> extract                 nodes + candidate edges
//!   -> EdgeResolver            inclusion filter, unknown endpoints dropped
//!   -> Decorator               fill colors, groups, edge weights
//!   -> PageRenderer            DOT + Tera HTML page
//! ```
//!
//! Role manifests skip the first four stages: [`roles`] builds the graph
//! directly from run lists and renders `simple`, `main` and per-node `focus`
//! pages for every tag.
//!
//! # Core Modules
//!
//! - [`dialect`] - Dialect table and version-marker detection
//! - [`template`] - Template documents, resource selection, extraction
//! - [`edges`] - Inclusion filter and edge resolution
//! - [`graph`] - Keyed directed graph with attributes, and DOT output
//! - [`decorate`] - Palette and decoration rules
//! - [`pipeline`] - The template pipeline
//! - [`render`] - HTML pages with Tera
//! - [`roles`] - Role manifests and their page sets
//!
//! ## Supporting Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - `~/.heat-viz/config.toml`
//! - [`core`] - Error types and user-facing error formatting
//!
//! # Template Dialects
//!
//! | Dialect | Version marker                                      | Reference key  |
//! |---------|-----------------------------------------------------|----------------|
//! | HOT     | `heat_template_version: 2013-05-23` or `queens` ... | `get_resource` |
//! | CFN     | `HeatTemplateFormatVersion: '2012-12-12'`           | `Ref`          |
//! | CFN     | `AWSTemplateFormatVersion: '2010-09-09'`            | `Ref`          |

pub mod cli;
pub mod config;
pub mod core;
pub mod decorate;
pub mod dialect;
pub mod edges;
pub mod graph;
pub mod pipeline;
pub mod render;
pub mod roles;
pub mod template;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
