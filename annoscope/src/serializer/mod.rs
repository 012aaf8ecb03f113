//! Renderers for resolution results and catalogs.
//!
//! - [`json`]: `serde_json::Value` documents for tools and the CLI.

pub mod json;
