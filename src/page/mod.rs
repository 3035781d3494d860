//! # Page Module
//!
//! Physical page formats and report output configuration.
//!
//! ## Modules
//!
//! - [`config`]: Page sizes, render resolution and output naming

pub mod config;

pub use config::{PageFormat, REPORT_FILE_NAME, ReportConfig};
