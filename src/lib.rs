//! Search the PyPI package index and render the results
//!
//! # Modules
//!
//! - [`app`]: query → parse → sort → render pipeline
//! - [`config`]: search configuration and defaults
//! - [`error`]: error type shared by all layers
//! - [`inventory`]: locally installed packages, used for version annotation
//! - [`package`]: package records and the sortable package set
//! - [`render`]: table and JSON output
//! - [`search`]: search page client and result parser

pub mod app;
pub mod config;
pub mod error;
pub mod inventory;
pub mod package;
pub mod render;
pub mod search;

pub use app::PipSearch;
pub use error::{Error, Result};
