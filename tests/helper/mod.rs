//! Shared test utilities

pub mod pypi;

pub use pypi::{StaticInventory, search_page, snippet, snippet_without_version};
