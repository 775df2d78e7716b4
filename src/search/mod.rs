//! Search layer
//! - client.rs: paginated fetches of the PyPI search page
//! - parser.rs: snippet → `Package` extraction

pub mod client;
pub mod parser;

pub use client::{SearchClient, Snippet, Snippets};
pub use parser::ResultParser;
