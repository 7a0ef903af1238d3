//! URL handling module for doc-crawler
//!
//! This module provides start-location normalization, the link filter that
//! scopes a crawl, and the visited set used for de-duplication.

mod filter;
mod normalize;
mod visited;

// Re-export main types and functions
pub use filter::LinkFilter;
pub use normalize::{index_alias, normalize_start_url, INDEX_DOCUMENT};
pub use visited::VisitedSet;
