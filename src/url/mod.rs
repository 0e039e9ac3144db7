//! URL handling module for Sumi-Sift
//!
//! This module provides URL sanitizing and normalization, link resolution,
//! domain extraction, and the crawlability filters (pagination markers,
//! excluded extensions and excluded path fragments).

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{domain_of, Domain};
pub use filter::{is_crawlable, is_pagination, EXCLUDED_EXTENSIONS, EXCLUDED_PATH_SUBSTRINGS};
pub use normalize::{normalize, resolve, sanitize, NormalizedUrl};
