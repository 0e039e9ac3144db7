//! State module for tracking crawl progress
//!
//! This module provides the per-URL state machine used by the frontier.
//!
//! # Components
//!
//! - `UrlState`: Tracks the state of an individual URL (pending, claimed, completed, etc.)

mod url_state;

// Re-export main types
pub use url_state::UrlState;
