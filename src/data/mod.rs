//! Data acquisition
//!
//! Handles:
//! - CBOE delayed quotes CDN (primary + fallback URL)
//! - Local caching of the raw response body

pub mod cboe;
pub mod cache;

pub use cboe::*;
pub use cache::*;
