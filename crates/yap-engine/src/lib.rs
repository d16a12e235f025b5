//! # yap-engine
//!
//! Auth, content parsing, and the feed state container for Yap.
//! Everything here is synchronous and single-writer; the async suggestion
//! oracle lives behind a port in `yap-core` and never touches this crate.

pub mod auth;
pub mod constants;
pub mod feed;
pub mod parser;

pub use feed::{FeedEngine, ProfileUpdate, SearchResults, Stats, TrendingTag};
