//! External profile context for Anigate.
//!
//! `github` fetches and normalizes GitHub profile/repository/README data
//! into a single text blob; `cache` keeps the last successful blob for a
//! validity window and serves it stale when a refresh fails.

pub mod cache;
pub mod github;

pub use cache::{ContextCache, UNAVAILABLE_SENTINEL};
pub use github::GithubSource;
