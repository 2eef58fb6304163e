//! Core domain types and traits for Anigate.
//!
//! Anigate relays chat messages to a generative model behind a pool of
//! rotating API keys, optionally enriching the instruction with externally
//! fetched profile context. This crate holds the value objects, the error
//! taxonomy, and the traits implemented by the provider and context crates.

pub mod error;
pub mod model;
pub mod source;

pub use error::{Error, FetchError, ModelError, Result};
pub use model::{GenerationRequest, TextModel};
pub use source::ContextSource;
