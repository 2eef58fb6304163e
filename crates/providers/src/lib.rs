//! Remote model client and credential rotation for Anigate.
//!
//! `gemini` implements the `TextModel` trait against the Gemini
//! `generateContent` REST API; `rotation` owns the ordered key pool and the
//! round-robin cursor the retry loop advances on failure.

pub mod gemini;
pub mod rotation;

pub use gemini::GeminiClient;
pub use rotation::KeyRotator;
