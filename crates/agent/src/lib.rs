//! Response generation for Anigate.
//!
//! The `Responder` ties the pipeline together: trigger-keyword scan,
//! cached context injection, instruction build, and the rotate-and-retry
//! generation loop bounded by the key pool size.

pub mod responder;

pub use responder::{APOLOGY_MESSAGE, OVERLOAD_MESSAGE, Responder};
