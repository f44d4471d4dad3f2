//! Generative-language synthesis over a finished bundle. Consumes the bundle
//! read-only; a failure here never affects the bundle itself.

mod citations;
mod client;
mod prompt;
mod types;

pub use citations::cited_sources;
pub use client::{GeminiClient, Summarizer, SynthesisError};
