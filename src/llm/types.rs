//! Common types for generation requests

use serde::Serialize;

/// Sampling configuration passed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingParams {
    pub do_sample: bool,
    pub top_k: u32,
    pub top_p: f64,
    /// Maximum total sequence length (prompt + continuation) in tokens
    pub max_length: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            do_sample: true,
            top_k: 50,
            top_p: 0.95,
            max_length: 1000,
        }
    }
}

/// Generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Full prompt, end-of-turn marker included
    pub inputs: String,
    pub sampling: SamplingParams,
}

/// Generation response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    /// Decoded output. Backends may or may not echo the prompt.
    pub text: String,
}

impl GenerationResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
