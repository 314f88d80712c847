//! Text-generation backend abstraction
//!
//! The chat only needs one capability from a model: continue a prompt.

mod config;
mod error;
mod inference_server;
mod types;

#[cfg(test)]
pub mod testing;

pub use config::GeneratorConfig;
pub use error::{LlmError, LlmErrorKind};
pub use inference_server::InferenceServerGenerator;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for text-generation backends
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Continue the prompt in `request`
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for generation backends
pub struct LoggingGenerator {
    inner: Arc<dyn TextGenerator>,
    model_id: String,
}

impl LoggingGenerator {
    pub fn new(inner: Arc<dyn TextGenerator>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl TextGenerator for LoggingGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    prompt_chars = request.inputs.chars().count(),
                    output_chars = response.text.chars().count(),
                    "Generation completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    "Generation failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
