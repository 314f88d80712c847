//! Bot reply generation
//!
//! Turns a user's message into a model prompt, runs it through the
//! configured backend and returns only the continuation.

use crate::llm::{GenerationRequest, LlmError, SamplingParams, TextGenerator};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyPrompt,
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),
}

/// Generation adapter bound to one model profile
pub struct ReplyGenerator {
    generator: Arc<dyn TextGenerator>,
    eos_token: String,
    sampling: SamplingParams,
}

impl ReplyGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, eos_token: impl Into<String>) -> Self {
        Self {
            generator,
            eos_token: eos_token.into(),
            sampling: SamplingParams::default(),
        }
    }

    pub fn model_id(&self) -> &str {
        self.generator.model_id()
    }

    /// Generate the bot's reply to `prompt`.
    ///
    /// Backend failures are returned as-is; there is no retry.
    pub async fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let request = GenerationRequest {
            inputs: format!("{prompt}{}", self.eos_token),
            sampling: self.sampling,
        };

        let response = self.generator.generate(&request).await?;
        Ok(continuation(&request.inputs, &response.text, &self.eos_token))
    }
}

/// Strip an echoed prompt and any special end-of-turn markers.
///
/// Only the exact prompt sent (marker included) counts as an echo; a reply
/// that merely repeats the user's words is kept whole.
fn continuation(full_prompt: &str, output: &str, eos_token: &str) -> String {
    let tail = output.strip_prefix(full_prompt).unwrap_or(output);
    let cleaned = if eos_token.is_empty() {
        tail.to_string()
    } else {
        tail.replace(eos_token, "")
    };
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::MockGenerator;
    use crate::llm::LlmErrorKind;

    const EOS: &str = "<|endoftext|>";

    #[test]
    fn test_continuation_strips_echo() {
        assert_eq!(
            continuation("hi<|endoftext|>", "hi<|endoftext|>hello there<|endoftext|>", EOS),
            "hello there"
        );
        assert_eq!(continuation("hi<|endoftext|>", " hey ", EOS), "hey");
    }

    #[test]
    fn test_continuation_keeps_reply_repeating_user_words() {
        assert_eq!(
            continuation("hi<|endoftext|>", "hi there yourself", EOS),
            "hi there yourself"
        );
    }

    #[tokio::test]
    async fn test_reply_starting_with_prompt_is_not_truncated() {
        let mock = Arc::new(MockGenerator::new());
        mock.queue_output("hello! how are you?");
        let replies = ReplyGenerator::new(mock, EOS);

        assert_eq!(replies.generate("hello").await.unwrap(), "hello! how are you?");
    }

    #[tokio::test]
    async fn test_generate_appends_eos_and_default_sampling() {
        let mock = Arc::new(MockGenerator::new());
        mock.queue_output("I'm good, thanks");
        let replies = ReplyGenerator::new(mock.clone(), EOS);

        let reply = replies.generate("how are you?").await.unwrap();
        assert_eq!(reply, "I'm good, thanks");

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].inputs, "how are you?<|endoftext|>");
        assert_eq!(requests[0].sampling, SamplingParams::default());
        assert_eq!(requests[0].sampling.top_k, 50);
        assert_eq!(requests[0].sampling.max_length, 1000);
    }

    #[tokio::test]
    async fn test_empty_prompt_never_reaches_backend() {
        let mock = Arc::new(MockGenerator::always("unused"));
        let replies = ReplyGenerator::new(mock.clone(), EOS);

        assert!(matches!(replies.generate("   ").await, Err(ChatError::EmptyPrompt)));
        assert!(mock.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let mock = Arc::new(MockGenerator::new());
        mock.queue_error(LlmError::server_error("CUDA out of memory"));
        let replies = ReplyGenerator::new(mock, EOS);

        match replies.generate("hello").await {
            Err(ChatError::Generation(e)) => assert_eq!(e.kind, LlmErrorKind::ServerError),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
