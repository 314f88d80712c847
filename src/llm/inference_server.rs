//! Text-generation-inference HTTP backend
//!
//! Speaks the `POST /tokenize` and `POST /generate` dialect served by
//! Hugging Face text-generation-inference and compatible servers.

use super::{GenerationRequest, GenerationResponse, GeneratorConfig, LlmError, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP generation backend
pub struct InferenceServerGenerator {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    model_id: String,
}

impl InferenceServerGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            model_id: config.model.clone(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{route}", self.base_url)
    }

    fn translate_request(request: &GenerationRequest, max_new_tokens: u32) -> TgiRequest<'_> {
        TgiRequest {
            inputs: &request.inputs,
            parameters: TgiParameters {
                do_sample: request.sampling.do_sample,
                top_k: request.sampling.top_k,
                top_p: request.sampling.top_p,
                max_new_tokens,
                return_full_text: false,
            },
        }
    }

    /// POST a JSON body and return the raw response body on success
    async fn post<T: Serialize + Sync>(&self, route: &str, body: &T) -> Result<String, LlmError> {
        let mut builder = self.client.post(self.url(route)).json(body);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                LlmError::network(format!("Connection failed: {e}"))
            } else {
                LlmError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }
        Ok(body)
    }

    async fn count_prompt_tokens(&self, inputs: &str) -> Result<u32, LlmError> {
        let body = self.post("tokenize", &TgiTokenizeRequest { inputs }).await?;
        parse_token_count(&body)
    }
}

/// Tokens left for the continuation under a total sequence length cap
fn new_token_budget(max_length: u32, prompt_tokens: u32) -> Result<u32, LlmError> {
    match max_length.checked_sub(prompt_tokens) {
        Some(budget) if budget > 0 => Ok(budget),
        _ => Err(LlmError::invalid_request(format!(
            "Prompt is {prompt_tokens} tokens, leaving no room under the {max_length} token limit"
        ))),
    }
}

fn classify_error(status: reqwest::StatusCode, body: &str) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::auth(format!("Authentication failed: {body}")),
        429 => LlmError::rate_limit(format!("Rate limited: {body}")),
        400 | 422 => LlmError::invalid_request(format!("Invalid request: {body}")),
        500..=599 => LlmError::server_error(format!("Server error: {body}")),
        _ => LlmError::unknown(format!("HTTP {status}: {body}")),
    }
}

fn parse_token_count(body: &str) -> Result<u32, LlmError> {
    let tokens: Vec<TgiToken> = serde_json::from_str(body)
        .map_err(|e| LlmError::unknown(format!("Failed to parse tokenize response: {e}")))?;
    u32::try_from(tokens.len())
        .map_err(|_| LlmError::invalid_request(format!("Prompt too long: {} tokens", tokens.len())))
}

fn parse_response(body: &str) -> Result<GenerationResponse, LlmError> {
    let parsed: TgiResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::unknown(format!("Failed to parse response: {e} - body: {body}")))?;

    let generation = match parsed {
        TgiResponse::Single(generation) => generation,
        TgiResponse::Batch(batch) => batch
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::unknown("Empty generation batch"))?,
    };

    Ok(GenerationResponse::new(generation.generated_text))
}

#[async_trait]
impl TextGenerator for InferenceServerGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, LlmError> {
        let prompt_tokens = self.count_prompt_tokens(&request.inputs).await?;
        let max_new_tokens = new_token_budget(request.sampling.max_length, prompt_tokens)?;
        tracing::debug!(prompt_tokens, max_new_tokens, "Generation budget");

        let body = self
            .post("generate", &Self::translate_request(request, max_new_tokens))
            .await?;
        parse_response(&body)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct TgiTokenizeRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct TgiToken {
    #[allow(dead_code)] // Only the count is used
    id: u32,
}

#[derive(Debug, Serialize)]
struct TgiRequest<'a> {
    inputs: &'a str,
    parameters: TgiParameters,
}

#[derive(Debug, Serialize)]
struct TgiParameters {
    do_sample: bool,
    top_k: u32,
    top_p: f64,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TgiResponse {
    Single(TgiGeneration),
    Batch(Vec<TgiGeneration>),
}

#[derive(Debug, Deserialize)]
struct TgiGeneration {
    generated_text: String,
}
