/// LLM Client — the single point of entry for all generative-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All LLM interactions MUST go through this module.
///
/// The HTTP hop sits behind `GenerationTransport` so the retry and parsing
/// behaviour can be exercised against a scripted transport.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::models::AnalysisResult;

pub mod lenient_json;
pub mod prompts;
pub mod retry;

use lenient_json::extract_json_value;
use retry::RetryPolicy;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 3000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Service still failing after {attempts} attempts (status {status}): {message}")]
    RetriesExhausted {
        attempts: u32,
        status: u16,
        message: String,
    },

    #[error("Could not parse AI response as JSON")]
    Unparseable,

    #[error("AI response does not match the expected schema: {0}")]
    Schema(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL can carry credentials; never let it reach logs.
        LlmError::Http(e.without_url().to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate; empty if absent.
    pub fn text(&self) -> &str {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Server-provided `error.message` if the body carries one, otherwise a generic line.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Generation request failed with status {status}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Transport
// ────────────────────────────────────────────────────────────────────────────

/// Raw HTTP outcome: status plus body text.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// One POST to the generation endpoint. No retries at this layer.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn send(
        &self,
        request: &GenerateContentRequest<'_>,
    ) -> Result<TransportResponse, LlmError>;
}

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Reqwest-backed transport for the Gemini `generateContent` endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(
        api_base: &str,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                api_base.trim_end_matches('/'),
                model
            ),
            api_key,
        })
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    async fn send(
        &self,
        request: &GenerateContentRequest<'_>,
    ) -> Result<TransportResponse, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by the analysis pipeline.
/// Wraps the generation endpoint with the retry policy and lenient JSON recovery.
#[derive(Clone)]
pub struct LlmClient {
    transport: Arc<dyn GenerationTransport>,
    generation: GenerationConfig,
    retry: RetryPolicy,
    model: String,
}

impl LlmClient {
    pub fn new(
        transport: Arc<dyn GenerationTransport>,
        generation: GenerationConfig,
        retry: RetryPolicy,
        model: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            generation,
            retry,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Makes a raw call, returning the response envelope.
    /// Retries 429 and 503 per the retry policy; every other failure is terminal.
    pub async fn call(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.generation,
        };

        let mut last_retryable: Option<(u16, String)> = None;

        for attempt in 0..self.retry.max_attempts {
            let delay = self.retry.delay_for(attempt);
            if attempt > 0 {
                warn!(
                    "Generation attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let response = self.transport.send(&request).await?;

            if RetryPolicy::is_retryable_status(response.status) {
                warn!(
                    "Generation API returned {}: {}",
                    response.status, response.body
                );
                last_retryable = Some((
                    response.status,
                    error_message(response.status, &response.body),
                ));
                continue;
            }

            if !(200..300).contains(&response.status) {
                return Err(LlmError::Api {
                    status: response.status,
                    message: error_message(response.status, &response.body),
                });
            }

            // An undecodable envelope is treated as an empty answer.
            let envelope: GenerateContentResponse =
                serde_json::from_str(&response.body).unwrap_or_default();

            debug!(
                "Generation call succeeded on attempt {}: {} chars",
                attempt + 1,
                envelope.text().len()
            );

            return Ok(envelope);
        }

        let (status, message) = last_retryable
            .unwrap_or((503, "no attempts were permitted by the retry policy".to_string()));
        Err(LlmError::RetriesExhausted {
            attempts: self.retry.max_attempts,
            status,
            message,
        })
    }

    /// Calls the model and recovers a JSON document from its free-form answer.
    pub async fn call_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, LlmError> {
        let response = self.call(prompt).await?;
        let value = extract_json_value(response.text()).ok_or(LlmError::Unparseable)?;
        serde_json::from_value(value).map_err(|e| LlmError::Schema(e.to_string()))
    }

    /// Runs an analysis prompt and returns a structurally valid result.
    pub async fn analyze(&self, prompt: &str) -> Result<AnalysisResult, LlmError> {
        let result: AnalysisResult = self.call_json(prompt).await?;
        result.validate_structure().map_err(LlmError::Schema)?;
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Scripted transport: returns responses in order, repeating the last one.
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<TransportResponse, String>>>,
        last: Mutex<Option<Result<TransportResponse, String>>>,
        call_count: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        pub fn new(responses: Vec<Result<TransportResponse, String>>) -> Self {
            assert!(!responses.is_empty(), "script must have at least one response");
            Self {
                responses: Mutex::new(responses.into()),
                last: Mutex::new(None),
                call_count: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn statuses(script: &[(u16, &str)]) -> Self {
            Self::new(
                script
                    .iter()
                    .map(|(status, body)| {
                        Ok(TransportResponse {
                            status: *status,
                            body: body.to_string(),
                        })
                    })
                    .collect(),
            )
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationTransport for ScriptedTransport {
        async fn send(
            &self,
            request: &GenerateContentRequest<'_>,
        ) -> Result<TransportResponse, LlmError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Some(part) = request.contents.first().and_then(|c| c.parts.first()) {
                self.prompts.lock().unwrap().push(part.text.to_string());
            }

            let next = self.responses.lock().unwrap().pop_front();
            let response = match next {
                Some(r) => {
                    *self.last.lock().unwrap() = Some(r.clone());
                    r
                }
                None => self.last.lock().unwrap().clone().unwrap(),
            };
            response.map_err(LlmError::Http)
        }
    }

    /// Wraps model text in a `generateContent` success envelope.
    pub fn envelope(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
        })
        .to_string()
    }

    pub fn client(transport: Arc<ScriptedTransport>) -> LlmClient {
        LlmClient::new(
            transport,
            GenerationConfig::default(),
            RetryPolicy::default(),
            DEFAULT_MODEL,
        )
    }
}
