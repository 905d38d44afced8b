use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const COMPLETION_MODEL: &str = "mistral-medium";
pub const MAX_TOKENS: u32 = 200;
pub const TEMPERATURE: f32 = 0.7;

/// Response text used when the endpoint answers 2xx but the payload carries
/// no usable choice. The exchange is still treated as a success so it gets
/// recorded like any other.
pub const NO_RESPONSE_PLACEHOLDER: &str = "no response received";

/// Upper bound on one completion round-trip. There is no retry at this
/// layer; a slow or dead endpoint degrades to a visible error string.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("unexpected HTTP status from completion endpoint: {status}")]
    UnexpectedStatus { status: u16 },

    #[error(transparent)]
    RequestError(#[from] reqwest::Error),
}

pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize, Debug)]
struct CompletionChoice {
    text: String,
}

impl CompletionClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Sends one synchronous completion request for the raw user text.
    ///
    /// Transport failures and non-2xx statuses are errors; a 2xx payload is
    /// parsed leniently and degrades to `NO_RESPONSE_PLACEHOLDER` instead of
    /// failing, so the caller can always record the exchange.
    pub async fn get_completion(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: COMPLETION_MODEL,
            prompt,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CompletionError::UnexpectedStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(extract_completion_text(&body))
    }
}

/// Pulls the first choice's text out of a 2xx completion payload.
///
/// An empty or unparseable choices list maps to the placeholder rather than
/// an error. Intent upstream is ambiguous here; the behavior is kept as-is.
fn extract_completion_text(body: &str) -> String {
    match serde_json::from_str::<CompletionResponse>(body) {
        Ok(payload) => payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string()),
        Err(_) => NO_RESPONSE_PLACEHOLDER.to_string(),
    }
}
