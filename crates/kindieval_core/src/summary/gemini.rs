//! Gemini `generateContent` provider.
//!
//! # Invariants
//! - One HTTP request per [`SummaryProvider::generate`] call.
//! - The API key travels in the `x-goog-api-key` header, never in the URL.

use super::{SummaryError, SummaryProvider};
use crate::config::SummaryConfig;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// HTTP client for Google's generative-language API.
pub struct GeminiSummaryProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSummaryProvider {
    /// Builds a provider from config.
    ///
    /// Returns `NotConfigured` when the API key is missing or blank.
    pub fn from_config(config: &SummaryConfig) -> Result<Self, SummaryError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SummaryError::NotConfigured)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| SummaryError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl SummaryProvider for GeminiSummaryProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        debug!(
            "event=summary_request module=summary status=start provider=gemini model={}",
            self.model
        );
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|err| SummaryError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SummaryError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(SummaryError::Status {
                code: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        extract_text(&body)
    }
}

fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [{ "text": prompt }] }
        ]
    })
}

/// Concatenates the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, SummaryError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|err| SummaryError::MalformedResponse(err.to_string()))?;

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(SummaryError::EmptyResponse);
    }
    Ok(text)
}
