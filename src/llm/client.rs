//! Async HTTP client for the text-generation service
//!
//! A model-agnostic text-in/text-out call. Speaks the Gemini
//! `generateContent` API and OpenAI-compatible chat completions.
//! The API key is passed per call because it lives in the store and can be
//! changed at runtime.

use crate::core::config::TrackerConfig;
use crate::core::error::{Result, TrackerError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text-in/text-out generation, the only contract the classifier needs
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one prompt and return the raw generated text
    ///
    /// Any transport, timeout or service error is
    /// `TrackerError::ClassifierUnavailable`.
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String>;
}

/// API format type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    Gemini,
    OpenAI,
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_url: String,
    model: String,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a client, detecting the API format from the URL
    pub fn new(api_url: String, model: String, timeout: Duration) -> Result<Self> {
        let api_format = Self::detect_api_format(&api_url);
        Self::with_format(api_url, model, timeout, api_format)
    }

    /// Create a client with an explicit API format
    pub fn with_format(
        api_url: String,
        model: String,
        timeout: Duration,
        api_format: ApiFormat,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
            api_format,
        })
    }

    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        Self::new(
            config.api_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("generativelanguage.googleapis.com") {
            ApiFormat::Gemini
        } else {
            // Everything else is assumed OpenAI-compatible
            ApiFormat::OpenAI
        }
    }

    pub fn api_format(&self) -> ApiFormat {
        self.api_format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single prompt to the model
    pub async fn complete(&self, api_key: &str, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.model, format = ?self.api_format, "Sending generation request");
        let text = match self.api_format {
            ApiFormat::Gemini => self.complete_gemini(api_key, prompt).await,
            ApiFormat::OpenAI => self.complete_openai(api_key, prompt).await,
        }?;
        tracing::debug!(chars = text.chars().count(), "Received generation response");
        Ok(text)
    }

    async fn complete_gemini(&self, api_key: &str, prompt: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".into()),
                parts: vec![GeminiPart {
                    text: Some(prompt.into()),
                }],
            }],
        };
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TrackerError::ClassifierUnavailable(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let completion: GeminiResponse = response.json().await.map_err(unavailable)?;

        let text: String = completion
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        non_empty(text)
    }

    async fn complete_openai(&self, api_key: &str, prompt: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".into(),
                content: prompt.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TrackerError::ClassifierUnavailable(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let completion: OpenAIResponse = response.json().await.map_err(unavailable)?;

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        non_empty(text)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String> {
        self.complete(api_key, prompt).await
    }
}

fn unavailable(e: reqwest::Error) -> TrackerError {
    if e.is_timeout() {
        TrackerError::ClassifierUnavailable("request timed out".into())
    } else {
        TrackerError::ClassifierUnavailable(e.to_string())
    }
}

fn non_empty(text: String) -> Result<String> {
    if text.trim().is_empty() {
        Err(TrackerError::ClassifierUnavailable("Empty response".into()))
    } else {
        Ok(text)
    }
}

// Gemini generateContent format
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}
