//! Minimal Ollama chat client used by the extractors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::error::LLMError;

/// Configuration for the Ollama client
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama server URL (default: http://localhost:11434)
    pub host: String,
    /// Model to use (default: llava, which accepts images)
    pub model: String,
    /// Sampling temperature; `None` keeps the server default
    pub temperature: Option<f32>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "llava".to_string(),
            temperature: Some(0.0),
        }
    }
}

impl OllamaConfig {
    pub fn at(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// A message in Ollama's chat format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    pub content: String,
    /// Base64 encoded images, for multimodal models
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl OllamaMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

/// Options for Ollama generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Request structure for Ollama chat completions
#[derive(Debug, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Response from Ollama's chat endpoint
#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub message: OllamaMessage,
    pub done: bool,
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub eval_count: u32,
}

/// Chat client bound to one Ollama server and model.
#[derive(Clone, Debug)]
pub struct Ollama {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl Ollama {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub(crate) fn request(&self, messages: Vec<OllamaMessage>, json_mode: bool) -> OllamaChatRequest {
        OllamaChatRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
            options: self.config.temperature.map(|t| OllamaOptions {
                temperature: Some(t),
            }),
            format: json_mode.then(|| "json".to_string()),
        }
    }

    /// Sends one non-streaming chat request.
    pub async fn chat(
        &self,
        messages: Vec<OllamaMessage>,
        json_mode: bool,
    ) -> Result<OllamaChatResponse, LLMError> {
        let request = self.request(messages, json_mode);

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.host))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LLMError::OllamaError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let chat_response: OllamaChatResponse = response.json().await?;
        if !chat_response.done {
            return Err(LLMError::InvalidResponse(
                "Ollama returned an unfinished response".to_string(),
            ));
        }
        Ok(chat_response)
    }
}
