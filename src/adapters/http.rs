//! LM Studio client over its OpenAI-compatible HTTP API.
//!
//! The connection is checked once in [`LmStudioClient::connect`] by listing
//! the served models; afterwards the client is only read from.

use crate::domain::ports::ModelClient;
use crate::domain::schema::{ComplaintInfo, SCHEMA_NAME};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";
pub const DEFAULT_MODEL: &str = "qwen/qwen3-30b-a3b-mlx";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LmStudioClient {
    client: Client,
    base_url: String,
    model: String,
}

impl LmStudioClient {
    pub async fn connect(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;

        tracing::info!("🔌 Connecting to LM Studio model {} at {}", model, base_url);
        let models_url = format!("{}/models", base_url);
        let unavailable = |reason: String| EtlError::ModelUnavailable {
            endpoint: base_url.clone(),
            reason,
        };

        let response = client
            .get(&models_url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("GET {} returned {}", models_url, status)));
        }

        let listing: ModelList = response
            .json()
            .await
            .map_err(|e| unavailable(format!("unexpected model listing: {}", e)))?;

        if listing.data.iter().any(|m| m.id == model) {
            tracing::info!("✅ Model {} is available", model);
        } else {
            // LM Studio 可按需載入模型，只發出警告
            tracing::warn!(
                "Model {} is not listed by the server ({} models available); it may be loaded on first request",
                model,
                listing.data.len()
            );
        }

        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body(&self, prompt: &str, schema: &Value) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "temperature": 0,
            "stream": false,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": schema,
                }
            }
        })
    }
}

/// Reasoning models may prepend a `<think>` block before the JSON answer.
fn strip_reasoning(content: &str) -> &str {
    match content.rfind("</think>") {
        Some(end) => content[end + "</think>".len()..].trim(),
        None => content.trim(),
    }
}

#[async_trait]
impl ModelClient for LmStudioClient {
    fn model_identifier(&self) -> &str {
        &self.model
    }

    async fn respond(&self, prompt: &str, schema: &Value) -> Result<ComplaintInfo> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&self.request_body(prompt, schema))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Chat completion status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EtlError::model_response(format!(
                "{} returned {}: {}",
                url, status, body
            )));
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EtlError::model_response("response contained no message content"))?;

        let info: ComplaintInfo = serde_json::from_str(strip_reasoning(&content))?;
        Ok(info)
    }
}
