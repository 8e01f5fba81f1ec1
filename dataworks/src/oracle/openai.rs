//! OpenAI-compatible oracle (works with OpenAI and any proxy exposing the
//! chat-completions and embeddings endpoints).

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::OracleConfig;
use crate::errors::OracleError;
use crate::oracle::Oracle;

pub struct OpenAiOracle {
    config: OracleConfig,
    client: reqwest::Client,
}

impl OpenAiOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| OracleError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_key(&self) -> Result<&str, OracleError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(OracleError::MissingCredential)
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, OracleError> {
        let api_key = self.api_key()?;
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| OracleError::Http(format!("request to {} failed: {}", path, e)))?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|e| OracleError::Http(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(OracleError::Api {
                status: status.as_u16(),
                body: truncate(&raw_body, 500),
            });
        }

        serde_json::from_str(&raw_body)
            .map_err(|e| OracleError::Parse(format!("invalid JSON from {}: {}", path, e)))
    }

    /// One chat completion. `content` is either a plain string or an array of
    /// content parts (used for image inputs).
    async fn chat(&self, content: serde_json::Value) -> Result<String, OracleError> {
        let request = json!({
            "model": self.config.model,
            "messages": [ChatMessage {
                role: "user".to_string(),
                content,
            }],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let value = self.post_json("/chat/completions", &request).await?;
        let response: ChatResponse = serde_json::from_value(value)
            .map_err(|e| OracleError::Parse(format!("unexpected completion shape: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::Parse("completion has no choices".to_string()))?;

        debug!(model = %self.config.model, "oracle completion received");
        Ok(choice.message.content)
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn classify(&self, task: &str, catalogue: &str) -> Result<String, OracleError> {
        let prompt = format!(
            "You classify a task description into exactly one operation code.\n\
             Known operations:\n{}\n\
             Respond with only the code (for example: A3). If none fits, respond: undetermined.\n\n\
             Task: {}",
            catalogue, task
        );
        self.chat(json!(prompt)).await
    }

    async fn confirm(&self, question: &str) -> Result<String, OracleError> {
        let prompt = format!("Answer with only 'yes' or 'no'.\n\n{}", question);
        self.chat(json!(prompt)).await
    }

    async fn translate_weekday(&self, text: &str) -> Result<String, OracleError> {
        let prompt = format!(
            "The following task mentions a day of the week, possibly not in English. \
             Respond with only the English name of that day (monday..sunday).\n\n{}",
            text
        );
        self.chat(json!(prompt)).await
    }

    async fn extract_text(
        &self,
        instruction: &str,
        content: &str,
    ) -> Result<String, OracleError> {
        let prompt = format!("{}\n\n{}", instruction, content);
        self.chat(json!(prompt)).await
    }

    async fn extract_text_from_image(
        &self,
        instruction: &str,
        png_bytes: &[u8],
    ) -> Result<String, OracleError> {
        let data_url = format!("data:image/png;base64,{}", BASE64.encode(png_bytes));
        let content = json!([
            {"type": "text", "text": instruction},
            {"type": "image_url", "image_url": {"url": data_url}},
        ]);
        self.chat(content).await
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, OracleError> {
        let request = json!({
            "model": self.config.embedding_model,
            "input": texts,
        });

        let value = self.post_json("/embeddings", &request).await?;
        let response: EmbeddingsResponse = serde_json::from_value(value)
            .map_err(|e| OracleError::Parse(format!("unexpected embeddings shape: {}", e)))?;

        if response.data.len() != texts.len() {
            return Err(OracleError::Parse(format!(
                "embeddings count mismatch: sent {}, received {}",
                texts.len(),
                response.data.len()
            )));
        }

        let mut rows = response.data;
        rows.sort_by_key(|row| row.index);
        Ok(rows.into_iter().map(|row| row.embedding).collect())
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.len() > limit {
        let mut end = limit;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &text[..end], text.len())
    } else {
        text.to_string()
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
