//! Bedrock-style inference client
//!
//! Invokes a model over the Bedrock runtime REST surface
//! (`POST {endpoint}/model/{model_id}/invoke`) with bearer-token auth.
//! The request body and the location of the generated text both depend on
//! the model family, so they are shaped per model id.
//!
//! Configuration is read lazily: the server starts fine without any of it,
//! and a missing model or region only fails the agent run that needs it.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::Llm;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.2;

/// Bedrock runtime client
pub struct BedrockClient {
    client: Client,
    model_id: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
    bearer_token: Option<String>,
}

impl BedrockClient {
    /// Read configuration from the environment. Missing values are kept as
    /// absent and reported when `chat` is called.
    pub fn from_env() -> Self {
        let client = Client::builder()
            .user_agent("pipeline-tracker/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            model_id: std::env::var("BEDROCK_MODEL_ID").ok(),
            region: std::env::var("AWS_REGION")
                .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
                .ok(),
            endpoint: std::env::var("BEDROCK_ENDPOINT").ok(),
            bearer_token: std::env::var("AWS_BEARER_TOKEN_BEDROCK").ok(),
        }
    }

    fn invoke_url(&self, model_id: &str) -> Result<String> {
        let endpoint = match (&self.endpoint, &self.region) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(region)) => format!("https://bedrock-runtime.{region}.amazonaws.com"),
            (None, None) => return Err(anyhow!("Missing BEDROCK_MODEL_ID or AWS_REGION")),
        };
        Ok(format!("{endpoint}/model/{model_id}/invoke"))
    }
}

/// Shape the invocation body for the model family.
fn build_request_body(model_id: &str, prompt: &str) -> Value {
    if model_id.contains("anthropic") {
        json!({
            "anthropic_version": "bedrock-2023-05-31",
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "messages": [{ "role": "user", "content": prompt }],
        })
    } else if model_id.contains("titan") || model_id.contains("amazon") {
        json!({
            "inputText": prompt,
            "textGenerationConfig": {
                "maxTokenCount": MAX_TOKENS,
                "temperature": TEMPERATURE,
            },
        })
    } else {
        json!({
            "prompt": prompt,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        })
    }
}

/// Pull the generated text out of the family-specific response shape.
fn response_text(model_id: &str, payload: &Value) -> String {
    if model_id.contains("anthropic") {
        payload["content"][0]["text"].as_str().unwrap_or_default().to_string()
    } else if model_id.contains("titan") || model_id.contains("amazon") {
        payload["results"][0]["outputText"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    } else {
        payload["completion"].as_str().unwrap_or_default().to_string()
    }
}

#[async_trait]
impl Llm for BedrockClient {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let model_id = self
            .model_id
            .as_deref()
            .ok_or_else(|| anyhow!("Missing BEDROCK_MODEL_ID or AWS_REGION"))?;
        let url = self.invoke_url(model_id)?;

        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&build_request_body(model_id, prompt));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Inference error ({status}): {body}");
        }

        let payload: Value = response.json().await?;
        Ok(response_text(model_id, &payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anthropic_body_uses_messages() {
        let body = build_request_body("anthropic.claude-3-haiku", "hello");
        assert_eq!(body["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 800);
    }

    #[test]
    fn titan_body_uses_input_text() {
        let body = build_request_body("amazon.titan-text-express-v1", "hello");
        assert_eq!(body["inputText"], "hello");
        assert_eq!(body["textGenerationConfig"]["maxTokenCount"], 800);
    }

    #[test]
    fn other_models_get_plain_prompt_body() {
        let body = build_request_body("meta.llama3-8b", "hello");
        assert_eq!(body["prompt"], "hello");
    }

    #[test]
    fn response_text_per_family() {
        let anthropic = json!({"content": [{"text": "out"}]});
        assert_eq!(response_text("anthropic.claude", &anthropic), "out");

        let titan = json!({"results": [{"outputText": "out"}]});
        assert_eq!(response_text("amazon.titan", &titan), "out");

        let generic = json!({"completion": "out"});
        assert_eq!(response_text("mistral.small", &generic), "out");

        // Missing fields degrade to empty text, which extraction rejects
        assert_eq!(response_text("anthropic.claude", &json!({})), "");
    }
}
