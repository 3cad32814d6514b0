//! Local Ollama `/api/generate` backend. No API key; usually slow on first load.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, non_empty, send_json, LlmProvider, ProviderError};

const PROVIDER: &str = "Ollama";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

pub struct OllamaProvider {
    client: Client,
    model: String,
    endpoint: String,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new(
        model: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            client: http_client(PROVIDER, timeout)?,
            model,
            endpoint: format!("{}/api/generate", base.trim_end_matches('/')),
            timeout,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: max_tokens,
                temperature: TEMPERATURE,
            },
        };

        let request = self.client.post(&self.endpoint).json(&body);
        let response: GenerateResponse = send_json(PROVIDER, self.timeout, request).await?;
        non_empty(PROVIDER, response.response)
    }
}
