//! Google Gemini `generateContent` backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, non_empty, send_json, LlmProvider, ProviderError};

const PROVIDER: &str = "Gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiProvider {
    pub fn new(
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(PROVIDER, timeout)?,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey {
            provider: PROVIDER,
            env_var: "GEMINI_API_KEY",
        })?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: max_tokens,
            },
        };

        let url = format!("{}/v1/models/{}:generateContent", self.base_url, self.model);
        let request = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&body);

        let response: GenerateResponse = send_json(PROVIDER, self.timeout, request).await?;
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text);

        non_empty(PROVIDER, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::serve;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn provider(base: String) -> GeminiProvider {
        GeminiProvider::new(
            Some("g-key".to_string()),
            None,
            Some(base),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_returns_first_candidate_text() {
        let router = Router::new().route(
            "/v1/models/:call",
            post(
                |Path(call): Path<String>,
                 Query(q): Query<HashMap<String, String>>,
                 Json(body): Json<Value>| async move {
                    assert_eq!(call, "gemini-2.0-flash:generateContent");
                    assert_eq!(q.get("key").map(String::as_str), Some("g-key"));
                    assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
                    assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze this");
                    Json(json!({
                        "candidates": [{"content": {"parts": [{"text": "  {\"ok\": true}\n"}]}}]
                    }))
                },
            ),
        );
        let base = serve(router).await;

        let text = provider(base).generate("Analyze this", 1000).await.unwrap();
        assert_eq!(text, "{\"ok\": true}");
    }

    #[tokio::test]
    async fn test_missing_key() {
        let p = GeminiProvider::new(None, None, None, Duration::from_secs(1)).unwrap();
        let err = p.generate("hi", 10).await.unwrap_err();
        assert_eq!(err.to_string(), "GEMINI_API_KEY is not set");
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_response() {
        let router = Router::new().route(
            "/v1/models/:call",
            post(|| async { Json(json!({"candidates": []})) }),
        );
        let err = provider(serve(router).await)
            .generate("hi", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let router = Router::new().route(
            "/v1/models/:call",
            post(|| async { (StatusCode::BAD_REQUEST, "API key not valid") }),
        );
        let err = provider(serve(router).await)
            .generate("hi", 10)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Gemini error (400): API key not valid");
    }
}
