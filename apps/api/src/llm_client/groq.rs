//! Groq chat-completions backend (OpenAI-compatible wire format).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, non_empty, send_json, LlmProvider, ProviderError};

const PROVIDER: &str = "Groq";
const DEFAULT_BASE_URL: &str = "https://api.groq.com";
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct GroqProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    timeout: Duration,
}

impl GroqProvider {
    pub fn new(
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            client: http_client(PROVIDER, timeout)?,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: format!("{}/openai/v1/chat/completions", base.trim_end_matches('/')),
            timeout,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey {
            provider: PROVIDER,
            env_var: "GROQ_API_KEY",
        })?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature: TEMPERATURE,
        };

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body);

        let response: ChatResponse = send_json(PROVIDER, self.timeout, request).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);

        non_empty(PROVIDER, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{refused_url, serve};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    const ROUTE: &str = "/openai/v1/chat/completions";

    fn provider(base: String, key: Option<&str>, timeout: Duration) -> GroqProvider {
        GroqProvider::new(key.map(String::from), None, Some(base), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_returns_first_choice_content() {
        let router = Router::new().route(
            ROUTE,
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer test-key");
                assert_eq!(body["model"], DEFAULT_MODEL);
                assert_eq!(body["max_tokens"], 20);
                assert_eq!(body["messages"][0]["role"], "user");
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "\n\nGroq is working!  "}}]
                }))
            }),
        );
        let base = serve(router).await;

        let text = provider(base, Some("test-key"), Duration::from_secs(5))
            .generate("Reply with exactly: Groq is working!", 20)
            .await
            .unwrap();
        assert_eq!(text, "Groq is working!");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let err = provider(refused_url().await, None, Duration::from_secs(1))
            .generate("hi", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey { .. }));
        assert_eq!(err.to_string(), "GROQ_API_KEY is not set");
    }

    #[tokio::test]
    async fn test_non_2xx_carries_status_and_body() {
        let router = Router::new().route(
            ROUTE,
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded") }),
        );
        let base = serve(router).await;

        let err = provider(base, Some("k"), Duration::from_secs(5))
            .generate("hi", 10)
            .await
            .unwrap_err();
        match err {
            ProviderError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model overloaded");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_content_is_an_error() {
        let router = Router::new().route(
            ROUTE,
            post(|| async { Json(json!({"choices": [{"message": {"content": "  "}}]})) }),
        );
        let base = serve(router).await;

        let err = provider(base, Some("k"), Duration::from_secs(5))
            .generate("hi", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        let err = provider(refused_url().await, Some("k"), Duration::from_secs(5))
            .generate("hi", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unreachable { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let router = Router::new().route(
            ROUTE,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({"choices": []}))
            }),
        );
        let base = serve(router).await;

        let err = provider(base, Some("k"), Duration::from_millis(200))
            .generate("hi", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout { .. }), "{err:?}");
    }
}
