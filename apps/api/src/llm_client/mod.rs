/// LLM Client — the single point of entry for all model calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// Handlers hold an `Arc<dyn LlmProvider>` chosen once at startup from
/// `LLM_PROVIDER`; swapping providers never touches handler code.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, ProviderKind};
use crate::schema::{conform, Schema, SchemaViolation};

pub mod gemini;
pub mod groq;
pub mod json;
pub mod ollama;
pub mod prompts;

#[cfg(test)]
pub mod testing;

pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use json::{extract_json, JsonShape, MalformedResponse};
pub use ollama::OllamaProvider;

/// Upper bound on provider error bodies echoed back to callers.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{env_var} is not set")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("{provider} is unreachable: {detail}")]
    Unreachable {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} request timed out after {}s", .timeout.as_secs())]
    Timeout {
        provider: &'static str,
        timeout: Duration,
    },

    #[error("{provider} error ({status}): {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },

    #[error("Failed to decode {provider} response: {detail}")]
    Decode {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Any failure on the way from prompt to typed result.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Malformed(#[from] MalformedResponse),

    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

/// A text-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name used in logs and error messages.
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Sends `prompt` with a completion budget of `max_tokens` and returns the
    /// raw completion text. Never retries; never returns an empty string.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError>;
}

/// Builds the provider selected by configuration.
pub fn build_provider(config: &Config) -> Result<Arc<dyn LlmProvider>, ProviderError> {
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Groq => Arc::new(GroqProvider::new(
            config.groq_api_key.clone(),
            config.llm_model.clone(),
            config.llm_base_url.clone(),
            config.llm_timeout,
        )?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(
            config.gemini_api_key.clone(),
            config.llm_model.clone(),
            config.llm_base_url.clone(),
            config.llm_timeout,
        )?),
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            config
                .llm_model
                .clone()
                .unwrap_or_else(|| config.ollama_model.clone()),
            config.llm_base_url.clone(),
            config.llm_timeout,
        )?),
    };
    Ok(provider)
}

/// Prompt → completion → extracted JSON → schema-checked value.
pub async fn generate_structured<T: Schema>(
    llm: &dyn LlmProvider,
    prompt: &str,
    max_tokens: u32,
) -> Result<T, LlmError> {
    let raw = llm.generate(prompt, max_tokens).await?;
    let value = extract_json(&raw, T::SHAPE)?;
    Ok(conform::<T>(value)?)
}

pub(crate) fn http_client(
    provider: &'static str,
    timeout: Duration,
) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| ProviderError::Http { provider, source })
}

/// Sends a prepared request and decodes a 2xx JSON body.
/// Non-2xx statuses become `ProviderError::Status` carrying the body text.
pub(crate) async fn send_json<R: DeserializeOwned>(
    provider: &'static str,
    timeout: Duration,
    request: RequestBuilder,
) -> Result<R, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| classify(provider, timeout, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| classify(provider, timeout, e))?;

    if !status.is_success() {
        warn!("{provider} returned {status}: {body}");
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    debug!("{provider} call succeeded: {} bytes", body.len());

    serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
        provider,
        detail: e.to_string(),
    })
}

/// Maps transport failures onto the provider error taxonomy. URLs are
/// stripped because some providers carry the API key in the query string.
fn classify(provider: &'static str, timeout: Duration, error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout { provider, timeout }
    } else if error.is_connect() {
        ProviderError::Unreachable {
            provider,
            detail: error.without_url().to_string(),
        }
    } else {
        ProviderError::Http {
            provider,
            source: error.without_url(),
        }
    }
}

/// Trims the completion; blank completions are an error. Every adapter
/// returns its text through here.
pub(crate) fn non_empty(provider: &'static str, text: Option<String>) -> Result<String, ProviderError> {
    match text.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(ProviderError::EmptyResponse { provider }),
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubProvider;
    use super::*;
    use crate::analysis::models::MatchResult;

    #[test]
    fn test_build_provider_follows_config() {
        let mut config = Config::for_tests(ProviderKind::Gemini);
        assert_eq!(build_provider(&config).unwrap().name(), "Gemini");

        config.provider = ProviderKind::Ollama;
        config.ollama_model = "mistral".to_string();
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "Ollama");
        assert_eq!(provider.model(), "mistral");
    }

    #[test]
    fn test_model_override_wins() {
        let mut config = Config::for_tests(ProviderKind::Groq);
        config.llm_model = Some("llama-3.3-70b-versatile".to_string());
        assert_eq!(build_provider(&config).unwrap().model(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_status_error_message_carries_code() {
        let err = ProviderError::Status {
            provider: "Groq",
            status: 500,
            body: "upstream exploded".to_string(),
        };
        assert_eq!(err.to_string(), "Groq error (500): upstream exploded");
    }

    #[test]
    fn test_non_empty_trims_and_rejects_blank() {
        assert_eq!(
            non_empty("Groq", Some("\n  Groq is working!  \n".to_string())).unwrap(),
            "Groq is working!"
        );
        assert!(non_empty("Groq", Some(" \t\n".to_string())).is_err());
        assert!(non_empty("Groq", None).is_err());
    }

    #[tokio::test]
    async fn test_generate_structured_decodes_fenced_output() {
        let stub = StubProvider::replying(
            "```json\n{\"matchScore\": 64, \"matchGrade\": \"C\", \"verdict\": \"Partial fit\"}\n```",
        );
        let result: MatchResult = generate_structured(&stub, "prompt", 100).await.unwrap();
        assert_eq!(result.match_score, 64);
        assert_eq!(result.verdict, "Partial fit");
    }

    #[tokio::test]
    async fn test_generate_structured_surfaces_malformed() {
        let stub = StubProvider::replying("no json here");
        let err = generate_structured::<MatchResult>(&stub, "prompt", 100)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_generate_structured_surfaces_schema_violation() {
        let stub = StubProvider::replying("{\"matchScore\": 140}");
        let err = generate_structured::<MatchResult>(&stub, "prompt", 100)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Schema(_)));
    }
}
