use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which LLM backend the process talks to. Exactly one is active per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
    Gemini,
    Ollama,
}

impl ProviderKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "gemini" => Ok(ProviderKind::Gemini),
            "ollama" => Ok(ProviderKind::Ollama),
            other => bail!("LLM_PROVIDER must be one of groq, gemini, ollama (got '{other}')"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// Provider API keys are optional here: a missing key surfaces as a
/// `ProviderError` on the first call, not as a startup failure.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub frontend_url: Option<String>,
    pub provider: ProviderKind,
    pub groq_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub ollama_model: String,
    /// Overrides the provider's default model name.
    pub llm_model: Option<String>,
    /// Overrides the provider's default endpoint base URL.
    pub llm_base_url: Option<String>,
    pub llm_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            frontend_url: optional_env("FRONTEND_URL"),
            provider: ProviderKind::parse(
                &std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "groq".to_string()),
            )?,
            groq_api_key: optional_env("GROQ_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            ollama_model: optional_env("OLLAMA_MODEL").unwrap_or_else(|| "llama3.2".to_string()),
            llm_model: optional_env("LLM_MODEL"),
            llm_base_url: optional_env("LLM_BASE_URL"),
            llm_timeout: Duration::from_secs(
                std::env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }

    /// Origins allowed by CORS: the local dev ports plus `FRONTEND_URL`.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = (5173..=5189)
            .map(|port| format!("http://localhost:{port}"))
            .collect();
        if let Some(url) = &self.frontend_url {
            origins.push(url.clone());
        }
        origins
    }

    /// The env var the active provider needs but does not have.
    pub fn missing_api_key(&self) -> Option<&'static str> {
        match self.provider {
            ProviderKind::Groq if self.groq_api_key.is_none() => Some("GROQ_API_KEY"),
            ProviderKind::Gemini if self.gemini_api_key.is_none() => Some("GEMINI_API_KEY"),
            _ => None,
        }
    }
}

/// Reads an env var, treating unset and blank values the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    /// Configuration used by unit tests; never reads the environment.
    pub fn for_tests(provider: ProviderKind) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            frontend_url: None,
            provider,
            groq_api_key: None,
            gemini_api_key: None,
            ollama_model: "llama3.2".to_string(),
            llm_model: None,
            llm_base_url: None,
            llm_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parses_case_insensitively() {
        assert_eq!(ProviderKind::parse("Groq").unwrap(), ProviderKind::Groq);
        assert_eq!(ProviderKind::parse(" gemini ").unwrap(), ProviderKind::Gemini);
        assert_eq!(ProviderKind::parse("OLLAMA").unwrap(), ProviderKind::Ollama);
    }

    #[test]
    fn test_provider_kind_rejects_unknown() {
        let err = ProviderKind::parse("openai").unwrap_err();
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn test_allowed_origins_cover_dev_ports() {
        let config = Config::for_tests(ProviderKind::Groq);
        let origins = config.allowed_origins();
        assert_eq!(origins.len(), 17);
        assert!(origins.contains(&"http://localhost:5173".to_string()));
        assert!(origins.contains(&"http://localhost:5189".to_string()));
    }

    #[test]
    fn test_allowed_origins_include_frontend_url() {
        let mut config = Config::for_tests(ProviderKind::Groq);
        config.frontend_url = Some("https://resume.example.com".to_string());
        assert_eq!(
            config.allowed_origins().last().map(String::as_str),
            Some("https://resume.example.com")
        );
    }

    #[test]
    fn test_missing_api_key_follows_active_provider() {
        let mut config = Config::for_tests(ProviderKind::Groq);
        config.gemini_api_key = Some("g-key".to_string());
        assert_eq!(config.missing_api_key(), Some("GROQ_API_KEY"));

        config.provider = ProviderKind::Gemini;
        assert_eq!(config.missing_api_key(), None);

        config.provider = ProviderKind::Ollama;
        assert_eq!(config.missing_api_key(), None);

        config.provider = ProviderKind::Gemini;
        config.gemini_api_key = None;
        assert_eq!(config.missing_api_key(), Some("GEMINI_API_KEY"));
    }
}
