//! In-process provider doubles for handler and pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmProvider, ProviderError};

/// Replays a fixed outcome for every call and records the prompts it saw.
pub struct StubProvider {
    outcome: Outcome,
    prompts: Mutex<Vec<(String, u32)>>,
}

enum Outcome {
    Reply(String),
    Fail(fn() -> ProviderError),
}

impl StubProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            outcome: Outcome::Reply(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(make: fn() -> ProviderError) -> Self {
        Self {
            outcome: Outcome::Fail(make),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts and token budgets received so far, oldest first.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &'static str {
        "Stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((prompt.to_string(), max_tokens));
        }
        match &self.outcome {
            Outcome::Reply(text) => Ok(text.clone()),
            Outcome::Fail(make) => Err(make()),
        }
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe port");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}
