//! Typed HTTP client for the Resume API.
//!
//! Every call reads the response body as text before parsing it, so an empty
//! body or an HTML error page from a proxy is reported as such instead of as
//! an opaque JSON error. Server-reported failures carry the `error` message
//! from the response body.

pub mod history;

use std::time::Duration;

use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::analysis::handlers::ParsePdfResponse;
use crate::analysis::models::{AnalysisResult, MatchResult};
use crate::routes::ai::GenerateResponse;
use crate::tools::models::{
    CoverLetter, CoverLetterRequest, InterviewPrep, InterviewPrepRequest, LinkedInProfile,
    LinkedInRequest, NegotiationScript, OutreachEmail, OutreachRequest, RewriteRequest,
    RewrittenBullet, SalaryRequest, ThankYouEmail, ThankYouRequest,
};

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Longer than the server's provider timeout so the server reports it first.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);
const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Server returned an empty response (HTTP {status})")]
    EmptyBody { status: u16 },

    #[error("Server returned a non-JSON response (HTTP {status}): {snippet}")]
    NotJson { status: u16, snippet: String },

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A generator tool request and the route it is served on.
pub trait ToolRequest: Serialize {
    const PATH: &'static str;
    type Output: DeserializeOwned;
}

macro_rules! tool_routes {
    ($($request:ty => $output:ty, $path:literal;)*) => {
        $(
            impl ToolRequest for $request {
                const PATH: &'static str = $path;
                type Output = $output;
            }
        )*
    };
}

tool_routes! {
    CoverLetterRequest => CoverLetter, "cover-letter";
    InterviewPrepRequest => InterviewPrep, "interview-prep";
    LinkedInRequest => LinkedInProfile, "linkedin";
    SalaryRequest => NegotiationScript, "salary-negotiation";
    OutreachRequest => OutreachEmail, "cold-outreach";
    ThankYouRequest => ThankYouEmail, "thank-you";
    RewriteRequest => RewrittenBullet, "rewrite-bullet";
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeReport {
    pub provider: String,
    pub model: String,
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
    pub provider: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3001`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: format!("{}/api", base_url.trim_end_matches('/')),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Uploads a PDF in the `resume` field and returns its extracted text.
    pub async fn parse_pdf(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<ParsePdfResponse, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("resume", part);
        self.send(self.http.post(self.url("resume/parse-pdf")).multipart(form))
            .await
    }

    pub async fn analyze_resume(&self, resume_text: &str) -> Result<AnalysisResult, ClientError> {
        let body = json!({ "resumeText": resume_text });
        self.send(self.http.post(self.url("resume/analyze")).json(&body))
            .await
    }

    pub async fn match_job(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<MatchResult, ClientError> {
        let body = json!({ "resumeText": resume_text, "jobDescription": job_description });
        self.send(self.http.post(self.url("resume/match")).json(&body))
            .await
    }

    /// Raw prompt passthrough; returns the completion text.
    pub async fn call_ai(&self, prompt: &str, max_tokens: u32) -> Result<String, ClientError> {
        let body = json!({ "prompt": prompt, "max_tokens": max_tokens });
        let response: GenerateResponse = self
            .send(self.http.post(self.url("ai/generate")).json(&body))
            .await?;
        Ok(response.text)
    }

    pub async fn run_tool<R: ToolRequest>(&self, request: &R) -> Result<R::Output, ClientError> {
        let path = format!("tools/{}", R::PATH);
        self.send(self.http.post(self.url(&path)).json(request))
            .await
    }

    pub async fn probe(&self) -> Result<ProbeReport, ClientError> {
        self.send(self.http.get(self.url("ai/test"))).await
    }

    pub async fn health(&self) -> Result<HealthReport, ClientError> {
        self.send(self.http.get(self.url("health"))).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("API responded {status}: {} bytes", body.len());
        decode_body(status, &body)
    }
}

fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ClientError> {
    if body.trim().is_empty() {
        return Err(ClientError::EmptyBody {
            status: status.as_u16(),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|_| ClientError::NotJson {
        status: status.as_u16(),
        snippet: body.chars().take(SNIPPET_CHARS).collect(),
    })?;

    if !status.is_success() {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        return Err(ClientError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::Multipart,
        http::StatusCode,
        response::Html,
        routing::{get, post},
        Json, Router,
    };

    use super::*;
    use crate::llm_client::testing::{refused_url, serve};

    async fn client_for(router: Router) -> ApiClient {
        ApiClient::new(&serve(router).await).unwrap()
    }

    #[tokio::test]
    async fn test_match_job_decodes_result() {
        let router = Router::new().route(
            "/api/resume/match",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["jobDescription"], "Rust role");
                Json(json!({"matchScore": 77, "matchGrade": "B", "verdict": "Solid"}))
            }),
        );
        let result = client_for(router)
            .await
            .match_job("resume text", "Rust role")
            .await
            .unwrap();
        assert_eq!(result.match_score, 77);
    }

    #[tokio::test]
    async fn test_server_error_carries_message() {
        let router = Router::new().route(
            "/api/resume/analyze",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Resume text is too short or missing", "code": "VALIDATION_ERROR"})),
                )
            }),
        );
        let err = client_for(router)
            .await
            .analyze_resume("short")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 400, .. }));
        assert_eq!(err.to_string(), "Resume text is too short or missing");
    }

    #[tokio::test]
    async fn test_html_page_is_not_json() {
        let router = Router::new().route(
            "/api/health",
            get(|| async { (StatusCode::BAD_GATEWAY, Html("<html><body>Bad Gateway</body></html>")) }),
        );
        let err = client_for(router).await.health().await.unwrap_err();
        match err {
            ClientError::NotJson { status, snippet } => {
                assert_eq!(status, 502);
                assert!(snippet.starts_with("<html>"));
            }
            other => panic!("expected NotJson, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_distinguished() {
        let router = Router::new().route("/api/ai/test", get(|| async { StatusCode::OK }));
        let err = client_for(router).await.probe().await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyBody { status: 200 }));
    }

    #[tokio::test]
    async fn test_probe_failure_reports_server_message() {
        let router = Router::new().route(
            "/api/ai/test",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"ok": false, "error": "Groq is unreachable: connection refused"})),
                )
            }),
        );
        let err = client_for(router).await.probe().await.unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 503, .. }));
        assert!(err.to_string().contains("unreachable"));
    }

    #[tokio::test]
    async fn test_parse_pdf_sends_resume_field() {
        let router = Router::new().route(
            "/api/resume/parse-pdf",
            post(|mut multipart: Multipart| async move {
                let field = multipart.next_field().await.unwrap().unwrap();
                assert_eq!(field.name(), Some("resume"));
                assert_eq!(field.content_type(), Some("application/pdf"));
                let filename = field.file_name().unwrap().to_string();
                let bytes = field.bytes().await.unwrap();
                Json(json!({"text": format!("{} bytes", bytes.len()), "filename": filename}))
            }),
        );
        let parsed = client_for(router)
            .await
            .parse_pdf(b"%PDF-1.4 fake".to_vec(), "cv.pdf")
            .await
            .unwrap();
        assert_eq!(parsed.filename, "cv.pdf");
        assert_eq!(parsed.text, "13 bytes");
    }

    #[tokio::test]
    async fn test_call_ai_returns_text() {
        let router = Router::new().route(
            "/api/ai/generate",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"text": format!("echo {}", body["max_tokens"])}))
            }),
        );
        let text = client_for(router).await.call_ai("hi", 256).await.unwrap();
        assert_eq!(text, "echo 256");
    }

    #[tokio::test]
    async fn test_run_tool_uses_tool_route() {
        let router = Router::new().route(
            "/api/tools/rewrite-bullet",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["bullet"], "Did things");
                Json(json!({"rewritten": "Delivered things", "actionVerb": "Delivered"}))
            }),
        );
        let request: RewriteRequest =
            serde_json::from_value(json!({"bullet": "Did things"})).unwrap();
        let out = client_for(router).await.run_tool(&request).await.unwrap();
        assert_eq!(out.action_verb, "Delivered");
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_decode_error() {
        let router = Router::new().route(
            "/api/health",
            get(|| async { Json(json!({"unexpected": true})) }),
        );
        let err = client_for(router).await.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() {
        let client = ApiClient::new(&refused_url().await).unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
