pub mod ai;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use tracing::warn;

use crate::analysis::handlers;
use crate::state::AppState;
use crate::tools::handlers as tools;

/// Room for multipart boundaries and part headers around a maximum-size PDF.
/// The file itself is checked against `MAX_PDF_BYTES` in the handler.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    connect-src 'self' http://localhost:* ws://localhost:*; \
    script-src 'self' 'unsafe-inline' 'unsafe-eval'; \
    style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
    font-src 'self' https://fonts.gstatic.com; \
    img-src 'self' data: https:;";

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins());

    Router::new()
        .route("/api/health", get(health::health_handler))
        // Resume analysis
        .route(
            "/api/resume/parse-pdf",
            post(handlers::handle_parse_pdf)
                .layer(DefaultBodyLimit::max(handlers::MAX_PDF_BYTES + MULTIPART_OVERHEAD)),
        )
        .route("/api/resume/analyze", post(handlers::handle_analyze))
        .route("/api/resume/match", post(handlers::handle_match))
        // Raw model access
        .route("/api/ai/generate", post(ai::handle_generate))
        .route("/api/ai/test", get(ai::handle_test))
        // Generator tools
        .route("/api/tools/cover-letter", post(tools::handle_cover_letter))
        .route("/api/tools/interview-prep", post(tools::handle_interview_prep))
        .route("/api/tools/linkedin", post(tools::handle_linkedin))
        .route("/api/tools/salary-negotiation", post(tools::handle_salary))
        .route("/api/tools/cold-outreach", post(tools::handle_outreach))
        .route("/api/tools/thank-you", post(tools::handle_thank_you))
        .route("/api/tools/rewrite-bullet", post(tools::handle_rewrite))
        .with_state(state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
}

/// Credentialed CORS for an explicit origin list. Origins that are not valid
/// header values are skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
