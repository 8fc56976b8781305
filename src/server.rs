//! Mediating HTTP boundary: `POST /api/generate`.
//!
//! Keeps the provider credential on the server. Clients send the full
//! document text plus a question and get back `{ "answer": ... }` or
//! `{ "error": ... }` with a non-2xx status.
//!
//! | Condition                          | Status |
//! |------------------------------------|--------|
//! | answered                           | 200    |
//! | method other than POST             | 405    |
//! | malformed JSON, missing/empty field| 400    |
//! | body over `max_body_bytes`         | 413    |
//! | no credential configured           | 500    |
//! | answerer failed                    | 500    |

use crate::config::ServerConfig;
use crate::error::{AskError, PdfQaError, CREDENTIAL_MISSING_MESSAGE};
use crate::pipeline::answer::Answerer;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Path of the question endpoint.
pub const GENERATE_PATH: &str = "/api/generate";

/// Error for a request body over the configured limit.
pub const BODY_TOO_LARGE_MESSAGE: &str =
    "The PDF text is too large for the server. Try a smaller document.";

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
struct AppState {
    /// `None` when the server was started without a credential.
    answerer: Option<Arc<dyn Answerer>>,
}

// ============================================================================
// Error type
// ============================================================================

struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorResponse { error: self.1 })).into_response()
    }
}

impl From<AskError> for AppError {
    fn from(e: AskError) -> Self {
        match e {
            AskError::MissingInput => AppError(StatusCode::BAD_REQUEST, e.to_string()),
            other => AppError(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

// ============================================================================
// Request / Response types
// ============================================================================

/// Body of `POST /api/generate`. Both fields are required and non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub context: Option<String>,
    pub question: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    answerer_configured: bool,
}

// ============================================================================
// Handlers
// ============================================================================

// POST /api/generate
async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let missing = || AppError(StatusCode::BAD_REQUEST, AskError::MissingInput.to_string());

    let Json(req) = body.map_err(|e| {
        debug!("Rejected request body: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError(StatusCode::PAYLOAD_TOO_LARGE, BODY_TOO_LARGE_MESSAGE.to_string())
        } else {
            missing()
        }
    })?;
    let (context, question) = match (req.context, req.question) {
        (Some(c), Some(q)) if !c.is_empty() && !q.is_empty() => (c, q),
        _ => return Err(missing()),
    };

    let Some(answerer) = state.answerer else {
        error!("No credential configured; cannot answer.");
        return Err(AppError(
            StatusCode::INTERNAL_SERVER_ERROR,
            CREDENTIAL_MISSING_MESSAGE.to_string(),
        ));
    };

    let answer = answerer.answer(&context, &question).await.map_err(|e| {
        warn!("Answer failed: {}", e);
        AppError::from(e)
    })?;
    Ok(Json(GenerateResponse { answer }))
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(ErrorResponse {
            error: "Method Not Allowed".to_string(),
        }),
    )
        .into_response()
}

// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        answerer_configured: state.answerer.is_some(),
    })
}

// ============================================================================
// Router / serve
// ============================================================================

/// Build the router. Pass `None` to run without a credential: every question
/// then gets a 500 with [`CREDENTIAL_MISSING_MESSAGE`].
pub fn router(answerer: Option<Arc<dyn Answerer>>, config: &ServerConfig) -> Router {
    Router::new()
        .route(
            GENERATE_PATH,
            post(generate).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { answerer })
}

/// Bind `config.bind` and serve until the process is stopped.
pub async fn serve(
    config: ServerConfig,
    answerer: Option<Arc<dyn Answerer>>,
) -> Result<(), PdfQaError> {
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|source| PdfQaError::Bind {
            addr: config.bind.clone(),
            source,
        })?;

    info!("Listening on http://{}{}", config.bind, GENERATE_PATH);
    let app = router(answerer, &config);
    axum::serve(listener, app)
        .await
        .map_err(|e| PdfQaError::Internal(format!("server error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_maps_to_bad_request() {
        let AppError(status, msg) = AppError::from(AskError::MissingInput);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "PDF context and question must be provided.");
    }

    #[test]
    fn remote_failure_maps_to_server_error() {
        let AppError(status, msg) = AppError::from(AskError::Remote {
            message: "quota".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "An error occurred while communicating with the AI: quota");
    }

    #[test]
    fn request_fields_are_optional_when_parsing() {
        let req: GenerateRequest = serde_json::from_str(r#"{"question":"q"}"#).unwrap();
        assert!(req.context.is_none());
        assert_eq!(req.question.as_deref(), Some("q"));
    }
}
