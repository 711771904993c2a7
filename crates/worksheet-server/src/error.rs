use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use worksheet_bedrock::error::PipelineError;
use worksheet_export::error::ExportError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// The generation service failed or returned nothing usable.
    BadGateway(String),
    /// The LaTeX could not be turned into a PDF.
    Unprocessable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Validation(inner) => ApiError::BadRequest(inner.to_string()),
            PipelineError::Generation(_) => ApiError::BadGateway(e.to_string()),
            PipelineError::Prompt(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError::Unprocessable(render_failure_message(&e))
    }
}

/// User-facing text for a failed render, with an install hint when no TeX
/// engine was found.
pub fn render_failure_message(e: &ExportError) -> String {
    if e.is_compiler_not_found() {
        format!(
            "Could not generate PDF: {e}. PDF generation requires a LaTeX installation; \
             download the .tex file and compile it locally."
        )
    } else {
        format!("Could not generate PDF: {e}")
    }
}
