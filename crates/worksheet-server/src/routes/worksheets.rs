use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use worksheet_bedrock::generator::TextGenerator;
use worksheet_core::artifact::{self, ArtifactKind};
use worksheet_core::models::content::Warning;
use worksheet_core::models::request::WorksheetRequest;
use worksheet_core::models::token_count::TokenUsage;

use crate::error::{render_failure_message, ApiError};
use crate::state::AppState;

/// A downloadable text file.
#[derive(Debug, Serialize)]
pub struct TextArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

/// A downloadable binary file, base64-encoded for JSON transport.
#[derive(Debug, Serialize)]
pub struct BinaryArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub data_base64: String,
}

#[derive(Debug, Serialize)]
pub struct WorksheetResponse {
    pub id: Uuid,
    pub model_id: String,
    pub created_at: jiff::Timestamp,
    pub worksheet: TextArtifact,
    /// Absent when the LaTeX translation failed.
    pub latex: Option<TextArtifact>,
    /// Absent when there was no LaTeX or it could not be compiled.
    pub pdf: Option<BinaryArtifact>,
    pub warnings: Vec<Warning>,
    pub usage: TokenUsage,
}

fn text_artifact(subject: &str, kind: ArtifactKind, content: String) -> TextArtifact {
    TextArtifact {
        file_name: artifact::file_name(subject, kind),
        mime_type: kind.mime_type(),
        content,
    }
}

/// Generate a worksheet and every artifact that can be produced from it.
///
/// Validation failures are 400s and generation failures 502s. A failed
/// LaTeX translation or PDF render only adds a warning: the worksheet (and
/// the LaTeX, when there is some) is still returned.
pub async fn create_worksheet<G: TextGenerator + 'static>(
    State(state): State<AppState<G>>,
    Json(req): Json<WorksheetRequest>,
) -> Result<Json<WorksheetResponse>, ApiError> {
    let run = state.pipeline.run(&req).await?;
    let mut warnings = run.warnings;
    let subject = req.subject.trim();

    let pdf = match &run.content.latex {
        Some(latex) => match state.renderer.render(latex).await {
            Ok(bytes) => Some(BinaryArtifact {
                file_name: artifact::file_name(subject, ArtifactKind::Pdf),
                mime_type: ArtifactKind::Pdf.mime_type(),
                data_base64: BASE64.encode(bytes),
            }),
            Err(e) => {
                tracing::warn!(run_id = %run.id, error = %e, "PDF render failed");
                warnings.push(Warning::Render {
                    message: render_failure_message(&e),
                });
                None
            }
        },
        None => None,
    };

    Ok(Json(WorksheetResponse {
        id: run.id,
        model_id: run.model_id,
        created_at: run.created_at,
        worksheet: text_artifact(subject, ArtifactKind::Worksheet, run.content.worksheet),
        latex: run
            .content
            .latex
            .map(|latex| text_artifact(subject, ArtifactKind::Latex, latex)),
        pdf,
        warnings,
        usage: run.usage,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub subject: String,
    pub latex: String,
}

/// Compile LaTeX to a PDF attachment named after the subject.
pub async fn render_pdf<G: TextGenerator + 'static>(
    State(state): State<AppState<G>>,
    Json(req): Json<RenderRequest>,
) -> Result<Response, ApiError> {
    if req.latex.trim().is_empty() {
        return Err(ApiError::BadRequest("latex must not be empty".to_string()));
    }

    let pdf = state.renderer.render(&req.latex).await?;

    let file_name = artifact::file_name(&req.subject, ArtifactKind::Pdf);
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(ArtifactKind::Pdf.mime_type()),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}
