use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token_count::TokenUsage;

/// Text produced by the two generation calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// Worksheet prose in Markdown.
    pub worksheet: String,
    /// LaTeX translation of the worksheet. `None` when translation failed.
    pub latex: Option<String>,
}

/// A non-fatal problem reported alongside generated content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The LaTeX translation call failed; the worksheet text is still usable.
    Translation { message: String },
    /// Neither PDF strategy produced a document; LaTeX is offered instead.
    Render { message: String },
}

impl Warning {
    pub fn message(&self) -> &str {
        match self {
            Warning::Translation { message } | Warning::Render { message } => message,
        }
    }
}

/// One completed generation run, before any rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRun {
    pub id: Uuid,
    pub model_id: String,
    pub content: GeneratedContent,
    pub warnings: Vec<Warning>,
    pub usage: TokenUsage,
    pub created_at: jiff::Timestamp,
}
