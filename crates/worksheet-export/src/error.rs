use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{program} is not available in the system path")]
    CompilerNotFound { program: String },

    #[error("{program} exited with {}: {diagnostics}", exit_label(.status))]
    CompilerFailed {
        program: String,
        status: Option<i32>,
        diagnostics: String,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs())]
    CompilerTimeout { program: String, timeout: Duration },

    #[error("PDF was not generated")]
    MissingOutput,

    #[error("generated file is not a PDF")]
    InvalidOutput,

    #[error("PDF generation failed: structured document: {primary}; standalone compile: {fallback}")]
    RenderFailed {
        primary: Box<ExportError>,
        fallback: Box<ExportError>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// True when rendering failed because no TeX engine could be found.
    pub fn is_compiler_not_found(&self) -> bool {
        match self {
            ExportError::CompilerNotFound { .. } => true,
            ExportError::RenderFailed { fallback, .. } => fallback.is_compiler_not_found(),
            _ => false,
        }
    }
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no status (killed by signal)".to_string(),
    }
}
