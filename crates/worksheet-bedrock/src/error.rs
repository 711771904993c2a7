use std::time::Duration;

use thiserror::Error;

use worksheet_core::error::CoreError;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("model call timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Failure of a whole generation run.
///
/// Only the first call can fail a run; a failed translation is reported as a
/// warning on the run instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(#[source] CoreError),

    #[error("failed to build prompt: {0}")]
    Prompt(#[source] CoreError),

    #[error("failed to generate worksheet: {0}")]
    Generation(#[source] BedrockError),
}
