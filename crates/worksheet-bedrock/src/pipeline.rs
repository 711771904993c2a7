//! Two-step worksheet generation.
//!
//! 1. The request fields are rendered into the worksheet prompt and sent as a
//!    single user message. Any failure here fails the run.
//! 2. The worksheet text is sent back with the fixed "LaTeX only" system
//!    instruction. A failure here only costs the LaTeX: the run still returns
//!    the worksheet, with a [`Warning::Translation`] attached.
//!
//! Both calls are bounded by [`PipelineOptions::call_timeout`]. There are no
//! retries.

use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use worksheet_core::models::content::{GeneratedContent, GenerationRun, Warning};
use worksheet_core::models::request::WorksheetRequest;
use worksheet_core::prompt::{worksheet_prompt, LATEX_SYSTEM_PROMPT};
use worksheet_core::reply::strip_code_fence;

use crate::error::{BedrockError, PipelineError};
use crate::generator::{Generation, GenerationRequest, TextGenerator};
use crate::tokens;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Upper bound on each individual model call.
    pub call_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(300),
        }
    }
}

pub struct ContentPipeline<G> {
    generator: G,
    options: PipelineOptions,
}

impl<G: TextGenerator> ContentPipeline<G> {
    pub fn new(generator: G, options: PipelineOptions) -> Self {
        Self { generator, options }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Validate the request, draft the worksheet, then translate it to LaTeX.
    pub async fn run(&self, request: &WorksheetRequest) -> Result<GenerationRun, PipelineError> {
        request.validate().map_err(PipelineError::Validation)?;

        let run_id = Uuid::new_v4();
        let model_id = self.generator.model_id().to_string();
        info!(run_id = %run_id, model = %model_id, subject = %request.subject.trim(), "starting worksheet generation");

        let prompt = worksheet_prompt(request).map_err(PipelineError::Prompt)?;

        let draft = self
            .call(GenerationRequest::user(prompt))
            .await
            .map_err(|e| {
                warn!(run_id = %run_id, error = %e, "worksheet generation failed");
                PipelineError::Generation(e)
            })?;
        info!(run_id = %run_id, chars = draft.text.len(), "worksheet content generated");

        let mut spent = draft.usage.unwrap_or_default();
        let mut warnings = Vec::new();

        let translation = self
            .call(GenerationRequest::with_system(
                LATEX_SYSTEM_PROMPT,
                draft.text.clone(),
            ))
            .await;

        let latex = match translation {
            Ok(generation) => {
                spent = spent + generation.usage.unwrap_or_default();
                let latex = strip_code_fence(&generation.text);
                if latex.is_empty() {
                    warnings.push(translation_warning(run_id, &BedrockError::EmptyResponse));
                    None
                } else {
                    info!(run_id = %run_id, chars = latex.len(), "worksheet converted to LaTeX");
                    Some(latex.to_string())
                }
            }
            Err(e) => {
                warnings.push(translation_warning(run_id, &e));
                None
            }
        };

        Ok(GenerationRun {
            id: run_id,
            usage: tokens::usage_for(&model_id, spent),
            model_id,
            content: GeneratedContent {
                worksheet: draft.text,
                latex,
            },
            warnings,
            created_at: jiff::Timestamp::now(),
        })
    }

    /// One bounded model call. Blank replies count as failures.
    async fn call(&self, request: GenerationRequest) -> Result<Generation, BedrockError> {
        let timeout = self.options.call_timeout;
        let generation = tokio::time::timeout(timeout, self.generator.generate(&request))
            .await
            .map_err(|_| BedrockError::Timeout(timeout))??;

        if generation.text.trim().is_empty() {
            return Err(BedrockError::EmptyResponse);
        }
        Ok(generation)
    }
}

fn translation_warning(run_id: Uuid, error: &BedrockError) -> Warning {
    warn!(run_id = %run_id, error = %error, "LaTeX conversion failed");
    Warning::Translation {
        message: format!("worksheet generated but LaTeX conversion failed: {error}"),
    }
}
