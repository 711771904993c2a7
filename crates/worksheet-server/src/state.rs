use std::sync::Arc;

use worksheet_bedrock::pipeline::ContentPipeline;
use worksheet_export::pdf::PdfRenderer;

/// Shared application state, injected into all route handlers via Axum state.
///
/// Everything here is immutable; each request runs its own pipeline and
/// render attempt.
pub struct AppState<G> {
    pub pipeline: Arc<ContentPipeline<G>>,
    pub renderer: Arc<PdfRenderer>,
}

impl<G> AppState<G> {
    pub fn new(pipeline: ContentPipeline<G>, renderer: PdfRenderer) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            renderer: Arc::new(renderer),
        }
    }
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            renderer: Arc::clone(&self.renderer),
        }
    }
}
