//! The text generation seam.
//!
//! The pipeline only needs "prompt in, text out"; [`TextGenerator`] is that
//! contract. [`crate::client::BedrockGenerator`] is the production
//! implementation.

use std::future::Future;

use worksheet_core::models::token_count::TokenCount;

use crate::error::BedrockError;

/// A single-turn request: an optional system instruction plus one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub user: String,
}

impl GenerationRequest {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            system: None,
            user: content.into(),
        }
    }

    pub fn with_system(system: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: content.into(),
        }
    }
}

/// The text of a model reply and the tokens it cost, when reported.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub usage: Option<TokenCount>,
}

pub trait TextGenerator: Send + Sync {
    /// Identifier of the model behind this generator, used for pricing and logs.
    fn model_id(&self) -> &str;

    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<Generation, BedrockError>> + Send;
}
