use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, StopReason,
    SystemContentBlock,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::BedrockError;
use crate::generator::{Generation, GenerationRequest, TextGenerator};
use crate::tokens;

/// Default model: Claude Sonnet 4 through its US inference profile. The
/// Converse API rejects bare foundation model IDs for on-demand use.
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

pub const DEFAULT_MAX_TOKENS: i32 = 8192;

/// Where AWS credentials come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Profile { profile_name: String },
    DefaultChain,
}

/// Build an `SdkConfig` from a region and credential source.
pub async fn build_sdk_config(region: &str, creds: &CredentialSource) -> aws_config::SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let CredentialSource::Profile { profile_name } = creds {
        builder = builder.profile_name(profile_name);
    }

    builder.load().await
}

/// Single-turn text generation through the Bedrock Converse API.
#[derive(Debug, Clone)]
pub struct BedrockGenerator {
    client: Client,
    model_id: String,
    max_tokens: i32,
}

impl BedrockGenerator {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>, max_tokens: i32) -> Self {
        Self {
            client: Client::new(config),
            model_id: model_id.into(),
            max_tokens,
        }
    }
}

impl TextGenerator for BedrockGenerator {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, BedrockError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(request.user.clone()))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        let mut call = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(self.max_tokens)
                    .build(),
            );

        if let Some(system) = &request.system {
            call = call.system(SystemContentBlock::Text(system.clone()));
        }

        let response = call
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        if *response.stop_reason() == StopReason::MaxTokens {
            warn!(
                model = %self.model_id,
                max_tokens = self.max_tokens,
                "response truncated at token limit"
            );
        }

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let usage = response.usage().map(tokens::extract_token_usage);

        info!(
            model = %self.model_id,
            chars = text.len(),
            input_tokens = usage.map(|u| u.input).unwrap_or_default(),
            output_tokens = usage.map(|u| u.output).unwrap_or_default(),
            "converse call complete"
        );

        Ok(Generation { text, usage })
    }
}
