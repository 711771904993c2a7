use worksheet_core::models::cost::ModelPricing;
use worksheet_core::models::token_count::{TokenCount, TokenUsage};

/// Extract token counts from a Bedrock Converse response.
pub fn extract_token_usage(usage: &aws_sdk_bedrockruntime::types::TokenUsage) -> TokenCount {
    TokenCount {
        input: usage.input_tokens.max(0) as u64,
        output: usage.output_tokens.max(0) as u64,
    }
}

/// Price a token count for a model. Unknown models cost nothing.
pub fn usage_for(model_id: &str, tokens: TokenCount) -> TokenUsage {
    match get_pricing(model_id) {
        Some(pricing) => pricing.usage(tokens),
        None => TokenUsage {
            tokens,
            cost_usd: 0.0,
        },
    }
}

/// Known model pricing (per million tokens).
/// These are approximate and should be updated as pricing changes.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    match model_id {
        id if id.contains("claude-opus-4") => Some(ModelPricing {
            input_per_million: 15.0,
            output_per_million: 75.0,
        }),
        id if id.contains("claude-sonnet-4") => Some(ModelPricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        }),
        id if id.contains("claude-haiku") => Some(ModelPricing {
            input_per_million: 0.80,
            output_per_million: 4.0,
        }),
        _ => None,
    }
}
