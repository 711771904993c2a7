use serde::{Deserialize, Serialize};

use super::token_count::{TokenCount, TokenUsage};

/// Pricing per million tokens for a generation model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPricing {
    pub fn estimate_cost(&self, tokens: TokenCount) -> f64 {
        let input_cost = (tokens.input as f64 / 1_000_000.0) * self.input_per_million;
        let output_cost = (tokens.output as f64 / 1_000_000.0) * self.output_per_million;
        input_cost + output_cost
    }

    pub fn usage(&self, tokens: TokenCount) -> TokenUsage {
        TokenUsage {
            tokens,
            cost_usd: self.estimate_cost(tokens),
        }
    }
}
