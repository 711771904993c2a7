use std::ops::Add;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub input: u64,
    pub output: u64,
}

impl TokenCount {
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

impl Add for TokenCount {
    type Output = TokenCount;

    fn add(self, rhs: TokenCount) -> TokenCount {
        TokenCount {
            input: self.input + rhs.input,
            output: self.output + rhs.output,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub tokens: TokenCount,
    pub cost_usd: f64,
}

impl Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        TokenUsage {
            tokens: self.tokens + rhs.tokens,
            cost_usd: self.cost_usd + rhs.cost_usd,
        }
    }
}
