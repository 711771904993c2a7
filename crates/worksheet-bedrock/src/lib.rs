//! worksheet-bedrock
//!
//! Bedrock model invocation and the two-step worksheet content pipeline.

pub mod client;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod tokens;
