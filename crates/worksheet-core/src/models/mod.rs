pub mod content;
pub mod cost;
pub mod request;
pub mod token_count;
