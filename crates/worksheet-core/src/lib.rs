//! worksheet-core
//!
//! Pure domain types, prompt templates, and artifact naming conventions.
//! No AWS SDK or process dependency: this is the shared vocabulary of the
//! worksheet generator.

pub mod artifact;
pub mod error;
pub mod models;
pub mod prompt;
pub mod reply;
