//! worksheet-export
//!
//! LaTeX to PDF rendering with a structured-document strategy and a
//! standalone-compile fallback.

pub mod document;
pub mod engine;
pub mod error;
pub mod pdf;
pub mod preamble;
pub mod styles;
