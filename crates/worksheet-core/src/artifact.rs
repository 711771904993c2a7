//! Download artifact conventions.
//!
//! Pure string functions. Every artifact is named
//! `<sanitized subject>_worksheet.<ext>`.

use serde::{Deserialize, Serialize};

const MAX_STEM_LEN: usize = 64;

const FALLBACK_STEM: &str = "untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Worksheet prose as Markdown.
    Worksheet,
    /// LaTeX source.
    Latex,
    /// Compiled PDF.
    Pdf,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Worksheet => "md",
            ArtifactKind::Latex => "tex",
            ArtifactKind::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ArtifactKind::Worksheet => "text/markdown",
            ArtifactKind::Latex => "application/x-tex",
            ArtifactKind::Pdf => "application/pdf",
        }
    }
}

/// Reduce a free-text subject to a filesystem- and header-safe file stem.
///
/// Whitespace runs become a single `_`; anything outside ASCII alphanumerics,
/// `-` and `_` is dropped. The result is capped at 64 characters and falls
/// back to `untitled` when nothing survives.
pub fn sanitize_stem(subject: &str) -> String {
    let mut stem = String::with_capacity(subject.len());
    for word in subject.split_whitespace() {
        let kept: String = word
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if kept.is_empty() {
            continue;
        }
        if !stem.is_empty() {
            stem.push('_');
        }
        stem.push_str(&kept);
    }

    // ASCII only from here on, so byte truncation is safe.
    stem.truncate(MAX_STEM_LEN);
    let stem = stem.trim_end_matches('_');

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

pub fn file_name(subject: &str, kind: ArtifactKind) -> String {
    format!("{}_worksheet.{}", sanitize_stem(subject), kind.extension())
}
