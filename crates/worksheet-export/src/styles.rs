use serde::{Deserialize, Serialize};

/// Layout defaults applied when assembling a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Class used when the markup does not declare one.
    pub document_class: String,

    /// Page margin as a TeX dimension (applied uniformly via `geometry`).
    pub margin: String,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            document_class: "article".to_string(),
            margin: "1in".to_string(),
        }
    }
}
