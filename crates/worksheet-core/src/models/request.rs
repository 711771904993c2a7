use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The four form fields a worksheet is generated from.
///
/// Absent fields deserialize as empty strings so that they surface as
/// validation errors rather than decoding errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorksheetRequest {
    /// Primary subject or topic, e.g. "Photosynthesis".
    pub subject: String,
    /// Grade range, age group, or skill level, e.g. "5th Grade".
    pub audience: String,
    /// Learning goals the worksheet should target.
    pub objectives: String,
    /// Themes, difficulty, time constraints, or style guidelines.
    pub details: String,
}

impl WorksheetRequest {
    /// Check that subject, audience, and objectives are non-blank.
    ///
    /// Every blank field is reported, in form order.
    pub fn validate(&self) -> Result<(), CoreError> {
        let missing: Vec<&'static str> = [
            ("subject", &self.subject),
            ("audience", &self.audience),
            ("objectives", &self.objectives),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::MissingFields(missing))
        }
    }

    /// Optional details, or `None` when the field was left blank.
    pub fn details(&self) -> Option<&str> {
        let trimmed = self.details.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
