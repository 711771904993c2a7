use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("please fill in all required fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("prompt template error: {0}")]
    Template(String),
}

impl From<tera::Error> for CoreError {
    fn from(e: tera::Error) -> Self {
        CoreError::Template(e.to_string())
    }
}
