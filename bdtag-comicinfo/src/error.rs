use crate::schema::Violation;

/// Errors raised while producing a ComicInfo document.
#[derive(Debug, thiserror::Error)]
pub enum ComicInfoError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Schema validation failed: {}", summarize(.0))]
    SchemaValidation(Vec<Violation>),
}

impl ComicInfoError {
    pub fn xml(msg: impl Into<String>) -> Self {
        Self::Xml(msg.into())
    }

    /// Violations carried by a validation failure; empty for other errors.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::SchemaValidation(violations) => violations,
            Self::Xml(_) => &[],
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
