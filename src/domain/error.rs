use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("duplicate slug `{slug}`")]
    DuplicateSlug { slug: String },
}

impl DomainError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
