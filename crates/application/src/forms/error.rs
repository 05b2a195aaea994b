use thiserror::Error;

use domain::validation::FieldErrors;
use domain::DomainError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),

    #[error("{0} cannot be changed while editing")]
    Locked(&'static str),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl FormError {
    /// Per-field messages, when the failure came from validation
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
