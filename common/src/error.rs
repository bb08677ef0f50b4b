use thiserror::Error;

/// Errors that terminate a run before it starts.
///
/// Per-target failures never show up here; they are recorded as
/// [`crate::probe::ErrorKind`] inside a [`crate::probe::ProbeResult`].
#[derive(Debug, Error)]
pub enum SweeprError {
    #[error("invalid specification '{input}': {reason}")]
    InvalidSpecification { input: String, reason: String },
}

impl SweeprError {
    pub fn invalid(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpecification {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn is_invalid_specification(&self) -> bool {
        matches!(self, Self::InvalidSpecification { .. })
    }
}

pub type Result<T> = std::result::Result<T, SweeprError>;
