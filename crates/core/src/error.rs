#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid argument: {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}
