use thiserror::Error;

/// Why a single message did not turn into a record. Never fatal for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("No grammar pattern matched")]
    Unrecognized,
    #[error("Invalid {field}: '{value}'")]
    InvalidAmount { field: &'static str, value: String },
    #[error("Invalid timestamp: '{0}'")]
    InvalidTimestamp(String),
}

impl MessageError {
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, MessageError::Unrecognized)
    }
}
