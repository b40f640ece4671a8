use crate::errors::InisectError;

#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("Failed to parse string as bytes: '{input}'")]
    InvalidBytes { input: String },

    #[error("Failed to parse string as fraction: '{input}'")]
    InvalidFraction { input: String },

    #[error("Failed to parse string as quota: '{input}': {source}")]
    InvalidQuota {
        input: String,
        #[source]
        source: Box<UnitError>,
    },
}

impl InisectError for UnitError {
    fn error_code(&self) -> &'static str {
        match self {
            UnitError::InvalidBytes { .. } => "UNIT_INVALID_BYTES",
            UnitError::InvalidFraction { .. } => "UNIT_INVALID_FRACTION",
            UnitError::InvalidQuota { .. } => "UNIT_INVALID_QUOTA",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
