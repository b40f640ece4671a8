use std::error::Error;

use crate::units::UnitError;

/// Base trait for all library errors
pub trait InisectError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error was caused by the contents of a config file
    /// rather than by the environment or the calling code
    fn is_user_error(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No config file at '{path}': {source}")]
    ConfigNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Option not in config: {key}")]
    OptionNotFound {
        key: String,
        section: Option<String>,
    },

    #[error("Invalid configuration entry format: {key} = {value} (expected {expected})")]
    FormatError {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Section not in config: {section}")]
    SectionNotFound { section: String },

    #[error("Subsection guard conflict: {message}")]
    GuardConflict { message: String },

    #[error("Invalid quota for {key}: {source}")]
    QuotaFormat {
        key: String,
        #[source]
        source: UnitError,
    },
}

impl ConfigError {
    /// True for the lookup failures a fallback or flag accessor absorbs
    /// silently apart from a diagnostic.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::OptionNotFound { .. } | ConfigError::SectionNotFound { .. }
        )
    }
}

impl InisectError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::OptionNotFound { .. } => "CONFIG_OPTION_NOT_FOUND",
            ConfigError::FormatError { .. } => "CONFIG_FORMAT_ERROR",
            ConfigError::SectionNotFound { .. } => "CONFIG_SECTION_NOT_FOUND",
            ConfigError::GuardConflict { .. } => "CONFIG_GUARD_CONFLICT",
            ConfigError::QuotaFormat { .. } => "CONFIG_QUOTA_FORMAT",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::OptionNotFound { .. }
                | ConfigError::FormatError { .. }
                | ConfigError::SectionNotFound { .. }
                | ConfigError::QuotaFormat { .. }
        )
    }
}
