use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkifyError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate {catalog} slug: {slug}")]
    DuplicateSlug { catalog: String, slug: String },

    #[error("Unknown {kind}: {slug}")]
    NotFound { kind: String, slug: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Catalog,
    Lookup,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a failed CLI run.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl MarkifyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::DuplicateSlug { .. } => ErrorCategory::Catalog,
            Self::NotFound { .. } => ErrorCategory::Lookup,
            Self::ZipError(_) | Self::CsvError(_) | Self::IoError(_) => ErrorCategory::Output,
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Medium,
            Self::IoError(_) | Self::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ConfigValidationError { field, .. }
            | Self::InvalidConfigValueError { field, .. } => {
                format!("Check the '{}' entry in your site configuration", field)
            }
            Self::DuplicateSlug { catalog, slug } => format!(
                "Rename or remove one of the {} entries with slug '{}'",
                catalog, slug
            ),
            Self::NotFound { kind, .. } => {
                format!("Run `markify-pseo routes` to list known {} slugs", kind)
            }
            Self::IoError(_) | Self::ZipError(_) => {
                "Make sure the output directory exists and is writable".to_string()
            }
            Self::CsvError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Re-run with --verbose to see which page failed".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Catalog => format!("Catalog problem: {}", self),
            ErrorCategory::Lookup => format!("Page not found: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
            ErrorCategory::Processing => format!("Page generation failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarkifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_lookup_with_medium_severity() {
        let err = MarkifyError::NotFound {
            kind: "intent".to_string(),
            slug: "nope".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Unknown intent: nope");
        assert!(err.recovery_suggestion().contains("routes"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err: MarkifyError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("Could not write output"));
    }

    #[test]
    fn test_every_severity_exits_non_zero() {
        let config = MarkifyError::ConfigValidationError {
            field: "site.base_url".to_string(),
            message: "empty".to_string(),
        };
        let duplicate = MarkifyError::DuplicateSlug {
            catalog: "industry".to_string(),
            slug: "legal".to_string(),
        };
        let not_found = MarkifyError::NotFound {
            kind: "industry".to_string(),
            slug: "nope".to_string(),
        };

        assert_eq!(config.severity(), ErrorSeverity::High);
        assert_eq!(config.severity().exit_code(), 1);
        assert_eq!(duplicate.severity().exit_code(), 1);
        assert_eq!(not_found.severity().exit_code(), 2);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);
        assert!(config.recovery_suggestion().contains("site.base_url"));
    }
}
