//! Error types for transpub.

use thiserror::Error;

/// A shared error type for the local (non-remote) parts of transpub.
///
/// Remote calls report [`crate::host::HostError`] instead; those never leave
/// the publisher, which folds them into a [`crate::outcome::PublishFailure`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranspubError {
    /// The locale identifier cannot be mapped to a translations file.
    #[error("Invalid locale identifier '{locale}': {reason}")]
    InvalidLocale { locale: String, reason: String },

    /// The translation document is not a flat object of strings.
    #[error("Invalid translations: {0}")]
    InvalidTranslations(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TranspubError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidLocale error
    pub fn invalid_locale(locale: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocale {
            locale: locale.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidTranslations error
    pub fn invalid_translations(message: impl Into<String>) -> Self {
        Self::InvalidTranslations(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an InvalidLocale error
    pub fn is_invalid_locale(&self) -> bool {
        matches!(self, Self::InvalidLocale { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TranspubError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TranspubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TranspubError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TranspubError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TranspubError>`.
pub type Result<T> = std::result::Result<T, TranspubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: TranspubError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        match err {
            TranspubError::Io { message } => {
                assert!(message.contains("missing"));
                assert!(message.contains("NotFound"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_error_is_serialization() {
        let err: TranspubError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.is_serialization());
        assert!(err.to_string().starts_with("Serialization error: JSON"));
    }

    #[test]
    fn test_invalid_locale_display() {
        let err = TranspubError::invalid_locale("", "must not be empty");
        assert!(err.is_invalid_locale());
        assert_eq!(
            err.to_string(),
            "Invalid locale identifier '': must not be empty"
        );
    }
}
