//! Error types for theme resolution, font scaling and preference storage.

use thiserror::Error;

/// Errors produced by the theming engine.
///
/// Every variant is recoverable: callers branch on the kind and substitute a
/// default (background color, preset, stored value) before retrying.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The color is not a literal hex, `rgb()` or `hsl()` color.
    #[error("invalid color spec '{value}': {reason}")]
    InvalidColorSpec { value: String, reason: String },

    /// Font scale preset id outside `small`, `normal`, `large`.
    #[error("invalid font scale preset '{0}' (expected small, normal or large)")]
    InvalidPreset(String),

    /// No theme preset is registered under this name.
    #[error("unknown theme preset '{0}'")]
    UnknownPreset(String),

    /// Semantic font size key not present in the base size table.
    #[error("unknown font size key '{0}'")]
    UnknownSizeKey(String),

    /// Preference storage could not be read or written.
    #[error("preference storage error: {0}")]
    Storage(String),

    /// A YAML or JSON document failed to parse.
    #[error("failed to parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// Engine configuration is unreadable or holds an unusable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration or preset files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ThemeError {
    /// Creates an [`ThemeError::InvalidColorSpec`].
    pub fn invalid_color(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColorSpec {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`ThemeError::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl From<serde_json::Error> for ThemeError {
    fn from(err: serde_json::Error) -> Self {
        ThemeError::Parse {
            format: "json",
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ThemeError {
    fn from(err: serde_yaml::Error) -> Self {
        ThemeError::Parse {
            format: "yaml",
            message: err.to_string(),
        }
    }
}

/// Result type for theming operations.
pub type Result<T> = std::result::Result<T, ThemeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_color_display() {
        let err = ThemeError::invalid_color("var(--brand)", "indirection token");
        let msg = err.to_string();
        assert!(msg.contains("var(--brand)"));
        assert!(msg.contains("indirection token"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ThemeError = json_err.into();
        assert!(matches!(err, ThemeError::Parse { format: "json", .. }));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ThemeError = io_err.into();
        assert!(matches!(err, ThemeError::Io(_)));
    }
}
