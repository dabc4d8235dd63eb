//! Error types for registration, card rendering and setup.

use thiserror::Error;
use vitrine_theme::ThemeError;

/// Errors raised while building the component registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A descriptor with this name is already registered in the category.
    #[error("component '{name}' is already registered in category '{category}'")]
    DuplicateRegistration { category: String, name: String },
}

/// Failure reported by a card's render callback.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("card render failed: {0}")]
    Render(String),

    /// A required dictionary entry is missing for the active locale.
    #[error("missing text '{key}' for locale '{locale}'")]
    MissingText { key: String, locale: String },

    #[error(transparent)]
    Theme(#[from] ThemeError),
}

impl CardError {
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}

/// Errors raised while assembling a [`Vitrine`](crate::Vitrine).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message() {
        let err = RegistryError::DuplicateRegistration {
            category: "jobs".into(),
            name: "A".into(),
        };
        assert_eq!(
            err.to_string(),
            "component 'A' is already registered in category 'jobs'"
        );
    }

    #[test]
    fn test_card_error_from_theme() {
        let err: CardError = ThemeError::UnknownSizeKey("4xl".into()).into();
        assert!(err.to_string().contains("4xl"));
    }
}
