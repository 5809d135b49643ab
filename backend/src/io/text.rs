//! Localized text lookup.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Resolves translation keys to user-facing text
pub trait TextProvider: Send + Sync {
    fn text(&self, key: &str) -> Option<String>;
}

static SWEDISH_DEFAULTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("abscense.title", "Anmäl frånvaro"),
        ("abscense.entireDay", "Hela dagen"),
        ("abscense.startTime", "Från"),
        ("abscense.endTime", "Till"),
        ("abscense.personalNumberMissing", "Personnummer saknas"),
        ("abscense.invalidPersonalNumber", "Ogiltigt personnummer"),
        ("abscense.timeOutOfRange", "Tiden måste vara mellan 08:00 och 17:00"),
        ("abscense.timeMisaligned", "Välj en tid i steg om tio minuter"),
        ("abscense.timeInverted", "Starttiden måste vara före sluttiden"),
        ("abscense.sendFailed", "Frånvaroanmälan kunde inte skickas"),
        ("general.socialSecurityNumber", "Personnummer"),
        ("general.send", "Skicka"),
    ])
});

/// Fixed key-to-text table
#[derive(Debug, Clone, Default)]
pub struct StaticTextProvider {
    texts: HashMap<String, String>,
}

impl StaticTextProvider {
    pub fn new(texts: HashMap<String, String>) -> Self {
        Self { texts }
    }

    /// Built-in Swedish texts for the absence screen
    pub fn swedish() -> Self {
        Self {
            texts: SWEDISH_DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Load a flat `{ "key": "text" }` JSON table
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let texts: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { texts })
    }

    /// Layer `other` on top of this table
    pub fn merged(mut self, other: StaticTextProvider) -> Self {
        self.texts.extend(other.texts);
        self
    }
}

impl TextProvider for StaticTextProvider {
    fn text(&self, key: &str) -> Option<String> {
        self.texts.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::AbsenceError;

    #[test]
    fn test_swedish_covers_surfaced_errors() {
        let provider = StaticTextProvider::swedish();
        let surfaced = [
            AbsenceError::MissingIdentity,
            AbsenceError::InvalidIdentity,
            AbsenceError::OutOfRange,
            AbsenceError::Misaligned,
            AbsenceError::InvertedRange,
            AbsenceError::MessagingFailure(String::new()),
        ];
        for error in surfaced {
            assert!(provider.text(error.translation_key()).is_some(), "missing text for {:?}", error);
        }
    }

    #[test]
    fn test_json_overrides_defaults() {
        let english = StaticTextProvider::from_json_str(
            r#"{ "abscense.personalNumberMissing": "Identity number is required" }"#,
        )
        .unwrap();
        let provider = StaticTextProvider::swedish().merged(english);

        assert_eq!(
            provider.text("abscense.personalNumberMissing").as_deref(),
            Some("Identity number is required")
        );
        assert_eq!(provider.text("general.send").as_deref(), Some("Skicka"));
        assert_eq!(provider.text("no.such.key"), None);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(StaticTextProvider::from_json_str("[1, 2]").is_err());
    }
}
