//! Error kinds of the absence pipeline.
//!
//! The set is closed: the presentation layer maps each kind to a field and a
//! localized text through [`AbsenceError::translation_key`].

use thiserror::Error;

/// Failure to accept a guardian-entered identity number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("identity number is required")]
    Missing,
    #[error("identity number is not a valid personnummer")]
    Invalid,
}

/// Failure to build a partial-day absence window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("absence time is outside the reportable range")]
    OutOfRange,
    #[error("absence time is not on a selectable minute step")]
    Misaligned,
    #[error("absence start is after its end")]
    InvertedRange,
}

/// Every error an absence form session can end up with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbsenceError {
    #[error("identity number is required")]
    MissingIdentity,
    #[error("identity number is not a valid personnummer")]
    InvalidIdentity,
    #[error("absence time is outside the reportable range")]
    OutOfRange,
    #[error("absence time is not on a selectable minute step")]
    Misaligned,
    #[error("absence start is after its end")]
    InvertedRange,
    #[error("failed to send absence message: {0}")]
    MessagingFailure(String),
    /// Never surfaced to the guardian; cache failures are logged and swallowed
    #[error("identity cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl AbsenceError {
    /// Key the text provider resolves to a user-facing message
    pub fn translation_key(&self) -> &'static str {
        match self {
            AbsenceError::MissingIdentity => "abscense.personalNumberMissing",
            AbsenceError::InvalidIdentity => "abscense.invalidPersonalNumber",
            AbsenceError::OutOfRange => "abscense.timeOutOfRange",
            AbsenceError::Misaligned => "abscense.timeMisaligned",
            AbsenceError::InvertedRange => "abscense.timeInverted",
            AbsenceError::MessagingFailure(_) => "abscense.sendFailed",
            AbsenceError::CacheUnavailable(_) => "abscense.cacheUnavailable",
        }
    }

    /// Field-level errors that keep the session editable
    pub fn is_validation_error(&self) -> bool {
        !matches!(
            self,
            AbsenceError::MessagingFailure(_) | AbsenceError::CacheUnavailable(_)
        )
    }
}

impl From<IdentityError> for AbsenceError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Missing => AbsenceError::MissingIdentity,
            IdentityError::Invalid => AbsenceError::InvalidIdentity,
        }
    }
}

impl From<WindowError> for AbsenceError {
    fn from(error: WindowError) -> Self {
        match error {
            WindowError::OutOfRange => AbsenceError::OutOfRange,
            WindowError::Misaligned => AbsenceError::Misaligned,
            WindowError::InvertedRange => AbsenceError::InvertedRange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_keep_kind() {
        assert_eq!(AbsenceError::from(IdentityError::Missing), AbsenceError::MissingIdentity);
        assert_eq!(AbsenceError::from(IdentityError::Invalid), AbsenceError::InvalidIdentity);
        assert_eq!(AbsenceError::from(WindowError::OutOfRange), AbsenceError::OutOfRange);
        assert_eq!(AbsenceError::from(WindowError::Misaligned), AbsenceError::Misaligned);
        assert_eq!(AbsenceError::from(WindowError::InvertedRange), AbsenceError::InvertedRange);
    }

    #[test]
    fn test_translation_keys_are_distinct() {
        let errors = [
            AbsenceError::MissingIdentity,
            AbsenceError::InvalidIdentity,
            AbsenceError::OutOfRange,
            AbsenceError::Misaligned,
            AbsenceError::InvertedRange,
            AbsenceError::MessagingFailure("offline".to_string()),
            AbsenceError::CacheUnavailable("locked".to_string()),
        ];
        let mut keys: Vec<&str> = errors.iter().map(|e| e.translation_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), errors.len());
    }

    #[test]
    fn test_validation_classification() {
        assert!(AbsenceError::InvalidIdentity.is_validation_error());
        assert!(AbsenceError::InvertedRange.is_validation_error());
        assert!(!AbsenceError::MessagingFailure("x".to_string()).is_validation_error());
    }
}
