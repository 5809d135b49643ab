//! Outbound absence message format.
//!
//! The message is read by the school's reporting system, so the layout is fixed:
//! the canonical identity number, and for a partial day one space followed by
//! `HHMM-HHMM` in 24-hour time.

use std::fmt;
use std::ops::Deref;

use crate::domain::absence_window::AbsenceWindow;

/// Final text handed to the messaging capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionMessage(String);

impl SubmissionMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for SubmissionMessage {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render a validated identity number and window into the outbound message
pub fn encode(canonical_identity: &str, window: &AbsenceWindow) -> SubmissionMessage {
    match window {
        AbsenceWindow::FullDay => SubmissionMessage(canonical_identity.to_string()),
        AbsenceWindow::Partial { start, end } => SubmissionMessage(format!(
            "{} {}-{}",
            canonical_identity,
            start.format("%H%M"),
            end.format("%H%M")
        )),
    }
}
