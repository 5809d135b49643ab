//! Absence form state and its transitions.
//!
//! `FormState` is a plain value; [`reduce`] computes the next state from an
//! action without side effects. The controller in `absence_form_controller`
//! owns the effects (cache, messaging) and feeds their results back in as
//! actions.

use chrono::{Duration, NaiveTime, Timelike};
use shared::TimeBounds;

use crate::domain::errors::{AbsenceError, IdentityError};
use crate::domain::identity_number;

/// Lifecycle of one form session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Editing,
    Submitting,
    Submitted,
    Failed,
}

/// Changes the guardian makes to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    IdentityChanged(String),
    /// The identity field lost focus; its errors become visible from now on
    IdentityBlurred,
    FullDayToggled(bool),
    StartTimeChanged(NaiveTime),
    EndTimeChanged(NaiveTime),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Mounted {
        now: NaiveTime,
        range: TimeBounds,
        granularity_minutes: u32,
    },
    CachedIdentityLoaded(Option<String>),
    Edit(FormEdit),
    SubmitStarted,
    SubmitFailed(AbsenceError),
    SubmitSucceeded,
}

impl From<FormEdit> for FormAction {
    fn from(edit: FormEdit) -> Self {
        FormAction::Edit(edit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub phase: FormPhase,
    pub identity_input: String,
    /// No guardian edit has reached the identity field yet
    pub identity_pristine: bool,
    /// Identity errors are shown once this is set
    pub identity_touched: bool,
    pub is_full_day: bool,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub last_error: Option<AbsenceError>,
}

impl FormState {
    pub fn new(range: TimeBounds) -> Self {
        Self {
            phase: FormPhase::Idle,
            identity_input: String::new(),
            identity_pristine: true,
            identity_touched: false,
            is_full_day: true,
            start_time: range.min,
            end_time: range.max,
            last_error: None,
        }
    }

    /// Submit is accepted only in an editable, non-busy session.
    /// `Submitted` is terminal: a report goes out at most once per session.
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, FormPhase::Editing | FormPhase::Failed)
    }

    /// Live identity error, held back until the field was blurred or submitted
    pub fn visible_identity_error(&self) -> Option<IdentityError> {
        if !self.identity_touched {
            return None;
        }
        identity_number::validate(&self.identity_input).err()
    }

    /// Error the presentation layer should currently show, if any
    pub fn visible_error(&self) -> Option<AbsenceError> {
        self.last_error
            .clone()
            .or_else(|| self.visible_identity_error().map(AbsenceError::from))
    }
}

/// Compute the state that follows `action`
pub fn reduce(state: FormState, action: FormAction) -> FormState {
    match action {
        FormAction::Mounted {
            now,
            range,
            granularity_minutes,
        } => {
            if state.phase != FormPhase::Idle {
                return state;
            }
            FormState {
                phase: FormPhase::Editing,
                is_full_day: true,
                start_time: default_start_time(now, range, granularity_minutes),
                end_time: range.max,
                ..state
            }
        }
        FormAction::CachedIdentityLoaded(Some(cached)) if state.identity_pristine => FormState {
            identity_input: cached,
            ..state
        },
        FormAction::CachedIdentityLoaded(_) => state,
        FormAction::Edit(edit) => apply_edit(state, edit),
        FormAction::SubmitStarted => FormState {
            phase: FormPhase::Submitting,
            identity_touched: true,
            last_error: None,
            ..state
        },
        FormAction::SubmitFailed(error) => FormState {
            phase: FormPhase::Failed,
            last_error: Some(error),
            ..state
        },
        FormAction::SubmitSucceeded => FormState {
            phase: FormPhase::Submitted,
            last_error: None,
            ..state
        },
    }
}

fn apply_edit(state: FormState, edit: FormEdit) -> FormState {
    let phase = match state.phase {
        FormPhase::Submitted => return state,
        FormPhase::Failed => FormPhase::Editing,
        other => other,
    };
    let state = FormState {
        phase,
        last_error: None,
        ..state
    };

    match edit {
        FormEdit::IdentityChanged(text) => FormState {
            identity_input: text,
            identity_pristine: false,
            ..state
        },
        FormEdit::IdentityBlurred => FormState {
            identity_touched: true,
            ..state
        },
        FormEdit::FullDayToggled(is_full_day) => FormState {
            is_full_day,
            ..state
        },
        FormEdit::StartTimeChanged(start_time) => FormState { start_time, ..state },
        FormEdit::EndTimeChanged(end_time) => FormState { end_time, ..state },
    }
}

/// The current hour on the hour, moved into the range and onto its step grid
fn default_start_time(now: NaiveTime, range: TimeBounds, granularity_minutes: u32) -> NaiveTime {
    let on_the_hour = NaiveTime::from_hms_opt(now.hour(), 0, 0).unwrap_or(range.min);
    let start = on_the_hour.max(range.min);

    let step = i64::from(granularity_minutes.max(1)) * 60;
    let offset = (start - range.min).num_seconds();
    let snapped = range.min + Duration::seconds((offset + step - 1) / step * step);

    if snapped > range.max || snapped < start {
        range.max
    } else {
        snapped
    }
}
