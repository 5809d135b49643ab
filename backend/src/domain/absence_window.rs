//! Full-day vs. partial-day absence.

use chrono::{Duration, NaiveTime};
use shared::TimeBounds;

use crate::domain::errors::WindowError;

/// The part of a school day an absence covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceWindow {
    FullDay,
    /// `start <= end`; equal times are a zero-length report
    Partial { start: NaiveTime, end: NaiveTime },
}

impl AbsenceWindow {
    /// Build a window from the form inputs.
    ///
    /// With `is_full_day` set the times are ignored. Otherwise both times must
    /// lie in `bounds`, sit on a `granularity_minutes` step counted from
    /// `bounds.min`, and `start` must not be after `end`; checked in that order.
    pub fn new(
        is_full_day: bool,
        start: NaiveTime,
        end: NaiveTime,
        bounds: TimeBounds,
        granularity_minutes: u32,
    ) -> Result<Self, WindowError> {
        if is_full_day {
            return Ok(AbsenceWindow::FullDay);
        }

        if !bounds.contains(start) || !bounds.contains(end) {
            return Err(WindowError::OutOfRange);
        }

        if !is_aligned(start, bounds.min, granularity_minutes)
            || !is_aligned(end, bounds.min, granularity_minutes)
        {
            return Err(WindowError::Misaligned);
        }

        if start > end {
            return Err(WindowError::InvertedRange);
        }

        Ok(AbsenceWindow::Partial { start, end })
    }

    pub fn is_full_day(&self) -> bool {
        matches!(self, AbsenceWindow::FullDay)
    }

    /// Length of a partial window; `None` for a full day
    pub fn duration(&self) -> Option<Duration> {
        match self {
            AbsenceWindow::FullDay => None,
            AbsenceWindow::Partial { start, end } => Some(*end - *start),
        }
    }
}

fn is_aligned(time: NaiveTime, origin: NaiveTime, granularity_minutes: u32) -> bool {
    let step_seconds = i64::from(granularity_minutes.max(1)) * 60;
    (time - origin).num_seconds().rem_euclid(step_seconds) == 0
}
