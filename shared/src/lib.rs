use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured name of a person as delivered by the school platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

impl PersonName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Name shown as the subtitle of the absence screen ("First Last")
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{} {}", first, last),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (true, true) => String::new(),
        }
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// A child the guardian can report absence for.
///
/// Owned by the navigation layer; the absence core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    /// Opaque identifier from the school platform
    pub id: String,
    pub name: PersonName,
}

impl Child {
    pub fn new(id: impl Into<String>, name: PersonName) -> Self {
        Self { id: id.into(), name }
    }
}

/// Inclusive range of wall-clock times that may be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min: NaiveTime,
    pub max: NaiveTime,
}

impl TimeBounds {
    pub fn new(min: NaiveTime, max: NaiveTime) -> Self {
        Self { min, max }
    }

    /// Whether `time` lies within the range, both ends included
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.min && time <= self.max
    }

    /// Every selectable time from `min` to `max`, stepping by `granularity_minutes`
    pub fn slots(&self, granularity_minutes: u32) -> Vec<NaiveTime> {
        let step = chrono::Duration::minutes(i64::from(granularity_minutes.max(1)));
        let mut slots = Vec::new();
        let mut current = self.min;
        while current <= self.max {
            slots.push(current);
            let (next, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 || next <= current {
                break;
            }
            current = next;
        }
        slots
    }
}

impl Default for TimeBounds {
    fn default() -> Self {
        Self {
            min: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            max: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Configuration for the absence form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsenceFormConfig {
    /// Times a partial-day absence may start and end within
    pub reportable_range: TimeBounds,
    /// Minute step for start/end times, counted from the start of the range
    pub granularity_minutes: u32,
    /// Prefix of the key-value entry holding a child's cached identity number
    pub cache_key_prefix: String,
    /// Number the outbound absence message is addressed to
    pub school_sms_number: String,
}

impl AbsenceFormConfig {
    /// Parse a configuration override; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for AbsenceFormConfig {
    fn default() -> Self {
        Self {
            reportable_range: TimeBounds::default(),
            granularity_minutes: 10,
            cache_key_prefix: "@childssn.".to_string(),
            school_sms_number: String::new(),
        }
    }
}
