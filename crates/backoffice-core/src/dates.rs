//! # Dates
//!
//! Day-first date handling for the back office.
//!
//! Every date the dashboard shows or accepts is `DD-MM-YYYY` (orders,
//! reminders, the date-range picker). Times are `HH:MM`. Internally dates are
//! `chrono::NaiveDate`, and the serde helpers in [`dmy`] and [`hm`] keep the
//! wire format day-first.
//!
//! ## Date-Range Picker
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  From: [20-01-2025]   To: [10-01-2025]   [Apply]                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse both ── bad text? ──► "from has invalid format: ..."             │
//! │       │                                                                 │
//! │       ├── after today? ────► "Start date cannot be in the future"       │
//! │       │                                                                 │
//! │       ├── from > to? ──────► "Start date must be before end date"       │
//! │       │                                                                 │
//! │       └── OK ──────────────► on_date_change(DateRange { from, to })     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Today" is always passed in by the caller; nothing here reads the clock.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{FieldErrors, ValidationError};

/// Display/parse format for dates.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Display/parse format for reminder times.
pub const TIME_FORMAT: &str = "%H:%M";

// =============================================================================
// Parsing & Formatting
// =============================================================================

/// Formats a date as `DD-MM-YYYY`.
pub fn format_dmy(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `DD-MM-YYYY` string.
pub fn parse_dmy(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
}

/// Parses a `DD-MM-YYYY` form input, reporting failures against `field`.
pub fn parse_dmy_field(field: &str, input: &str) -> Result<NaiveDate, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    parse_dmy(input).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected DD-MM-YYYY".to_string(),
    })
}

/// Parses an `HH:MM` form input, reporting failures against `field`.
pub fn parse_hm_field(field: &str, input: &str) -> Result<NaiveTime, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected HH:MM".to_string(),
        }
    })
}

/// Serde adapter: `NaiveDate` ⇄ `"DD-MM-YYYY"`.
pub mod dmy {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_dmy(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_dmy(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: `NaiveTime` ⇄ `"HH:MM"`.
pub mod hm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(super::TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), super::TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[serde(with = "dmy")]
    #[ts(as = "String")]
    pub from: NaiveDate,
    #[serde(with = "dmy")]
    #[ts(as = "String")]
    pub to: NaiveDate,
}

impl DateRange {
    /// Checks whether a day falls inside the range (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Validates raw picker input against `today`.
///
/// All parse and future-date failures are reported together; the ordering
/// check only runs once both dates are valid.
pub fn validate_date_range(
    from: &str,
    to: &str,
    today: NaiveDate,
) -> Result<DateRange, FieldErrors> {
    let mut errors = FieldErrors::new();

    let from = parse_dmy_field("from", from).map_err(|e| errors.push(e)).ok();
    let to = parse_dmy_field("to", to).map_err(|e| errors.push(e)).ok();

    if let Some(from) = from {
        if from > today {
            errors.insert("from", "Start date cannot be in the future");
        }
    }
    if let Some(to) = to {
        if to > today {
            errors.insert("to", "End date cannot be in the future");
        }
    }

    match (from, to) {
        (Some(from), Some(to)) if errors.is_empty() => {
            if from > to {
                return Err(ValidationError::StartAfterEnd.into());
            }
            Ok(DateRange { from, to })
        }
        _ => Err(errors),
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Quick-pick ranges offered next to the picker inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DateRangePreset {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    ThisMonth,
}

impl DateRangePreset {
    pub fn range(&self, today: NaiveDate) -> DateRange {
        match self {
            DateRangePreset::Today => DateRange { from: today, to: today },
            DateRangePreset::Yesterday => {
                let day = today - Duration::days(1);
                DateRange { from: day, to: day }
            }
            DateRangePreset::Last7Days => DateRange {
                from: today - Duration::days(6),
                to: today,
            },
            DateRangePreset::Last30Days => DateRange {
                from: today - Duration::days(29),
                to: today,
            },
            DateRangePreset::ThisMonth => DateRange {
                from: today.with_day(1).unwrap_or(today),
                to: today,
            },
        }
    }
}

// =============================================================================
// Picker
// =============================================================================

type DateChangeHandler = Box<dyn FnMut(DateRange) + Send>;

/// State behind the date-range picker widget.
///
/// Accepted ranges are stored and forwarded to the `on_date_change` handler;
/// rejected input leaves the previous selection untouched.
pub struct DateRangePicker {
    today: NaiveDate,
    selected: Option<DateRange>,
    on_date_change: Option<DateChangeHandler>,
}

impl DateRangePicker {
    pub fn new(today: NaiveDate) -> Self {
        DateRangePicker {
            today,
            selected: None,
            on_date_change: None,
        }
    }

    /// Installs the callback that receives every accepted range.
    pub fn on_date_change(mut self, handler: impl FnMut(DateRange) + Send + 'static) -> Self {
        self.on_date_change = Some(Box::new(handler));
        self
    }

    pub fn selected(&self) -> Option<DateRange> {
        self.selected
    }

    /// Validates and applies typed input.
    pub fn apply(&mut self, from: &str, to: &str) -> Result<DateRange, FieldErrors> {
        let range = validate_date_range(from, to, self.today)?;
        self.select(range);
        Ok(range)
    }

    /// Applies a preset; presets are valid by construction.
    pub fn apply_preset(&mut self, preset: DateRangePreset) -> DateRange {
        let range = preset.range(self.today);
        self.select(range);
        range
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    fn select(&mut self, range: DateRange) {
        self.selected = Some(range);
        if let Some(handler) = self.on_date_change.as_mut() {
            handler(range);
        }
    }
}

impl std::fmt::Debug for DateRangePicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateRangePicker")
            .field("today", &self.today)
            .field("selected", &self.selected)
            .field("has_handler", &self.on_date_change.is_some())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn day(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_and_format_dmy() {
        let date = parse_dmy("05-03-2025").unwrap();
        assert_eq!(date, day(5, 3, 2025));
        assert_eq!(format_dmy(date), "05-03-2025");
        assert!(parse_dmy("2025-03-05").is_err());
        assert!(parse_dmy("31-02-2025").is_err());
    }

    #[test]
    fn test_parse_dmy_field_errors() {
        assert_eq!(
            parse_dmy_field("date", "  ").unwrap_err().to_string(),
            "date is required"
        );
        assert_eq!(
            parse_dmy_field("date", "tomorrow").unwrap_err().to_string(),
            "date has invalid format: expected DD-MM-YYYY"
        );
    }

    #[test]
    fn test_parse_hm_field() {
        assert_eq!(
            parse_hm_field("time", "09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_hm_field("time", "25:00").is_err());
    }

    #[test]
    fn test_range_start_after_end_rejected() {
        let today = day(1, 6, 2025);
        let errors = validate_date_range("20-01-2025", "10-01-2025", today).unwrap_err();
        assert_eq!(errors.get("from"), Some("Start date must be before end date"));
    }

    #[test]
    fn test_range_in_future_rejected() {
        let today = day(1, 6, 2025);
        let errors = validate_date_range("02-06-2025", "03-06-2025", today).unwrap_err();
        assert_eq!(errors.get("from"), Some("Start date cannot be in the future"));
        assert_eq!(errors.get("to"), Some("End date cannot be in the future"));
    }

    #[test]
    fn test_range_reports_both_parse_failures() {
        let errors = validate_date_range("", "xx", day(1, 6, 2025)).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("from"));
        assert!(errors.contains("to"));
    }

    #[test]
    fn test_picker_forwards_accepted_range() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut picker = DateRangePicker::new(day(1, 6, 2025))
            .on_date_change(move |range| sink.lock().unwrap().push(range));

        let range = picker.apply("10-01-2025", "20-01-2025").unwrap();
        assert_eq!(range.from, day(10, 1, 2025));
        assert_eq!(range.to, day(20, 1, 2025));
        assert_eq!(range.days(), 11);

        // Rejected input neither calls back nor replaces the selection.
        assert!(picker.apply("20-01-2025", "10-01-2025").is_err());
        assert_eq!(picker.selected(), Some(range));
        assert_eq!(*seen.lock().unwrap(), vec![range]);
    }

    #[test]
    fn test_picker_preset_selects_and_forwards() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut picker = DateRangePicker::new(day(15, 6, 2025))
            .on_date_change(move |range| sink.lock().unwrap().push(range));

        let range = picker.apply_preset(DateRangePreset::Last7Days);
        assert_eq!(range.from, day(9, 6, 2025));
        assert_eq!(range.to, day(15, 6, 2025));
        assert_eq!(picker.selected(), Some(range));
        assert_eq!(*seen.lock().unwrap(), vec![range]);

        picker.clear();
        assert_eq!(picker.selected(), None);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_same_day_range_accepted() {
        let today = day(1, 6, 2025);
        let range = validate_date_range("01-06-2025", "01-06-2025", today).unwrap();
        assert!(range.contains(today));
    }

    #[test]
    fn test_presets() {
        let today = day(15, 6, 2025);
        assert_eq!(DateRangePreset::Last7Days.range(today).days(), 7);
        assert_eq!(DateRangePreset::Last30Days.range(today).days(), 30);
        assert_eq!(DateRangePreset::ThisMonth.range(today).from, day(1, 6, 2025));
        assert_eq!(DateRangePreset::Yesterday.range(today).to, day(14, 6, 2025));
    }

    #[test]
    fn test_date_range_serializes_day_first() {
        let range = DateRange {
            from: day(10, 1, 2025),
            to: day(20, 1, 2025),
        };
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"from":"10-01-2025","to":"20-01-2025"}"#);
        let back: DateRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }
}
