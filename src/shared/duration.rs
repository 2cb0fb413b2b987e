//! ISO-8601 duration parsing for spoken timeframes
//!
//! The voice platform resolves phrases like "the last three days" into
//! ISO-8601 durations (`P3D`, `PT90M`, `P1Y2M`). Only the integer forms
//! the platform emits are accepted; fractional and negative durations are
//! rejected.

use chrono::{DateTime, Duration, Months, TimeZone};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Longest elapsed (non-calendar) span accepted: 100 years of seconds
const MAX_ELAPSED_SECONDS: i64 = 100 * 366 * 24 * 3600;

/// Duration parse error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationParseError {
    pub input: String,
    pub message: String,
}

impl DurationParseError {
    pub fn new(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid duration '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for DurationParseError {}

/// Unit of a duration component, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl DurationUnit {
    pub const ALL: [DurationUnit; 7] = [
        DurationUnit::Year,
        DurationUnit::Month,
        DurationUnit::Week,
        DurationUnit::Day,
        DurationUnit::Hour,
        DurationUnit::Minute,
        DurationUnit::Second,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Year => "year",
            DurationUnit::Month => "month",
            DurationUnit::Week => "week",
            DurationUnit::Day => "day",
            DurationUnit::Hour => "hour",
            DurationUnit::Minute => "minute",
            DurationUnit::Second => "second",
        }
    }
}

/// A parsed ISO-8601 duration
///
/// Each component is optional; at least one is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationSpec {
    pub years: Option<u32>,
    pub months: Option<u32>,
    pub weeks: Option<u32>,
    pub days: Option<u32>,
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
}

impl DurationSpec {
    /// Parse an ISO-8601 duration such as `P3D`, `PT90M` or `P1Y2M3DT4H`
    pub fn parse(text: &str) -> Result<Self, DurationParseError> {
        static DURATION_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = DURATION_REGEX.get_or_init(|| {
            Regex::new(
                r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:(T)(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$",
            )
            .expect("duration regex is valid")
        });

        let trimmed = text.trim();
        let captures = regex
            .captures(trimmed)
            .ok_or_else(|| DurationParseError::new(trimmed, "not an ISO-8601 duration"))?;

        let component = |index: usize| -> Result<Option<u32>, DurationParseError> {
            captures
                .get(index)
                .map(|m| {
                    m.as_str()
                        .parse::<u32>()
                        .map_err(|_| DurationParseError::new(trimmed, "component is too large"))
                })
                .transpose()
        };

        let spec = DurationSpec {
            years: component(1)?,
            months: component(2)?,
            weeks: component(3)?,
            days: component(4)?,
            hours: component(6)?,
            minutes: component(7)?,
            seconds: component(8)?,
        };

        let has_time_designator = captures.get(5).is_some();
        if has_time_designator
            && spec.hours.is_none()
            && spec.minutes.is_none()
            && spec.seconds.is_none()
        {
            return Err(DurationParseError::new(
                trimmed,
                "time designator 'T' must be followed by a component",
            ));
        }

        if spec.components().next().is_none() {
            return Err(DurationParseError::new(trimmed, "duration has no components"));
        }

        Ok(spec)
    }

    pub fn get(&self, unit: DurationUnit) -> Option<u32> {
        match unit {
            DurationUnit::Year => self.years,
            DurationUnit::Month => self.months,
            DurationUnit::Week => self.weeks,
            DurationUnit::Day => self.days,
            DurationUnit::Hour => self.hours,
            DurationUnit::Minute => self.minutes,
            DurationUnit::Second => self.seconds,
        }
    }

    /// Present components in display order
    pub fn components(&self) -> impl Iterator<Item = (DurationUnit, u32)> + '_ {
        DurationUnit::ALL
            .iter()
            .filter_map(move |unit| self.get(*unit).map(|value| (*unit, value)))
    }

    /// Spoken form, e.g. "1 day 6 hours"
    pub fn phrase(&self) -> String {
        self.components()
            .map(|(unit, value)| {
                let plural = if value > 1 { "s" } else { "" };
                format!("{} {}{}", value, unit.as_str(), plural)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Calendar part of the duration (years and months)
    pub fn calendar_months(&self) -> Option<u32> {
        let years = self.years.unwrap_or(0);
        let months = self.months.unwrap_or(0);
        years.checked_mul(12)?.checked_add(months)
    }

    /// Exact elapsed part of the duration (weeks through seconds)
    pub fn elapsed(&self) -> Option<Duration> {
        let weeks = i64::from(self.weeks.unwrap_or(0));
        let days = i64::from(self.days.unwrap_or(0));
        let hours = i64::from(self.hours.unwrap_or(0));
        let minutes = i64::from(self.minutes.unwrap_or(0));
        let seconds = i64::from(self.seconds.unwrap_or(0));

        let total = weeks
            .checked_mul(7 * 24 * 3600)?
            .checked_add(days.checked_mul(24 * 3600)?)?
            .checked_add(hours.checked_mul(3600)?)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)?;

        if total > MAX_ELAPSED_SECONDS {
            return None;
        }
        Some(Duration::seconds(total))
    }

    /// Subtract this duration from `end`
    ///
    /// Years and months step back by calendar months first (clamping the day
    /// of month), then the elapsed part is subtracted.
    pub fn subtract_from<Tz: TimeZone>(&self, end: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let months = self.calendar_months()?;
        let stepped = if months == 0 {
            end.clone()
        } else {
            end.clone().checked_sub_months(Months::new(months))?
        };
        stepped.checked_sub_signed(self.elapsed()?)
    }
}

impl std::str::FromStr for DurationSpec {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DurationSpec::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_parse_days() {
        let spec = DurationSpec::parse("P3D").unwrap();
        assert_eq!(spec.days, Some(3));
        assert_eq!(spec.hours, None);
        assert_eq!(spec.phrase(), "3 days");
    }

    #[test]
    fn test_parse_minutes_not_months() {
        let spec = DurationSpec::parse("PT90M").unwrap();
        assert_eq!(spec.minutes, Some(90));
        assert_eq!(spec.months, None);
        assert_eq!(spec.phrase(), "90 minutes");
    }

    #[test]
    fn test_parse_months_before_time_designator() {
        let spec = DurationSpec::parse("P2M").unwrap();
        assert_eq!(spec.months, Some(2));
        assert_eq!(spec.minutes, None);
    }

    #[test]
    fn test_parse_all_components() {
        let spec = DurationSpec::parse("P1Y2M3W4DT5H6M7S").unwrap();
        assert_eq!(spec.years, Some(1));
        assert_eq!(spec.months, Some(2));
        assert_eq!(spec.weeks, Some(3));
        assert_eq!(spec.days, Some(4));
        assert_eq!(spec.hours, Some(5));
        assert_eq!(spec.minutes, Some(6));
        assert_eq!(spec.seconds, Some(7));
        assert_eq!(
            spec.phrase(),
            "1 year 2 months 3 weeks 4 days 5 hours 6 minutes 7 seconds"
        );
    }

    #[test]
    fn test_phrase_singular() {
        let spec = DurationSpec::parse("P1DT1H").unwrap();
        assert_eq!(spec.phrase(), "1 day 1 hour");
    }

    #[test]
    fn test_phrase_zero_is_not_plural() {
        let spec = DurationSpec::parse("PT0S").unwrap();
        assert_eq!(spec.phrase(), "0 second");
    }

    #[test]
    fn test_parse_rejects_empty_duration() {
        assert!(DurationSpec::parse("P").is_err());
        assert!(DurationSpec::parse("PT").is_err());
        assert!(DurationSpec::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DurationSpec::parse("3 days").is_err());
        assert!(DurationSpec::parse("P3").is_err());
        assert!(DurationSpec::parse("PT1.5H").is_err());
        assert!(DurationSpec::parse("P-3D").is_err());
        assert!(DurationSpec::parse("P1D2Y").is_err());
        assert!(DurationSpec::parse("p3d").is_err());
    }

    #[test]
    fn test_parse_rejects_overflowing_component() {
        let err = DurationSpec::parse("P99999999999D").unwrap_err();
        assert!(err.message.contains("too large"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(DurationSpec::parse(" P3D ").unwrap().days, Some(3));
    }

    #[test]
    fn test_elapsed() {
        let spec = DurationSpec::parse("P1W2DT3H4M5S").unwrap();
        let expected = Duration::days(9)
            + Duration::hours(3)
            + Duration::minutes(4)
            + Duration::seconds(5);
        assert_eq!(spec.elapsed(), Some(expected));
    }

    #[test]
    fn test_elapsed_rejects_absurd_span() {
        let spec = DurationSpec::parse("P4000000000W").unwrap();
        assert_eq!(spec.elapsed(), None);
    }

    #[test]
    fn test_subtract_calendar_months_clamps_day() {
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let spec = DurationSpec::parse("P1M").unwrap();

        let start = spec.subtract_from(&end).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_subtract_mixed() {
        let end = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let spec = DurationSpec::parse("P1YT2H").unwrap();

        let start = spec.subtract_from(&end).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 3, 15, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_from_str() {
        let spec: DurationSpec = "PT6H".parse().unwrap();
        assert_eq!(spec.hours, Some(6));
    }
}
