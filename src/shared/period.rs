//! Reporting period resolution
//!
//! Turns either a symbolic period ("today", "last week") or a spoken ISO-8601
//! duration into an absolute half-open window `[start, end)` in the skill's
//! timezone, plus the phrase used when reading the result back.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

use crate::duration::{DurationParseError, DurationSpec};

/// Period resolution error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("Unrecognized period: {0}")]
    UnrecognizedPeriod(String),

    #[error("{0}")]
    Parse(#[from] DurationParseError),

    #[error("Window for '{0}' falls outside the supported calendar range")]
    OutOfRange(String),
}

/// Symbolic reporting periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKeyword {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
}

impl PeriodKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKeyword::Today => "today",
            PeriodKeyword::Yesterday => "yesterday",
            PeriodKeyword::ThisWeek => "this week",
            PeriodKeyword::LastWeek => "last week",
        }
    }
}

impl FromStr for PeriodKeyword {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(PeriodKeyword::Today),
            "yesterday" => Ok(PeriodKeyword::Yesterday),
            "this week" => Ok(PeriodKeyword::ThisWeek),
            "last week" => Ok(PeriodKeyword::LastWeek),
            _ => Err(PeriodError::UnrecognizedPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for PeriodKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user asked for: a named period or a trailing duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodRequest {
    Keyword(PeriodKeyword),
    Duration(DurationSpec),
}

impl PeriodRequest {
    /// Build a request from the two optional intent slots
    ///
    /// A duration takes precedence over a keyword. With neither slot filled
    /// the request defaults to today.
    pub fn from_slots(
        period: Option<&str>,
        timeframe: Option<&str>,
    ) -> Result<Self, PeriodError> {
        if let Some(text) = timeframe {
            return Ok(PeriodRequest::Duration(DurationSpec::parse(text)?));
        }

        match period {
            Some(keyword) => Ok(PeriodRequest::Keyword(keyword.parse()?)),
            None => Ok(PeriodRequest::Keyword(PeriodKeyword::Today)),
        }
    }
}

/// An absolute window `[start, end)` with its spoken label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingPeriod {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub phrase: String,
}

impl ReportingPeriod {
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }

    /// Half-open membership test
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start_utc() && *instant < self.end_utc()
    }
}

/// Resolve a period request against `now` in `timezone`
pub fn resolve(
    request: &PeriodRequest,
    now: DateTime<Utc>,
    timezone: Tz,
) -> Result<ReportingPeriod, PeriodError> {
    let local_now = now.with_timezone(&timezone);

    match request {
        PeriodRequest::Keyword(keyword) => {
            let label = keyword.as_str();
            let out_of_range = || PeriodError::OutOfRange(label.to_string());
            let today = local_now.date_naive();

            let (start, end) = match keyword {
                PeriodKeyword::Today => {
                    let start = midnight_on(timezone, today).ok_or_else(out_of_range)?;
                    (start, start + Duration::hours(24))
                }
                PeriodKeyword::Yesterday => {
                    let end = midnight_on(timezone, today).ok_or_else(out_of_range)?;
                    (end - Duration::hours(24), end)
                }
                PeriodKeyword::ThisWeek | PeriodKeyword::LastWeek => {
                    // Calendar days so the window starts at Monday 00:00 across DST changes
                    let weeks_back = if *keyword == PeriodKeyword::LastWeek { 7 } else { 0 };
                    let monday = today
                        .checked_sub_days(Days::new(
                            u64::from(today.weekday().num_days_from_monday()) + weeks_back,
                        ))
                        .ok_or_else(out_of_range)?;
                    let next_monday = monday
                        .checked_add_days(Days::new(7))
                        .ok_or_else(out_of_range)?;
                    (
                        midnight_on(timezone, monday).ok_or_else(out_of_range)?,
                        midnight_on(timezone, next_monday).ok_or_else(out_of_range)?,
                    )
                }
            };

            Ok(ReportingPeriod {
                start,
                end,
                phrase: label.to_string(),
            })
        }
        PeriodRequest::Duration(spec) => {
            let start = spec
                .subtract_from(&local_now)
                .ok_or_else(|| PeriodError::OutOfRange(spec.phrase()))?;

            Ok(ReportingPeriod {
                start,
                end: local_now,
                phrase: format!("in the last {}", spec.phrase()),
            })
        }
    }
}

/// First instant of a local calendar day
fn midnight_on(timezone: Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    timezone.from_local_datetime(&naive).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mountain() -> Tz {
        "US/Mountain".parse().unwrap()
    }

    fn local(tz: Tz, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        tz.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn now_at(tz: Tz, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        local(tz, y, mo, d, h, mi).with_timezone(&Utc)
    }

    #[test]
    fn test_keyword_parse() {
        assert_eq!("today".parse::<PeriodKeyword>().unwrap(), PeriodKeyword::Today);
        assert_eq!(
            " Last Week ".parse::<PeriodKeyword>().unwrap(),
            PeriodKeyword::LastWeek
        );
        assert_eq!(
            "fortnight".parse::<PeriodKeyword>(),
            Err(PeriodError::UnrecognizedPeriod("fortnight".to_string()))
        );
    }

    #[test]
    fn test_from_slots_duration_wins() {
        let request = PeriodRequest::from_slots(Some("today"), Some("P3D")).unwrap();
        assert!(matches!(request, PeriodRequest::Duration(spec) if spec.days == Some(3)));
    }

    #[test]
    fn test_from_slots_defaults_to_today() {
        let request = PeriodRequest::from_slots(None, None).unwrap();
        assert_eq!(request, PeriodRequest::Keyword(PeriodKeyword::Today));
    }

    #[test]
    fn test_from_slots_bad_duration() {
        let result = PeriodRequest::from_slots(None, Some("three days"));
        assert!(matches!(result, Err(PeriodError::Parse(_))));
    }

    #[test]
    fn test_from_slots_bad_keyword() {
        let result = PeriodRequest::from_slots(Some("last year"), None);
        assert!(matches!(result, Err(PeriodError::UnrecognizedPeriod(_))));
    }

    #[test]
    fn test_resolve_today() {
        let tz = mountain();
        let now = now_at(tz, 2024, 3, 15, 10, 0);

        let period = resolve(&PeriodRequest::Keyword(PeriodKeyword::Today), now, tz).unwrap();

        assert_eq!(period.start, local(tz, 2024, 3, 15, 0, 0));
        assert_eq!(period.end, local(tz, 2024, 3, 16, 0, 0));
        assert_eq!(period.phrase, "today");
    }

    #[test]
    fn test_resolve_yesterday() {
        let tz = mountain();
        let now = now_at(tz, 2024, 3, 15, 10, 0);

        let period =
            resolve(&PeriodRequest::Keyword(PeriodKeyword::Yesterday), now, tz).unwrap();

        assert_eq!(period.start, local(tz, 2024, 3, 14, 0, 0));
        assert_eq!(period.end, local(tz, 2024, 3, 15, 0, 0));
        assert_eq!(period.phrase, "yesterday");
    }

    #[test]
    fn test_resolve_this_week_from_friday() {
        let tz = mountain();
        let now = now_at(tz, 2024, 3, 15, 10, 0);

        let period = resolve(&PeriodRequest::Keyword(PeriodKeyword::ThisWeek), now, tz).unwrap();

        assert_eq!(period.start, local(tz, 2024, 3, 11, 0, 0));
        assert_eq!(period.end, local(tz, 2024, 3, 18, 0, 0));
    }

    #[test]
    fn test_resolve_this_week_on_monday() {
        let tz = mountain();
        let now = now_at(tz, 2024, 3, 11, 0, 30);

        let period = resolve(&PeriodRequest::Keyword(PeriodKeyword::ThisWeek), now, tz).unwrap();

        assert_eq!(period.start, local(tz, 2024, 3, 11, 0, 0));
    }

    #[test]
    fn test_resolve_last_week() {
        let tz = mountain();
        let now = now_at(tz, 2024, 3, 15, 10, 0);

        let period = resolve(&PeriodRequest::Keyword(PeriodKeyword::LastWeek), now, tz).unwrap();

        assert_eq!(period.start, local(tz, 2024, 3, 4, 0, 0));
        // Spring-forward on the 10th makes this week one hour short
        assert_eq!(period.end, local(tz, 2024, 3, 11, 0, 0));
        assert_eq!(period.end - period.start, Duration::days(7) - Duration::hours(1));
    }

    #[test]
    fn test_resolve_this_week_across_fall_back() {
        let tz = mountain();
        // Clocks fall back on Sunday 2024-11-03
        let now = now_at(tz, 2024, 11, 6, 9, 0);

        let this_week =
            resolve(&PeriodRequest::Keyword(PeriodKeyword::ThisWeek), now, tz).unwrap();
        let last_week =
            resolve(&PeriodRequest::Keyword(PeriodKeyword::LastWeek), now, tz).unwrap();

        assert_eq!(this_week.start, local(tz, 2024, 11, 4, 0, 0));
        assert_eq!(last_week.start, local(tz, 2024, 10, 28, 0, 0));
        assert_eq!(last_week.end, this_week.start);
        assert_eq!(last_week.end - last_week.start, Duration::days(7) + Duration::hours(1));
    }

    #[test]
    fn test_resolve_uses_local_date_not_utc_date() {
        let tz = mountain();
        // 22:00 local on the 15th is already the 16th in UTC
        let now = now_at(tz, 2024, 3, 15, 22, 0);

        let period = resolve(&PeriodRequest::Keyword(PeriodKeyword::Today), now, tz).unwrap();

        assert_eq!(period.start, local(tz, 2024, 3, 15, 0, 0));
    }

    #[test]
    fn test_resolve_duration() {
        let tz = mountain();
        let now = now_at(tz, 2024, 3, 15, 10, 0);
        let request = PeriodRequest::Duration(DurationSpec::parse("P3D").unwrap());

        let period = resolve(&request, now, tz).unwrap();

        assert_eq!(period.end_utc(), now);
        assert_eq!(period.start_utc(), now - Duration::days(3));
        assert_eq!(period.phrase, "in the last 3 days");
    }

    #[test]
    fn test_resolve_duration_minutes() {
        let tz = mountain();
        let now = now_at(tz, 2024, 3, 15, 10, 0);
        let request = PeriodRequest::Duration(DurationSpec::parse("PT90M").unwrap());

        let period = resolve(&request, now, tz).unwrap();

        assert_eq!(period.start_utc(), now - Duration::minutes(90));
        assert_eq!(period.phrase, "in the last 90 minutes");
    }

    #[test]
    fn test_contains_is_half_open() {
        let tz = mountain();
        let now = now_at(tz, 2024, 3, 15, 10, 0);
        let period = resolve(&PeriodRequest::Keyword(PeriodKeyword::Today), now, tz).unwrap();

        assert!(period.contains(&period.start_utc()));
        assert!(!period.contains(&period.end_utc()));
        assert!(period.contains(&now));
    }
}
