use thiserror::Error;

use hot_water::{MetricsError, PeriodError};

/// Main error type for the voice skill
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    #[error("Period error: {0}")]
    Period(#[from] PeriodError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

impl SkillError {
    /// Stable code for log fields
    pub fn code(&self) -> &'static str {
        match self {
            SkillError::InvalidIntent(_) => "INVALID_INTENT",
            SkillError::Period(PeriodError::UnrecognizedPeriod(_)) => "UNRECOGNIZED_PERIOD",
            SkillError::Period(PeriodError::Parse(_)) => "INVALID_TIMEFRAME",
            SkillError::Period(PeriodError::OutOfRange(_)) => "TIMEFRAME_OUT_OF_RANGE",
            SkillError::Metrics(MetricsError::NoData { .. }) => "NO_DATA",
            SkillError::Metrics(MetricsError::Backend(_)) => "METRICS_ERROR",
        }
    }
}
