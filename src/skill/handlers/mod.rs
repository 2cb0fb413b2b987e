pub mod remaining;
pub mod session;
pub mod usage;

use std::str::FromStr;
use tracing::warn;

use hot_water::alexa::{SkillResponse, Speechlet};
use hot_water::MetricsError;

use crate::error::SkillError;

pub const TIMEFRAME_REPROMPT: &str = "I'm not sure what that timeframe is. \
    A valid timeframe is something like 6 hours, 3 days, or 10 minutes. ";

/// Intents the skill understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillIntent {
    WaterVolumeUsed,
    WaterRemaining,
    LengthOfShower,
    Help,
    Cancel,
    Stop,
}

impl SkillIntent {
    pub fn card_title(&self) -> &'static str {
        match self {
            SkillIntent::WaterVolumeUsed => usage::CARD_TITLE,
            SkillIntent::WaterRemaining => remaining::REMAINING_CARD_TITLE,
            SkillIntent::LengthOfShower => remaining::SHOWER_CARD_TITLE,
            SkillIntent::Help => session::WELCOME_CARD_TITLE,
            SkillIntent::Cancel | SkillIntent::Stop => session::SESSION_END_CARD_TITLE,
        }
    }
}

impl FromStr for SkillIntent {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WaterVolumeUsed" => Ok(SkillIntent::WaterVolumeUsed),
            "WaterRemaining" => Ok(SkillIntent::WaterRemaining),
            "LengthOfShower" => Ok(SkillIntent::LengthOfShower),
            "AMAZON.HelpIntent" => Ok(SkillIntent::Help),
            "AMAZON.CancelIntent" => Ok(SkillIntent::Cancel),
            "AMAZON.StopIntent" => Ok(SkillIntent::Stop),
            other => Err(SkillError::InvalidIntent(other.to_string())),
        }
    }
}

/// Turn a recoverable handler error into a spoken response
///
/// Timeframe problems reprompt with the session left open. Missing data and
/// backend failures are spoken. Invalid intents stay fatal.
pub fn error_response(
    intent: SkillIntent,
    error: SkillError,
    should_end_session: bool,
) -> Result<SkillResponse, SkillError> {
    let title = intent.card_title();

    match error {
        SkillError::Period(_) => Ok(SkillResponse::new(Speechlet::new(
            title,
            TIMEFRAME_REPROMPT,
            Some(TIMEFRAME_REPROMPT.to_string()),
            false,
        ))),
        SkillError::Metrics(MetricsError::NoData { .. }) => Ok(SkillResponse::new(
            Speechlet::new(
                title,
                "There is no hot water data available for that time. ",
                Some(String::new()),
                should_end_session,
            ),
        )),
        SkillError::Metrics(MetricsError::Backend(ref message)) => {
            warn!(error = %message, "Speaking apology for metrics backend failure");
            Ok(SkillResponse::new(Speechlet::new(
                title,
                "Sorry, I couldn't reach your water heater data right now. Please try again later. ",
                None,
                true,
            )))
        }
        SkillError::InvalidIntent(_) => Err(error),
    }
}
