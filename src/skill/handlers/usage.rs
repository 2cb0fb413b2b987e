use tracing::info;

use hot_water::alexa::{Intent, SkillResponse, Speechlet};
use hot_water::{
    liters_to_gallons, resolve, total_value, Clock, MetricName, MetricQuery, MetricsStore,
    PeriodRequest, Statistic,
};

use super::TIMEFRAME_REPROMPT;
use crate::config::SkillConfig;
use crate::error::SkillError;

pub const CARD_TITLE: &str = "Water Volume";
pub const PERIOD_SLOT: &str = "period";
pub const TIMEFRAME_SLOT: &str = "timeframe";

/// One aggregation period per year of window
pub const USAGE_PERIOD_SECONDS: i32 = 60 * 60 * 24 * 365;

/// Handle the WaterVolumeUsed intent
///
/// Resolves the requested period, sums `liters_used` over it and reads the
/// total back in gallons.
pub async fn water_volume_used(
    intent: &Intent,
    should_end_session: bool,
    config: &SkillConfig,
    store: &dyn MetricsStore,
    clock: &dyn Clock,
) -> Result<SkillResponse, SkillError> {
    let request = PeriodRequest::from_slots(
        intent.slot_value(PERIOD_SLOT),
        intent.slot_value(TIMEFRAME_SLOT),
    )?;
    let period = resolve(&request, clock.now(), config.timezone)?;

    info!(
        start = %period.start,
        end = %period.end,
        phrase = %period.phrase,
        "Resolved reporting period"
    );

    let query = MetricQuery {
        namespace: config.namespace.clone(),
        metric: MetricName::LitersUsed,
        start: period.start_utc(),
        end: period.end_utc(),
        period_seconds: USAGE_PERIOD_SECONDS,
        statistic: Statistic::Sum,
    };

    let datapoints = store.get_statistics(&query).await?;
    let liters = total_value(&query, &datapoints)?;
    let gallons = liters_to_gallons(liters);

    info!(liters, gallons, "Water volume used");

    Ok(SkillResponse::new(Speechlet::new(
        CARD_TITLE,
        describe_usage(gallons, &period.phrase),
        Some(TIMEFRAME_REPROMPT.to_string()),
        should_end_session,
    )))
}

pub fn describe_usage(gallons: f64, phrase: &str) -> String {
    if gallons == 0.0 {
        format!("You have used no hot water {}. ", phrase)
    } else {
        format!("You have used {:.1} gallons of hot water {}. ", gallons, phrase)
    }
}
