use chrono::Duration;
use tracing::info;

use hot_water::alexa::{SkillResponse, Speechlet};
use hot_water::{
    estimate, latest_value, Clock, MetricName, MetricQuery, MetricsStore, RemainingState,
    Statistic,
};

use crate::config::SkillConfig;
use crate::error::SkillError;

pub const REMAINING_CARD_TITLE: &str = "Water Remaining";
pub const SHOWER_CARD_TITLE: &str = "Shower Time";

/// How far back to look for a deficit sample
pub const DEFICIT_LOOKBACK_SECONDS: i64 = 120;
pub const DEFICIT_PERIOD_SECONDS: i32 = 10;

/// Most recent `liter_deficit` reading within the lookback window
async fn latest_deficit(
    config: &SkillConfig,
    store: &dyn MetricsStore,
    clock: &dyn Clock,
) -> Result<f64, SkillError> {
    let end = clock.now();
    let query = MetricQuery {
        namespace: config.namespace.clone(),
        metric: MetricName::LiterDeficit,
        start: end - Duration::seconds(DEFICIT_LOOKBACK_SECONDS),
        end,
        period_seconds: DEFICIT_PERIOD_SECONDS,
        statistic: Statistic::Maximum,
    };

    let datapoints = store.get_statistics(&query).await?;
    let deficit = latest_value(&query, &datapoints)?;

    info!(deficit, datapoints = datapoints.len(), "Latest liter deficit");
    Ok(deficit)
}

async fn remaining_state(
    config: &SkillConfig,
    store: &dyn MetricsStore,
    clock: &dyn Clock,
) -> Result<RemainingState, SkillError> {
    let deficit = latest_deficit(config, store, clock).await?;
    Ok(estimate(
        config.capacity_gallons,
        deficit,
        config.shower_liters_per_minute,
    ))
}

/// Handle the WaterRemaining intent
pub async fn water_remaining(
    should_end_session: bool,
    config: &SkillConfig,
    store: &dyn MetricsStore,
    clock: &dyn Clock,
) -> Result<SkillResponse, SkillError> {
    let state = remaining_state(config, store, clock).await?;

    Ok(SkillResponse::new(Speechlet::new(
        REMAINING_CARD_TITLE,
        state.describe_remaining(),
        Some(String::new()),
        should_end_session,
    )))
}

/// Handle the LengthOfShower intent
pub async fn length_of_shower(
    should_end_session: bool,
    config: &SkillConfig,
    store: &dyn MetricsStore,
    clock: &dyn Clock,
) -> Result<SkillResponse, SkillError> {
    let state = remaining_state(config, store, clock).await?;

    info!(minutes = state.shower_minutes, "Estimated shower length");

    Ok(SkillResponse::new(Speechlet::new(
        SHOWER_CARD_TITLE,
        state.describe_shower(),
        Some(String::new()),
        should_end_session,
    )))
}
