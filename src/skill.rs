// Voice skill binary entry point

mod config;
mod error;
mod repo;
mod router;

#[path = "skill/handlers/mod.rs"]
mod handlers;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::SkillConfig;
use hot_water::alexa::{SkillRequest, SkillResponse};
use hot_water::{Clock, MetricsStore, SystemClock};
use repo::cloudwatch::CloudWatchStore;
use router::route_request;

async fn function_handler(
    event: LambdaEvent<SkillRequest>,
    config: &SkillConfig,
    store: &dyn MetricsStore,
    clock: &dyn Clock,
) -> Result<Option<SkillResponse>, Error> {
    let LambdaEvent {
        payload: request,
        context,
    } = event;
    let request_id = context.request_id;

    info!(
        request_id = %request_id,
        request_type = request.request.kind(),
        invoked_at = %clock.now_rfc3339(),
        "Skill Lambda invoked"
    );

    match route_request(&request, config, store, clock).await {
        Ok(response) => {
            info!(
                request_id = %request_id,
                has_response = response.is_some(),
                "Request completed successfully"
            );
            Ok(response)
        }
        Err(skill_error) => {
            error!(
                request_id = %request_id,
                code = skill_error.code(),
                error = %skill_error,
                "Request failed"
            );
            Err(skill_error.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_target(false)
        .without_time()
        .init();

    info!("Skill Lambda starting");

    let config = SkillConfig::from_env()?;
    let store = CloudWatchStore::from_env().await;
    let clock = SystemClock::new();

    info!(
        namespace = %config.namespace,
        timezone = %config.timezone,
        capacity_gallons = config.capacity_gallons,
        "Configuration loaded"
    );

    let config = &config;
    let store = &store;
    let clock = &clock;

    run(service_fn(move |event: LambdaEvent<SkillRequest>| async move {
        function_handler(event, config, store, clock).await
    }))
    .await
}
