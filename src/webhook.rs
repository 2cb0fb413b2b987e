// Telemetry webhook binary entry point

#[path = "webhook/config.rs"]
mod config;
#[path = "webhook/error.rs"]
mod error;
mod repo;

#[path = "webhook/handlers/mod.rs"]
mod handlers;

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::WebhookConfig;
use handlers::update::handle_update;
use hot_water::MetricsStore;
use repo::cloudwatch::CloudWatchStore;

async fn function_handler(
    event: Request,
    config: &WebhookConfig,
    store: &dyn MetricsStore,
) -> Result<Response<Body>, Error> {
    // Extract request ID from Lambda context
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        method = %event.method(),
        path = %event.uri().path(),
        "Webhook Lambda invoked"
    );

    match handle_update(event, &request_id, config, store).await {
        Ok(response) => {
            info!(
                request_id = %request_id,
                status = %response.status(),
                "Request completed successfully"
            );
            Ok(response)
        }
        Err(api_error) => {
            error!(
                request_id = %request_id,
                error = %api_error,
                "Request failed"
            );
            Ok(api_error.to_http_response(&request_id))
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

    info!("Webhook Lambda starting");

    let config = WebhookConfig::from_env()?;
    let store = CloudWatchStore::from_env().await;

    info!(
        namespace = %config.namespace,
        accepted_device_id = config.accepted_device_id,
        "Configuration loaded"
    );

    let config = &config;
    let store = &store;

    run(service_fn(move |event: Request| async move {
        function_handler(event, config, store).await
    }))
    .await
}
