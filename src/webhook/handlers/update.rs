use lambda_http::{Body, Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::WebhookConfig;
use crate::error::{ApiError, ValidationError};
use hot_water::{map_telemetry, MetricsStore, TelemetryOutcome};

/// Device shadow update delivered to the webhook
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    pub state: ShadowState,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShadowState {
    /// Flat reported-state object with `device_id` and the metric fields
    pub reported: Map<String, Value>,
}

/// Response payload for the webhook
///
/// `test` is set when the report came from a device other than the accepted
/// one and was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<bool>,
}

/// Handle a device state update
///
/// Parses the body, maps the reported state to metric samples and writes
/// them in one batch. Reports from other devices succeed without a write.
pub async fn handle_update(
    event: Request,
    request_id: &str,
    config: &WebhookConfig,
    store: &dyn MetricsStore,
) -> Result<Response<Body>, ApiError> {
    let body_bytes = match event.body() {
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes.as_slice(),
        Body::Empty => {
            return Err(ValidationError::InvalidBody("Request body is empty".to_string()).into());
        }
    };

    let update: UpdateRequest = serde_json::from_slice(body_bytes)
        .map_err(|e| ValidationError::InvalidBody(format!("Failed to parse JSON: {}", e)))?;

    let response = match map_telemetry(&update.state.reported, config.accepted_device_id)? {
        TelemetryOutcome::Rejected { device_id } => {
            info!(
                request_id = %request_id,
                device_id = %device_id,
                "Discarding report from non-accepted device"
            );
            UpdateResponse {
                success: true,
                test: Some(true),
            }
        }
        TelemetryOutcome::Accepted { record, samples } => {
            store.put_samples(&config.namespace, &samples).await?;
            info!(
                request_id = %request_id,
                device_id = record.device_id,
                samples = samples.len(),
                liter_deficit = record.liter_deficit,
                "Telemetry ingested"
            );
            UpdateResponse {
                success: true,
                test: None,
            }
        }
    };

    let response_body = serde_json::to_string(&response)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize response: {}", e)))?;

    Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(Body::from(response_body))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
