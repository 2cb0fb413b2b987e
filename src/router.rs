use tracing::{info, warn};

use hot_water::alexa::{RequestBody, SkillRequest, SkillResponse};
use hot_water::{Clock, MetricsStore};

use crate::config::SkillConfig;
use crate::error::SkillError;
use crate::handlers::remaining::{length_of_shower, water_remaining};
use crate::handlers::session::{session_end_response, welcome_response};
use crate::handlers::usage::water_volume_used;
use crate::handlers::{error_response, SkillIntent};

/// Route a voice request to the matching handler
///
/// Returns `Ok(None)` for a session-ended notification, which takes no
/// response body.
pub async fn route_request(
    request: &SkillRequest,
    config: &SkillConfig,
    store: &dyn MetricsStore,
    clock: &dyn Clock,
) -> Result<Option<SkillResponse>, SkillError> {
    let request_id = request.request.request_id();
    let session_id = request.session.session_id.as_str();

    if request.session.new {
        info!(
            request_id = %request_id,
            session_id = %session_id,
            application_id = %request.session.application.application_id,
            "Session started"
        );
    }

    match &request.request {
        RequestBody::LaunchRequest(_) => {
            info!(request_id = %request_id, session_id = %session_id, "Launch request");
            Ok(Some(welcome_response()))
        }

        RequestBody::IntentRequest(intent_request) => {
            let intent = &intent_request.intent;
            info!(
                request_id = %request_id,
                session_id = %session_id,
                intent = %intent.name,
                "Intent request"
            );

            let skill_intent: SkillIntent = intent.name.parse()?;
            let should_end_session = request.session.new;

            let result = match skill_intent {
                SkillIntent::WaterVolumeUsed => {
                    water_volume_used(intent, should_end_session, config, store, clock).await
                }
                SkillIntent::WaterRemaining => {
                    water_remaining(should_end_session, config, store, clock).await
                }
                SkillIntent::LengthOfShower => {
                    length_of_shower(should_end_session, config, store, clock).await
                }
                SkillIntent::Help => Ok(welcome_response()),
                SkillIntent::Cancel | SkillIntent::Stop => Ok(session_end_response()),
            };

            result
                .or_else(|e| {
                    warn!(
                        request_id = %request_id,
                        intent = %intent.name,
                        code = e.code(),
                        error = %e,
                        "Intent handler failed"
                    );
                    error_response(skill_intent, e, should_end_session)
                })
                .map(Some)
        }

        RequestBody::SessionEndedRequest(ended) => {
            info!(
                request_id = %request_id,
                session_id = %session_id,
                reason = ended.reason.as_deref().unwrap_or("unknown"),
                "Session ended"
            );
            Ok(None)
        }
    }
}
