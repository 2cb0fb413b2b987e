use hot_water::alexa::{SkillResponse, Speechlet};

pub const WELCOME_CARD_TITLE: &str = "Welcome";
pub const SESSION_END_CARD_TITLE: &str = "Session Ended";

const WELCOME_SPEECH: &str = "Welcome to your Hot Water Heater. ";
const WELCOME_REPROMPT: &str = "You can ask me how much water you've used recently, \
    how much water is left, or how long you can shower. ";
const GOODBYE_SPEECH: &str = "Thank you for talking to your Hot Water Heater. Have a nice day! ";

/// Response for launch and help; keeps the session open
pub fn welcome_response() -> SkillResponse {
    SkillResponse::new(Speechlet::new(
        WELCOME_CARD_TITLE,
        WELCOME_SPEECH,
        Some(WELCOME_REPROMPT.to_string()),
        false,
    ))
}

/// Response for cancel and stop; ends the session
pub fn session_end_response() -> SkillResponse {
    SkillResponse::new(Speechlet::new(
        SESSION_END_CARD_TITLE,
        GOODBYE_SPEECH,
        None,
        true,
    ))
}
