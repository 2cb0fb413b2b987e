//! Voice assistant request/response envelope
//!
//! Only the parts of the envelope the skill reads or writes are modeled;
//! unknown fields are ignored on the way in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const RESPONSE_VERSION: &str = "1.0";
pub const CARD_TITLE_PREFIX: &str = "Hot Water - ";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequest {
    pub session: Session,
    pub request: RequestBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub new: bool,
    pub session_id: String,
    pub application: Application,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum RequestBody {
    LaunchRequest(LaunchRequest),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
}

impl RequestBody {
    pub fn request_id(&self) -> &str {
        match self {
            RequestBody::LaunchRequest(r) => &r.request_id,
            RequestBody::IntentRequest(r) => &r.request_id,
            RequestBody::SessionEndedRequest(r) => &r.request_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::LaunchRequest(_) => "LaunchRequest",
            RequestBody::IntentRequest(_) => "IntentRequest",
            RequestBody::SessionEndedRequest(_) => "SessionEndedRequest",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub request_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub request_id: String,
    pub intent: Intent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    pub request_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Value of a slot, if the user filled it
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    pub version: String,
    pub session_attributes: Map<String, Value>,
    pub response: Speechlet,
}

impl SkillResponse {
    pub fn new(speechlet: Speechlet) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            session_attributes: Map::new(),
            response: speechlet,
        }
    }

    pub fn speech_text(&self) -> &str {
        &self.response.output_speech.text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speechlet {
    pub output_speech: OutputSpeech,
    pub card: Card,
    pub reprompt: Reprompt,
    pub should_end_session: bool,
}

impl Speechlet {
    /// Plain-text speech with a matching simple card
    pub fn new(
        title: &str,
        output: impl Into<String>,
        reprompt: Option<String>,
        should_end_session: bool,
    ) -> Self {
        let output = output.into();
        Self {
            card: Card {
                kind: "Simple".to_string(),
                title: format!("{}{}", CARD_TITLE_PREFIX, title),
                content: output.clone(),
            },
            output_speech: OutputSpeech::plain(output),
            reprompt: Reprompt {
                output_speech: OutputSpeechText {
                    kind: "PlainText".to_string(),
                    text: reprompt,
                },
            },
            should_end_session,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeechText,
}

/// Reprompt speech; the text is null when the session is closing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeechText {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}
