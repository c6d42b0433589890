//! Voice-platform request/response envelope
//!
//! Serde model of the JSON the platform posts to the skill endpoint and the JSON
//! it expects back. Only the fields the skill reads are typed; the rest pass
//! through as `serde_json::Value` so envelopes can be logged intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const ENVELOPE_VERSION: &str = "1.0";

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequest {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub request: RequestBody,
    /// The envelope exactly as received, when decoded through [`SkillRequest::from_value`].
    #[serde(skip)]
    pub raw: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

/// Discriminated by the `type` field. Unknown types decode to `Unknown`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestBody {
    LaunchRequest(LaunchRequest),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
    #[serde(rename = "System.ExceptionEncountered")]
    SystemException(SystemExceptionRequest),
    #[serde(other)]
    Unknown,
}

impl RequestBody {
    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::LaunchRequest(_) => "LaunchRequest",
            RequestBody::IntentRequest(_) => "IntentRequest",
            RequestBody::SessionEndedRequest(_) => "SessionEndedRequest",
            RequestBody::SystemException(_) => "System.ExceptionEncountered",
            RequestBody::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_state: Option<String>,
    pub intent: Intent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<SkillError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemExceptionRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<SkillError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillError {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// Unparseable timestamps are dropped rather than failing the whole envelope.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc)))
}

fn lenient_error<'de, D>(deserializer: D) -> Result<Option<SkillError>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl SkillRequest {
    pub fn new(request: RequestBody) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            session: None,
            context: None,
            request,
            raw: None,
        }
    }

    /// Decode a received envelope. Never fails: anything that does not decode
    /// into a known request becomes `RequestBody::Unknown`, keeping the raw JSON.
    pub fn from_value(raw: Value) -> Self {
        match serde_json::from_value::<SkillRequest>(raw.clone()) {
            Ok(mut request) => {
                request.raw = Some(raw);
                request
            }
            Err(e) => {
                tracing::debug!(error = %e, "skill request did not decode, treating as unknown");
                let mut request = Self::new(RequestBody::Unknown);
                request.version = raw["version"].as_str().unwrap_or_default().to_string();
                request.raw = Some(raw);
                request
            }
        }
    }

    /// The `request.type` as sent, falling back to the decoded kind.
    pub fn type_name(&self) -> &str {
        self.raw
            .as_ref()
            .and_then(|raw| raw["request"]["type"].as_str())
            .unwrap_or_else(|| self.request.kind())
    }

    /// The envelope as received if available, otherwise re-serialized.
    pub fn to_log_json(&self) -> String {
        match &self.raw {
            Some(raw) => raw.to_string(),
            None => serde_json::to_string(self)
                .unwrap_or_else(|e| format!("<unserializable: {}>", e)),
        }
    }

    pub fn launch() -> Self {
        Self::new(RequestBody::LaunchRequest(LaunchRequest {
            request_id: new_request_id(),
            timestamp: Some(Utc::now()),
            locale: None,
        }))
    }

    pub fn intent(name: impl Into<String>) -> Self {
        Self::new(RequestBody::IntentRequest(IntentRequest {
            request_id: new_request_id(),
            timestamp: Some(Utc::now()),
            locale: None,
            dialog_state: None,
            intent: Intent {
                name: name.into(),
                confirmation_status: None,
                slots: None,
            },
        }))
    }

    pub fn session_ended(reason: impl Into<String>) -> Self {
        Self::new(RequestBody::SessionEndedRequest(SessionEndedRequest {
            request_id: new_request_id(),
            timestamp: Some(Utc::now()),
            locale: None,
            reason: Some(reason.into()),
            error: None,
        }))
    }

    pub fn with_session(mut self, session_id: impl Into<String>, new: bool) -> Self {
        self.session = Some(Session {
            new,
            session_id: session_id.into(),
            application: None,
            attributes: None,
            user: None,
        });
        self
    }
}

fn new_request_id() -> String {
    Utc::now()
        .format("catfacts.request.%Y%m%dT%H%M%S%.6f")
        .to_string()
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<Value>,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub ssml: String,
}

impl OutputSpeech {
    pub fn ssml(ssml: impl Into<String>) -> Self {
        Self {
            kind: "SSML".to_string(),
            ssml: ssml.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl SkillResponse {
    /// Speak, then keep the session open and reprompt on silence.
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self::build(
            Some(OutputSpeech::ssml(speech)),
            Some(Reprompt {
                output_speech: OutputSpeech::ssml(reprompt),
            }),
            false,
        )
    }

    /// Speak, then end the session.
    pub fn tell(speech: impl Into<String>) -> Self {
        Self::build(Some(OutputSpeech::ssml(speech)), None, true)
    }

    /// No speech at all.
    pub fn empty() -> Self {
        Self::build(None, None, true)
    }

    fn build(output_speech: Option<OutputSpeech>, reprompt: Option<Reprompt>, should_end_session: bool) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            session_attributes: None,
            response: ResponseBody {
                output_speech,
                reprompt,
                should_end_session,
            },
        }
    }

    pub fn speech(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(|s| s.ssml.as_str())
    }

    pub fn reprompt_speech(&self) -> Option<&str> {
        self.response
            .reprompt
            .as_ref()
            .map(|r| r.output_speech.ssml.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.response.output_speech.is_none() && self.response.reprompt.is_none()
    }
}
