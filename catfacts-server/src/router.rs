use catfacts_core::skill::{IntentRequest, RequestBody, SkillRequest, SkillResponse};
use catfacts_core::{speech, FactCommand, IntentCommand, ResponseSegment};

use crate::context::SkillContext;
use crate::subsystems::facts;

/// Segments to speak, plus a reprompt when the session should stay open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub responses: Vec<ResponseSegment>,
    pub reprompt: Option<Vec<ResponseSegment>>,
}

impl Dispatch {
    fn ask(responses: Vec<ResponseSegment>, reprompt: Vec<ResponseSegment>) -> Self {
        Self {
            responses,
            reprompt: Some(reprompt),
        }
    }

    fn tell(responses: Vec<ResponseSegment>) -> Self {
        Self {
            responses,
            reprompt: None,
        }
    }

    /// Ask when a reprompt is present, tell otherwise.
    pub fn into_response(self) -> SkillResponse {
        let speech = speech::render(&self.responses);
        match self.reprompt {
            Some(reprompt) => SkillResponse::ask(speech, speech::render(&reprompt)),
            None => SkillResponse::tell(speech),
        }
    }
}

/// Handle one skill request. Every branch yields a valid response envelope.
pub async fn handle_request(request: &SkillRequest, ctx: &SkillContext) -> SkillResponse {
    match dispatch(request, ctx).await {
        Some(dispatch) => dispatch.into_response(),
        None => SkillResponse::empty(),
    }
}

/// Map a request to the segments to speak. `None` means no speech at all.
pub async fn dispatch(request: &SkillRequest, ctx: &SkillContext) -> Option<Dispatch> {
    match &request.request {
        RequestBody::LaunchRequest(_) => {
            tracing::info!("launch");
            Some(Dispatch::ask(
                vec![ResponseSegment::say("Welcome to Cat Facts!")],
                vec![ResponseSegment::Help],
            ))
        }
        RequestBody::IntentRequest(intent) => Some(dispatch_intent(intent, ctx).await),
        RequestBody::SessionEndedRequest(ended) => {
            tracing::info!(reason = ?ended.reason, "session ended");
            None
        }
        RequestBody::SystemException(_) => {
            tracing::info!("system exception");
            tracing::error!(request = %request.to_log_json(), "skill request reported an exception");
            None
        }
        RequestBody::Unknown => {
            tracing::warn!(
                kind = request.type_name(),
                request = %request.to_log_json(),
                "unrecognized skill request"
            );
            None
        }
    }
}

async fn dispatch_intent(request: &IntentRequest, ctx: &SkillContext) -> Dispatch {
    let name = request.intent.name.as_str();
    match IntentCommand::parse(name) {
        IntentCommand::Fact(command) => {
            tracing::info!(intent = name, "fact request intent");
            let responses = match command {
                FactCommand::GetFact => facts::get_fact_response(ctx).await,
            };
            Dispatch::ask(responses, vec![ResponseSegment::Help])
        }
        IntentCommand::Help => {
            tracing::info!(intent = name, "built-in help intent");
            Dispatch::tell(vec![ResponseSegment::Help])
        }
        IntentCommand::Stop | IntentCommand::Cancel => {
            tracing::info!(intent = name, "built-in stop/cancel intent");
            Dispatch::tell(vec![ResponseSegment::Bye])
        }
        IntentCommand::Unrecognized(_) => {
            tracing::warn!(intent = name, "intent not recognized");
            Dispatch::ask(vec![ResponseSegment::Help], vec![ResponseSegment::NotUnderstood])
        }
    }
}
