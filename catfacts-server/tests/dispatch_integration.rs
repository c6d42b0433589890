//! Dispatch tests for every request kind
//!
//! Run against an in-memory fact store; no database required.

use std::io;
use std::sync::{Arc, Mutex};

use catfacts_core::skill::{RequestBody, SkillRequest, SystemExceptionRequest, SkillError};
use catfacts_core::{speech, FactStore, MemoryFactStore, ResponseSegment};
use catfacts_server::router::{dispatch, handle_request, Dispatch};
use catfacts_server::subsystems::facts::{FACT_INTROS, FACT_UNAVAILABLE};
use catfacts_server::SkillContext;

const ONLY_FACT: &str = "A cat's nose print is unique, like a human fingerprint.";

fn single_fact_context() -> SkillContext {
    let store: Arc<dyn FactStore> = Arc::new(MemoryFactStore::new([ONLY_FACT]));
    SkillContext::with_count(store, 1, Some(11))
}

fn help_only() -> Vec<ResponseSegment> {
    vec![ResponseSegment::Help]
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

// ===========================================================================
// Launch → welcome, reprompt with help
// ===========================================================================
#[tokio::test]
async fn test_launch_dispatch() {
    let ctx = single_fact_context();
    let result = dispatch(&SkillRequest::launch(), &ctx).await;
    assert_eq!(
        result,
        Some(Dispatch {
            responses: vec![ResponseSegment::say("Welcome to Cat Facts!")],
            reprompt: Some(help_only()),
        })
    );
}

// ===========================================================================
// GetFact in any case → fact (with optional intro), reprompt with help
// ===========================================================================
#[tokio::test]
async fn test_get_fact_any_case() {
    let ctx = single_fact_context();
    for name in ["GetFact", "getfact", "GETFACT"] {
        let result = dispatch(&SkillRequest::intent(name), &ctx).await.unwrap();
        assert_eq!(result.reprompt, Some(help_only()), "intent {}", name);
        assert_eq!(result.responses.last(), Some(&ResponseSegment::say(ONLY_FACT)));
        assert!(result.responses.len() <= 2);
    }
}

#[tokio::test]
async fn test_get_fact_intro_is_known_phrase() {
    let ctx = single_fact_context();
    for _ in 0..100 {
        let result = dispatch(&SkillRequest::intent("GetFact"), &ctx).await.unwrap();
        if let [ResponseSegment::Say { text }, _] = result.responses.as_slice() {
            assert!(
                FACT_INTROS.contains(&text.as_str()) || text == "Here is cat fact number 1",
                "unexpected intro {:?}",
                text
            );
        }
    }
}

// ===========================================================================
// Built-ins: help → tell help; stop/cancel → tell bye
// ===========================================================================
#[tokio::test]
async fn test_builtin_help() {
    let ctx = single_fact_context();
    let result = dispatch(&SkillRequest::intent("AMAZON.HelpIntent"), &ctx).await;
    assert_eq!(
        result,
        Some(Dispatch {
            responses: help_only(),
            reprompt: None
        })
    );
}

#[tokio::test]
async fn test_builtin_stop_and_cancel() {
    let ctx = single_fact_context();
    for name in ["AMAZON.StopIntent", "AMAZON.CancelIntent"] {
        let result = dispatch(&SkillRequest::intent(name), &ctx).await;
        assert_eq!(
            result,
            Some(Dispatch {
                responses: vec![ResponseSegment::Bye],
                reprompt: None
            }),
            "intent {}",
            name
        );
    }
}

// ===========================================================================
// Unrecognized intent → help, reprompt with not-understood
// ===========================================================================
#[tokio::test]
async fn test_unrecognized_intent() {
    let ctx = single_fact_context();
    for name in ["Foo", "amazon.helpintent", "GetFacts", ""] {
        let result = dispatch(&SkillRequest::intent(name), &ctx).await;
        assert_eq!(
            result,
            Some(Dispatch {
                responses: help_only(),
                reprompt: Some(vec![ResponseSegment::NotUnderstood]),
            }),
            "intent {:?}",
            name
        );
    }
}

// ===========================================================================
// Session end, system exception, unknown shape → no speech
// ===========================================================================
#[tokio::test]
async fn test_silent_requests_yield_empty_response() {
    let ctx = single_fact_context();

    let exception = SkillRequest::new(RequestBody::SystemException(SystemExceptionRequest {
        request_id: "amzn1.echo-api.request.9".to_string(),
        timestamp: None,
        locale: None,
        error: Some(SkillError {
            kind: "INVALID_RESPONSE".to_string(),
            message: "An exception occurred while dispatching the request to the skill.".to_string(),
        }),
        cause: Some(serde_json::json!({ "requestId": "amzn1.echo-api.request.8" })),
    }));

    for request in [
        SkillRequest::session_ended("USER_INITIATED"),
        SkillRequest::session_ended("ERROR"),
        exception,
        SkillRequest::new(RequestBody::Unknown),
    ] {
        assert_eq!(dispatch(&request, &ctx).await, None);
        let resp = handle_request(&request, &ctx).await;
        assert!(resp.is_empty());
        assert!(resp.response.should_end_session);
    }
}

// ===========================================================================
// Unknown request types are logged with their original payload
// ===========================================================================
#[tokio::test]
async fn test_unknown_request_logs_received_payload() {
    let ctx = single_fact_context();
    let request = SkillRequest::from_value(serde_json::json!({
        "version": "1.0",
        "request": {
            "type": "AudioPlayer.PlaybackStarted",
            "requestId": "r-42",
            "token": "purr-track",
            "offsetInMilliseconds": 0
        }
    }));

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let resp = {
        let _guard = tracing::subscriber::set_default(subscriber);
        handle_request(&request, &ctx).await
    };

    assert!(resp.is_empty());
    let logs = logs.contents();
    assert!(logs.contains("WARN"), "logs: {}", logs);
    assert!(logs.contains("AudioPlayer.PlaybackStarted"), "logs: {}", logs);
    assert!(logs.contains("r-42"), "logs: {}", logs);
    assert!(logs.contains("purr-track"), "logs: {}", logs);
}

// ===========================================================================
// Store miss → apology sentence, still an ask
// ===========================================================================
#[tokio::test]
async fn test_get_fact_store_miss() {
    let store: Arc<dyn FactStore> = Arc::new(MemoryFactStore::default());
    let ctx = SkillContext::with_count(store, 3, Some(5));

    let resp = handle_request(&SkillRequest::intent("GetFact"), &ctx).await;
    let speech = resp.speech().unwrap();
    assert!(speech.ends_with(&format!("<p>{}</p></speak>", FACT_UNAVAILABLE)));
    assert_eq!(resp.reprompt_speech(), Some(speech::render(&help_only()).as_str()));
    assert!(!resp.response.should_end_session);
}

// ===========================================================================
// End-to-end envelopes
// ===========================================================================
#[tokio::test]
async fn test_launch_end_to_end() {
    let ctx = single_fact_context();
    let resp = handle_request(&SkillRequest::launch().with_session("s-1", true), &ctx).await;
    assert_eq!(resp.speech(), Some("<speak><p>Welcome to Cat Facts!</p></speak>"));
    assert_eq!(
        resp.reprompt_speech(),
        Some("<speak><p>To hear a new fact, say give me a cat fact.</p></speak>")
    );
    assert!(!resp.response.should_end_session);
}

#[tokio::test]
async fn test_stop_end_to_end() {
    let ctx = single_fact_context();
    let resp = handle_request(&SkillRequest::intent("AMAZON.StopIntent"), &ctx).await;
    assert_eq!(resp.speech(), Some("<speak><p>Good bye.</p></speak>"));
    assert!(resp.reprompt_speech().is_none());
    assert!(resp.response.should_end_session);
}

#[tokio::test]
async fn test_unrecognized_end_to_end() {
    let ctx = single_fact_context();
    let resp = handle_request(&SkillRequest::intent("Foo"), &ctx).await;
    assert_eq!(
        resp.speech(),
        Some("<speak><p>To hear a new fact, say give me a cat fact.</p></speak>")
    );
    assert_eq!(
        resp.reprompt_speech(),
        Some("<speak><p>Sorry, I don't know what that means.</p></speak>")
    );
    assert!(!resp.response.should_end_session);
}
