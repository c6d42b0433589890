use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One unit of speech output, rendered in order by [`crate::speech::render`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseSegment {
    Say { text: String },
    Delay { ms: u64 },
    PlayAudio { url: String },
    NotUnderstood,
    Help,
    Bye,
}

impl ResponseSegment {
    pub fn say(text: impl Into<String>) -> Self {
        ResponseSegment::Say { text: text.into() }
    }

    /// Sub-millisecond precision is truncated.
    pub fn delay(duration: Duration) -> Self {
        ResponseSegment::Delay {
            ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn play_audio(url: impl Into<String>) -> Self {
        ResponseSegment::PlayAudio { url: url.into() }
    }
}
