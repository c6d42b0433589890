//! SSML rendering of response segments
//!
//! Each segment becomes one child of a `<speak>` root, in input order. Output is
//! compact (no indentation), and an empty sequence renders as `<speak />`.
//!
//! `render` takes typed segments and matches exhaustively. `render_values` takes
//! segments as raw JSON and falls back to the apology paragraph for `null` or
//! undecodable entries, logging each one.

use serde_json::Value;

use crate::models::ResponseSegment;

pub const NOT_UNDERSTOOD_TEXT: &str = "Sorry, I don't know what that means.";
pub const HELP_TEXT: &str = "To hear a new fact, say give me a cat fact.";
pub const BYE_TEXT: &str = "Good bye.";

/// Render typed segments into an SSML document.
pub fn render(segments: &[ResponseSegment]) -> String {
    let mut doc = SsmlDocument::new();
    for segment in segments {
        doc.push_segment(segment);
    }
    doc.finish()
}

/// Render segments decoded from JSON. Never fails.
pub fn render_values(values: &[Value]) -> String {
    let mut doc = SsmlDocument::new();
    for value in values {
        if value.is_null() {
            tracing::error!("null response segment");
            doc.paragraph(NOT_UNDERSTOOD_TEXT);
            continue;
        }
        match serde_json::from_value::<ResponseSegment>(value.clone()) {
            Ok(segment) => doc.push_segment(&segment),
            Err(e) => {
                let kind = value
                    .get("kind")
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| "<missing>".to_string());
                tracing::error!(kind = %kind, error = %e, "unknown response segment");
                doc.paragraph(NOT_UNDERSTOOD_TEXT);
            }
        }
    }
    doc.finish()
}

// ============================================================================
// Compact SSML writer
// ============================================================================

#[derive(Debug, Default)]
struct SsmlDocument {
    body: String,
}

impl SsmlDocument {
    fn new() -> Self {
        Self::default()
    }

    fn push_segment(&mut self, segment: &ResponseSegment) {
        match segment {
            ResponseSegment::Say { text } => self.paragraph(text),
            ResponseSegment::Delay { ms } => self.pause(*ms),
            ResponseSegment::PlayAudio { url } => self.audio(url),
            ResponseSegment::NotUnderstood => self.paragraph(NOT_UNDERSTOOD_TEXT),
            ResponseSegment::Help => self.paragraph(HELP_TEXT),
            ResponseSegment::Bye => self.paragraph(BYE_TEXT),
        }
    }

    fn paragraph(&mut self, text: &str) {
        self.body.push_str("<p>");
        escape_into(&mut self.body, text, false);
        self.body.push_str("</p>");
    }

    fn pause(&mut self, ms: u64) {
        self.body.push_str(&format!("<break time=\"{}ms\" />", ms));
    }

    fn audio(&mut self, url: &str) {
        self.body.push_str("<audio src=\"");
        escape_into(&mut self.body, url, true);
        self.body.push_str("\" />");
    }

    fn finish(self) -> String {
        if self.body.is_empty() {
            "<speak />".to_string()
        } else {
            format!("<speak>{}</speak>", self.body)
        }
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
