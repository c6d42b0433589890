//! GetFact response construction
//!
//! 1. Draw a fact id uniformly from `1..=fact_count`
//! 2. Half the time, pick an intro: one of five canned phrases or the numbered
//!    phrase, each with probability 1/6
//! 3. Look the fact up; a miss (or store error) becomes an apology sentence

use catfacts_core::{FactStore, ResponseSegment};
use rand::Rng;

use crate::context::SkillContext;

pub const FACT_INTROS: [&str; 5] = [
    "Here is your cat fact.",
    "Did you know?",
    "I thought this was interesting.",
    "Here's something cool.",
    "Here's a good one.",
];

pub const FACT_UNAVAILABLE: &str = "Sorry, could not retrieve a fact";

/// Random choices for one GetFact response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactDraw {
    pub id: i64,
    pub intro: Option<String>,
}

/// An empty store still draws id 1, which then misses.
pub fn draw_fact<R: Rng + ?Sized>(rng: &mut R, fact_count: i64) -> FactDraw {
    let id = rng.gen_range(1..=fact_count.max(1));

    let intro = if rng.gen_bool(0.5) {
        // One slot past the canned phrases selects the numbered intro.
        let index = rng.gen_range(0..=FACT_INTROS.len());
        Some(match FACT_INTROS.get(index) {
            Some(phrase) => phrase.to_string(),
            None => numbered_intro(id),
        })
    } else {
        None
    };

    FactDraw { id, intro }
}

pub fn numbered_intro(id: i64) -> String {
    format!("Here is cat fact number {}", id)
}

/// Build the segments for a fact request: optional intro, then the fact.
pub async fn get_fact_response(ctx: &SkillContext) -> Vec<ResponseSegment> {
    let draw = ctx.with_rng(|rng| draw_fact(rng, ctx.fact_count()));

    let mut responses = Vec::with_capacity(2);
    if let Some(intro) = draw.intro {
        responses.push(ResponseSegment::say(intro));
    }
    responses.push(ResponseSegment::say(fetch_fact(ctx.store(), draw.id).await));
    responses
}

async fn fetch_fact(store: &dyn FactStore, id: i64) -> String {
    match store.get(id).await {
        Ok(Some(fact)) => {
            tracing::info!(id, store = store.name(), "Fact returned from store: {}", fact);
            fact
        }
        Ok(None) => {
            tracing::warn!(id, store = store.name(), "No fact stored under id");
            FACT_UNAVAILABLE.to_string()
        }
        Err(e) => {
            tracing::error!(id, store = store.name(), error = %e, "Fact lookup failed");
            FACT_UNAVAILABLE.to_string()
        }
    }
}
