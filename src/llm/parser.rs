//! Parse classifier responses into per-ability scores
//!
//! The model's output is untrusted free text that may wrap JSON in prose,
//! drop fields or use strings for numbers. Parsing never fails: anything
//! unusable degrades to an empty `ScoreMap`, which callers read as
//! "no signal".

use crate::abilities::{AbilityKind, ScoreMap};
use serde_json::{Map, Value};

/// A score must exceed this for an ability to count as clearly relevant
pub const RELEVANCE_CUTOFF: f64 = 2.0;

/// Score credited to the catch-all when no ability is clearly relevant
pub const FALLBACK_SCORE: f64 = 1.0;

/// Parse a raw classifier response into a score per ability
///
/// Every field is optional and defaults to 0.0. When none of the nine
/// regular abilities scores above `RELEVANCE_CUTOFF`, the catch-all gets
/// `FALLBACK_SCORE` regardless of what the response said for it.
pub fn parse_scores(response: &str) -> ScoreMap {
    let Some(json_str) = extract_json(response) else {
        tracing::warn!("Classifier response has no JSON object");
        return ScoreMap::new();
    };
    tracing::debug!("Extracted JSON: {}", json_str);

    let object = match serde_json::from_str::<Value>(json_str) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            tracing::warn!("Classifier JSON is not an object: {}", other);
            return ScoreMap::new();
        }
        Err(e) => {
            tracing::warn!("Failed to parse classifier JSON: {}", e);
            return ScoreMap::new();
        }
    };

    score_object(&object)
}

fn score_object(object: &Map<String, Value>) -> ScoreMap {
    let mut scores = ScoreMap::new();
    let mut recognized = 0usize;
    let mut has_high_score = false;

    for kind in AbilityKind::scored() {
        let parsed = read_score(object, kind);
        if parsed.is_some() {
            recognized += 1;
        }
        let score = parsed.unwrap_or(0.0);
        if score > RELEVANCE_CUTOFF {
            has_high_score = true;
        }
        scores.insert(kind, score);
    }

    let catch_all = read_score(object, AbilityKind::Unknown);
    if catch_all.is_some() {
        recognized += 1;
    }

    if recognized == 0 {
        tracing::warn!("Classifier JSON contains none of the ability keys");
        return ScoreMap::new();
    }

    if has_high_score {
        scores.insert(AbilityKind::Unknown, catch_all.unwrap_or(0.0));
    } else {
        tracing::debug!("No clearly relevant ability, crediting the catch-all");
        scores.insert(AbilityKind::Unknown, FALLBACK_SCORE);
    }

    tracing::debug!(?scores, "Parsed ability scores");
    scores
}

/// Numeric field, accepting numbers and numeric strings
fn read_score(object: &Map<String, Value>, kind: AbilityKind) -> Option<f64> {
    match object.get(kind.label())? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}
