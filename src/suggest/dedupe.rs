//! Deduplication coordinator
//!
//! Second model pass that resolves semantic overlap between suggestions
//! (conflicting fixes on overlapping spans, one fix subsuming another)
//! which the purely syntactic first pass cannot see. The model is used as
//! a data-transformation function here: structured set in, same-shaped set
//! out. Any failure falls back to the pre-dedup set; deduplication is an
//! optimization, never a correctness requirement.

use super::client::{GenerateOptions, Transport};
use super::{prompts, SuggestionSet};
use log::{debug, warn};
use regex::Regex;

const DEDUPE_TEMPERATURE: f32 = 0.1;

/// Best-effort extraction of a JSON object from a model reply.
///
/// Strips control characters and backslash escapes that are not valid JSON
/// escapes, then slices from the first `{` to the last `}`. This defends
/// against the model wrapping the data in prose despite instructions.
pub fn extract_json_payload(raw: &str) -> Option<String> {
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}'))
        .collect();

    let invalid_escape = Regex::new(r#"\\[^"\\/bfnrtu]"#).unwrap();
    let cleaned = invalid_escape.replace_all(&stripped, "");

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if start > end {
        return None;
    }
    Some(cleaned[start..=end].to_string())
}

/// Drop entries the model's rewrite reintroduced in violation of the
/// invariants: empty replacements and no-op replacements.
fn scrub(mut set: SuggestionSet) -> SuggestionSet {
    for category in [
        &mut set.grammar,
        &mut set.style,
        &mut set.tone,
        &mut set.simple,
    ] {
        category.retain(|s| !s.replacement.is_empty() && s.replacement != s.text);
    }
    set
}

/// Run the deduplication pass over a validated set.
///
/// Returns the model's merged set on success, or `validated` unchanged on
/// any failure: a transport error, prose-wrapped junk, or a shape
/// mismatch. Callers cannot observe the difference beyond possibly seeing
/// redundant suggestions.
pub async fn deduplicate<T: Transport>(transport: &T, validated: SuggestionSet) -> SuggestionSet {
    if validated.is_empty() {
        debug!("skipping deduplication pass; nothing to merge");
        return validated;
    }

    let serialized = match serde_json::to_string_pretty(&validated) {
        Ok(json) => json,
        Err(err) => {
            warn!("could not serialize suggestions for deduplication: {}", err);
            return validated;
        }
    };

    let options = GenerateOptions::temperature(DEDUPE_TEMPERATURE)
        .with_stop(vec!["\n\n".to_string(), "```".to_string()]);
    let raw = match transport
        .generate(&prompts::dedupe_prompt(&serialized), options)
        .await
    {
        Ok(raw) => raw,
        Err(err) => {
            warn!("deduplication call failed ({}); keeping pre-dedup set", err);
            return validated;
        }
    };

    let payload = match extract_json_payload(&raw) {
        Some(payload) => payload,
        None => {
            warn!("no JSON object in deduplication reply; keeping pre-dedup set");
            return validated;
        }
    };

    match serde_json::from_str::<SuggestionSet>(&payload) {
        Ok(deduplicated) => scrub(deduplicated),
        Err(err) => {
            warn!(
                "deduplication reply did not decode ({}); keeping pre-dedup set",
                err
            );
            validated
        }
    }
}
