//! Suggestion validation
//!
//! A pure, idempotent filter over (SuggestionSet, analyzed text). Anything
//! the model hallucinated, refused, or hedged on is dropped here so the
//! applier only ever sees substitutions that were verifiably grounded in
//! the analyzed text.

use super::{Position, Suggestion, SuggestionSet};
use std::collections::HashSet;

/// True when the replacement is a refusal or no-op marker rather than text.
fn is_refusal(replacement: &str) -> bool {
    let lower = replacement.trim().to_lowercase();
    lower == "none" || lower.contains("no correction")
}

/// The rejection predicate. A suggestion is dropped when any clause holds.
fn rejected(suggestion: &Suggestion, source_text: &str) -> bool {
    suggestion.text.is_empty()
        || suggestion.replacement.is_empty()
        || is_refusal(&suggestion.replacement)
        || suggestion.replacement == suggestion.text
        // " or " signals the model offered alternatives instead of one
        // replacement. Known false-positive source; kept as-is.
        || suggestion.replacement.contains(" or ")
        || !source_text.contains(&suggestion.text)
}

fn validate_category(suggestions: Vec<Suggestion>, source_text: &str) -> Vec<Suggestion> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut accepted = Vec::new();

    for mut suggestion in suggestions {
        if rejected(&suggestion, source_text) {
            log::debug!(
                "rejected suggestion {:?} -> {:?}",
                suggestion.text,
                suggestion.replacement
            );
            continue;
        }

        let key = (suggestion.text.clone(), suggestion.replacement.clone());
        if !seen.insert(key) {
            continue;
        }

        if suggestion.position.is_none() {
            // First occurrence; repeated substrings keep this tie-break.
            if let Some(start) = source_text.find(&suggestion.text) {
                suggestion.position = Some(Position {
                    start,
                    end: start + suggestion.text.len(),
                });
            }
        }
        accepted.push(suggestion);
    }

    accepted
}

/// Filter a parsed set against the text that was analyzed.
///
/// Order within each category is preserved. Running this twice yields the
/// same result as running it once.
pub fn validate(set: SuggestionSet, source_text: &str) -> SuggestionSet {
    SuggestionSet {
        grammar: validate_category(set.grammar, source_text),
        style: validate_category(set.style, source_text),
        tone: validate_category(set.tone, source_text),
        simple: validate_category(set.simple, source_text),
    }
}
