//! Suggestion application
//!
//! Applies one suggestion to the live, possibly-since-edited content of a
//! target field. Literal substring search is the only authority: position
//! hints were computed against text that may no longer exist, so they are
//! never consulted here.

use super::Suggestion;

/// Outcome of applying a suggestion to current field content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The span was found and replaced; `new_text` is the full new content.
    Applied { new_text: String },
    /// The target span no longer exists in the field. The caller should
    /// treat this as a silent no-op or trigger a fresh analysis.
    Stale,
}

impl ApplyOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, ApplyOutcome::Stale)
    }
}

/// Strip wrapping quote artifacts left by the model or the parser.
fn strip_quotes(value: &str) -> &str {
    value.trim_matches(|c| matches!(c, '"' | '\''))
}

/// Apply `suggestion` to `current_text`.
///
/// Replaces the first occurrence only: the suggestion was generated as a
/// direct 1:1 replacement, so one apply action corrects one instance.
pub fn apply(current_text: &str, suggestion: &Suggestion) -> ApplyOutcome {
    let needle = strip_quotes(&suggestion.text);
    let replacement = strip_quotes(&suggestion.replacement);

    if needle.is_empty() || !current_text.contains(needle) {
        return ApplyOutcome::Stale;
    }

    ApplyOutcome::Applied {
        new_text: current_text.replacen(needle, replacement, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::{Position, Suggestion};

    #[test]
    fn test_applies_first_occurrence_only() {
        let suggestion = Suggestion::new("cat", "dog");
        let outcome = apply("cat cat", &suggestion);
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                new_text: "dog cat".to_string()
            }
        );
    }

    #[test]
    fn test_stale_when_text_changed() {
        let suggestion = Suggestion::new("teh cat", "the cat");
        let outcome = apply("the dog is very big", &suggestion);
        assert!(outcome.is_stale());
    }

    #[test]
    fn test_quote_artifacts_stripped_before_matching() {
        let suggestion = Suggestion::new("\"teh cat\"", "'the cat'");
        let outcome = apply("teh cat is very big", &suggestion);
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                new_text: "the cat is very big".to_string()
            }
        );
    }

    #[test]
    fn test_position_hint_is_ignored() {
        // A hint pointing at a second occurrence must not move the edit.
        let mut suggestion = Suggestion::new("cat", "dog");
        suggestion.position = Some(Position { start: 4, end: 7 });
        let outcome = apply("cat cat", &suggestion);
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                new_text: "dog cat".to_string()
            }
        );
    }

    #[test]
    fn test_empty_needle_is_stale() {
        let suggestion = Suggestion::new("\"\"", "something");
        assert!(apply("any content", &suggestion).is_stale());
    }

    #[test]
    fn test_replacement_may_contain_needle() {
        let suggestion = Suggestion::new("big", "very big");
        let outcome = apply("a big cat", &suggestion);
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                new_text: "a very big cat".to_string()
            }
        );
    }
}
