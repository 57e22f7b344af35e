//! Response parsing state machines
//!
//! The first-pass model reply is free text by design; constraining this
//! class of model to one-shot JSON is unreliable. Parsing is therefore a
//! line-oriented state machine with case-insensitive labels and a
//! continuation rule that absorbs wrapped fields. Parsing never fails:
//! unrecognizable input yields an empty set.

use super::{Category, Suggestion, SuggestionSet};

/// Which field of the draft record is currently open for continuation lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenField {
    Text,
    Replacement,
    Explanation,
}

/// A partially-built suggestion record.
#[derive(Debug, Default)]
struct Draft {
    text: String,
    replacement: String,
    explanation: String,
    open: Option<OpenField>,
}

impl Draft {
    fn append(&mut self, line: &str) {
        let field = match self.open {
            Some(OpenField::Text) => &mut self.text,
            Some(OpenField::Replacement) => &mut self.replacement,
            Some(OpenField::Explanation) => &mut self.explanation,
            None => return,
        };
        if !field.is_empty() {
            field.push(' ');
        }
        field.push_str(line);
    }

    /// Finalize into a Suggestion, or None when either required field is
    /// missing after cleanup.
    fn complete(&self) -> Option<Suggestion> {
        let text = strip_wrapping(&self.text);
        let replacement = clean_replacement(&self.replacement);
        if text.is_empty() || replacement.is_empty() {
            return None;
        }
        Some(
            Suggestion::new(text, replacement)
                .with_explanation(self.explanation.trim().to_string()),
        )
    }
}

/// Remove wrapping quote and bracket artifacts the model tends to leave
/// around field values.
pub(crate) fn strip_wrapping(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '[' | ']'))
        .trim()
        .to_string()
}

/// Case-insensitive byte search; the needle must be ASCII.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Clean a `Replace with:` value: strip wrapping, then hedging verbs the
/// model slips in ("use X", "consider X", "try X") and trailing
/// "instead of ..." qualifiers.
pub(crate) fn clean_replacement(raw: &str) -> String {
    let mut value = strip_wrapping(raw);

    for prefix in ["use ", "consider ", "try "] {
        if value.len() > prefix.len()
            && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        {
            value = value[prefix.len()..].to_string();
            break;
        }
    }

    if let Some(idx) = find_ignore_ascii_case(&value, " instead of ") {
        value.truncate(idx);
    }

    strip_wrapping(&value)
}

/// Strip a label prefix from a line, case-insensitively. The label must be
/// ASCII; returns the trimmed remainder on a match.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let prefix = line.get(..label.len())?;
    if prefix.eq_ignore_ascii_case(label) {
        Some(line[label.len()..].trim())
    } else {
        None
    }
}

/// Category header: case-insensitive prefix match after markdown stripping.
fn category_header(line: &str) -> Option<Category> {
    let lower = line.to_lowercase();
    if lower.starts_with("grammar issues") {
        Some(Category::Grammar)
    } else if lower.starts_with("style issues") {
        Some(Category::Style)
    } else if lower.starts_with("tone issues") {
        Some(Category::Tone)
    } else {
        None
    }
}

/// The categorized-mode state machine.
///
/// States: awaiting a category header, then per-record field accumulation
/// driven by `Original:` / `Replace with:` / `Reason:` labels.
#[derive(Default)]
struct ResponseParser {
    set: SuggestionSet,
    category: Option<Category>,
    draft: Option<Draft>,
}

impl ResponseParser {
    /// Flush the in-flight draft into the set when complete; drop it
    /// otherwise. Incomplete records never cross a category boundary.
    fn flush(&mut self) {
        if let (Some(category), Some(draft)) = (self.category, self.draft.take()) {
            if let Some(suggestion) = draft.complete() {
                self.set.push(category, suggestion);
            } else {
                log::debug!("dropping incomplete record in {}", category.label());
            }
        }
        self.draft = None;
    }

    fn feed(&mut self, line: &str) {
        // Markdown emphasis markers are stripped before matching.
        let normalized = line.replace('*', "");
        let normalized = normalized.trim();
        if normalized.is_empty() {
            return;
        }

        if let Some(category) = category_header(normalized) {
            self.flush();
            self.category = Some(category);
            return;
        }

        // Lines before the first category header are ignored.
        if self.category.is_none() {
            return;
        }

        if let Some(rest) = strip_label(normalized, "original:") {
            self.flush();
            self.draft = Some(Draft {
                text: rest.to_string(),
                open: Some(OpenField::Text),
                ..Draft::default()
            });
        } else if let Some(rest) = strip_label(normalized, "replace with:") {
            if let Some(draft) = self.draft.as_mut() {
                draft.replacement = rest.to_string();
                draft.open = Some(OpenField::Replacement);
            }
        } else if let Some(rest) = strip_label(normalized, "reason:") {
            // Canonical end-of-record signal.
            if let Some(draft) = self.draft.as_mut() {
                draft.explanation = rest.to_string();
                draft.open = Some(OpenField::Explanation);
                self.flush();
            }
        } else if let Some(draft) = self.draft.as_mut() {
            // Continuation of whichever field is currently open.
            draft.append(normalized);
        }
    }

    fn finish(mut self) -> SuggestionSet {
        self.flush();
        self.set
    }
}

/// Parse a categorized-mode model reply. Never fails; unrecognizable input
/// produces an empty set with all categories present.
pub fn parse_categorized(response: &str) -> SuggestionSet {
    let mut parser = ResponseParser::default();
    for line in response.lines() {
        parser.feed(line);
    }
    let set = parser.finish();
    log::debug!(
        "parsed {} grammar / {} style / {} tone suggestions",
        set.grammar.len(),
        set.style.len(),
        set.tone.len()
    );
    set
}

/// Extract the value between the first pair of double quotes.
fn extract_quoted(value: &str) -> Option<&str> {
    let start = value.find('"')? + 1;
    let end = start + value[start..].find('"')?;
    Some(&value[start..end])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimpleSection {
    Preamble,
    Changes,
    Reason,
}

/// Parse a simple-mode reply into exactly one suggestion under `simple`.
///
/// `source_text` becomes the suggestion's target: the model is not trusted
/// to echo the analyzed text verbatim, so its echo is never re-parsed.
pub fn parse_simple(response: &str, source_text: &str) -> SuggestionSet {
    let mut improved = String::new();
    let mut changes: Vec<String> = Vec::new();
    let mut explanation = String::new();
    let mut section = SimpleSection::Preamble;

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = strip_label(line, "improved version:") {
            improved = extract_quoted(rest).unwrap_or_default().to_string();
            section = SimpleSection::Preamble;
        } else if strip_label(line, "key changes:").is_some() {
            section = SimpleSection::Changes;
        } else if let Some(rest) = strip_label(line, "reason:") {
            explanation = rest.to_string();
            section = SimpleSection::Reason;
        } else if section == SimpleSection::Changes && line.starts_with('-') {
            let change = line[1..].trim();
            if change.starts_with("Grammar:")
                || change.starts_with("Style:")
                || change.starts_with("Tone:")
            {
                changes.push(change.to_string());
            }
        } else if section == SimpleSection::Reason {
            if !explanation.is_empty() {
                explanation.push(' ');
            }
            explanation.push_str(line);
        }
    }

    let mut set = SuggestionSet::new();
    if !improved.is_empty() {
        set.push(
            Category::Simple,
            Suggestion::new(source_text, improved)
                .with_explanation(explanation)
                .with_changes(changes),
        );
    }
    set
}
