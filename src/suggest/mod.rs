//! Suggestion engine for WriteWell
//!
//! Turns free-form model output into structured, validated, de-duplicated
//! text edits. Suggestions are generated on demand via `engine::analyze()`
//! and applied against live field text via `apply::apply()`.

pub mod apply;
pub mod client;
pub mod dedupe;
pub mod engine;
pub mod parser;
pub mod prompts;
pub mod validate;

pub use apply::{apply, ApplyOutcome};
pub use client::{ConnectionStatus, GenerateOptions, OllamaClient, Transport};
pub use engine::{analyze, generate_guide};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category a suggestion belongs to.
///
/// `Simple` is the implicit single category of simple mode, where the model
/// produces one holistic rewrite instead of itemized corrections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Grammar,
    Style,
    Tone,
    Simple,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Grammar => "grammar",
            Category::Style => "style",
            Category::Tone => "tone",
            Category::Simple => "simple",
        }
    }
}

/// Byte offsets of a suggestion's target span in the analyzed text.
///
/// Computed at validation time against the text that was analyzed. Offsets
/// are a display hint only; once the field's text has changed they are
/// unsafe, and apply-time matching never consults them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// A single correction: replace `text` with `replacement`.
///
/// Wire field names (`text`, `suggestion`, `explanation`) match the JSON
/// structure exchanged with the model during the deduplication pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Local identity for UI correlation; never sent to the model.
    #[serde(skip, default = "new_id")]
    pub id: Uuid,
    /// Exact substring of the analyzed source this suggestion targets.
    pub text: String,
    /// Exact text to substitute.
    #[serde(rename = "suggestion")]
    pub replacement: String,
    /// Human-readable rationale. Advisory only, never used for matching.
    #[serde(default)]
    pub explanation: String,
    /// Labeled change bullets (`Grammar: ...`); simple mode only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            replacement: replacement.into(),
            explanation: String::new(),
            changes: Vec::new(),
            position: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_changes(mut self, changes: Vec<String>) -> Self {
        self.changes = changes;
        self
    }
}

/// Suggestions grouped by category, in the order the model produced them.
///
/// The three advanced-mode categories always serialize, empty or not, so the
/// dedup pass round-trips the exact shape the model was shown. `simple` only
/// appears on the wire in simple mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionSet {
    #[serde(default)]
    pub grammar: Vec<Suggestion>,
    #[serde(default)]
    pub style: Vec<Suggestion>,
    #[serde(default)]
    pub tone: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub simple: Vec<Suggestion>,
}

impl SuggestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self, category: Category) -> &Vec<Suggestion> {
        match category {
            Category::Grammar => &self.grammar,
            Category::Style => &self.style,
            Category::Tone => &self.tone,
            Category::Simple => &self.simple,
        }
    }

    pub fn category_mut(&mut self, category: Category) -> &mut Vec<Suggestion> {
        match category {
            Category::Grammar => &mut self.grammar,
            Category::Style => &mut self.style,
            Category::Tone => &mut self.tone,
            Category::Simple => &mut self.simple,
        }
    }

    pub fn push(&mut self, category: Category, suggestion: Suggestion) {
        self.category_mut(category).push(suggestion);
    }

    pub fn len(&self) -> usize {
        self.grammar.len() + self.style.len() + self.tone.len() + self.simple.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all suggestions with their category, in set order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Suggestion)> {
        self.grammar
            .iter()
            .map(|s| (Category::Grammar, s))
            .chain(self.style.iter().map(|s| (Category::Style, s)))
            .chain(self.tone.iter().map(|s| (Category::Tone, s)))
            .chain(self.simple.iter().map(|s| (Category::Simple, s)))
    }
}
