//! Analysis pipeline
//!
//! One stateless async function per operation, taking the transport and a
//! preferences snapshot as parameters. For a single request the stages run
//! strictly in sequence: prompt, generate, parse, validate, deduplicate.
//! The two generate calls are the only suspension points.

use super::client::{GenerateOptions, Transport};
use super::{dedupe, parser, prompts, validate, SuggestionSet};
use crate::config::Preferences;
use crate::error::Error;

const ANALYSIS_TEMPERATURE: f32 = 0.2;
const GUIDE_TEMPERATURE: f32 = 0.7;

/// Analyze `text` and return a validated, de-duplicated suggestion set.
///
/// Only transport failures propagate. A reply with no recognizable
/// structure resolves to an empty set, and a failed deduplication pass
/// resolves to the pre-dedup set; neither is an error.
pub async fn analyze<T: Transport>(
    transport: &T,
    text: &str,
    preferences: &Preferences,
) -> Result<SuggestionSet, Error> {
    let prompt = if preferences.simple_mode {
        prompts::simple_prompt(text, preferences)
    } else {
        prompts::analysis_prompt(text, preferences)
    };

    let raw = transport
        .generate(&prompt, GenerateOptions::temperature(ANALYSIS_TEMPERATURE))
        .await?;

    let parsed = if preferences.simple_mode {
        parser::parse_simple(&raw, text)
    } else {
        parser::parse_categorized(&raw)
    };

    let validated = validate::validate(parsed, text);
    Ok(dedupe::deduplicate(transport, validated).await)
}

/// Generate guideline bullets for a user-described style or tone.
pub async fn generate_guide<T: Transport>(
    transport: &T,
    kind_label: &str,
    description: &str,
) -> Result<String, Error> {
    let prompt = prompts::guide_prompt(kind_label, description);
    let raw = transport
        .generate(&prompt, GenerateOptions::temperature(GUIDE_TEMPERATURE))
        .await?;
    Ok(raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::client::ConnectionStatus;
    use std::sync::Mutex;

    struct Scripted {
        replies: Mutex<Vec<Result<String, Error>>>,
        prompts_seen: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, Error>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                prompts_seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for Scripted {
        async fn generate(
            &self,
            prompt: &str,
            _options: GenerateOptions,
        ) -> Result<String, Error> {
            self.prompts_seen.lock().unwrap().push(prompt.to_string());
            self.replies.lock().unwrap().remove(0)
        }

        async fn check(&self) -> Result<ConnectionStatus, Error> {
            Ok(ConnectionStatus {
                reachable: true,
                model_available: true,
                error: None,
            })
        }
    }

    const CATEGORIZED_REPLY: &str = "**Grammar Issues**\nOriginal: \"teh cat\"\nReplace with: \"the cat\"\nReason: spelling\n**Style Issues**\nOriginal: \"very big\"\nReplace with: \"enormous\"\nReason: stronger word choice";

    #[tokio::test]
    async fn test_analyze_full_pipeline() {
        let dedupe_reply = r#"{"grammar":[{"text":"teh cat","suggestion":"the cat","explanation":"spelling"}],"style":[{"text":"very big","suggestion":"enormous","explanation":"stronger word choice"}],"tone":[]}"#;
        let transport = Scripted::new(vec![
            Ok(CATEGORIZED_REPLY.to_string()),
            Ok(dedupe_reply.to_string()),
        ]);

        let source = "teh cat is very big";
        let set = analyze(&transport, source, &Preferences::default())
            .await
            .unwrap();

        assert_eq!(set.grammar.len(), 1);
        assert_eq!(set.style.len(), 1);
        // Substring invariant against the analyzed text.
        for (_, suggestion) in set.iter() {
            assert!(source.contains(&suggestion.text));
            assert_ne!(suggestion.text, suggestion.replacement);
        }
        // Two transport calls, strictly sequenced.
        assert_eq!(transport.prompts_seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_dedupe_garbage_returns_validated_set() {
        let transport = Scripted::new(vec![
            Ok(CATEGORIZED_REPLY.to_string()),
            Ok("definitely not json".to_string()),
        ]);

        let set = analyze(&transport, "teh cat is very big", &Preferences::default())
            .await
            .unwrap();
        assert_eq!(set.grammar.len(), 1);
        assert_eq!(set.style.len(), 1);
        assert_eq!(set.grammar[0].text, "teh cat");
    }

    #[tokio::test]
    async fn test_analyze_unstructured_reply_is_empty_success() {
        // First reply has no labels at all; the dedupe pass is skipped, so
        // only one scripted reply is needed.
        let transport = Scripted::new(vec![Ok("No issues found, looks great!".to_string())]);

        let set = analyze(&transport, "hello world", &Preferences::default())
            .await
            .unwrap();
        assert!(set.is_empty());
        assert!(set.grammar.is_empty() && set.style.is_empty() && set.tone.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_transport_failure_propagates() {
        let transport = Scripted::new(vec![Err(Error::transport("connection refused"))]);
        let result = analyze(&transport, "hello", &Preferences::default()).await;
        assert!(matches!(result, Err(Error::Transport { .. })));
    }

    #[tokio::test]
    async fn test_analyze_simple_mode() {
        let reply = "Improved Version: \"I believe it's fine.\"\nKey Changes:\n- Grammar: fixed contraction\nReason: polish";
        let dedupe_reply = r#"{"grammar":[],"style":[],"tone":[],"simple":[{"text":"i think its fine","suggestion":"I believe it's fine.","changes":["Grammar: fixed contraction"]}]}"#;
        let transport = Scripted::new(vec![Ok(reply.to_string()), Ok(dedupe_reply.to_string())]);

        let mut preferences = Preferences::default();
        preferences.simple_mode = true;
        let set = analyze(&transport, "i think its fine", &preferences)
            .await
            .unwrap();

        assert_eq!(set.simple.len(), 1);
        assert_eq!(set.simple[0].replacement, "I believe it's fine.");
        assert_eq!(set.simple[0].changes.len(), 1);
        let prompts_seen = transport.prompts_seen.lock().unwrap();
        assert!(prompts_seen[0].contains("ONE improved version"));
    }

    #[tokio::test]
    async fn test_generate_guide_trims_reply() {
        let transport =
            Scripted::new(vec![Ok("\n- Be bold\n- Be brief\n".to_string())]);
        let guide = generate_guide(&transport, "writing style", "bold and brief")
            .await
            .unwrap();
        assert_eq!(guide, "- Be bold\n- Be brief");
    }
}
