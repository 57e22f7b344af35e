//! Request dispatch
//!
//! The closed set of operations a frontend can ask for, each with a typed
//! payload and a typed result, matched exhaustively. Dispatch is a
//! stateless function of (transport, request); preferences are read fresh
//! from settings when the caller does not supply them.

use crate::config::{Preferences, Settings};
use crate::error::Error;
use crate::suggest::client::{ConnectionStatus, Transport};
use crate::suggest::{engine, SuggestionSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideKind {
    Style,
    Tone,
}

impl GuideKind {
    pub fn label(&self) -> &'static str {
        match self {
            GuideKind::Style => "writing style",
            GuideKind::Tone => "tone",
        }
    }
}

/// Everything a frontend can request of the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    Analyze {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preferences: Option<Preferences>,
    },
    CheckConnection,
    GetSettings,
    SaveSettings {
        settings: Settings,
    },
    GenerateGuide {
        kind: GuideKind,
        name: String,
        description: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Suggestions(SuggestionSet),
    Connection(ConnectionStatus),
    Settings(Settings),
    Saved,
    Guide { guide: String },
}

/// Handle one request. Exhaustive over the request kinds; adding a variant
/// is a compile error until every frontend concern is covered.
pub async fn dispatch<T: Transport>(transport: &T, request: Request) -> Result<Response, Error> {
    match request {
        Request::Analyze { text, preferences } => {
            let preferences =
                preferences.unwrap_or_else(|| Settings::load().preferences());
            let suggestions = engine::analyze(transport, &text, &preferences).await?;
            Ok(Response::Suggestions(suggestions))
        }
        Request::CheckConnection => {
            let status = transport.check().await?;
            Ok(Response::Connection(status))
        }
        Request::GetSettings => Ok(Response::Settings(Settings::load())),
        Request::SaveSettings { settings } => {
            settings.save()?;
            Ok(Response::Saved)
        }
        Request::GenerateGuide {
            kind, description, ..
        } => {
            let guide = engine::generate_guide(transport, kind.label(), &description).await?;
            Ok(Response::Guide { guide })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::client::GenerateOptions;
    use std::sync::Mutex;

    struct Scripted {
        replies: Mutex<Vec<Result<String, Error>>>,
    }

    impl Transport for Scripted {
        async fn generate(
            &self,
            _prompt: &str,
            _options: GenerateOptions,
        ) -> Result<String, Error> {
            self.replies.lock().unwrap().remove(0)
        }

        async fn check(&self) -> Result<ConnectionStatus, Error> {
            Ok(ConnectionStatus {
                reachable: true,
                model_available: false,
                error: Some("Model \"llama3.2\" is not installed.".to_string()),
            })
        }
    }

    #[test]
    fn test_request_round_trips_through_json() {
        let request = Request::Analyze {
            text: "teh cat".to_string(),
            preferences: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["action"], "analyze");
        let back: Request = serde_json::from_value(json).unwrap();
        assert!(matches!(back, Request::Analyze { text, .. } if text == "teh cat"));
    }

    #[test]
    fn test_guide_kind_labels() {
        assert_eq!(GuideKind::Style.label(), "writing style");
        assert_eq!(GuideKind::Tone.label(), "tone");
    }

    #[tokio::test]
    async fn test_dispatch_check_connection() {
        let transport = Scripted {
            replies: Mutex::new(vec![]),
        };
        let response = dispatch(&transport, Request::CheckConnection).await.unwrap();
        match response {
            Response::Connection(status) => {
                assert!(status.reachable);
                assert!(!status.model_available);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_analyze_with_explicit_preferences() {
        let transport = Scripted {
            replies: Mutex::new(vec![Ok(
                "Grammar Issues\nOriginal: \"teh\"\nReplace with: \"the\"\nReason: typo"
                    .to_string(),
            ),
            Ok(r#"{"grammar":[{"text":"teh","suggestion":"the"}],"style":[],"tone":[]}"#
                .to_string())]),
        };
        let request = Request::Analyze {
            text: "teh cat".to_string(),
            preferences: Some(Preferences::default()),
        };
        let response = dispatch(&transport, request).await.unwrap();
        match response {
            Response::Suggestions(set) => assert_eq!(set.grammar.len(), 1),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_generate_guide() {
        let transport = Scripted {
            replies: Mutex::new(vec![Ok("- Keep it short".to_string())]),
        };
        let request = Request::GenerateGuide {
            kind: GuideKind::Tone,
            name: "brisk".to_string(),
            description: "short and direct".to_string(),
        };
        let response = dispatch(&transport, request).await.unwrap();
        match response {
            Response::Guide { guide } => assert_eq!(guide, "- Keep it short"),
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
