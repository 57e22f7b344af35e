//! Ollama transport
//!
//! Wraps the `/api/generate` endpoint behind the `Transport` trait so the
//! pipeline stages stay testable without a running server. Retry policy
//! lives here, at the transport boundary, never in the parsing core.

use crate::error::Error;
use log::warn;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_ADDRESS: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Retry configuration for transient transport failures
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;
const BACKOFF_MULTIPLIER: u64 = 2;

/// Local generation can be slow, but not unboundedly so.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Sampling options forwarded to the inference server.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

impl GenerateOptions {
    pub fn temperature(temperature: f32) -> Self {
        Self {
            temperature,
            stop: None,
            num_predict: None,
        }
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

/// Result of probing the inference server.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub reachable: bool,
    pub model_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The pipeline's only seam to the outside world.
///
/// `generate` returns the model's raw generated text; no schema is imposed
/// on it here, only at the parsing stage.
pub trait Transport: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
        options: GenerateOptions,
    ) -> impl Future<Output = Result<String, Error>> + Send;

    fn check(&self) -> impl Future<Output = Result<ConnectionStatus, Error>> + Send;
}

/// HTTP client for a local Ollama server.
pub struct OllamaClient {
    http: reqwest::Client,
    address: String,
    model: String,
}

impl OllamaClient {
    pub fn new(address: impl Into<String>, model: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            address: address.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.address)
    }

    async fn send_once(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, Error> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options,
        };

        let response = self
            .http
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transport(format!("{} ({})", connect_hint(&self.address), e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status));
            if message.contains("model not found") {
                return Err(Error::transport(format!(
                    "Model {} not found. Please run: ollama pull {}",
                    self.model, self.model
                )));
            }
            return Err(Error::transport(message));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| Error::invalid_response(format!("failed to decode reply: {}", e)))?;

        match parsed.response {
            Some(content) => Ok(content),
            None => Err(Error::invalid_response(
                "reply carried no response text".to_string(),
            )),
        }
    }
}

fn connect_hint(address: &str) -> String {
    format!(
        "Cannot connect to Ollama. Please make sure Ollama is running ({})",
        address
    )
}

impl Transport for OllamaClient {
    /// Call the server, retrying transient failures with exponential backoff.
    async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String, Error> {
        let mut attempt = 0;
        loop {
            match self.send_once(prompt, &options).await {
                Ok(content) => return Ok(content),
                Err(err) => {
                    attempt += 1;
                    if attempt > MAX_RETRIES || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = RETRY_DELAY_MS * BACKOFF_MULTIPLIER.pow(attempt - 1);
                    warn!(
                        "transport attempt {}/{} failed ({}); retrying in {}ms",
                        attempt, MAX_RETRIES, err, delay
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    /// Probe the server and verify the configured model is installed.
    async fn check(&self) -> Result<ConnectionStatus, Error> {
        let url = format!("{}/api/tags", self.address);
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(_) => {
                return Ok(ConnectionStatus {
                    reachable: false,
                    model_available: false,
                    error: Some(connect_hint(&self.address)),
                });
            }
        };

        if !response.status().is_success() {
            return Ok(ConnectionStatus {
                reachable: false,
                model_available: false,
                error: Some("Could not connect to Ollama server".to_string()),
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| Error::invalid_response(format!("failed to decode tag list: {}", e)))?;

        let model_available = model_installed(&tags.models, &self.model);
        Ok(ConnectionStatus {
            reachable: true,
            model_available,
            error: if model_available {
                None
            } else {
                Some(format!(
                    "Model \"{}\" is not installed. Try running: ollama pull {}",
                    self.model, self.model
                ))
            },
        })
    }
}

/// A bare tag matches its `:latest` variant and vice versa.
fn model_installed(models: &[TagModel], wanted: &str) -> bool {
    models
        .iter()
        .any(|m| m.name == wanted || m.name == format!("{}:latest", wanted))
}

/// Connection failures and server-side errors are worth retrying;
/// malformed replies are not.
fn is_retryable(err: &Error) -> bool {
    matches!(err, Error::Transport { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_installed_matches_latest_suffix() {
        let models = vec![TagModel {
            name: "llama3.2:latest".to_string(),
        }];
        assert!(model_installed(&models, "llama3.2"));
        assert!(!model_installed(&models, "mistral"));
    }

    #[test]
    fn test_model_installed_exact_match() {
        let models = vec![TagModel {
            name: "mistral:7b".to_string(),
        }];
        assert!(model_installed(&models, "mistral:7b"));
        assert!(!model_installed(&models, "mistral"));
    }

    #[test]
    fn test_generate_options_serialization_skips_absent_fields() {
        let options = GenerateOptions::temperature(0.2);
        let json = serde_json::to_value(&options).unwrap();
        let temperature = json["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
        assert!(json.get("stop").is_none());
        assert!(json.get("num_predict").is_none());

        let options = GenerateOptions::temperature(0.1)
            .with_stop(vec!["\n\n".to_string(), "```".to_string()]);
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["stop"][1], "```");
    }

    #[test]
    fn test_invalid_response_is_not_retryable() {
        assert!(!is_retryable(&Error::invalid_response("no text")));
        assert!(is_retryable(&Error::transport("connection refused")));
    }
}
