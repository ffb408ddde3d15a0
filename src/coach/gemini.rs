//! Client for the hosted generative-language API.

use crate::coach::AdviceBackend;
use crate::config::CoachConfig;
use crate::error::CoachError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// generateContent request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// generateContent response body.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// The coach's connection to the generative-language API.
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    timeout_seconds: u64,
}

impl GeminiClient {
    /// Create a client. Fails with [`CoachError::MissingApiKey`] when no
    /// usable key is given.
    pub fn new(api_key: Option<String>, config: &CoachConfig) -> Result<Self, CoachError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(CoachError::MissingApiKey)?;

        info!("Initializing coach with model {}", config.model);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Endpoint URL without the key.
    fn endpoint(&self) -> String {
        let model = self.model.strip_prefix("models/").unwrap_or(&self.model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn request_body(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }
}

impl AdviceBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, CoachError> {
        let url = self.endpoint();
        debug!("Sending prompt of {} chars to {}", prompt.len(), url);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoachError::Timeout(self.timeout_seconds)
                } else if e.is_connect() {
                    CoachError::Connect(self.base_url.clone())
                } else {
                    CoachError::Http(e.without_url())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CoachError::Api { status, body });
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| e.without_url())?;
        body.into_text().ok_or(CoachError::EmptyResponse)
    }
}
