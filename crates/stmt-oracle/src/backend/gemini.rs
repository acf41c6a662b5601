//! Google Gemini backend using the `generateContent` REST endpoint.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::OracleError;
use crate::outcome::parse_reply;
use crate::prompt::{page_prompt, response_schema};
use crate::{ExtractionOracle, ExtractionOutcome, PageSubmission, Result};

/// Default model, a fast and inexpensive choice for statement pages.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Default REST endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Backend calling Gemini once per page.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    timeout: Duration,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiBackend {
    /// Create a backend with default model, endpoint and a 120s timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OracleError::Config("empty API key".to_string()));
        }

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| OracleError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(120),
            http_client,
        })
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the REST endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Model in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(&self, page: &PageSubmission<'_>) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: page_prompt(page.number, page.page_count),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: page.mime_type.to_string(),
                            data: STANDARD.encode(page.data),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
                temperature: self.temperature,
            },
        }
    }

    async fn generate(&self, page: &PageSubmission<'_>) -> Result<String> {
        let request = self.request_body(page);

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        trace!("Gemini response body: {}", body);
        reply_text(&body)
    }

    fn transport_error(&self, err: reqwest::Error) -> OracleError {
        if err.is_timeout() {
            OracleError::Timeout(self.timeout.as_secs())
        } else {
            OracleError::Transport(err.to_string())
        }
    }
}

/// Pull the generated text out of a `generateContent` response body.
fn reply_text(body: &str) -> Result<String> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| OracleError::Decode(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(OracleError::EmptyResponse);
    }

    Ok(text)
}

impl ExtractionOracle for GeminiBackend {
    async fn extract(&self, page: &PageSubmission<'_>) -> ExtractionOutcome {
        debug!(
            "Submitting page {}/{} ({} bytes) to {}",
            page.number,
            page.page_count,
            page.data.len(),
            self.model
        );

        match self.generate(page).await {
            Ok(text) => parse_reply(&text),
            Err(e) => ExtractionOutcome::OracleFailure(e),
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
