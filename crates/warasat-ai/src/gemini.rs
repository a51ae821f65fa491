//! HTTP client for the Gemini `generateContent` endpoint, and the advisor
//! built on top of it.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use warasat_core::{Inheritor, Property, ValuationSource};

use crate::advisor::{
    EMPTY_ADVICE, EstateAdvisor, Estimate, EstimateRequest, FAILED_ADVICE, FAILED_EXPLANATION,
    FALLBACK_RATE, MOCK_RATE, NO_KEY_ADVICE, NO_KEY_ANALYSIS, NO_KEY_EXPLANATION,
    UNAVAILABLE_ANALYSIS, UNDETERMINED_ANALYSIS,
};
use crate::prompts;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contained no text")]
    EmptyResponse,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Without a key the advisor never goes to the network.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ── Wire types ──

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    fn new(prompt: &str, json: bool) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: json.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        Some(text)
    }
}

// ── Client ──

/// Thin client for one Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// `endpoint` should be like `https://generativelanguage.googleapis.com/v1beta`
    /// (trailing slash optional).
    pub fn new(
        api_key: String,
        model: String,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Send one prompt and return the reply text. With `json` set the model
    /// is asked to answer with a JSON document.
    pub async fn generate(&self, prompt: &str, json: bool) -> Result<String, AdvisorError> {
        let url = self.url();
        info!(url = %url, json, "requesting generation");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateRequest::new(prompt, json))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        parsed.text().ok_or(AdvisorError::EmptyResponse)
    }
}

// ── Advisor ──

/// [`EstateAdvisor`] backed by Gemini, degrading to fixed fallbacks when no
/// key is configured or a call fails.
pub struct GeminiAdvisor {
    client: Option<GeminiClient>,
}

impl GeminiAdvisor {
    pub fn new(config: GeminiConfig) -> Result<Self, AdvisorError> {
        let client = match config.api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => Some(GeminiClient::new(
                key,
                config.model,
                &config.endpoint,
                config.timeout,
            )?),
            None => {
                warn!("no API key configured; advisory calls will use fallbacks");
                None
            }
        };
        Ok(Self { client })
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl EstateAdvisor for GeminiAdvisor {
    async fn estimate(&self, request: &EstimateRequest) -> Estimate {
        let Some(client) = &self.client else {
            return Estimate::fallback(MOCK_RATE, NO_KEY_ANALYSIS);
        };

        let prompt = prompts::valuation_prompt(
            request.area_sq_ft,
            &request.location,
            request.kind,
            request.description.as_deref(),
        );
        let reply = match client.generate(&prompt, true).await {
            Ok(text) => prompts::parse_valuation_reply(&text).map_err(AdvisorError::from),
            Err(e) => Err(e),
        };

        match reply {
            Ok(reply) => {
                let analysis = reply
                    .analysis
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| UNDETERMINED_ANALYSIS.to_string());
                match reply.rate_per_sq_ft.filter(|r| r.is_finite() && *r > 0.0) {
                    Some(rate) => Estimate {
                        rate_per_sq_ft: rate,
                        analysis,
                        source: ValuationSource::Estimated,
                    },
                    None => {
                        warn!("valuation reply carried no usable rate");
                        Estimate {
                            rate_per_sq_ft: FALLBACK_RATE,
                            analysis,
                            source: ValuationSource::Manual,
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "valuation request failed");
                Estimate::fallback(FALLBACK_RATE, UNAVAILABLE_ANALYSIS)
            }
        }
    }

    async fn advise(&self, property: &Property, inheritor: &Inheritor) -> String {
        let Some(client) = &self.client else {
            return NO_KEY_ADVICE.to_string();
        };

        match client
            .generate(&prompts::advice_prompt(property, inheritor), false)
            .await
        {
            Ok(text) if text.trim().is_empty() => EMPTY_ADVICE.to_string(),
            Ok(text) => text,
            Err(AdvisorError::EmptyResponse) => EMPTY_ADVICE.to_string(),
            Err(e) => {
                warn!(error = %e, property = %property.id, "advice request failed");
                FAILED_ADVICE.to_string()
            }
        }
    }

    async fn explain_distribution(&self, inheritors: &[Inheritor], total_value: f64) -> String {
        let Some(client) = &self.client else {
            return NO_KEY_EXPLANATION.to_string();
        };

        match client
            .generate(&prompts::distribution_prompt(inheritors, total_value), false)
            .await
        {
            Ok(text) => text,
            Err(AdvisorError::EmptyResponse) => String::new(),
            Err(e) => {
                warn!(error = %e, "explanation request failed");
                FAILED_EXPLANATION.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warasat_core::{Location, PropertyType, Relation};

    fn request() -> EstimateRequest {
        EstimateRequest {
            area_sq_ft: 2000.0,
            location: Location::FALLBACK,
            kind: PropertyType::Residential,
            description: None,
        }
    }

    fn unreachable_config() -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".into()),
            // Discard port: nothing listens, the connection is refused.
            endpoint: "http://127.0.0.1:9/v1beta".into(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    #[test]
    fn url_trims_trailing_slash() {
        let client = GeminiClient::new(
            "k".into(),
            DEFAULT_MODEL.into(),
            "https://example.test/v1beta/",
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn json_request_sets_mime_type() {
        let body = serde_json::to_value(GenerateRequest::new("hello", true)).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");

        let plain = serde_json::to_value(GenerateRequest::new("hello", false)).unwrap();
        assert!(plain.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": "Rent " }, { "text": "well." }], "role": "model" } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Rent well."));
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.text().is_none());
    }

    #[test]
    fn blank_key_means_unconfigured() {
        let advisor = GeminiAdvisor::new(GeminiConfig {
            api_key: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(!advisor.is_configured());
    }

    #[tokio::test]
    async fn missing_key_returns_mock_valuation() {
        let advisor = GeminiAdvisor::new(GeminiConfig::default()).unwrap();
        let estimate = advisor.estimate(&request()).await;
        assert_eq!(estimate.rate_per_sq_ft, MOCK_RATE);
        assert_eq!(estimate.analysis, NO_KEY_ANALYSIS);
        assert_eq!(estimate.source, ValuationSource::Manual);
    }

    #[tokio::test]
    async fn unreachable_service_falls_back() {
        let advisor = GeminiAdvisor::new(unreachable_config()).unwrap();
        assert!(advisor.is_configured());

        let estimate = advisor.estimate(&request()).await;
        assert_eq!(estimate.rate_per_sq_ft, FALLBACK_RATE);
        assert_eq!(estimate.analysis, UNAVAILABLE_ANALYSIS);
        assert_eq!(estimate.source, ValuationSource::Manual);

        let heirs = [Inheritor::new("h1", "Bilal", Relation::Son)];
        assert_eq!(
            advisor.explain_distribution(&heirs, 1_000_000.0).await,
            FAILED_EXPLANATION
        );
    }
}
