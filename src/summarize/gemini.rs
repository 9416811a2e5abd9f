//! Gemini `generateContent` client.

use super::TextGenerator;
use crate::common::{Error, Result};
use crate::config::GenerativeConfig;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// Blocking client for the Gemini REST API.
pub struct GeminiGenerator {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiGenerator {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Service(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Client configured from `config`, or `None` without an API key.
    pub fn from_config(config: &GenerativeConfig) -> Option<Self> {
        let api_key = std::env::var(&config.api_key_env).ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        Self::new(
            config.endpoint.trim_end_matches('/'),
            &config.model,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
        .ok()
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

/// First text part of the first candidate.
fn response_text(v: &Value) -> Result<String> {
    if let Some(error) = v.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        return Err(Error::Service(format!("Gemini API error: {}", message)));
    }
    v["candidates"][0]["content"]["parts"]
        .as_array()
        .and_then(|parts| parts.iter().find_map(|part| part["text"].as_str()))
        .map(|s| s.to_string())
        .ok_or_else(|| Error::Service("reply has no text".to_string()))
}

impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}]
        });
        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting outline");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| Error::Service(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::Service(format!("Failed to read response: {}", e)))?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            Error::Service(format!("HTTP {}: unparseable body: {}", status, e))
        })?;
        if !status.is_success() && value.get("error").is_none() {
            return Err(Error::Service(format!("HTTP {}: {}", status, body)));
        }
        response_text(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text() {
        let ok = json!({"candidates": [{"content": {"parts": [{"text": "{\"slides\": []}"}]}}]});
        assert_eq!(response_text(&ok).unwrap(), "{\"slides\": []}");

        let err = json!({"error": {"message": "quota exceeded"}});
        assert!(response_text(&err).unwrap_err().to_string().contains("quota exceeded"));

        assert!(response_text(&json!({"candidates": []})).is_err());
    }

    #[test]
    fn test_url() {
        let generator = GeminiGenerator::new(
            "https://example.invalid/v1beta",
            "gemini-2.5-flash",
            "key",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            generator.url(),
            "https://example.invalid/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
