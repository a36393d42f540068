//! OCR provider client.
//!
//! The recognizer is a capability trait so the pipeline can run against the
//! hosted Vision endpoint in production and a canned implementation in
//! tests. The provider contract: POST a base64 JPEG with a text-detection
//! feature, read `responses[0].fullTextAnnotation.text`. A response without
//! the annotation means the image had no text, not that the call failed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Turns an image into the full recognized text, lines separated by
/// newlines. An empty string is a valid result.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, jpeg: &[u8]) -> Result<String>;
}

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    full_text_annotation: Option<FullTextAnnotation>,
}

#[derive(Deserialize)]
struct FullTextAnnotation {
    #[serde(default)]
    text: String,
}

/// Hosted Vision API client. The reqwest client is built once and reused
/// across scans for connection pooling.
pub struct VisionOcrClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl VisionOcrClient {
    pub fn new(endpoint: String, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build OCR HTTP client")?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl TextRecognizer for VisionOcrClient {
    async fn recognize(&self, jpeg: &[u8]) -> Result<String> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(jpeg),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION".to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("OCR request failed")?
            .error_for_status()
            .context("OCR provider returned an error status")?;

        let raw = response
            .text()
            .await
            .context("failed to read OCR response body")?;
        parse_full_text(&raw)
    }
}

/// Extract the full text annotation from a provider response. Missing
/// annotation (or an empty response list) is zero text.
pub fn parse_full_text(raw: &str) -> Result<String> {
    let parsed: AnnotateResponse =
        serde_json::from_str(raw).context("malformed OCR response JSON")?;

    let text = parsed
        .responses
        .into_iter()
        .next()
        .and_then(|r| r.full_text_annotation)
        .map(|a| a.text)
        .unwrap_or_default();

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_full_text_annotation() {
        let raw = r#"{
            "responses": [
                { "fullTextAnnotation": { "text": "Name: Jane Smith\nID: 12345678" } }
            ]
        }"#;
        let text = parse_full_text(raw).unwrap();
        assert_eq!(text, "Name: Jane Smith\nID: 12345678");
    }

    #[test]
    fn missing_annotation_is_zero_text() {
        let raw = r#"{ "responses": [ {} ] }"#;
        assert_eq!(parse_full_text(raw).unwrap(), "");
    }

    #[test]
    fn empty_response_list_is_zero_text() {
        assert_eq!(parse_full_text(r#"{ "responses": [] }"#).unwrap(), "");
        assert_eq!(parse_full_text("{}").unwrap(), "");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_full_text("not json").is_err());
    }
}
