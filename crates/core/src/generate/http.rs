use crate::config::Settings;
use crate::error::GatewayError;
use crate::generate::error::GenerationDiagnostics;
use crate::generate::{GenerateRequest, GeneratedBatch, GenerationClient};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use std::time::Duration;

// Generation is a long-running call; the timeout is deliberately generous.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    http: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

#[derive(Debug, Serialize)]
struct GenerateBody {
    request_id: uuid::Uuid,
    company_id: i64,
    organization_id: i64,
    year: i32,
    quarter: u8,
}

impl HttpGenerationClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_generation_base_url()?.to_string();
        let api_key = settings.require_generation_api_key()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .context("GENERATION_API_KEY is not a valid header")?,
        );

        let timeout_secs = std::env::var("GENERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build generation http client")?;

        Ok(Self {
            http,
            base_url,
            headers,
        })
    }

    fn url(&self, request: &GenerateRequest) -> String {
        format!(
            "{}/v1/generate/{}",
            self.base_url.trim_end_matches('/'),
            request.category
        )
    }
}

#[async_trait::async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedBatch, GatewayError> {
        let body = GenerateBody {
            request_id: request.request_id,
            company_id: request.selection.company_id,
            organization_id: request.organization_id,
            year: request.selection.period.year,
            quarter: request.selection.period.quarter,
        };

        tracing::info!(
            request_id = %request.request_id,
            category = %request.category,
            company_id = request.selection.company_id,
            organization_id = request.organization_id,
            period = %request.selection.period,
            "requesting tailored generation"
        );

        let res = self
            .http
            .post(self.url(request))
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;

        let status = res.status();
        let text = res.text().await.map_err(GatewayError::from_reqwest)?;

        if !status.is_success() {
            return Err(GenerationDiagnostics {
                category: request.category,
                stage: "http",
                detail: format!("status={status}"),
                raw_body: Some(text),
            }
            .into());
        }

        let batch = serde_json::from_str::<GeneratedBatch>(&text).map_err(|e| {
            GatewayError::from(GenerationDiagnostics {
                category: request.category,
                stage: "decode",
                detail: e.to_string(),
                raw_body: Some(text.clone()),
            })
        })?;

        if batch.credits_used < 0 {
            return Err(GenerationDiagnostics {
                category: request.category,
                stage: "validate",
                detail: format!("negative credits_used: {}", batch.credits_used),
                raw_body: Some(text),
            }
            .into());
        }

        tracing::info!(
            request_id = %request.request_id,
            category = %request.category,
            rows = batch.rows.len(),
            credits_used = batch.credits_used,
            "generation complete"
        );

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_generation_response() {
        let text = serde_json::json!({
            "rows": [{"company_id": 42, "year": 2024, "quarter": 1, "summary": "A\nB"}],
            "credits_used": 2,
            "generated_at": "2024-05-01T12:00:00Z"
        })
        .to_string();

        let batch: GeneratedBatch = serde_json::from_str(&text).unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.credits_used, 2);
    }

    #[test]
    fn decodes_response_without_generated_at() {
        let text = serde_json::json!({
            "rows": [],
            "credits_used": 0
        })
        .to_string();

        let batch: GeneratedBatch = serde_json::from_str(&text).unwrap();
        assert!(batch.rows.is_empty());
        assert_eq!(batch.credits_used, 0);
    }
}
