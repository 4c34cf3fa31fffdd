use crate::config::Settings;
use crate::domain::EarningsPeriod;
use crate::error::GatewayError;
use crate::store::query::{Direction, SelectQuery};
use crate::store::rows::EarningsPeriodRow;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 3;
const REST_PATH: &str = "/rest/v1";

/// Authenticated read client for the managed relational store. Issues the
/// query, validates the response shape, and hands typed rows to the caller;
/// it never interprets the data.
#[derive(Debug, Clone)]
pub struct HttpStoreClient {
    http: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
    retries: u32,
}

impl HttpStoreClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_supabase_url()?.to_string();
        let api_key = settings.require_supabase_anon_key()?;
        let bearer_token = settings.store_bearer_token()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key).context("SUPABASE_ANON_KEY is not a valid header")?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {bearer_token}"))
                .context("session token is not a valid header")?,
        );

        let timeout_secs = std::env::var("STORE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("STORE_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build store http client")?;

        Ok(Self {
            http,
            base_url,
            headers,
            retries,
        })
    }

    fn url(&self, collection: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            REST_PATH,
            collection
        )
    }

    async fn select_once<T: DeserializeOwned>(
        &self,
        query: &SelectQuery,
    ) -> Result<Vec<T>, GatewayError> {
        let res = self
            .http
            .get(self.url(query.collection()))
            .headers(self.headers.clone())
            .query(query.params())
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;

        let status = res.status();
        let text = res.text().await.map_err(GatewayError::from_reqwest)?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        if !status.is_success() {
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        // Schema validation happens here, at the boundary. A body that does
        // not match the expected row shape never reaches the normalizer.
        serde_json::from_str::<Vec<T>>(&text).map_err(|e| {
            GatewayError::MalformedResponse(format!(
                "store rows for {} did not match expected shape: {e}",
                query.collection()
            ))
        })
    }

    /// Run a select with transient-failure retries and exponential backoff.
    pub async fn select<T: DeserializeOwned>(
        &self,
        query: &SelectQuery,
    ) -> Result<Vec<T>, GatewayError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.select_once(query).await {
                Ok(rows) => return Ok(rows),
                Err(err) if err.is_transient() && attempt < self.retries => {
                    let backoff = backoff_for(attempt);
                    tracing::warn!(
                        collection = query.collection(),
                        attempt,
                        ?backoff,
                        error = %err,
                        "store query failed; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Earnings periods on record for a company, newest first.
    pub async fn earnings_periods(
        &self,
        company_id: i64,
    ) -> Result<Vec<EarningsPeriod>, GatewayError> {
        let query = SelectQuery::from_collection("earnings_records")
            .eq("company_id", company_id)
            .order("year", Direction::Desc)
            .order("quarter", Direction::Desc)
            .columns("year,quarter");

        let rows: Vec<EarningsPeriodRow> = self.select(&query).await?;
        let mut periods = Vec::with_capacity(rows.len());
        for row in rows {
            let quarter = u8::try_from(row.quarter).map_err(|_| {
                GatewayError::MalformedResponse(format!(
                    "earnings_records quarter out of range: {}",
                    row.quarter
                ))
            })?;
            let period = EarningsPeriod::new(row.year, quarter).map_err(|e| {
                GatewayError::MalformedResponse(format!("invalid earnings period in store: {e}"))
            })?;
            periods.push(period);
        }
        Ok(periods)
    }
}

/// Exponential backoff for retry `attempt` (1-based). The exponent is capped
/// so an oversized STORE_RETRIES cannot overflow the shift.
fn backoff_for(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << (attempt.saturating_sub(1)).min(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_for(1), Duration::from_secs(1));
        assert_eq!(backoff_for(2), Duration::from_secs(2));
        assert_eq!(backoff_for(4), Duration::from_secs(8));
        // Far past the cap, including attempts that would overflow a shift.
        assert_eq!(backoff_for(7), Duration::from_secs(64));
        assert_eq!(backoff_for(100), Duration::from_secs(64));
    }
}
