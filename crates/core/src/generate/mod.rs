pub mod error;
pub mod http;

use crate::domain::{Category, Selection};
use crate::error::GatewayError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tailored-generation call. The request id exists for log correlation;
/// the external API treats it as opaque.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub request_id: Uuid,
    pub selection: Selection,
    pub organization_id: i64,
    pub category: Category,
}

impl GenerateRequest {
    pub fn new(selection: Selection, organization_id: i64, category: Category) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            selection,
            organization_id,
            category,
        }
    }
}

/// What the generation API returns: raw rows in the same shape the store
/// serves, plus the credits it actually consumed. The credit count is the
/// API's authority; callers must not assume an amount.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedBatch {
    pub rows: Vec<serde_json::Value>,
    pub credits_used: i64,
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedBatch, GatewayError>;
}
