//! Raw row shapes exactly as the managed store returns them: flat records
//! with newline-delimited text fields and JSON-encoded subfields. These are
//! validated at the gateway boundary and converted by the normalizer; nothing
//! downstream ever sees an untyped row.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityRow {
    pub company_id: i64,
    #[serde(default)]
    pub organization_id: Option<i64>,
    pub year: i32,
    pub quarter: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub buyer_role: Option<String>,
    #[serde(default)]
    pub buyer_department: Option<String>,
    /// Newline-delimited.
    #[serde(default)]
    pub inbound_tips: Option<String>,
    /// Newline-delimited.
    #[serde(default)]
    pub outbound_tips: Option<String>,
    #[serde(default)]
    pub email_subject: Option<String>,
    #[serde(default)]
    pub email_body: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    /// JSON-encoded array of strings.
    #[serde(default)]
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingRow {
    pub company_id: i64,
    #[serde(default)]
    pub organization_id: Option<i64>,
    pub year: i32,
    pub quarter: i32,
    #[serde(default)]
    pub tactic: Option<String>,
    #[serde(default)]
    pub tactic_score: Option<f64>,
    /// JSON-encoded array of strings.
    #[serde(default)]
    pub target_personas: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub value_proposition: Option<String>,
    /// Newline-delimited.
    #[serde(default)]
    pub key_performance_indicators: Option<String>,
    #[serde(default)]
    pub strategic_alignment: Option<String>,
    #[serde(default)]
    pub call_to_action: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub company_id: i64,
    #[serde(default)]
    pub organization_id: Option<i64>,
    pub year: i32,
    pub quarter: i32,
    /// All five text fields are newline-delimited.
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub challenges: Option<String>,
    #[serde(default)]
    pub pain_points: Option<String>,
    #[serde(default)]
    pub opportunities: Option<String>,
    #[serde(default)]
    pub priorities: Option<String>,
    /// JSON-encoded array of `{keyword, weight}` objects.
    #[serde(default)]
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsPeriodRow {
    pub year: i32,
    pub quarter: i32,
}
