use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel rendered for absent text fields. Presentation never receives a
/// null where prose is expected.
pub const NO_DATA: &str = "No data";

/// The three analytical categories the orchestration layer serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Opportunity,
    Marketing,
    Summary,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Opportunity, Category::Marketing, Category::Summary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Opportunity => "opportunity",
            Category::Marketing => "marketing",
            Category::Summary => "summary",
        }
    }

    /// Store collection holding this category's rows.
    pub fn collection(&self) -> &'static str {
        match self {
            Category::Opportunity => "opportunity_records",
            Category::Marketing => "marketing_records",
            Category::Summary => "summary_records",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetBuyer {
    pub role: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementTips {
    pub inbound: Vec<String>,
    pub outbound: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    pub name: String,
    pub score: f64,
    pub target_buyer: TargetBuyer,
    pub engagement_tips: EngagementTips,
    pub outbound_email: OutboundEmail,
    pub reasoning: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub tactic: String,
    pub tactic_score: f64,
    pub target_personas: Vec<String>,
    pub channel: String,
    pub value_proposition: String,
    pub key_performance_indicators: Vec<String>,
    pub strategic_alignment: String,
    pub call_to_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub summary: Vec<String>,
    pub challenges: Vec<String>,
    pub pain_points: Vec<String>,
    pub opportunities: Vec<String>,
    pub priorities: Vec<String>,
    pub keywords: Vec<Keyword>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_are_stable() {
        assert_eq!(Category::Opportunity.as_str(), "opportunity");
        assert_eq!(Category::Summary.collection(), "summary_records");
        assert_eq!(Category::ALL.len(), 3);
    }

    #[test]
    fn category_serializes_lowercase() {
        let v = serde_json::to_value(Category::Marketing).unwrap();
        assert_eq!(v, serde_json::json!("marketing"));
    }
}
