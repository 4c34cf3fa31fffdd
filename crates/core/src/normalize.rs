//! Pure row-to-record transformation. No I/O: raw store rows in, typed
//! records out. Parse failures in embedded JSON degrade the affected field
//! to empty rather than discarding the record.

use crate::domain::{
    EngagementTips, MarketingRecord, OpportunityRecord, OutboundEmail, SummaryRecord, TargetBuyer,
    NO_DATA,
};
use crate::store::rows::{MarketingRow, OpportunityRow, SummaryRow};
use serde::de::DeserializeOwned;

/// Split newline-delimited text into an ordered sequence. Rejoining the
/// result with `\n` reproduces the input exactly.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Lines for an optional field: absent or blank fields yield an empty
/// sequence rather than a single empty line.
fn field_lines(field: Option<&str>) -> Vec<String> {
    match field {
        Some(text) if !text.trim().is_empty() => split_lines(text),
        _ => Vec::new(),
    }
}

/// Parse a JSON-encoded list field, failing closed: absence or a parse
/// failure yields an empty sequence, never an error.
fn json_list<T: DeserializeOwned>(field: Option<&str>, field_name: &str) -> Vec<T> {
    let Some(raw) = field else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(values) => values,
        Err(err) => {
            tracing::warn!(field = field_name, error = %err, "dropping unparseable JSON field");
            Vec::new()
        }
    }
}

fn text_or_no_data(field: Option<String>) -> String {
    match field {
        Some(text) if !text.trim().is_empty() => text,
        _ => NO_DATA.to_string(),
    }
}

pub fn opportunity(row: OpportunityRow) -> OpportunityRecord {
    OpportunityRecord {
        name: text_or_no_data(row.name),
        score: row.score.unwrap_or_default(),
        target_buyer: TargetBuyer {
            role: text_or_no_data(row.buyer_role),
            department: text_or_no_data(row.buyer_department),
        },
        engagement_tips: EngagementTips {
            inbound: field_lines(row.inbound_tips.as_deref()),
            outbound: field_lines(row.outbound_tips.as_deref()),
        },
        outbound_email: OutboundEmail {
            subject: text_or_no_data(row.email_subject),
            body: text_or_no_data(row.email_body),
        },
        reasoning: text_or_no_data(row.reasoning),
        keywords: json_list(row.keywords.as_deref(), "keywords"),
    }
}

pub fn marketing(row: MarketingRow) -> MarketingRecord {
    MarketingRecord {
        tactic: text_or_no_data(row.tactic),
        tactic_score: row.tactic_score.unwrap_or_default(),
        target_personas: json_list(row.target_personas.as_deref(), "target_personas"),
        channel: text_or_no_data(row.channel),
        value_proposition: text_or_no_data(row.value_proposition),
        key_performance_indicators: field_lines(row.key_performance_indicators.as_deref()),
        strategic_alignment: text_or_no_data(row.strategic_alignment),
        call_to_action: text_or_no_data(row.call_to_action),
    }
}

pub fn summary(row: SummaryRow) -> SummaryRecord {
    SummaryRecord {
        summary: field_lines(row.summary.as_deref()),
        challenges: field_lines(row.challenges.as_deref()),
        pain_points: field_lines(row.pain_points.as_deref()),
        opportunities: field_lines(row.opportunities.as_deref()),
        priorities: field_lines(row.priorities.as_deref()),
        keywords: json_list(row.keywords.as_deref(), "keywords"),
    }
}

/// Map rows 1:1 into records, preserving store return order.
pub fn opportunities(rows: Vec<OpportunityRow>) -> Vec<OpportunityRecord> {
    rows.into_iter().map(opportunity).collect()
}

pub fn marketing_records(rows: Vec<MarketingRow>) -> Vec<MarketingRecord> {
    rows.into_iter().map(marketing).collect()
}

pub fn summaries(rows: Vec<SummaryRow>) -> Vec<SummaryRecord> {
    rows.into_iter().map(summary).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_row(summary: Option<&str>, keywords: Option<&str>) -> SummaryRow {
        SummaryRow {
            company_id: 42,
            organization_id: None,
            year: 2024,
            quarter: 1,
            summary: summary.map(str::to_string),
            challenges: None,
            pain_points: None,
            opportunities: None,
            priorities: None,
            keywords: keywords.map(str::to_string),
        }
    }

    #[test]
    fn multi_line_fields_round_trip_through_split() {
        let text = "Revenue grew 12%\nCloud segment flat\nGuidance raised";
        let record = summary(summary_row(Some(text), None));
        assert_eq!(record.summary.len(), text.split('\n').count());
        assert_eq!(record.summary.join("\n"), text);
    }

    #[test]
    fn absent_fields_become_empty_sequences() {
        let record = summary(summary_row(None, None));
        assert!(record.summary.is_empty());
        assert!(record.keywords.is_empty());
    }

    #[test]
    fn unparseable_keywords_fail_closed() {
        let record = summary(summary_row(Some("A"), Some("not json at all")));
        // The bad field degrades to empty; the rest of the record survives.
        assert!(record.keywords.is_empty());
        assert_eq!(record.summary, vec!["A".to_string()]);
    }

    #[test]
    fn keyword_objects_parse_with_weights() {
        let record = summary(summary_row(
            None,
            Some(r#"[{"keyword":"ai","weight":0.9},{"keyword":"churn","weight":0.4}]"#),
        ));
        assert_eq!(record.keywords.len(), 2);
        assert_eq!(record.keywords[0].keyword, "ai");
        assert_eq!(record.keywords[1].weight, 0.4);
    }

    #[test]
    fn absent_scalar_fields_render_no_data_sentinel() {
        let row = OpportunityRow {
            company_id: 42,
            organization_id: None,
            year: 2024,
            quarter: 1,
            name: None,
            score: None,
            buyer_role: Some("  ".to_string()),
            buyer_department: Some("Engineering".to_string()),
            inbound_tips: Some("Tip one\nTip two".to_string()),
            outbound_tips: None,
            email_subject: None,
            email_body: None,
            reasoning: None,
            keywords: Some(r#"["expansion","renewal"]"#.to_string()),
        };

        let record = opportunity(row);
        assert_eq!(record.name, NO_DATA);
        assert_eq!(record.target_buyer.role, NO_DATA);
        assert_eq!(record.target_buyer.department, "Engineering");
        assert_eq!(record.engagement_tips.inbound, vec!["Tip one", "Tip two"]);
        assert!(record.engagement_tips.outbound.is_empty());
        assert_eq!(record.keywords, vec!["expansion", "renewal"]);
    }

    #[test]
    fn rows_map_one_to_one_preserving_order() {
        let rows = vec![
            summary_row(Some("first"), None),
            summary_row(Some("second"), None),
            summary_row(Some("third"), None),
        ];
        let records = summaries(rows);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].summary, vec!["first"]);
        assert_eq!(records[2].summary, vec!["third"]);
    }

    #[test]
    fn marketing_personas_parse_and_kpis_split() {
        let row = MarketingRow {
            company_id: 42,
            organization_id: Some(7),
            year: 2024,
            quarter: 1,
            tactic: Some("Executive webinar".to_string()),
            tactic_score: Some(0.8),
            target_personas: Some(r#"["CTO","VP Engineering"]"#.to_string()),
            channel: Some("LinkedIn".to_string()),
            value_proposition: None,
            key_performance_indicators: Some("Registrations\nAttendance rate".to_string()),
            strategic_alignment: None,
            call_to_action: Some("Book a demo".to_string()),
        };

        let record = marketing(row);
        assert_eq!(record.target_personas, vec!["CTO", "VP Engineering"]);
        assert_eq!(
            record.key_performance_indicators,
            vec!["Registrations", "Attendance rate"]
        );
        assert_eq!(record.value_proposition, NO_DATA);
    }
}
