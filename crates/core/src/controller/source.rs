use crate::domain::{Category, MarketingRecord, OpportunityRecord, Selection, SummaryRecord};
use crate::error::GatewayError;
use crate::generate::{GenerateRequest, GenerationClient};
use crate::normalize;
use crate::store::rows::{MarketingRow, OpportunityRow, SummaryRow};
use crate::store::{HttpStoreClient, SelectQuery};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Records produced by one successful generation call, together with the
/// credit usage the API reported for it.
#[derive(Debug, Clone)]
pub struct GeneratedVariant<R> {
    pub records: Vec<R>,
    pub credits_used: i64,
}

/// The seam between the controller and the remote world. One implementation
/// per analytical category; mocked in controller tests.
#[async_trait::async_trait]
pub trait VariantSource: Send + Sync {
    type Record: Clone + Send + Sync + 'static;

    fn category(&self) -> Category;

    /// The shared, pre-computed variant. Zero rows are a `NotFound`.
    async fn fetch_general(&self, selection: &Selection)
        -> Result<Vec<Self::Record>, GatewayError>;

    /// The organization-specific variant. Zero rows are `Ok(vec![])`:
    /// not-yet-generated is an expected state, not a failure.
    async fn fetch_tailored(
        &self,
        selection: &Selection,
        organization_id: i64,
    ) -> Result<Vec<Self::Record>, GatewayError>;

    async fn generate_tailored(
        &self,
        selection: &Selection,
        organization_id: i64,
    ) -> Result<GeneratedVariant<Self::Record>, GatewayError>;
}

fn general_query(category: Category, selection: &Selection) -> SelectQuery {
    SelectQuery::from_collection(category.collection())
        .eq("company_id", selection.company_id)
        .eq("year", selection.period.year)
        .eq("quarter", selection.period.quarter)
        .is_null("organization_id")
}

fn tailored_query(category: Category, selection: &Selection, organization_id: i64) -> SelectQuery {
    SelectQuery::from_collection(category.collection())
        .eq("company_id", selection.company_id)
        .eq("year", selection.period.year)
        .eq("quarter", selection.period.quarter)
        .eq("organization_id", organization_id)
}

/// Generated rows come back in the same shape the store serves; they pass
/// through the same boundary validation before normalization.
fn decode_generated_rows<T: DeserializeOwned>(
    category: Category,
    rows: Vec<serde_json::Value>,
) -> Result<Vec<T>, GatewayError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value::<T>(row).map_err(|e| {
                GatewayError::MalformedResponse(format!(
                    "generated {category} row did not match expected shape: {e}"
                ))
            })
        })
        .collect()
}

macro_rules! category_source {
    ($source:ident, $category:expr, $row:ty, $record:ty, $normalize:path) => {
        pub struct $source {
            store: Arc<HttpStoreClient>,
            generator: Arc<dyn GenerationClient>,
        }

        impl $source {
            pub fn new(store: Arc<HttpStoreClient>, generator: Arc<dyn GenerationClient>) -> Self {
                Self { store, generator }
            }
        }

        #[async_trait::async_trait]
        impl VariantSource for $source {
            type Record = $record;

            fn category(&self) -> Category {
                $category
            }

            async fn fetch_general(
                &self,
                selection: &Selection,
            ) -> Result<Vec<Self::Record>, GatewayError> {
                let query = general_query($category, selection);
                let rows: Vec<$row> = self.store.select(&query).await?;
                if rows.is_empty() {
                    return Err(GatewayError::NotFound);
                }
                Ok($normalize(rows))
            }

            async fn fetch_tailored(
                &self,
                selection: &Selection,
                organization_id: i64,
            ) -> Result<Vec<Self::Record>, GatewayError> {
                let query = tailored_query($category, selection, organization_id);
                let rows: Vec<$row> = self.store.select(&query).await?;
                Ok($normalize(rows))
            }

            async fn generate_tailored(
                &self,
                selection: &Selection,
                organization_id: i64,
            ) -> Result<GeneratedVariant<Self::Record>, GatewayError> {
                let request = GenerateRequest::new(*selection, organization_id, $category);
                let batch = self.generator.generate(&request).await?;
                let rows: Vec<$row> = decode_generated_rows($category, batch.rows)?;
                Ok(GeneratedVariant {
                    records: $normalize(rows),
                    credits_used: batch.credits_used,
                })
            }
        }
    };
}

category_source!(
    OpportunitySource,
    Category::Opportunity,
    OpportunityRow,
    OpportunityRecord,
    normalize::opportunities
);

category_source!(
    MarketingSource,
    Category::Marketing,
    MarketingRow,
    MarketingRecord,
    normalize::marketing_records
);

category_source!(
    SummarySource,
    Category::Summary,
    SummaryRow,
    SummaryRecord,
    normalize::summaries
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EarningsPeriod;

    #[test]
    fn queries_scope_general_and_tailored_rows_apart() {
        let selection = Selection::new(42, Some(7), EarningsPeriod::new(2024, 1).unwrap());

        let general = general_query(Category::Summary, &selection);
        assert!(general
            .params()
            .contains(&("organization_id".to_string(), "is.null".to_string())));

        let tailored = tailored_query(Category::Summary, &selection, 7);
        assert!(tailored
            .params()
            .contains(&("organization_id".to_string(), "eq.7".to_string())));
        assert!(tailored
            .params()
            .contains(&("company_id".to_string(), "eq.42".to_string())));
    }

    #[test]
    fn generated_rows_are_validated_before_normalization() {
        let good = serde_json::json!({
            "company_id": 42, "organization_id": 7, "year": 2024, "quarter": 1,
            "summary": "A\nB\nC"
        });
        let rows = decode_generated_rows::<SummaryRow>(Category::Summary, vec![good]).unwrap();
        assert_eq!(rows.len(), 1);

        let bad = serde_json::json!({"company_id": "not a number"});
        let err = decode_generated_rows::<SummaryRow>(Category::Summary, vec![bad]).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }
}
