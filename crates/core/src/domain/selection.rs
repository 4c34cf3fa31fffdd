use crate::domain::period::EarningsPeriod;
use crate::error::GatewayError;
use serde::{Deserialize, Serialize};

/// Identifies which analytical content to display: one company, one earnings
/// period, and optionally the viewer's organization context. Changing any
/// part of this invalidates everything cached for the previous selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub company_id: i64,
    pub organization_id: Option<i64>,
    pub period: EarningsPeriod,
}

impl Selection {
    pub fn new(company_id: i64, organization_id: Option<i64>, period: EarningsPeriod) -> Self {
        Self {
            company_id,
            organization_id,
            period,
        }
    }

    pub fn require_organization(&self) -> Result<i64, GatewayError> {
        self.organization_id.ok_or(GatewayError::MissingOrganization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_organization_rejects_missing_context() {
        let period = EarningsPeriod::new(2024, 1).unwrap();
        let sel = Selection::new(42, None, period);
        assert!(matches!(
            sel.require_organization(),
            Err(GatewayError::MissingOrganization)
        ));
        assert_eq!(
            Selection::new(42, Some(7), period).require_organization().unwrap(),
            7
        );
    }
}
