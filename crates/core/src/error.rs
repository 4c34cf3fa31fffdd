use crate::generate::error::GenerationDiagnostics;
use thiserror::Error;

/// Errors surfaced by the remote gateways. Every variant is caught at the
/// controller boundary; none propagate to rendering code.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("record not found")]
    NotFound,

    #[error("network failure")]
    Network(#[source] reqwest::Error),

    #[error("store returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    GenerationFailed(#[from] GenerationDiagnostics),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("tailored content requires an organization context")]
    MissingOrganization,
}

impl GatewayError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    /// Whether a retry of the same request can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_5xx_is_transient_4xx_is_not() {
        let server = GatewayError::Upstream {
            status: 503,
            body: "unavailable".to_string(),
        };
        let client = GatewayError::Upstream {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert!(server.is_transient());
        assert!(!client.is_transient());
        assert!(!GatewayError::NotFound.is_transient());
    }
}
