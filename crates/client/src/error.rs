//! Error types for the marketing-API client.
//!
//! One enum covers the whole client surface. Empty directories and catalogs
//! are valid results, never errors; callers get `Ok(vec![])` for those.

use thiserror::Error;

/// Errors that can occur when talking to the marketing API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The brand-token response carried no access token.
    #[error("no access token in brand-token response")]
    TokenNotFound,

    /// Affiliate-scope resolution was attempted without a resolved brand token.
    #[error("affiliate token requested without a resolved brand token")]
    MissingScopeToken,

    /// Lead submission was attempted without any usable token.
    #[error("no access token available for lead submission")]
    MissingToken,

    /// Transport-level failure (connect, timeout, DNS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status; carries the raw response body for diagnostics.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body could not be parsed into the expected shape.
    #[error("failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A newer acquisition was issued before this one completed; the result
    /// was discarded. Callers treat this as a no-op, not a failure.
    #[error("acquisition superseded by a newer request")]
    Superseded,
}

impl ClientError {
    /// True for the staleness guard, which callers should swallow silently.
    #[must_use]
    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ClientError::MissingScopeToken.to_string(),
            "affiliate token requested without a resolved brand token"
        );
        assert_eq!(
            ClientError::Http {
                status: 400,
                body: "{\"error\":\"bad\"}".to_string()
            }
            .to_string(),
            "HTTP 400: {\"error\":\"bad\"}"
        );
    }

    #[test]
    fn test_is_superseded() {
        assert!(ClientError::Superseded.is_superseded());
        assert!(!ClientError::MissingToken.is_superseded());
    }
}
