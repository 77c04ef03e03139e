//! Lead Submission.
//!
//! One-shot POST of an opportunity record. The scoped token travels as a
//! `token` query parameter for this endpoint specifically, unlike the
//! header-based catalog calls - an external-API asymmetry preserved as a
//! contract. Submissions are never retried automatically: a blind retry
//! could duplicate a lead.

use serde_json::Value;

use crate::error::ClientError;
use crate::gateway::ApiGateway;
use crate::types::OpportunityPayload;

const OPPORTUNITIES_PATH: &str = "/v1/marketing/oportunidades";

/// Submits opportunity records to the marketing API.
#[derive(Clone)]
pub struct LeadService {
    gateway: ApiGateway,
}

impl LeadService {
    /// Create the service over the shared gateway.
    #[must_use]
    pub const fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Submit one opportunity and return the API's receipt.
    ///
    /// The token is trimmed first; an empty token fails fast with
    /// [`ClientError::MissingToken`] before any network traffic. On a
    /// non-success status the raw response body is attached to the error for
    /// diagnostics; the caller decides how to present it and whether the
    /// user re-submits.
    ///
    /// # Errors
    ///
    /// [`ClientError::MissingToken`], transport failures, and
    /// [`ClientError::Http`] with the captured body.
    pub async fn submit(
        &self,
        token: &str,
        payload: &OpportunityPayload,
    ) -> Result<Value, ClientError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ClientError::MissingToken);
        }

        let receipt = self
            .gateway
            .post_json::<Value, _>(
                OPPORTUNITIES_PATH,
                &[("token", token.to_string())],
                payload,
            )
            .await
            .inspect_err(|error| {
                tracing::warn!(
                    origin = payload.origin.as_deref().unwrap_or("-"),
                    %error,
                    "opportunity submission failed"
                );
            })?;

        tracing::info!(
            origin = payload.origin.as_deref().unwrap_or("-"),
            "opportunity submitted"
        );
        Ok(receipt)
    }
}
