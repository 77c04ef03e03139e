//! External API Gateway - the single shared HTTP client.
//!
//! All marketing-API traffic goes through one `reqwest::Client` configured
//! with the deployment's base address. Outbound requests are decorated with
//! the current site token (read live from its source on every request, never
//! cached here); inbound failures are logged with a category and propagated
//! unchanged - the gateway never swallows or re-kinds an error.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;
use vitrine_core::SiteToken;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Header carrying the URL-supplied site token on every request.
const SITE_TOKEN_HEADER: &str = "x-ems-token";

/// Query-string key (case-insensitive) carrying the site token.
const SITE_TOKEN_PARAM: &str = "ems";

// =============================================================================
// Site token source
// =============================================================================

/// Live source of the URL-embedded site token.
///
/// Read on every outbound request so navigation-driven changes take effect
/// immediately; implementations must not cache stale values.
pub trait SiteTokenSource: Send + Sync {
    /// The site token currently present, if any.
    fn current(&self) -> Option<SiteToken>;
}

/// A replaceable site-token holder.
///
/// Covers both the fixed case (one token for the process lifetime) and the
/// navigation case, where [`StaticSiteTokenSource::set`] swaps the token and
/// later requests pick up the new value.
#[derive(Default)]
pub struct StaticSiteTokenSource {
    token: RwLock<Option<SiteToken>>,
}

impl StaticSiteTokenSource {
    /// Create a source holding `token`.
    #[must_use]
    pub fn new(token: Option<SiteToken>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    /// Replace the held token (navigation).
    pub fn set(&self, token: Option<SiteToken>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }
}

impl SiteTokenSource for StaticSiteTokenSource {
    fn current(&self) -> Option<SiteToken> {
        self.token.read().ok()?.clone()
    }
}

/// Extract the site token from a page URL's query string.
///
/// The key is matched case-insensitively (`EMS`, `ems`, `Ems`...); the value
/// is trimmed, and a blank value counts as absent.
#[must_use]
pub fn site_token_from_url(url: &Url) -> Option<SiteToken> {
    url.query_pairs()
        .find(|(key, _)| key.eq_ignore_ascii_case(SITE_TOKEN_PARAM))
        .and_then(|(_, value)| SiteToken::new(&value))
}

// =============================================================================
// ApiGateway
// =============================================================================

/// Single shared HTTP client for the marketing API.
#[derive(Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: String,
    site_token: Arc<dyn SiteTokenSource>,
}

impl ApiGateway {
    /// Create a gateway against the configured base address.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(
        config: &ClientConfig,
        site_token: Arc<dyn SiteTokenSource>,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            site_token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Propagates transport failures, non-success statuses (with the raw
    /// body attached), and body-parse failures.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let mut request = self.client.get(self.endpoint(path)).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let body = self.execute(path, request).await?;
        self.parse(path, &body)
    }

    /// POST a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Propagates transport failures, non-success statuses (with the raw
    /// body attached), and body-parse failures.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.client.post(self.endpoint(path)).query(query).json(body);
        let body = self.execute(path, request).await?;
        self.parse(path, &body)
    }

    /// Send a decorated request and return the success body as text.
    async fn execute(
        &self,
        path: &str,
        mut request: reqwest::RequestBuilder,
    ) -> Result<String, ClientError> {
        // Read live so navigation-driven token changes apply immediately.
        if let Some(site_token) = self.site_token.current() {
            request = request.header(SITE_TOKEN_HEADER, site_token.as_str());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(category = "network", %path, %error, "marketing API request failed");
                return Err(ClientError::Network(error));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                tracing::error!(category = "network", %path, %error, "marketing API body read failed");
                return Err(ClientError::Network(error));
            }
        };

        if !status.is_success() {
            tracing::error!(
                category = "http",
                %path,
                status = status.as_u16(),
                body = %body.chars().take(500).collect::<String>(),
                "marketing API returned non-success status"
            );
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn parse<T: DeserializeOwned>(&self, path: &str, body: &str) -> Result<T, ClientError> {
        serde_json::from_str(body).map_err(|error| {
            tracing::error!(
                category = "other",
                %path,
                %error,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse marketing API response"
            );
            ClientError::Parse(error)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("url")
    }

    #[test]
    fn test_site_token_from_url_uppercase_key() {
        let token = site_token_from_url(&url("https://shop.example/?EMS=abc123"));
        assert_eq!(token.expect("token").as_str(), "abc123");
    }

    #[test]
    fn test_site_token_from_url_lowercase_and_mixed_key() {
        assert!(site_token_from_url(&url("https://shop.example/?ems=x1")).is_some());
        assert!(site_token_from_url(&url("https://shop.example/?Ems=x1")).is_some());
    }

    #[test]
    fn test_site_token_from_url_trims_value() {
        let token = site_token_from_url(&url("https://shop.example/?EMS=%20abc%20"));
        assert_eq!(token.expect("token").as_str(), "abc");
    }

    #[test]
    fn test_site_token_from_url_blank_is_absent() {
        assert!(site_token_from_url(&url("https://shop.example/?EMS=")).is_none());
        assert!(site_token_from_url(&url("https://shop.example/?EMS=%20%20")).is_none());
        assert!(site_token_from_url(&url("https://shop.example/")).is_none());
    }

    #[test]
    fn test_static_source_swaps_token() {
        let source = StaticSiteTokenSource::new(SiteToken::new("one"));
        assert_eq!(source.current().expect("token").as_str(), "one");

        source.set(SiteToken::new("two"));
        assert_eq!(source.current().expect("token").as_str(), "two");

        source.set(None);
        assert!(source.current().is_none());
    }
}
