//! Token Resolution Chain.
//!
//! Turns the URL-supplied site token into scoped access tokens:
//!
//! ```text
//! site token (EMS) --> brand-scope token --> affiliate-scope token (per storefront)
//! ```
//!
//! Resolved tokens are cached twice: in-memory via `moka` (5-minute TTL) and
//! durably in the selection store so they survive a reload. The brand cache
//! remembers which site token produced it; when the site token changes on
//! navigation, the whole chain is invalidated and resolution restarts.
//! Affiliate tokens are cached per `company_id` and never reused across
//! storefronts.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use vitrine_core::{CompanyId, ScopedAccessToken, SiteToken};

use crate::error::ClientError;
use crate::gateway::ApiGateway;
use crate::store::{SelectionStore, keys};
use crate::wire::{RawAccessGrant, RawBrandGrant};

/// Brand-token endpoint; the site token travels as the `EMS` query parameter.
const BRAND_TOKEN_PATH: &str = "/v1/marketing/site-token";

/// Header carrying the brand token on affiliate-token requests. This endpoint
/// takes the credential as a header, unlike the catalog endpoints.
const BRAND_SCOPE_HEADER: &str = "X-Access-Token";

/// In-memory token cache TTL.
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(300);

fn affiliate_token_path(company_id: CompanyId) -> String {
    format!("/v1/marketing/afiliados/{company_id}/token")
}

/// Resolves and caches the brand-scope and affiliate-scope tokens.
#[derive(Clone)]
pub struct TokenChain {
    gateway: ApiGateway,
    store: Arc<dyn SelectionStore>,
    cache: Cache<String, ScopedAccessToken>,
}

impl TokenChain {
    /// Create a chain over the shared gateway and durable store.
    #[must_use]
    pub fn new(gateway: ApiGateway, store: Arc<dyn SelectionStore>) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(TOKEN_CACHE_TTL)
            .build();

        Self {
            gateway,
            store,
            cache,
        }
    }

    /// Resolve the brand-scope token for `site_token`.
    ///
    /// Idempotent for an unchanged site token: a cached token is returned
    /// without a network call. A changed site token invalidates the brand
    /// cache and every cached affiliate token before resolving fresh.
    ///
    /// # Errors
    ///
    /// [`ClientError::TokenNotFound`] when the response carries no token
    /// field; transport and HTTP failures propagate unchanged.
    pub async fn resolve_brand_token(
        &self,
        site_token: &SiteToken,
    ) -> Result<ScopedAccessToken, ClientError> {
        let cached_source = self.store.get(keys::BRAND_TOKEN_SOURCE);

        if cached_source.as_deref() == Some(site_token.as_str()) {
            if let Some(token) = self.cached_brand_token().await {
                tracing::debug!("brand token cache hit");
                return Ok(token);
            }
        } else if cached_source.is_some() {
            tracing::info!("site token changed, restarting token resolution");
            self.invalidate().await;
        }

        let grant: RawBrandGrant = self
            .gateway
            .get_json(
                BRAND_TOKEN_PATH,
                &[("EMS", site_token.as_str().to_string())],
                &[],
            )
            .await?;

        let company_id = grant.company_id();
        let brand_name = grant.brand_name().map(str::to_string);
        let token = grant.into_token()?;

        tracing::info!(
            company_id = ?company_id,
            brand = brand_name.as_deref().unwrap_or("-"),
            "brand token resolved"
        );
        self.store.set(keys::BRAND_TOKEN, token.as_str());
        self.store
            .set(keys::BRAND_TOKEN_SOURCE, site_token.as_str());
        self.cache
            .insert(keys::BRAND_TOKEN.to_string(), token.clone())
            .await;

        Ok(token)
    }

    /// Resolve the affiliate-scope token for one storefront.
    ///
    /// Requires a previously resolved brand token; never substitutes a
    /// different scope. The brand token travels in the `X-Access-Token`
    /// header, not the query string.
    ///
    /// # Errors
    ///
    /// [`ClientError::MissingScopeToken`] when no brand token is cached;
    /// [`ClientError::TokenNotFound`] when the response grants nothing.
    pub async fn resolve_affiliate_token(
        &self,
        company_id: CompanyId,
    ) -> Result<ScopedAccessToken, ClientError> {
        let brand = self
            .cached_brand_token()
            .await
            .ok_or(ClientError::MissingScopeToken)?;

        let cache_key = keys::affiliate_token(company_id);
        if let Some(token) = self.cache.get(&cache_key).await {
            tracing::debug!(%company_id, "affiliate token cache hit");
            return Ok(token);
        }
        if let Some(value) = self.store.get(&cache_key) {
            let token = ScopedAccessToken::affiliate(value);
            self.cache.insert(cache_key, token.clone()).await;
            return Ok(token);
        }

        let grant: RawAccessGrant = self
            .gateway
            .get_json(
                &affiliate_token_path(company_id),
                &[],
                &[(BRAND_SCOPE_HEADER, brand.as_str())],
            )
            .await?;
        let token = grant.into_token()?;

        tracing::info!(%company_id, "affiliate token resolved");
        self.store.set(&cache_key, token.as_str());
        self.cache.insert(cache_key, token.clone()).await;

        Ok(token)
    }

    /// The cached brand token, if one was resolved and not invalidated.
    pub async fn cached_brand_token(&self) -> Option<ScopedAccessToken> {
        if let Some(token) = self.cache.get(keys::BRAND_TOKEN).await {
            return Some(token);
        }
        let value = self.store.get(keys::BRAND_TOKEN)?;
        let token = ScopedAccessToken::brand(value);
        self.cache
            .insert(keys::BRAND_TOKEN.to_string(), token.clone())
            .await;
        Some(token)
    }

    /// Drop every cached token, brand and affiliate alike.
    pub async fn invalidate(&self) {
        self.store.remove(keys::BRAND_TOKEN);
        self.store.remove(keys::BRAND_TOKEN_SOURCE);
        for key in self.store.keys() {
            if key.starts_with(keys::AFFILIATE_TOKEN_PREFIX) {
                self.store.remove(&key);
            }
        }
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
