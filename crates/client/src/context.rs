//! Shared client context passed down through the call graph.
//!
//! Instead of ambient globals, everything a flow needs (gateway, token
//! chain, directory, catalog, leads, media resolution) hangs off one
//! cheaply cloneable context built from configuration plus a durable store.

use std::sync::Arc;

use url::Url;
use vitrine_core::SiteToken;

use crate::catalog::CatalogService;
use crate::config::ClientConfig;
use crate::directory::StorefrontDirectory;
use crate::error::ClientError;
use crate::gateway::{ApiGateway, StaticSiteTokenSource, site_token_from_url};
use crate::leads::LeadService;
use crate::media::MediaResolver;
use crate::store::SelectionStore;
use crate::tokens::TokenChain;

/// Shared context for all marketing-API flows.
///
/// Cheaply cloneable via `Arc`; one logical writer (the active user flow)
/// per piece of state.
#[derive(Clone)]
pub struct MarketingContext {
    inner: Arc<MarketingContextInner>,
}

struct MarketingContextInner {
    config: ClientConfig,
    store: Arc<dyn SelectionStore>,
    site_token: Arc<StaticSiteTokenSource>,
    tokens: TokenChain,
    directory: StorefrontDirectory,
    catalog: CatalogService,
    leads: LeadService,
    media: MediaResolver,
}

impl MarketingContext {
    /// Build the context and every service over one shared gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn SelectionStore>,
        site_token: Option<SiteToken>,
    ) -> Result<Self, ClientError> {
        let site_token = Arc::new(StaticSiteTokenSource::new(site_token));
        let token_source: Arc<dyn crate::gateway::SiteTokenSource> = site_token.clone();
        let gateway = ApiGateway::new(&config, token_source)?;

        let tokens = TokenChain::new(gateway.clone(), Arc::clone(&store));
        let directory = StorefrontDirectory::new(gateway.clone(), Arc::clone(&store));
        let catalog = CatalogService::new(gateway.clone(), tokens.clone());
        let leads = LeadService::new(gateway);
        let media = MediaResolver::new(&config);

        Ok(Self {
            inner: Arc::new(MarketingContextInner {
                config,
                store,
                site_token,
                tokens,
                directory,
                catalog,
                leads,
                media,
            }),
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the durable selection store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SelectionStore> {
        &self.inner.store
    }

    /// Get a reference to the token resolution chain.
    #[must_use]
    pub fn tokens(&self) -> &TokenChain {
        &self.inner.tokens
    }

    /// Get a reference to the storefront directory.
    #[must_use]
    pub fn directory(&self) -> &StorefrontDirectory {
        &self.inner.directory
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the lead-submission service.
    #[must_use]
    pub fn leads(&self) -> &LeadService {
        &self.inner.leads
    }

    /// Get a reference to the media resolver.
    #[must_use]
    pub fn media(&self) -> &MediaResolver {
        &self.inner.media
    }

    /// The site token currently in effect.
    #[must_use]
    pub fn site_token(&self) -> Option<SiteToken> {
        use crate::gateway::SiteTokenSource;
        self.inner.site_token.current()
    }

    /// Record a navigation to `url`, replacing the live site token.
    ///
    /// The token chain notices a changed site token on its next brand
    /// resolution and restarts from scratch; nothing is invalidated eagerly
    /// here.
    pub fn navigate_to(&self, url: &Url) -> Option<SiteToken> {
        let token = site_token_from_url(url);
        self.inner.site_token.set(token.clone());
        token
    }

    /// Replace the live site token directly (deep link, CLI flag).
    pub fn set_site_token(&self, token: Option<SiteToken>) {
        self.inner.site_token.set(token);
    }
}
