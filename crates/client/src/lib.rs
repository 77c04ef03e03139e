//! Vitrine marketing-API client library.
//!
//! Implements the context-resolution and catalog-acquisition protocol of the
//! multi-brand storefront: a URL-supplied site token is resolved into a
//! chain of scoped access tokens, which authorize the storefront directory,
//! per-storefront page metadata and catalog, product enrichment, and lead
//! submission.
//!
//! # Architecture
//!
//! - One shared `reqwest` gateway; the remote marketing API is treated as an
//!   opaque collaborator
//! - Loosely typed responses are normalized once, at the gateway boundary
//!   (`wire` module)
//! - Tokens are cached in-memory via `moka` and durably via the selection
//!   store; selection state survives reloads
//! - Strictly ordered fetch chain (token, metadata, catalog); a generation
//!   counter discards stale acquisitions on rapid storefront switching
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitrine_client::{ClientConfig, FileStore, MarketingContext};
//! use vitrine_core::SiteToken;
//!
//! let store = Arc::new(FileStore::open(".vitrine-state.json"));
//! let ctx = MarketingContext::new(ClientConfig::from_env()?, store, SiteToken::new("abc123"))?;
//!
//! let site_token = ctx.site_token().expect("site token");
//! let brand = ctx.tokens().resolve_brand_token(&site_token).await?;
//! let storefronts = ctx.directory().load(&brand).await?;
//!
//! let selected = ctx.directory().selected_company_id().expect("selection");
//! let context = ctx.catalog().load_storefront_context(selected).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod leads;
pub mod media;
pub mod store;
pub mod tokens;
pub mod types;

mod wire;

pub use catalog::CatalogService;
pub use config::{ClientConfig, ConfigError};
pub use context::MarketingContext;
pub use directory::StorefrontDirectory;
pub use error::ClientError;
pub use gateway::{ApiGateway, SiteTokenSource, StaticSiteTokenSource, site_token_from_url};
pub use leads::LeadService;
pub use media::{MediaResolver, PLACEHOLDER_IMAGE};
pub use store::{FileStore, MemoryStore, SelectionStore};
pub use tokens::TokenChain;
pub use types::{
    CatalogItem, ContactChannel, Gender, InstallmentPlan, OpportunityPayload, OpportunityProduct,
    PageMetadata, PersonType, ProductInfo, SiteDescriptor, StorefrontContext, StorefrontRecord,
};
