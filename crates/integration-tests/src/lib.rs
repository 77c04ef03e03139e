//! Integration tests for Vitrine.
//!
//! The marketing API is mocked with `wiremock`; each test stands up a fresh
//! [`MarketingContext`] over an in-memory selection store pointed at the
//! mock server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `token_chain` - Site-token, brand-token and affiliate-token resolution
//! - `catalog_acquisition` - Page metadata, catalog filter/fallback/dedup
//! - `directory_selection` - Storefront directory and selection repair
//! - `lead_submission` - Opportunity submission

use std::sync::Arc;

use vitrine_client::{ClientConfig, MarketingContext, MemoryStore, SelectionStore};
use vitrine_core::SiteToken;

/// Build a context against a mock server, sharing the store with the test.
///
/// # Panics
///
/// Panics when the HTTP client cannot be built.
#[must_use]
pub fn test_context(base_url: &str, site_token: Option<&str>) -> (MarketingContext, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let store_dyn: Arc<dyn SelectionStore> = Arc::<MemoryStore>::clone(&store);

    let ctx = MarketingContext::new(
        ClientConfig::with_api_url(base_url),
        store_dyn,
        site_token.and_then(SiteToken::new),
    )
    .expect("context construction should not fail");

    (ctx, store)
}
