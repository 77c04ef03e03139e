//! Catalog Acquisition.
//!
//! Given a selected storefront, walks the strictly ordered fetch chain
//! (affiliate token, page metadata, catalog), filters the catalog by the
//! authoritative company id from the metadata, and deduplicates by product
//! id. The two product-enrichment fetches (info + installment plans) are
//! independent and issued concurrently.
//!
//! Rapid storefront switching is handled with a generation counter: every
//! acquisition takes a monotonically increasing request id, and a completion
//! that is no longer the latest issued is discarded instead of overwriting
//! fresher state. No transport-level cancellation is attempted.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use vitrine_core::{CompanyId, ProductId};

use crate::error::ClientError;
use crate::gateway::ApiGateway;
use crate::tokens::TokenChain;
use crate::types::{CatalogItem, InstallmentPlan, PageMetadata, ProductInfo, StorefrontContext};
use crate::wire::{RawCatalogItem, RawInstallment, RawPageDetails, RawProductInfo};

const CATALOG_PATH: &str = "/v1/marketing/ps-catalog";
const INSTALLMENTS_PATH: &str = "/v1/common/installments";

fn page_details_path(company_id: CompanyId) -> String {
    format!("/v1/marketing/modelos-sites/{company_id}/detalhes-pagina-vendas")
}

fn product_info_path(product_id: ProductId) -> String {
    format!("/v1/marketing/p/{product_id}/info")
}

/// Acquires storefront contexts (page metadata + catalog) and product detail.
#[derive(Clone)]
pub struct CatalogService {
    gateway: ApiGateway,
    tokens: TokenChain,
    generation: Arc<AtomicU64>,
}

impl CatalogService {
    /// Create the service over the shared gateway and token chain.
    #[must_use]
    pub fn new(gateway: ApiGateway, tokens: TokenChain) -> Self {
        Self {
            gateway,
            tokens,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Load the full context for one storefront.
    ///
    /// Steps are strictly ordered because each credential depends on the
    /// previous step's result:
    /// 1. resolve or reuse the affiliate token for `company_id`;
    /// 2. fetch page metadata with it;
    /// 3. fetch the catalog with the *resolved* token from the metadata;
    /// 4. filter by the metadata's authoritative company id, keeping the
    ///    unfiltered list when filtering would empty a non-empty catalog;
    /// 5. deduplicate by product id, last occurrence wins.
    ///
    /// # Errors
    ///
    /// Any failure in steps 1-3 aborts the whole operation; a partial
    /// catalog is never returned. [`ClientError::Superseded`] signals that a
    /// newer acquisition was issued meanwhile and this result was discarded.
    pub async fn load_storefront_context(
        &self,
        company_id: CompanyId,
    ) -> Result<StorefrontContext, ClientError> {
        let request_id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.acquire(company_id).await;

        if self.generation.load(Ordering::SeqCst) != request_id {
            tracing::debug!(%company_id, request_id, "discarding superseded acquisition");
            return Err(ClientError::Superseded);
        }

        result
    }

    async fn acquire(&self, company_id: CompanyId) -> Result<StorefrontContext, ClientError> {
        let affiliate = self.tokens.resolve_affiliate_token(company_id).await?;

        let page = self.fetch_page_metadata(company_id, affiliate.as_str()).await?;
        let catalog = self.fetch_catalog(page.access_token.as_str()).await?;

        // The token may represent a different authoritative company than the
        // route supplied; the metadata's id wins.
        let authoritative_id = page.company_id.unwrap_or(company_id);

        let filtered: Vec<CatalogItem> = catalog
            .iter()
            .filter(|item| item.company_id == Some(authoritative_id))
            .cloned()
            .collect();

        let items = if filtered.is_empty() && !catalog.is_empty() {
            // An id mismatch between systems would otherwise blank the whole
            // screen; show everything instead.
            tracing::warn!(
                %company_id,
                %authoritative_id,
                total = catalog.len(),
                "company-id filter matched nothing, keeping unfiltered catalog"
            );
            catalog
        } else {
            filtered
        };

        Ok(StorefrontContext {
            page,
            items: dedup_by_id(items),
        })
    }

    async fn fetch_page_metadata(
        &self,
        company_id: CompanyId,
        token: &str,
    ) -> Result<PageMetadata, ClientError> {
        let raw: RawPageDetails = self
            .gateway
            .get_json(
                &page_details_path(company_id),
                &[("token", token.trim().to_string())],
                &[],
            )
            .await?;
        PageMetadata::try_from(raw)
    }

    async fn fetch_catalog(&self, token: &str) -> Result<Vec<CatalogItem>, ClientError> {
        let raw: Vec<RawCatalogItem> = self
            .gateway
            .get_json(CATALOG_PATH, &[("token", token.to_string())], &[])
            .await?;
        Ok(raw.into_iter().map(CatalogItem::from).collect())
    }

    /// Fetch detail-level info and installment plans for one product.
    ///
    /// The two requests are independent and issued concurrently.
    ///
    /// # Errors
    ///
    /// Either fetch failing fails the pair.
    pub async fn product_detail(
        &self,
        product_id: ProductId,
        token: &str,
    ) -> Result<(ProductInfo, Vec<InstallmentPlan>), ClientError> {
        let token = token.trim();

        let info = async {
            self.gateway
                .get_json::<RawProductInfo>(
                    &product_info_path(product_id),
                    &[("token", token.to_string())],
                    &[],
                )
                .await
        };
        let installments = async {
            self.gateway
                .get_json::<Vec<RawInstallment>>(
                    INSTALLMENTS_PATH,
                    &[
                        ("token", token.to_string()),
                        ("produto_id", product_id.to_string()),
                    ],
                    &[],
                )
                .await
        };

        let (info, installments) = tokio::try_join!(info, installments)?;

        Ok((
            ProductInfo::from(info),
            installments.into_iter().map(InstallmentPlan::from).collect(),
        ))
    }
}

/// Deduplicate by product id: first-occurrence order, last occurrence's
/// payload wins.
fn dedup_by_id(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let mut order: Vec<ProductId> = Vec::with_capacity(items.len());
    let mut by_id: HashMap<ProductId, CatalogItem> = HashMap::with_capacity(items.len());

    for item in items {
        if !by_id.contains_key(&item.id) {
            order.push(item.id);
        }
        by_id.insert(item.id, item);
    }

    order.into_iter().filter_map(|id| by_id.remove(&id)).collect()
}
