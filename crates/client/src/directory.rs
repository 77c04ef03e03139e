//! Storefront Directory.
//!
//! Holds the list of selectable storefronts scoped by the brand token and
//! the durably persisted "currently selected storefront" id. After every
//! fresh load the selection is repaired: a selection that no longer appears
//! in the directory falls back to the first entry; an empty directory leaves
//! it unset.

use std::sync::{Arc, RwLock};

use vitrine_core::{AdReferenceId, CompanyId, ScopedAccessToken};

use crate::error::ClientError;
use crate::gateway::ApiGateway;
use crate::store::{SelectionStore, keys};
use crate::types::StorefrontRecord;
use crate::wire::RawStorefront;

/// Directory endpoint; the scoped credential travels in the header.
const DIRECTORY_PATH: &str = "/v1/marcas";

const SCOPE_HEADER: &str = "X-Access-Token";

/// Directory of selectable storefronts plus the persisted selection.
#[derive(Clone)]
pub struct StorefrontDirectory {
    gateway: ApiGateway,
    store: Arc<dyn SelectionStore>,
    records: Arc<RwLock<Vec<StorefrontRecord>>>,
}

impl StorefrontDirectory {
    /// Create an empty directory over the shared gateway and durable store.
    #[must_use]
    pub fn new(gateway: ApiGateway, store: Arc<dyn SelectionStore>) -> Self {
        Self {
            gateway,
            store,
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Fetch the storefront list with the brand-scope credential.
    ///
    /// An empty response is a valid empty directory, not a failure. On
    /// success the in-memory list is replaced wholesale and the selection
    /// invariant is repaired.
    ///
    /// # Errors
    ///
    /// Transport, HTTP and parse failures propagate unchanged; the previous
    /// directory contents are kept when a load fails.
    pub async fn load(
        &self,
        brand: &ScopedAccessToken,
    ) -> Result<Vec<StorefrontRecord>, ClientError> {
        let raw: Vec<RawStorefront> = self
            .gateway
            .get_json(DIRECTORY_PATH, &[], &[(SCOPE_HEADER, brand.as_str())])
            .await?;

        let records: Vec<StorefrontRecord> =
            raw.into_iter().map(StorefrontRecord::from).collect();

        tracing::debug!(count = records.len(), "storefront directory loaded");

        if let Ok(mut slot) = self.records.write() {
            slot.clone_from(&records);
        }
        self.repair_selection(&records);

        Ok(records)
    }

    /// Pure lookup over the last successfully loaded directory.
    #[must_use]
    pub fn get_by_company_id(&self, company_id: CompanyId) -> Option<StorefrontRecord> {
        self.records
            .read()
            .ok()?
            .iter()
            .find(|record| record.company_id == company_id)
            .cloned()
    }

    /// Ad reference linked to one storefront, if any.
    #[must_use]
    pub fn ad_reference_for(&self, company_id: CompanyId) -> Option<AdReferenceId> {
        self.get_by_company_id(company_id)?.ad_reference_id
    }

    /// The persisted selected storefront id.
    #[must_use]
    pub fn selected_company_id(&self) -> Option<CompanyId> {
        self.store
            .get(keys::SELECTED_COMPANY_ID)?
            .parse::<i64>()
            .ok()
            .map(CompanyId::new)
    }

    /// Select a storefront and persist the choice.
    pub fn select(&self, company_id: CompanyId) {
        self.store
            .set(keys::SELECTED_COMPANY_ID, &company_id.to_string());
    }

    /// Selection invariant: a selection absent from the fresh directory is
    /// reset to the first entry and persisted; an empty directory leaves the
    /// selection untouched.
    fn repair_selection(&self, records: &[StorefrontRecord]) {
        let Some(first) = records.first() else {
            return;
        };

        let selection_is_valid = self
            .selected_company_id()
            .is_some_and(|selected| records.iter().any(|r| r.company_id == selected));

        if !selection_is_valid {
            tracing::info!(company_id = %first.company_id, "selection repaired to first storefront");
            self.select(first.company_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::gateway::StaticSiteTokenSource;
    use crate::store::MemoryStore;

    fn directory_with_store() -> (StorefrontDirectory, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let gateway = ApiGateway::new(
            &ClientConfig::default(),
            Arc::new(StaticSiteTokenSource::default()),
        )
        .expect("gateway");
        (
            StorefrontDirectory::new(gateway, Arc::<MemoryStore>::clone(&store)),
            store,
        )
    }

    fn record(company_id: i64) -> StorefrontRecord {
        StorefrontRecord {
            company_id: CompanyId::new(company_id),
            display_name: format!("Loja {company_id}"),
            logo_path: None,
            affiliate_model_site_id: None,
            model_site_id: None,
            active: Some(true),
            ad_reference_id: None,
        }
    }

    #[test]
    fn test_repair_resets_stale_selection_to_first() {
        let (directory, store) = directory_with_store();
        store.set(keys::SELECTED_COMPANY_ID, "42");

        directory.repair_selection(&[record(7), record(8)]);

        assert_eq!(directory.selected_company_id(), Some(CompanyId::new(7)));
        assert_eq!(store.get(keys::SELECTED_COMPANY_ID), Some("7".to_string()));
    }

    #[test]
    fn test_repair_keeps_valid_selection() {
        let (directory, store) = directory_with_store();
        store.set(keys::SELECTED_COMPANY_ID, "8");

        directory.repair_selection(&[record(7), record(8)]);

        assert_eq!(directory.selected_company_id(), Some(CompanyId::new(8)));
    }

    #[test]
    fn test_repair_sets_first_when_nothing_selected() {
        let (directory, _store) = directory_with_store();

        directory.repair_selection(&[record(7)]);

        assert_eq!(directory.selected_company_id(), Some(CompanyId::new(7)));
    }

    #[test]
    fn test_repair_on_empty_directory_leaves_selection_unset() {
        let (directory, store) = directory_with_store();

        directory.repair_selection(&[]);
        assert_eq!(directory.selected_company_id(), None);

        // And an existing selection is not clobbered by an empty load.
        store.set(keys::SELECTED_COMPANY_ID, "42");
        directory.repair_selection(&[]);
        assert_eq!(directory.selected_company_id(), Some(CompanyId::new(42)));
    }
}
