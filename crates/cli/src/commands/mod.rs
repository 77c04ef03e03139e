//! CLI command implementations.

pub mod catalog;
pub mod lead;
pub mod storefronts;

use std::sync::Arc;

use thiserror::Error;
use vitrine_client::{
    ClientConfig, ClientError, ConfigError, FileStore, MarketingContext, SelectionStore,
};
use vitrine_core::{CompanyId, PhoneError, ScopedAccessToken, SiteToken};

/// Default durable-state location when `VITRINE_STATE_PATH` is unset.
const DEFAULT_STATE_FILE: &str = ".vitrine-state.json";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Marketing-API client error.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid phone input.
    #[error(transparent)]
    Phone(#[from] PhoneError),

    /// No site token given and no brand token cached from a previous run.
    #[error("no site token: pass --ems, set VITRINE_EMS, or run a command with --ems first")]
    MissingSiteToken,

    /// No storefront selected and none given.
    #[error("no storefront selected: pass --company-id or run `vitrine select <id>`")]
    NoSelection,
}

/// Build the shared context from environment configuration.
pub fn build_context(ems_flag: Option<&str>) -> Result<MarketingContext, CommandError> {
    let config = ClientConfig::from_env()?;

    let state_path = config
        .state_path
        .clone()
        .unwrap_or_else(|| DEFAULT_STATE_FILE.into());
    let store: Arc<dyn SelectionStore> = Arc::new(FileStore::open(state_path));

    let site_token = ems_flag
        .and_then(SiteToken::new)
        .or_else(|| std::env::var("VITRINE_EMS").ok().as_deref().and_then(SiteToken::new));

    Ok(MarketingContext::new(config, store, site_token)?)
}

/// Resolve (or reuse) the brand token for the current site token.
///
/// Falls back to a previously cached brand token when no site token is
/// available this run.
pub async fn brand_token(ctx: &MarketingContext) -> Result<ScopedAccessToken, CommandError> {
    if let Some(site_token) = ctx.site_token() {
        return Ok(ctx.tokens().resolve_brand_token(&site_token).await?);
    }
    ctx.tokens()
        .cached_brand_token()
        .await
        .ok_or(CommandError::MissingSiteToken)
}

/// The storefront to operate on: an explicit `--company-id`, the persisted
/// selection, or the selection repaired from a fresh directory load.
pub async fn target_company(
    ctx: &MarketingContext,
    company_id: Option<i64>,
) -> Result<CompanyId, CommandError> {
    if let Some(id) = company_id {
        return Ok(CompanyId::new(id));
    }
    if let Some(selected) = ctx.directory().selected_company_id() {
        return Ok(selected);
    }

    // A fresh load repairs the selection to the first storefront.
    let brand = brand_token(ctx).await?;
    ctx.directory().load(&brand).await?;
    ctx.directory()
        .selected_company_id()
        .ok_or(CommandError::NoSelection)
}
