//! Storefront directory commands.

use vitrine_client::MarketingContext;
use vitrine_core::CompanyId;

use super::CommandError;

/// List the brand's storefronts, marking the persisted selection.
#[allow(clippy::print_stdout)]
pub async fn list(ctx: &MarketingContext) -> Result<(), CommandError> {
    let brand = super::brand_token(ctx).await?;
    let records = ctx.directory().load(&brand).await?;

    if records.is_empty() {
        println!("No storefronts for this brand.");
        return Ok(());
    }

    let selected = ctx.directory().selected_company_id();
    for record in &records {
        let marker = if selected == Some(record.company_id) {
            "*"
        } else {
            " "
        };
        let active = match record.active {
            Some(true) | None => "",
            Some(false) => " (inactive)",
        };
        println!(
            "{marker} {:>6}  {}{active}",
            record.company_id, record.display_name
        );
    }

    Ok(())
}

/// Persist a storefront selection.
#[allow(clippy::print_stdout)]
pub fn select(ctx: &MarketingContext, company_id: i64) -> Result<(), CommandError> {
    let company_id = CompanyId::new(company_id);
    ctx.directory().select(company_id);
    println!("Selected storefront {company_id}.");
    Ok(())
}
