//! Lead submission command.

use vitrine_client::{MarketingContext, OpportunityPayload};
use vitrine_core::{Phone, ProductId};

use super::CommandError;

/// Inputs for one lead submission.
pub struct LeadArgs {
    pub name: String,
    pub phone: String,
    pub description: Option<String>,
    pub product_id: Option<i64>,
    pub quantity: u32,
    pub origin: String,
    pub company_id: Option<i64>,
}

/// Submit one opportunity for the target storefront.
///
/// The storefront context is acquired first so the submission uses the
/// authoritative affiliate token and the ad reference from the page
/// metadata (falling back to the directory's).
#[allow(clippy::print_stdout)]
pub async fn submit(ctx: &MarketingContext, args: LeadArgs) -> Result<(), CommandError> {
    let company_id = super::target_company(ctx, args.company_id).await?;
    let context = ctx.catalog().load_storefront_context(company_id).await?;

    let phone = Phone::parse(&args.phone)?;

    let ad_reference = context
        .page
        .ad_reference_id
        .or_else(|| ctx.directory().ad_reference_for(company_id));

    let mut payload = OpportunityPayload::contact(args.name, phone)
        .with_ad_reference(ad_reference)
        .with_origin(args.origin);
    payload.description = args.description;
    if let Some(product_id) = args.product_id {
        payload = payload.with_product(ProductId::new(product_id), args.quantity);
    }

    let receipt = ctx
        .leads()
        .submit(context.page.access_token.as_str(), &payload)
        .await?;

    println!("Lead submitted for storefront {company_id}.");
    if let Some(id) = receipt.get("id") {
        println!("  receipt id: {id}");
    }

    Ok(())
}
