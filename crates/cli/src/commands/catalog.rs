//! Catalog and product-detail commands.

use vitrine_client::MarketingContext;
use vitrine_core::ProductId;

use super::CommandError;

/// Show the storefront's filtered, deduplicated catalog.
#[allow(clippy::print_stdout)]
pub async fn show(ctx: &MarketingContext, company_id: Option<i64>) -> Result<(), CommandError> {
    let company_id = super::target_company(ctx, company_id).await?;
    let context = ctx.catalog().load_storefront_context(company_id).await?;

    let show_price = context.page.param_flag("is_show_price");

    println!("Storefront {company_id} - {} item(s)", context.items.len());
    for item in &context.items {
        if show_price {
            println!("  {:>6}  {:<40}  R$ {}", item.id, item.name, item.price);
        } else {
            println!("  {:>6}  {}", item.id, item.name);
        }
        if let Some(path) = item.cover_image_path.as_deref() {
            println!("          {}", ctx.media().resolve(Some(path)));
        }
    }

    if !context.page.contact_channels.is_empty() {
        println!("Contact channels:");
        for channel in &context.page.contact_channels {
            let name = channel.name.as_deref().unwrap_or("-");
            let handle = channel.handle.as_deref().unwrap_or("-");
            println!("  {name}: {handle}");
        }
    }

    Ok(())
}

/// Show product info and installment plans, fetched concurrently.
#[allow(clippy::print_stdout)]
pub async fn product(
    ctx: &MarketingContext,
    product_id: i64,
    company_id: Option<i64>,
) -> Result<(), CommandError> {
    let company_id = super::target_company(ctx, company_id).await?;
    let context = ctx.catalog().load_storefront_context(company_id).await?;

    let product_id = ProductId::new(product_id);
    let (info, installments) = ctx
        .catalog()
        .product_detail(product_id, context.page.access_token.as_str())
        .await?;

    println!("{} (#{})", info.name, info.id);
    if let Some(price) = info.price.as_deref() {
        println!("  Price: R$ {price}");
    }
    if let Some(description) = info.description.as_deref() {
        println!("  {description}");
    }
    for path in &info.media {
        println!("  media: {}", ctx.media().resolve(Some(path)));
    }

    if installments.is_empty() {
        println!("No installment plans.");
    } else {
        println!("Installment plans:");
        for plan in &installments {
            println!("  {}: {}x R$ {}", plan.name, plan.quantity, plan.amount);
        }
    }

    Ok(())
}
