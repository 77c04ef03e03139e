//! Vitrine CLI - drives the catalog and lead flows from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List storefronts (resolves the token chain from the site token)
//! vitrine --ems AB12CD storefronts
//!
//! # Persist a storefront selection
//! vitrine select 496
//!
//! # Show the selected storefront's catalog
//! vitrine catalog
//!
//! # Product detail (info + installment plans)
//! vitrine product 1207
//!
//! # Submit a lead for the selected storefront
//! vitrine lead --name "Maria Silva" --phone "(81) 99999-9999" --product-id 1207
//! ```
//!
//! # Environment Variables
//!
//! - `VITRINE_API_URL` - Marketing API base URL
//! - `VITRINE_EMS` - Site token, when not passed via `--ems`
//! - `VITRINE_STATE_PATH` - Durable state file (default: `.vitrine-state.json`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine storefront catalog CLI")]
struct Cli {
    /// Site token (EMS); falls back to the VITRINE_EMS environment variable
    #[arg(long, global = true)]
    ems: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the brand's selectable storefronts
    Storefronts,
    /// Select a storefront and persist the choice
    Select {
        /// Company id of the storefront
        company_id: i64,
    },
    /// Show a storefront's catalog
    Catalog {
        /// Company id; defaults to the persisted selection
        #[arg(long)]
        company_id: Option<i64>,
    },
    /// Show product info and installment plans
    Product {
        /// Product id
        product_id: i64,

        /// Company id; defaults to the persisted selection
        #[arg(long)]
        company_id: Option<i64>,
    },
    /// Submit a lead (opportunity) for a storefront
    Lead {
        /// Contact's full name
        #[arg(long)]
        name: String,

        /// Contact phone, free-form ("(81) 99999-9999")
        #[arg(long)]
        phone: String,

        /// Free-text description of the intent
        #[arg(long)]
        description: Option<String>,

        /// Product of interest
        #[arg(long)]
        product_id: Option<i64>,

        /// Quantity for the product of interest
        #[arg(long, default_value_t = 1)]
        quantity: u32,

        /// Flow tag recorded with the lead
        #[arg(long, default_value = "cli")]
        origin: String,

        /// Company id; defaults to the persisted selection
        #[arg(long)]
        company_id: Option<i64>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrine=info,vitrine_client=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let ctx = commands::build_context(cli.ems.as_deref())?;

    match cli.command {
        Commands::Storefronts => commands::storefronts::list(&ctx).await?,
        Commands::Select { company_id } => commands::storefronts::select(&ctx, company_id)?,
        Commands::Catalog { company_id } => commands::catalog::show(&ctx, company_id).await?,
        Commands::Product {
            product_id,
            company_id,
        } => commands::catalog::product(&ctx, product_id, company_id).await?,
        Commands::Lead {
            name,
            phone,
            description,
            product_id,
            quantity,
            origin,
            company_id,
        } => {
            commands::lead::submit(
                &ctx,
                commands::lead::LeadArgs {
                    name,
                    phone,
                    description,
                    product_id,
                    quantity,
                    origin,
                    company_id,
                },
            )
            .await?;
        }
    }
    Ok(())
}
