//! Corner Shop CLI - talk to the catalog API from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! cs-cli products list --page 2
//! cs-cli products show -Lp1
//!
//! # Work with the shared cart
//! cs-cli cart show
//! cs-cli cart add -Lp1 --qty 2
//! cs-cli cart update -Cart1 --product -Lp1 --qty 3
//! cs-cli cart remove -Cart1
//! cs-cli cart clear
//!
//! # Place an order for the current cart
//! cs-cli order submit -n "Lin Mei" -e lin.mei@example.com -t 0912345678 -a "Taipei"
//!
//! # Check the API is reachable
//! cs-cli health
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_API_BASE_URL` - Base URL of the catalog API (or `--base-url`)
//! - `CATALOG_API_PATH` - Shop path segment (or `--api-path`)
//! - `CATALOG_API_TIMEOUT_SECS` - Request timeout (or `--timeout`, default 10)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Corner Shop catalog API client")]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Connection settings, read from the environment unless given as flags.
#[derive(Args)]
struct ApiArgs {
    /// Base URL of the catalog API
    #[arg(long, env = "CATALOG_API_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Shop path segment under /api/
    #[arg(long, env = "CATALOG_API_PATH", global = true, hide_env_values = true)]
    api_path: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CATALOG_API_TIMEOUT_SECS", default_value_t = 10, global = true)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Check that the catalog API answers
    Health,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List one page of products
    List {
        /// Page number (values below 1 mean 1)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Show {
        /// Product ID
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a product
    Add {
        /// Product ID
        #[arg(allow_hyphen_values = true)]
        product_id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        qty: i64,
    },
    /// Set the quantity of a cart line
    Update {
        /// Cart line ID
        #[arg(allow_hyphen_values = true)]
        item_id: String,

        /// Product ID of the line
        #[arg(short, long, allow_hyphen_values = true)]
        product: String,

        /// New quantity (at least 1)
        #[arg(short, long)]
        qty: i64,
    },
    /// Remove a cart line
    Remove {
        /// Cart line ID
        #[arg(allow_hyphen_values = true)]
        item_id: String,
    },
    /// Remove every cart line
    Clear,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Validate the buyer details and place an order for the current cart
    Submit {
        /// Recipient name
        #[arg(short, long)]
        name: String,

        /// Recipient email
        #[arg(short, long)]
        email: String,

        /// Recipient phone number (digits only, at least 8)
        #[arg(short, long)]
        tel: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,

        /// Note to the shop
        #[arg(short, long, default_value = "")]
        message: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let client = commands::connect(
        cli.api.base_url.as_deref(),
        cli.api.api_path.as_deref(),
        cli.api.timeout,
    )?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List { page, category } => {
                commands::products::list(&client, page, category.as_deref()).await?;
            }
            ProductAction::Show { id } => commands::products::show(&client, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&client).await?,
            CartAction::Add { product_id, qty } => {
                commands::cart::add(&client, &product_id, qty).await?;
            }
            CartAction::Update {
                item_id,
                product,
                qty,
            } => commands::cart::update(&client, &item_id, &product, qty).await?,
            CartAction::Remove { item_id } => commands::cart::remove(&client, &item_id).await?,
            CartAction::Clear => commands::cart::clear(&client).await?,
        },
        Commands::Order { action } => match action {
            OrderAction::Submit {
                name,
                email,
                tel,
                address,
                message,
            } => {
                let form = corner_shop_core::OrderForm {
                    name,
                    email,
                    tel,
                    address,
                    message,
                };
                commands::order::submit(&client, &form).await?;
            }
        },
        Commands::Health => commands::health(&client).await?,
    }
    Ok(())
}
