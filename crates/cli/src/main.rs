//! Stock dashboard CLI - catalog, stock levels and orders from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Is the API up?
//! stock-cli health
//! stock-cli health --watch
//!
//! # Dashboard figures, low-stock products and latest orders
//! stock-cli dashboard
//!
//! # Catalog and stock, filtered by name or code
//! stock-cli products --search coca
//! stock-cli stock --search 33cl
//!
//! # Orders by number, phone or customer name
//! stock-cli orders --search 0612 --limit 100
//!
//! # Stock movements by product name or reason
//! stock-cli movements --search endommag
//!
//! # Any command as JSON
//! stock-cli --json dashboard
//! ```
//!
//! Connection and credentials come from `STOCK_API_*` environment variables
//! (or a `.env` file). Logs go to stderr; set `STOCK_LOG_JSON=1` for JSON logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use stock_dashboard_client::client::DEFAULT_ORDER_LIMIT;
use stock_dashboard_client::{ApiClient, ClientConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod output;

use commands::{CliError, Context};
use output::Format;

#[derive(Parser)]
#[command(name = "stock-cli")]
#[command(author, version, about = "Stock dashboard for the stock management API")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the API is reachable
    Health {
        /// Keep polling until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// Show the user the configured credentials belong to
    #[command(alias = "login-check")]
    Whoami,
    /// Headline figures, low-stock products and latest orders
    Dashboard {
        /// Number of orders to fetch
        #[arg(short, long, default_value_t = DEFAULT_ORDER_LIMIT)]
        limit: u32,
    },
    /// List products
    Products {
        /// Filter by name or code (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Include products that are no longer sold
        #[arg(long)]
        include_inactive: bool,
    },
    /// Stock levels per product
    Stock {
        /// Filter by name or code (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List orders
    Orders {
        /// Filter by order number, phone or customer name (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Number of orders to fetch
        #[arg(short, long, default_value_t = DEFAULT_ORDER_LIMIT)]
        limit: u32,
    },
    /// Stock movement history
    Movements {
        /// Only movements of this product id
        #[arg(short, long)]
        product: Option<String>,

        /// Filter by product name or reason (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stock_dashboard_cli=info,stock_dashboard_client=info".into());

    let json_logs = std::env::var("STOCK_LOG_JSON").is_ok_and(|v| !v.is_empty() && v != "0");
    let json_layer = json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    let client = ApiClient::new(&config)?;
    let format = if cli.json { Format::Json } else { Format::Text };
    let mut stdout = std::io::stdout().lock();

    if let Commands::Health { watch } = cli.command {
        return commands::health::run(&client, config.health_interval, watch, format, &mut stdout)
            .await;
    }

    let session = client.open_session(&config).await?;
    let ctx = Context {
        client: &client,
        session: &session,
        language: &config.language,
        format,
    };
    let result = run_authenticated(cli.command, &ctx, &mut stdout).await;
    session.end();
    stdout.flush()?;
    result
}

async fn run_authenticated<W: Write>(
    command: Commands,
    ctx: &Context<'_>,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        // Handled before a session is opened
        Commands::Health { .. } => Ok(()),
        Commands::Whoami => commands::auth::whoami(ctx, out).await,
        Commands::Dashboard { limit } => commands::dashboard::run(ctx, limit, out).await,
        Commands::Products {
            search,
            include_inactive,
        } => commands::catalog::products(ctx, search.as_deref(), include_inactive, out).await,
        Commands::Stock { search } => commands::catalog::stock(ctx, search.as_deref(), out).await,
        Commands::Orders { search, limit } => {
            commands::orders::list(ctx, search.as_deref(), limit, out).await
        }
        Commands::Movements { product, search } => {
            commands::orders::movements(ctx, product.as_deref(), search.as_deref(), out).await
        }
    }
}
