//! Revoice command-line interface.
//!
//! Reverses a posted sales invoice, fully or partially:
//!
//! ```text
//! revoice --database-url postgres://... reverse-invoice --payload '{"invoice_id": 10}'
//! revoice ri --payload '{"invoice_id": 10, "include_item_list": [{"item_id": 5, "qty": 4}]}'
//! ```
//!
//! The outcome is printed to stdout as JSON. Any failure exits non-zero with
//! the error code and message on stderr.

use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revoice_core::reversal::{ReturnRequest, ReversalError};
use revoice_db::ReversalRepository;
use revoice_shared::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "revoice", author, version, about, long_about = None)]
struct Cli {
    /// Database connection URL; overrides configuration files and environment
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reverse a posted sales invoice
    #[command(visible_alias = "ri")]
    ReverseInvoice {
        /// Request JSON, or `-` to read it from stdin
        #[arg(long)]
        payload: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revoice=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ReversalError>() {
                Some(reversal) => eprintln!("error [{}]: {reversal}", reversal.error_code()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::ReverseInvoice { payload } => {
            let request = ReturnRequest::parse(&read_payload(payload)?)?;

            let config = AppConfig::load_with_database_url(cli.database_url.as_deref())
                .context("failed to load configuration")?;
            let db = revoice_db::connect_with(&config.database)
                .await
                .context("failed to connect to database")?;
            info!("Connected to database");

            let outcome = ReversalRepository::from_config(db, &config)
                .reverse_invoice(&request)
                .await?;

            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
    }
}

fn read_payload(payload: String) -> anyhow::Result<String> {
    if payload != "-" {
        return Ok(payload);
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read payload from stdin")?;
    Ok(buffer)
}
