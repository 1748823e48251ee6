use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sep_gateway::{PaymentGateway, SepClient, SepConfig, SepError};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Operator tool for the SEP payment gateway.
///
/// Reads SEP_BASE_URL, SEP_TERMINAL_ID and SEP_TIMEOUT_SECS from the
/// environment (or a .env file).
#[derive(Debug, Parser)]
#[command(name = "sep-gateway", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Request a payment token and print the payment page URL
    Token {
        /// Amount in Rials
        #[arg(long)]
        amount: u64,
        /// Merchant reservation number
        #[arg(long)]
        res_num: String,
        /// URL the payer returns to after paying
        #[arg(long)]
        redirect_url: String,
        /// Payer mobile number
        #[arg(long)]
        cell_number: Option<String>,
    },
    /// Verify a completed payment
    Verify {
        #[arg(long)]
        ref_num: String,
    },
    /// Reverse a verified payment
    Reverse {
        #[arg(long)]
        ref_num: String,
    },
}

#[derive(Serialize)]
struct TokenOutput {
    token: String,
    redirect_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = SepConfig::from_env().context("Failed to load SEP configuration")?;
    tracing::info!("SEP gateway: {}", config.base_url);

    let client = SepClient::new(config).context("Failed to create SEP client")?;

    let output = run(&client, cli.command).await.map_err(|err| {
        let catalog_name = err
            .downcast_ref::<SepError>()
            .and_then(SepError::as_gateway)
            .map(|gateway| {
                gateway
                    .catalog_entry
                    .map(|entry| entry.name())
                    .unwrap_or("undocumented code")
            });
        match catalog_name {
            Some(name) => err.context(format!("SEP gateway rejected the request ({})", name)),
            None => err,
        }
    })?;

    println!("{}", output);
    Ok(())
}

async fn run(gateway: &dyn PaymentGateway, command: Command) -> Result<String> {
    let output = match command {
        Command::Token {
            amount,
            res_num,
            redirect_url,
            cell_number,
        } => {
            let result = gateway
                .request_token(amount, &res_num, &redirect_url, cell_number.as_deref())
                .await?;
            let output = TokenOutput {
                redirect_url: gateway.redirect_url(&result.token),
                token: result.token,
            };
            serde_json::to_string_pretty(&output)
        }
        Command::Verify { ref_num } => {
            serde_json::to_string_pretty(&gateway.verify_transaction(&ref_num).await?)
        }
        Command::Reverse { ref_num } => {
            serde_json::to_string_pretty(&gateway.reverse_transaction(&ref_num).await?)
        }
    };

    output.context("Failed to render result")
}
