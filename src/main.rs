use std::{
    io::{self, BufRead as _},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fractic_iap_receipt_forge::{
    config::{CredentialsConfig, DEFAULT_CERT_FILE, DEFAULT_KEY_FILE},
    server,
    util::ReceiptForgeUtil,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Forges signed App Store receipts for testing receipt validation.
#[derive(Parser, Debug)]
#[command(name = "receipt-forge")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level, used when RUST_LOG is not set.
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read one line of receipt JSON from stdin and print the base64 receipt.
    Encode {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Serve `POST /` returning `{"receipt-data": ...}`.
    Serve {
        /// Port to listen on.
        #[arg(short, long, env = "PORT", default_value_t = 8000)]
        port: u16,

        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

#[derive(Args, Debug)]
struct CredentialArgs {
    /// Private key file (PEM). Falls back to $PRIVATE_KEY if unreadable.
    #[arg(long, default_value = DEFAULT_KEY_FILE)]
    key_file: PathBuf,

    /// Certificate file (PEM). Falls back to $CERTIFICATE if unreadable.
    #[arg(long, default_value = DEFAULT_CERT_FILE)]
    cert_file: PathBuf,
}

impl From<CredentialArgs> for CredentialsConfig {
    fn from(args: CredentialArgs) -> Self {
        CredentialsConfig {
            key_file: args.key_file,
            cert_file: args.cert_file,
        }
    }
}

fn setup_logging(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Command::Encode { credentials } => {
            let forge = ReceiptForgeUtil::from_config(&credentials.into())
                .context("failed to load signing credentials")?;

            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed to read receipt JSON from stdin")?;

            let receipt = forge
                .forge_json(line.trim_end().as_bytes())
                .context("failed to forge receipt")?;
            println!("{receipt}");
        }
        Command::Serve { port, credentials } => {
            let forge = ReceiptForgeUtil::from_config(&credentials.into())
                .context("failed to load signing credentials")?;
            info!(port, "starting receipt forge server");
            server::serve(port, forge)
                .await
                .context("receipt forge server failed")?;
        }
    }

    Ok(())
}
