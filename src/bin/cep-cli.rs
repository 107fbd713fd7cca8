use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;

use circular_enterprise_apis::blockchain::wallet;
use circular_enterprise_apis::config::{load_config, SdkConfig};
use circular_enterprise_apis::observability::init_logging;
use circular_enterprise_apis::{CancelSignal, CepAccount};

#[derive(Parser)]
#[command(name = "cep-cli")]
#[command(about = "Certify data on a Circular network", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Account address (hex).
    #[arg(short, long, env = "CIRCULAR_ADDRESS")]
    address: Option<String>,

    /// Network to resolve through the discovery service.
    #[arg(short, long, default_value = "testnet")]
    network: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the network to its gateway URL
    Resolve,
    /// Fetch the account's next nonce
    Nonce,
    /// Sign and submit a certificate
    Submit {
        /// Data to certify.
        #[arg(short, long)]
        data: String,

        /// Private key (hex) used to sign.
        #[arg(long, env = "CIRCULAR_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,

        /// Wait for the transaction outcome after submitting.
        #[arg(short, long)]
        wait: bool,
    },
    /// Wait for a transaction to leave the pending state
    Outcome {
        #[arg(short, long)]
        tx_id: String,
    },
    /// Look up a transaction in a specific block
    Transaction {
        #[arg(short, long)]
        block: String,

        #[arg(short, long)]
        tx_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => SdkConfig::default(),
    };
    init_logging(&config.observability);

    match run(cli, &config).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &SdkConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let account = CepAccount::from_config(config)?;
    let address = cli.address.unwrap_or_default();

    match cli.command {
        Commands::Resolve => {
            let gateway_url = account.set_network(&cli.network).await?;
            Ok(json!({ "network": cli.network, "gateway_url": gateway_url }))
        }
        Commands::Nonce => {
            account.open(&address).await?;
            account.set_network(&cli.network).await?;
            let nonce = account.update_account().await?;
            Ok(json!({ "address": address, "nonce": nonce }))
        }
        Commands::Submit {
            data,
            private_key,
            wait,
        } => {
            account.open(&address).await?;
            account.set_public_key(&wallet::public_key_hex(&private_key)?).await;
            account.set_network(&cli.network).await?;
            account.update_account().await?;
            let tx_id = account.submit_certificate(&data, &private_key).await?;

            let state = account.snapshot().await;
            let mut output = json!({ "tx_id": tx_id, "nonce": state.nonce, "public_key": state.public_key });
            if wait {
                output["outcome"] = wait_with_interrupt(&account, &tx_id, config).await?;
            }
            Ok(output)
        }
        Commands::Outcome { tx_id } => {
            account.set_network(&cli.network).await?;
            Ok(wait_with_interrupt(&account, &tx_id, config).await?)
        }
        Commands::Transaction { block, tx_id } => {
            account.set_network(&cli.network).await?;
            Ok(account.get_transaction(&block, &tx_id).await?)
        }
    }
}

/// Wait for an outcome, stopping early on Ctrl-C.
async fn wait_with_interrupt(
    account: &CepAccount,
    tx_id: &str,
    config: &SdkConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let cancel = CancelSignal::new();
    let trigger = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    let result = account
        .get_transaction_outcome_with(tx_id, config.polling.policy(), Some(&cancel))
        .await;
    watcher.abort();
    Ok(result?)
}
