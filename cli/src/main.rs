mod config;

use std::path::PathBuf;

use alloy_primitives::{Address, Bytes, B256, U256};
use clap::{Parser, Subcommand};
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use tracing::{info, warn};

use boost_chain::{resolve_scalar, verify_chain_id, RpcChainClient};
use boost_rewards::{compute_reward, remaining_claim_potential, WAD};
use boost_scalar::gas_rebate_criteria;
use boost_validator::{ClaimDomain, ClaimRequest, ClaimSigner, ValidatorVersion};

use crate::config::ClaimConfig;

/// Boost claim tooling
#[derive(Parser)]
#[command(name = "boost", version, about = "Boost claim scalar and signing tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the incentive scalar of a transaction against a node
    Scalar {
        /// Path to the claim config
        #[arg(short, long, default_value = "boost.toml")]
        config: PathBuf,

        /// Transaction hash
        #[arg(long)]
        tx: B256,
    },

    /// Compute a payable reward from a scalar
    Reward {
        /// WAD-scaled reward rate (0 pays the scalar as-is)
        #[arg(long, default_value = "0")]
        rate: U256,

        #[arg(long)]
        scalar: U256,

        /// Per-claim cap (0 = uncapped)
        #[arg(long, default_value = "0")]
        max_reward: U256,

        /// Cumulative budget
        #[arg(long)]
        limit: Option<U256>,

        #[arg(long, default_value = "0")]
        total_claimed: U256,
    },

    /// Print the canonical gas-rebate criteria record
    GasRebateCriteria,

    /// Sign claim data for a signer validator
    SignClaim {
        /// Signer private key (hex)
        #[arg(long)]
        key: String,

        /// Validator contract address (EIP-712 verifying contract)
        #[arg(long)]
        validator: Address,

        #[arg(long)]
        chain_id: u64,

        #[arg(long)]
        boost_id: U256,

        /// Number of incentives the signature authorizes
        #[arg(long, default_value = "1")]
        quantity: u8,

        #[arg(long)]
        claimant: Address,

        /// Hex-encoded incentive data
        #[arg(long, default_value = "0x")]
        incentive_data: Bytes,

        /// Referrer (V2 only, defaults to the claimant)
        #[arg(long)]
        referrer: Option<Address>,

        /// Sign for a V2 validator
        #[arg(long)]
        v2: bool,
    },

    /// Generate a new secp256k1 signer key
    Keygen {
        /// Output file for the private key
        #[arg(short, long, default_value = "signer.key")]
        output: PathBuf,
    },

    /// Write a default claim config
    InitConfig {
        #[arg(short, long, default_value = "boost.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scalar { config, tx } => cmd_scalar(config, tx).await,
        Commands::Reward {
            rate,
            scalar,
            max_reward,
            limit,
            total_claimed,
        } => cmd_reward(rate, scalar, max_reward, limit, total_claimed),
        Commands::GasRebateCriteria => cmd_gas_rebate_criteria(),
        Commands::SignClaim {
            key,
            validator,
            chain_id,
            boost_id,
            quantity,
            claimant,
            incentive_data,
            referrer,
            v2,
        } => {
            let version = if v2 { ValidatorVersion::V2 } else { ValidatorVersion::V1 };
            let domain = ClaimDomain::new(version, chain_id, validator);
            let request = ClaimRequest {
                boost_id,
                incentive_quantity: quantity,
                claimant,
                incentive_data,
                referrer,
            };
            cmd_sign_claim(&key, &domain, &request)
        }
        Commands::Keygen { output } => cmd_keygen(output),
        Commands::InitConfig { output } => cmd_init_config(output),
    }
}

async fn cmd_scalar(config_path: PathBuf, tx: B256) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %config_path.display(), "loading config");
    let config = ClaimConfig::from_file(&config_path)?;
    config.validate()?;

    let registry = config.registry()?;
    let criteria = config.criteria()?;
    let client = RpcChainClient::new(&config.rpc_url)?;

    verify_chain_id(&client, config.chain_id, config.timeout()).await?;

    match resolve_scalar(&client, config.chain_id, tx, criteria, &registry, config.timeout()).await {
        Ok(scalar) => {
            println!("{scalar}");
            Ok(())
        }
        Err(e) => {
            warn!(tx_hash = %tx, retryable = e.is_retryable(), "scalar resolution failed: {e}");
            Err(e.into())
        }
    }
}

fn cmd_reward(
    rate: U256,
    scalar: U256,
    max_reward: U256,
    limit: Option<U256>,
    total_claimed: U256,
) -> Result<(), Box<dyn std::error::Error>> {
    let payable = compute_reward(rate, scalar, max_reward)?;

    println!("Reward");
    if rate.is_zero() {
        println!("  Rate: unscaled");
    } else {
        println!("  Rate: {rate} / {WAD}");
    }
    println!("  Scalar: {scalar}");
    println!("  Payable: {payable}");

    if let Some(limit) = limit {
        let remaining = remaining_claim_potential(limit, total_claimed);
        println!("  Remaining budget: {remaining}");
        if payable > remaining {
            warn!(%payable, %remaining, "claim would exceed the remaining budget");
        }
    }
    Ok(())
}

fn cmd_gas_rebate_criteria() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&gas_rebate_criteria())?);
    Ok(())
}

fn cmd_sign_claim(
    key: &str,
    domain: &ClaimDomain,
    request: &ClaimRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let signer = ClaimSigner::from_hex(key)?;
    let signed = signer.sign_claim(domain, request)?;
    info!(signer = %signer.address(), boost_id = %request.boost_id, "claim signed");
    println!("{}", serde_json::to_string_pretty(&signed)?);
    Ok(())
}

fn cmd_keygen(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let key = SigningKey::random(&mut OsRng);
    let signer = ClaimSigner::new(key.clone());
    std::fs::write(&output, format!("0x{}", hex::encode(key.to_bytes())))?;

    println!("Generated new signer key");
    println!("  Address: {}", signer.address());
    println!("  Private key saved to: {}", output.display());
    Ok(())
}

fn cmd_init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClaimConfig::default_local();
    config.to_file(&output)?;

    println!("Config file created: {}", output.display());
    println!("  RPC URL: {}", config.rpc_url);
    println!("  Chain ID: {}", config.chain_id);
    println!("  Signatures: {}", config.signatures.len());
    Ok(())
}
