//! Zeratul Network Setup
//!
//! Generates genesis configuration and validator keys for a new network.
//!
//! ## Usage
//!
//! ```bash
//! # Generate keys for 4-validator network
//! cargo run --bin setup -- --num-validators 4 --output-dir ./validators
//! ```
//!
//! ## Generated Files
//!
//! For each validator:
//! - `validator-{N}/bls_secret.key` - BLS secret key (for threshold signatures)
//! - `validator-{N}/bls_public.key` - BLS public key
//! - `validator-{N}/ed25519_secret.key` - Ed25519 secret key (for p2p identity)
//! - `validator-{N}/ed25519_public.key` - Ed25519 public key
//! - `validator-{N}/config.toml` - Validator configuration
//!
//! Plus network-wide:
//! - `genesis.json` - Genesis block with initial validator set
//! - `network.toml` - Network configuration (bootnodes, etc.)

use anyhow::Result;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber;

/// Setup CLI configuration
#[derive(Parser, Debug)]
#[command(name = "zeratul-setup")]
#[command(about = "Generate keys and genesis for Zeratul network", long_about = None)]
struct Cli {
    /// Number of validators to generate keys for
    #[arg(long, default_value = "4")]
    num_validators: u32,

    /// Output directory for generated files
    #[arg(long, default_value = "./validators")]
    output_dir: PathBuf,

    /// Network name (for display purposes)
    #[arg(long, default_value = "zeratul-testnet")]
    network_name: String,

    /// Base port for validators (increments by 1 for each validator)
    #[arg(long, default_value = "9000")]
    base_port: u16,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .compact()
        .init();

    info!(
        num_validators = cli.num_validators,
        output_dir = ?cli.output_dir,
        network_name = %cli.network_name,
        "Generating Zeratul network configuration"
    );

    // Create output directory
    fs::create_dir_all(&cli.output_dir)?;
    info!("Created output directory: {:?}", cli.output_dir);

    // TODO TODO TODO: Implement key generation
    //
    // 1. Generate BLS keys for each validator
    //    - Use commonware_cryptography::bls12381
    //    - These are for threshold signatures (DKG)
    //
    // 2. Generate Ed25519 keys for each validator
    //    - Use ed25519-dalek or commonware_cryptography::ed25519
    //    - These are for p2p identity and peer authentication
    //
    // 3. Generate genesis block
    //    - Initial validator set (BLS public keys)
    //    - Initial supply allocation
    //    - Chain ID and genesis timestamp
    //
    // 4. Generate network config
    //    - Bootstrap node addresses
    //    - Network parameters (block time, epoch length, etc.)
    //
    // 5. Write validator configs
    //    - Listen address (127.0.0.1:{base_port + index})
    //    - Bootstrap peers (other validators)
    //    - Paths to keys
    //
    // For now, just create placeholder directories

    for i in 0..cli.num_validators {
        let validator_dir = cli.output_dir.join(format!("validator-{}", i));
        fs::create_dir_all(&validator_dir)?;
        info!("Created validator directory: {:?}", validator_dir);

        // Write placeholder config
        let config = format!(
            r#"# Validator {} Configuration
validator_index = {}
num_validators = {}
listen_addr = "127.0.0.1:{}"
data_dir = "{}/data"

[network]
name = "{}"
"#,
            i,
            i,
            cli.num_validators,
            cli.base_port + i as u16,
            validator_dir.display(),
            cli.network_name
        );

        fs::write(validator_dir.join("config.toml"), config)?;
    }

    info!("Network setup complete!");
    info!("TODO: Implement actual key generation (BLS + Ed25519)");
    info!("TODO: Generate genesis.json with initial validator set");
    info!("TODO: Generate network.toml with bootstrap peers");

    info!("\nNext steps:");
    info!("1. Implement key generation in this binary");
    info!("2. Start validators with: cargo run --bin validator -- --validator-index 0");
    info!("3. Implement DKG protocol over litep2p");

    Ok(())
}
