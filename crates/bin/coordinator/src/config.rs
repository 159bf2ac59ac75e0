//! process startup configuration (ambient stack, not a spec component).

use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "coordinator")]
#[command(about = "attested activation core for a confidential-computing mesh", long_about = None)]
pub struct Args {
    /// gRPC listen address for the Activation service
    #[arg(long, default_value = "0.0.0.0:50052")]
    pub listen: SocketAddr,

    /// sealed-store path (sled database directory)
    #[arg(long, default_value = "./coordinator.db")]
    pub db_path: String,

    /// path to the YAML manifest committed as `main` on startup
    #[arg(long)]
    pub manifest: Option<String>,

    /// bypass remote-attestation quote verification; never set in production
    #[arg(long)]
    pub simulation_mode: bool,
}
