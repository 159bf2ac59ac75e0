use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tonic::transport::Server;
use tracing::{info, warn};

mod config;
mod service;

use coordinator::{activation, manifest, quote, store::SledStore};

use config::Args;
use service::proto::activation_server::ActivationServer;
use service::ActivationService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coordinator=info".into()),
        )
        .init();

    let args = Args::parse();

    info!("starting coordinator");
    info!("gRPC listen: {}", args.listen);
    info!("database: {}", args.db_path);
    info!("simulation mode: {}", args.simulation_mode);

    if args.simulation_mode {
        warn!("simulation mode is enabled: attestation quotes are NOT verified");
    }

    let store = Arc::new(SledStore::open(&args.db_path).context("open sealed store")?);

    // the real attestation backend (SGX/DCAP) is an external collaborator
    // (spec §1); in simulation mode it is never consulted, and outside
    // simulation mode this process expects to be started with a real
    // verifier wired in by the deployment, not the dev-only stub below.
    let verifier: Arc<dyn quote::QuoteVerifier> = Arc::new(quote::AlwaysAccept);
    if !args.simulation_mode {
        warn!("no production QuoteVerifier backend wired in; refusing to start outside simulation mode");
        anyhow::bail!("non-simulation mode requires a real QuoteVerifier backend");
    }

    let svc = Arc::new(activation::Service::new(
        store,
        verifier,
        args.simulation_mode,
    ));

    if let Some(manifest_path) = &args.manifest {
        let bytes = std::fs::read_to_string(manifest_path)
            .with_context(|| format!("read manifest {manifest_path}"))?;
        let manifest: manifest::Manifest =
            serde_yaml::from_str(&bytes).context("parse manifest yaml")?;
        svc.set_manifest(manifest).await.context("commit manifest")?;
        info!("committed manifest from {}", manifest_path);
    }

    let grpc_service = ActivationService::new(svc);

    info!("serving Activation on {}", args.listen);
    Server::builder()
        .add_service(ActivationServer::new(grpc_service))
        .serve(args.listen)
        .await?;

    Ok(())
}
