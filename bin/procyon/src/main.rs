use std::{env, path::PathBuf, process};

use anyhow::Context;
use clap::Parser;
use procyon::{
    cli::{Cli, Commands, node::NodeConfig},
    local_consensus::LocalConsensus,
    startup_message::startup_message,
};
use procyon_driver::driver::Driver;
use procyon_execution_engine::{
    EngineApi, capabilities::REQUIRED_CAPABILITIES, client::ExecutionEngine,
};
use procyon_storage::{db::ProcyonDB, dir::setup_data_dir};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "procyon";

/// Entry point for the procyon node. Initializes logging, parses CLI arguments and drives
/// local consensus rounds against the execution engine until Ctrl-C.
fn main() {
    let cli = Cli::parse();

    // Set the default log level based on verbosity flag or RUST_LOG env var
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let env_filter = match rust_log.is_empty() {
        true => EnvFilter::builder().parse_lossy(cli.verbosity.directive()),
        false => EnvFilter::builder().parse_lossy(rust_log),
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    info!("\n{}", startup_message());

    let data_dir = match setup_data_dir(APP_NAME, cli.data_dir.clone(), cli.ephemeral) {
        Ok(data_dir) => data_dir,
        Err(err) => {
            error!("Unable to initialize database directory: {err}");
            process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("unable to create runtime");

    let result = runtime.block_on(async {
        match cli.command {
            Commands::Node(config) => run_node(*config, data_dir).await,
        }
    });

    if let Err(err) = result {
        error!("{err:#}");
        process::exit(1);
    }
    process::exit(0);
}

/// Runs the node.
///
/// Startup fails before the first round if the JWT secret cannot be loaded or the
/// execution engine lacks a required method.
pub async fn run_node(config: NodeConfig, data_dir: PathBuf) -> anyhow::Result<()> {
    info!(engine_url = %config.engine_url, "starting up procyon node...");

    let engine = ExecutionEngine::new(config.execution_engine_config())
        .context("Failed to create execution engine client")?;
    engine
        .check_capabilities(REQUIRED_CAPABILITIES)
        .await
        .context("Execution engine is not usable")?;

    let db = ProcyonDB::new(data_dir).context("Unable to init procyon database")?;
    let driver = Driver::new(engine, db.consensus_state_provider(), config.driver_config())
        .context("Unable to load consensus state")?;
    let committed_height = driver.committed_state().height;

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
        info!("Ctrl-C received, shutting down...");
    };

    let driver = LocalConsensus::new(driver, config.block_time, committed_height)
        .run(shutdown)
        .await
        .context("Fatal error while committing consensus state")?;
    driver.into_engine().close();
    Ok(())
}
