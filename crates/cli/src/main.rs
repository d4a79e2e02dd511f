//! occkv CLI: launches cluster services or drives a workload against them.
//!
//! - `occkv store | validator | dispatcher`: one service per process, wired by
//!   the addresses in the configuration
//! - `occkv all`: every service in one process
//! - `occkv client`: random transactions through a dispatcher
//!
//! Logging goes through `tracing`; set `RUST_LOG` to change the level.

mod commands;
mod parse;
mod workload;

use anyhow::Result;
use occkv_server::{ClusterConfig, Running, ServerHandle};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use parse::{matches_to_action, CliAction};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = build_cli().get_matches();
    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = execute(action).await {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

async fn execute(action: CliAction) -> Result<()> {
    match action {
        CliAction::Store(config) => {
            let store = occkv_server::start_store(&config.store).await?;
            let stop_requested = wait(store.handle()).await;
            if stop_requested {
                store.service().halt();
            }
            finish(store).await
        }
        CliAction::Validator(config) => {
            let validator = occkv_server::start_validator(&config.validator, &config.store.addr).await?;
            let stop_requested = wait(validator.handle()).await;
            if stop_requested {
                validator.service().shutdown().await;
            }
            finish(validator).await
        }
        CliAction::Dispatcher(config) => {
            let dispatcher = occkv_server::start_dispatcher(
                &config.dispatcher,
                &config.store.addr,
                &config.validator.addr,
            )
            .await?;
            wait(dispatcher.handle()).await;
            dispatcher.service().shutdown().await;
            finish(dispatcher).await
        }
        CliAction::All(config) => run_all(&config).await,
        CliAction::Client(spec) => {
            let (stats, entries) = workload::run(&spec).await?;
            print!("{}", workload::summary(&stats, &entries));
            Ok(())
        }
    }
}

async fn run_all(config: &ClusterConfig) -> Result<()> {
    let cluster = occkv_server::start_cluster(config).await?;
    info!(dispatcher = %cluster.dispatcher_addr(), "Cluster ready");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
        _ = cluster.store.handle().stopped() => info!("Store stopped"),
        _ = cluster.validator.handle().stopped() => info!("Validator stopped"),
        _ = cluster.dispatcher.handle().stopped() => info!("Dispatcher stopped"),
    }
    cluster.shutdown().await?;
    Ok(())
}

/// Block until Ctrl-C or a `Stop` RPC. Returns true on Ctrl-C.
async fn wait(handle: &ServerHandle) -> bool {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            handle.shutdown();
            true
        }
        _ = handle.stopped() => false,
    }
}

async fn finish<T>(running: Running<T>) -> Result<()> {
    let (_, handle) = running.into_parts();
    handle.join().await?;
    Ok(())
}
