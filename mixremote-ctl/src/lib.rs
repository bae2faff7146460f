pub mod cli;
pub mod config;

use anyhow::Result;
use clap::Parser;
use cli::{CallCmd, Cli, Commands};
use config::{load_config, CtlConfig};
use mixremote_connector::{session::Session, transport::HttpTransport};
use std::sync::Arc;
use tokio::signal;

/// The main entry point for the control binary.
/// Handles CLI parsing, configuration, logging and the one-shot call.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let Commands::Call(call_cmd) = cli.command;
    let config = load_config_from_cli(&call_cmd)?;
    mixremote_logger::init(&config.log)?;
    tracing::info!("configuration loaded: {:#?}", &config);
    run_call(config, call_cmd).await?;

    Ok(())
}

/// Loads the configuration based on the provided CLI command.
fn load_config_from_cli(call_cmd: &CallCmd) -> Result<CtlConfig> {
    if let Some(config_path) = &call_cmd.config {
        println!("Loading configuration from '{}'", config_path);
        load_config(config_path)
    } else {
        println!("No config file provided, using default settings.");
        Ok(CtlConfig::default())
    }
}

/// Issues the remote call and waits for its dispatched response.
///
/// The underlying protocol offers no way to detect a request that never
/// completes, so the wait is unbounded; Ctrl+C gives up cleanly.
async fn run_call(config: CtlConfig, call_cmd: CallCmd) -> Result<()> {
    let connector_config = Arc::new(config.connector);
    let transport = Arc::new(HttpTransport::new(&connector_config.endpoint)?);

    let (session, handle) = Session::new(connector_config);
    let worker = tokio::spawn(session.run());

    let mut callback = handle.register(&call_cmd.handler).await;
    let api = handle.api_client(transport);

    tracing::info!(
        "calling `{}` with handler `{}`",
        call_cmd.payload,
        call_cmd.handler
    );
    api.call(&call_cmd.handler, &call_cmd.payload);

    tokio::select! {
        response = callback.next_response() => match response {
            Some(response) => {
                if response.is_error() {
                    tracing::warn!("server flagged the remote call as failed");
                }
                println!("{}", response.to_json_string());
            }
            None => tracing::error!("session shut down before a response arrived"),
        },
        _ = signal::ctrl_c() => {
            tracing::info!("interrupted while waiting for the response");
        }
    }

    handle.stop().await;
    if let Err(e) = worker.await? {
        tracing::error!("dispatch worker exited with an error: {:#}", e);
    }
    Ok(())
}
