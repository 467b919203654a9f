use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use switchd::config::{Cli, ServerConfig};
use switchd::daemon;
use switchd::error::{ServerError, USAGE};
use switchd::logging::LogConfig;
use switchd::server::Server;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: {USAGE}");
            return ExitCode::from(1);
        }
    };

    // Nothing is logged until the subscriber exists, so report on stderr.
    let config = match prepare(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("switchd: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Builds the configuration, detaches if asked to, and installs logging.
fn prepare(cli: Cli) -> Result<ServerConfig, ServerError> {
    let config = cli.into_config()?;

    if config.daemon {
        daemon::daemonize()?;
    }

    LogConfig::from_server_config(&config)
        .init()
        .map_err(|e| ServerError::Runtime(e.to_string()))?;

    Ok(config)
}

fn run(config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!("Serving {}", config.root.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| ServerError::Runtime(format!("runtime: {e}")))?;

    runtime.block_on(serve(config))
}

async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let server = Server::bind(config).await?;

    tokio::select! {
        res = server.run() => {
            let summary = res?;
            tracing::info!("Shut down after {} worker sessions", summary.workers_spawned);
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
