//! GameHooks - webhook registry and event dispatch for game servers
//!
//! Main entry point for the GameHooks CLI and server.

mod cli;
mod commands;
mod server;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::server::{build_registry, gamehooks_dir, init_tracing, load_config, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(gamehooks_dir);
    init_tracing(&data_dir)?;

    let config = load_config(&cli.config, cli.data_dir.as_deref())?;

    match cli.command {
        None => run_server(config).await,
        Some(Commands::Run { host, port }) => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await
        }
        Some(Commands::List) => {
            let registry = build_registry(&config).await?;
            commands::list_endpoints(&registry).await
        }
        Some(Commands::Events) => {
            let registry = build_registry(&config).await?;
            commands::list_events(&registry);
            Ok(())
        }
        Some(Commands::Fire { event, payload }) => {
            let registry = build_registry(&config).await?;
            let failed = commands::fire_event(&registry, &event, &payload).await?;
            if failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
