//! CLI definitions for GameHooks.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// GameHooks CLI.
#[derive(Parser)]
#[command(name = "gamehooks")]
#[command(about = "Webhook registry and event dispatch for game servers")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/gamehooks.toml", global = true)]
    pub config: PathBuf,

    /// Data directory for logs and the endpoint document
    #[arg(short, long, env = "GAMEHOOKS_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the HTTP server in foreground (default)
    Run {
        /// Server host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print registered endpoints as JSON
    List,

    /// Print the event catalog
    Events,

    /// Fire an event once and wait for every delivery
    Fire {
        /// Event name, e.g. player.join
        event: String,

        /// JSON payload
        #[arg(long, default_value = "{}")]
        payload: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["gamehooks"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("config/gamehooks.toml"));
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from(["gamehooks", "run", "--host", "0.0.0.0", "--port", "9000"])
            .unwrap();
        match cli.command {
            Some(Commands::Run { host, port }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_fire_with_payload_and_global_flags() {
        let cli = Cli::try_parse_from([
            "gamehooks",
            "fire",
            "player.join",
            "--payload",
            r#"{"player":"Alucard"}"#,
            "--data-dir",
            "/tmp/gh",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/gh")));
        match cli.command {
            Some(Commands::Fire { event, payload }) => {
                assert_eq!(event, "player.join");
                assert_eq!(payload, r#"{"player":"Alucard"}"#);
            }
            _ => panic!("expected fire"),
        }
    }

    #[test]
    fn test_fire_default_payload() {
        let cli = Cli::try_parse_from(["gamehooks", "fire", "player.leave"]).unwrap();
        match cli.command {
            Some(Commands::Fire { payload, .. }) => assert_eq!(payload, "{}"),
            _ => panic!("expected fire"),
        }
    }
}
