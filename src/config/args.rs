//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for qrlinker using clap's derive macros.

use clap::{Parser, Subcommand};

use super::DEFAULT_CONFIG_PATH;

/// qrlinker - dynamic QR codes backed by editable short links
#[derive(Parser, Debug)]
#[command(name = "qrlinker")]
#[command(version)]
#[command(about = "Dynamic QR codes backed by editable short links", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,

    /// Resolve a short code in the terminal, running the redirect countdown
    ///
    /// Press Ctrl+C during the countdown to abandon the visit.
    Resolve {
        /// Short code to resolve
        short_code: String,

        /// Only log the scan instead of counting it
        #[arg(long)]
        no_track: bool,
    },

    /// Mint a session token for an owner (development helper)
    Token {
        /// Owner id written to the `sub` claim
        #[arg(long)]
        owner: String,

        /// Token lifetime in minutes (default: auth.token_minutes)
        #[arg(long)]
        ttl_minutes: Option<u64>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Generate example configuration file
    Generate {
        /// Output path (default: stdout)
        output_path: Option<String>,
    },
}

impl Cli {
    /// Subcommand to run, defaulting to `serve`
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::try_parse_from(["qrlinker"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_config_flag_short_and_long() {
        let cli = Cli::try_parse_from(["qrlinker", "-c", "custom.toml"]).unwrap();
        assert_eq!(cli.config, "custom.toml");

        let cli = Cli::try_parse_from(["qrlinker", "--config=other.toml", "serve"]).unwrap();
        assert_eq!(cli.config, "other.toml");
        assert_eq!(cli.command(), Command::Serve);
    }

    #[test]
    fn test_resolve_command() {
        let cli = Cli::try_parse_from(["qrlinker", "resolve", "abc123"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Resolve {
                short_code: "abc123".to_string(),
                no_track: false,
            }
        );

        let cli = Cli::try_parse_from(["qrlinker", "resolve", "abc123", "--no-track"]).unwrap();
        assert!(matches!(
            cli.command(),
            Command::Resolve { no_track: true, .. }
        ));
    }

    #[test]
    fn test_token_command() {
        let cli =
            Cli::try_parse_from(["qrlinker", "token", "--owner", "user-1", "--ttl-minutes", "5"])
                .unwrap();
        assert_eq!(
            cli.command(),
            Command::Token {
                owner: "user-1".to_string(),
                ttl_minutes: Some(5)
            }
        );
    }

    #[test]
    fn test_config_generate_command() {
        let cli = Cli::try_parse_from(["qrlinker", "config", "generate"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Config {
                action: ConfigAction::Generate { output_path: None }
            }
        );
    }

    #[test]
    fn test_token_requires_owner() {
        assert!(Cli::try_parse_from(["qrlinker", "token"]).is_err());
    }
}
