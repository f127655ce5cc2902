use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "telemetry-api", version, about = "Satellite telemetry API")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the telemetry API server (default)
    Serve,

    /// Insert synthetic telemetry readings for development
    Seed {
        /// Number of readings to insert
        #[arg(long, default_value = "30")]
        count: u32,
    },

    /// Show version information
    Version,
}

impl Cli {
    /// Get the command to execute, defaulting to Serve if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["telemetry-api"]);
        assert!(matches!(cli.get_command(), Commands::Serve));
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_parses_seed_count() {
        let cli = Cli::parse_from(["telemetry-api", "seed", "--count", "12"]);
        assert!(matches!(cli.get_command(), Commands::Seed { count: 12 }));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["telemetry-api", "serve", "--config", "other.toml"]);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }
}
