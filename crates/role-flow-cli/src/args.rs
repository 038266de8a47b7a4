use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "role-flow")]
#[command(about = "Assign players to roles from ranked preferences")]
#[command(version)]
pub struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Roles config file (default: ./roles.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Algorithm {
    Dijkstra,
    BellmanFord,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the role assignment for a roster
    Assign {
        /// Players file: JSON object of player name -> ordered role list
        #[arg(short, long, default_value = "players.json")]
        players: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the solved flow network as Graphviz DOT
        #[arg(long, value_name = "FILE")]
        dot: Option<PathBuf>,

        /// Override the shortest-path routine from the config
        #[arg(long, value_enum)]
        algorithm: Option<Algorithm>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value (e.g. roles.Tank, solver.algorithm)
    Get { key: String },

    /// Set a config value
    Set { key: String, value: String },

    /// List all config values
    List,

    /// Show the resolved config file path
    Path,

    /// Write a commented default config
    Init,
}
