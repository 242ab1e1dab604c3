//! CLI module for the triage copilot
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the support API server
//! - `score` - Score a ticket with the escalation engine, offline
//! - `index build` - Chunk and embed documentation into a vector index
//! - `config init` - Write an example configuration file
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! triage serve
//!
//! # Score an angry P0 ticket with two retrieved documents
//! triage score --query "SSO is down for everyone" --sentiment Angry --priority P0 --scores 0.9,0.8
//!
//! # Generate shell completions
//! triage completions bash > ~/.bash_completion.d/triage
//! ```

pub mod completions;
pub mod config;
pub mod index;
pub mod output;
pub mod score;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;
pub use index::handle_index_build;
pub use score::handle_score;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Triage copilot - support ticket classification and escalation
#[derive(Parser, Debug)]
#[command(
    name = "triage",
    version,
    about = "Customer-support triage copilot with deterministic escalation scoring"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the support API server
    Serve(ServeArgs),
    /// Score a ticket with the escalation engine
    Score(ScoreArgs),
    /// Vector index utilities
    #[command(subcommand)]
    Index(IndexCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "triage.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Override the escalation threshold
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Skip loading the vector index; every query runs without documentation
    #[arg(long)]
    pub no_retrieval: bool,
}

/// Weighting scheme selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SchemeArg {
    #[default]
    RetrievalAware,
    RetrievalAgnostic,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Customer query text
    #[arg(short, long)]
    pub query: String,

    /// Topic label (e.g. "SSO", "Sensitive data")
    #[arg(long, default_value = "Unknown")]
    pub topic: String,

    /// Sentiment label (e.g. "Angry", "Frustrated")
    #[arg(long, default_value = "Neutral")]
    pub sentiment: String,

    /// Priority label (P0, P1, P2)
    #[arg(long, default_value = "P2")]
    pub priority: String,

    /// Retrieval similarity scores, comma separated
    #[arg(long, value_delimiter = ',')]
    pub scores: Vec<f64>,

    /// Drafted answer to evaluate
    #[arg(short, long)]
    pub draft: Option<String>,

    /// Override the escalation threshold
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Weighting scheme
    #[arg(long, value_enum, default_value_t = SchemeArg::RetrievalAware)]
    pub scheme: SchemeArg,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "triage.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum IndexCommands {
    /// Chunk and embed a documentation directory
    Build(IndexBuildArgs),
}

#[derive(Args, Debug)]
pub struct IndexBuildArgs {
    /// Documentation directory (defaults to retrieval.data_dir)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Index output path (defaults to retrieval.index_path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, default_value = "triage.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "triage.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load a configuration file if present, then apply environment overrides.
pub(crate) fn load_config(
    path: &std::path::Path,
) -> Result<crate::config::TriageConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        crate::config::TriageConfig::load(Some(path))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        crate::config::TriageConfig::default()
    };
    Ok(config.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["triage", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, PathBuf::from("triage.toml"));
                assert!(args.port.is_none());
                assert!(!args.no_retrieval);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["triage", "serve", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(9000)),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_score() {
        let cli = Cli::try_parse_from([
            "triage",
            "score",
            "--query",
            "Our PII leaked",
            "--topic",
            "Sensitive data",
            "--scores",
            "0.9,0.8",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Score(args) => {
                assert_eq!(args.query, "Our PII leaked");
                assert_eq!(args.topic, "Sensitive data");
                assert_eq!(args.sentiment, "Neutral");
                assert_eq!(args.scores, vec![0.9, 0.8]);
                assert_eq!(args.scheme, SchemeArg::RetrievalAware);
                assert!(args.json);
            }
            _ => panic!("Expected Score command"),
        }
    }

    #[test]
    fn test_cli_parse_score_requires_query() {
        assert!(Cli::try_parse_from(["triage", "score"]).is_err());
    }

    #[test]
    fn test_cli_parse_score_agnostic_scheme() {
        let cli = Cli::try_parse_from([
            "triage",
            "score",
            "-q",
            "hi",
            "--scheme",
            "retrieval-agnostic",
        ])
        .unwrap();
        match cli.command {
            Commands::Score(args) => assert_eq!(args.scheme, SchemeArg::RetrievalAgnostic),
            _ => panic!("Expected Score command"),
        }
    }

    #[test]
    fn test_cli_parse_index_build() {
        let cli =
            Cli::try_parse_from(["triage", "index", "build", "--data-dir", "docs"]).unwrap();
        match cli.command {
            Commands::Index(IndexCommands::Build(args)) => {
                assert_eq!(args.data_dir, Some(PathBuf::from("docs")));
                assert!(args.output.is_none());
            }
            _ => panic!("Expected Index Build command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["triage", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => assert!(args.force),
            _ => panic!("Expected Config Init command"),
        }
    }
}
