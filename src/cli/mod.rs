//! CLI interface using clap
//!
//! Provides the command-line interface for codedoc

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};

/// codedoc - add documentation comments to source files with an LLM
#[derive(Parser, Debug)]
#[command(name = "codedoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Document a source file, or every source file under a directory
    Document(DocumentArgs),

    /// Read or change configuration
    Config(ConfigArgs),
}

/// Arguments for document command
#[derive(Parser, Debug)]
pub struct DocumentArgs {
    /// File or directory to document
    pub path: String,

    /// Source extension to include when expanding a directory (repeatable)
    #[arg(short, long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Inference endpoint base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "CODEDOC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Operate on the global configuration instead of the local one
    #[arg(short, long)]
    pub global: bool,

    /// Get a configuration value
    #[arg(long, conflicts_with_all = ["set", "unset"])]
    pub get: Option<String>,

    /// Set a configuration value (KEY=VALUE)
    #[arg(long, value_name = "KEY=VALUE", conflicts_with = "unset")]
    pub set: Option<String>,

    /// Remove a configuration value
    #[arg(long)]
    pub unset: Option<String>,

    /// List configuration values (the default when no other flag is given)
    #[arg(short, long, conflicts_with_all = ["get", "set", "unset"])]
    pub list: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["codedoc", "document", "src", "--ext", "rs", "-e", "py"]);
        assert!(matches!(cli.command, Commands::Document(_)));

        if let Commands::Document(args) = cli.command {
            assert_eq!(args.path, "src");
            assert_eq!(args.extensions, vec!["rs", "py"]);
            assert!(args.endpoint.is_none());
        }
    }

    #[test]
    fn test_config_command() {
        let cli = Cli::parse_from(["codedoc", "-v", "config", "--global", "--set", "llm.model=x"]);
        assert!(cli.verbose);
        if let Commands::Config(args) = cli.command {
            assert!(args.global);
            assert_eq!(args.set.as_deref(), Some("llm.model=x"));
        } else {
            panic!("expected config command");
        }
    }

    #[test]
    fn test_config_get_conflicts_with_set() {
        let result = Cli::try_parse_from(["codedoc", "config", "--get", "a", "--set", "b=c"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_list_flag() {
        let cli = Cli::parse_from(["codedoc", "config", "--list"]);
        if let Commands::Config(args) = cli.command {
            assert!(args.list);
            assert!(!args.global);
        } else {
            panic!("expected config command");
        }

        let cli = Cli::parse_from(["codedoc", "config", "-g", "-l"]);
        assert!(matches!(cli.command, Commands::Config(ref args) if args.list && args.global));

        let result = Cli::try_parse_from(["codedoc", "config", "--list", "--unset", "k"]);
        assert!(result.is_err());
    }
}
