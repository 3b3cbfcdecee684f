//! codedoc - documentation comments from an LLM
//!
//! Sends source files to a chat-completions endpoint and writes back the
//! documented code.

use anyhow::Result;
use codedoc::cli::{config, document, Cli, Commands};
use codedoc::ConfigContext;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let ctx = ConfigContext::from_env()?;

    // Execute command
    match cli.command {
        Commands::Document(args) => {
            document(&ctx, &args).await?;
        }

        Commands::Config(args) => {
            config(&ctx, &args)?;
        }
    }

    Ok(())
}
