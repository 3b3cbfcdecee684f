//! Command implementations

use super::{ConfigArgs, DocumentArgs};
use crate::config::{ConfigContext, DocumenterSettings};
use crate::documenter::{Documenter, RunSummary};
use anyhow::{Context, Result};

/// Resolve settings from configuration plus command-line overrides
pub fn resolve_settings(ctx: &ConfigContext, args: &DocumentArgs) -> Result<DocumenterSettings> {
    let config = ctx.all_configs()?;
    let mut settings =
        DocumenterSettings::from_config(&config).context("Invalid configuration")?;

    if let Some(ref endpoint) = args.endpoint {
        settings.llm.endpoint = endpoint.clone();
    }
    if let Some(ref model) = args.model {
        settings.llm.model = model.clone();
    }
    if let Some(ref key) = args.api_key {
        settings.llm.api_key = Some(key.clone());
    }
    if !args.extensions.is_empty() {
        settings = settings.with_extensions(&args.extensions);
    }

    Ok(settings)
}

/// Document a file or directory
pub async fn document(ctx: &ConfigContext, args: &DocumentArgs) -> Result<RunSummary> {
    let settings = resolve_settings(ctx, args)?;

    tracing::debug!(
        endpoint = %settings.llm.endpoint,
        model = %settings.llm.model,
        extensions = ?settings.extensions,
        "Resolved documenter settings"
    );

    let documenter = Documenter::from_settings(settings)?;
    let summary = documenter.run(&args.path).await;

    println!(
        "✓ {} documented, {} failed, {} skipped",
        summary.documented, summary.failed, summary.skipped
    );

    Ok(summary)
}

/// Show or change configuration
///
/// Reads (`--get`, `--list`) see the merged view unless `--global` is given;
/// writes go to the local file unless `--global` is given.
pub fn config(ctx: &ConfigContext, args: &ConfigArgs) -> Result<()> {
    let mut config = if args.global {
        ctx.global_config()?
    } else {
        ctx.local_config()?
    };

    let changed = if let Some(ref pair) = args.set {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected KEY=VALUE, got {:?}", pair))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Configuration key cannot be empty");
        }
        config.set(key, value.trim());
        true
    } else if let Some(ref key) = args.unset {
        if config.remove(key).is_none() {
            println!("Unknown config key: {}", key);
            return Ok(());
        }
        true
    } else {
        false
    };

    if changed {
        if args.global {
            ctx.save_global_config(&config)?;
        } else {
            ctx.save_local_config(&config)?;
        }
        println!("✓ Updated {} configuration", config.scope());
        return Ok(());
    }

    let view = if args.global {
        config
    } else {
        ctx.all_configs()?
    };

    if let Some(ref key) = args.get {
        match view.get(key) {
            Some(value) => println!("{}", value),
            None => println!("Unknown config key: {}", key),
        }
        return Ok(());
    }

    println!("codedoc configuration ({})", view.scope());
    println!("==========================\n");
    for (key, value) in view.iter() {
        println!("{} = {}", key, value);
    }

    Ok(())
}
