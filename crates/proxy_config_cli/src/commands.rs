//! Command implementations for the proxy-config CLI.
//!
//! - `resolve`: merge up to three documents and print the result
//! - `defaults`: print the baseline spec

use std::path::PathBuf;

use clap::{Args, Subcommand};
use proxy_config::{ProxyConfig, ProxyConfigResolver, ProxyWorkloadSpec};
use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::Error;
use crate::loader::{load_baseline_defaults, load_document};

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the effective proxy configuration from its sources
    Resolve(ResolveArgs),

    /// Show the baseline proxy configuration
    Defaults(DefaultsArgs),
}

#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// File holding the template spec
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// File holding the gateway class override
    #[arg(long)]
    pub class: Option<PathBuf>,

    /// File holding the gateway override
    #[arg(long)]
    pub instance: Option<PathBuf>,

    /// Fill settings left unset with baseline defaults
    #[arg(long)]
    pub fill_defaults: bool,

    /// TOML file replacing built-in baseline values
    #[arg(long, requires = "fill_defaults")]
    pub defaults: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct DefaultsArgs {
    /// TOML file replacing built-in baseline values
    #[arg(long)]
    pub defaults: Option<PathBuf>,
}

/// Runs a command and returns the text to print.
pub fn execute(command: &Commands) -> Result<String, Error> {
    match command {
        Commands::Resolve(args) => resolve_command(args),
        Commands::Defaults(args) => defaults_command(args),
    }
}

/// Loads the given documents, resolves them and optionally fills defaults.
#[instrument(skip_all, fields(fill_defaults = args.fill_defaults))]
pub fn resolve_command(args: &ResolveArgs) -> Result<String, Error> {
    let template = args
        .template
        .as_deref()
        .map(load_document::<ProxyWorkloadSpec>)
        .transpose()?;
    let class_override = args
        .class
        .as_deref()
        .map(load_document::<ProxyConfig>)
        .transpose()?;
    let instance_override = args
        .instance
        .as_deref()
        .map(load_document::<ProxyConfig>)
        .transpose()?;

    let resolved =
        ProxyConfigResolver::new().resolve(template, class_override, instance_override)?;
    info!(
        message = "Resolved proxy configuration",
        name = ?resolved.as_ref().and_then(|c| c.metadata.name.as_deref())
    );

    if !args.fill_defaults {
        return render(&resolved);
    }

    let defaults = load_baseline_defaults(args.defaults.as_deref())?;
    let mut config = resolved.unwrap_or_default();
    config.spec = defaults.fill_unset(&config.spec)?;
    render(&config)
}

/// Renders the baseline spec.
#[instrument(skip_all)]
pub fn defaults_command(args: &DefaultsArgs) -> Result<String, Error> {
    let defaults = load_baseline_defaults(args.defaults.as_deref())?;
    render(&defaults.proxy_spec())
}

fn render<T: Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(Error::Serialize)
}
