#![deny(unsafe_code)]

//! revstamp CLI — prints the resolved version of this build.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use clap::{Parser, Subcommand};
use revstamp_config::AppConfig;
use revstamp_core::{EmbeddedMetadata, MetadataProvider, ResolvedVersion, VersionResolver};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Versions resolved with default settings, shown by `--version`.
static DEFAULT_VERSION: LazyLock<ResolvedVersion> =
    LazyLock::new(revstamp_core::build_info::resolved);

/// revstamp — derive a human-readable version from build metadata.
#[derive(Parser)]
#[command(
    name = "revstamp",
    version = DEFAULT_VERSION.simple.as_str(),
    long_version = DEFAULT_VERSION.full.as_str(),
    about,
    long_about = None
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "revstamp.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Version override; takes precedence over the config file.
    #[arg(long, global = true)]
    custom_version: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved version.
    Version {
        /// Print the full version instead of the simple one.
        #[arg(long, conflicts_with = "json")]
        full: bool,

        /// Print both versions as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the build metadata embedded in this binary.
    Metadata,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (mut config, source) = load_config(&cli.config).await?;
    let from_file = source == ConfigSource::File;
    if let Some(custom) = cli.custom_version.as_deref() {
        config.version.custom_version = Some(custom.to_string());
        config.validate()?;
    }

    // Set up tracing subscriber with verbosity level
    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Loading happened before the subscriber existed; report it now.
    match source {
        ConfigSource::File => debug!(path = %cli.config.display(), "Loaded configuration"),
        ConfigSource::Defaults => {
            info!(path = %cli.config.display(), "Config file not found, using defaults")
        }
    }

    match cli.command {
        Commands::Version { full, json } => cmd_version(&config, full, json)?,
        Commands::Metadata => cmd_metadata()?,
        Commands::Config { show } => cmd_config(&cli.config, from_file, &config, show)?,
    }

    Ok(())
}

fn cmd_version(config: &AppConfig, full: bool, json: bool) -> Result<()> {
    let resolved = VersionResolver::from_config(EmbeddedMetadata, config).resolve();
    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else if full {
        println!("{}", resolved.full);
    } else {
        println!("{}", resolved.simple);
    }
    Ok(())
}

fn cmd_metadata() -> Result<()> {
    match EmbeddedMetadata.build_metadata() {
        Some(metadata) => println!("{}", serde_json::to_string_pretty(&metadata)?),
        None => eprintln!("No build metadata was embedded in this binary."),
    }
    Ok(())
}

fn cmd_config(config_path: &Path, from_file: bool, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else if from_file {
        println!("Configuration at '{}' is valid.", config_path.display());
    } else {
        println!("No configuration at '{}', using defaults.", config_path.display());
    }
    Ok(())
}

/// Where the active configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    File,
    Defaults,
}

/// Load the config file, falling back to defaults when it does not exist.
async fn load_config(path: &Path) -> Result<(AppConfig, ConfigSource)> {
    if path.exists() {
        Ok((AppConfig::load(path).await?, ConfigSource::File))
    } else {
        Ok((AppConfig::default(), ConfigSource::Defaults))
    }
}
