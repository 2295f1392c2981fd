use anyhow::Result;
use clap::Parser;
use std::path::Path;

use voice_provisioner::cli::commands::{
    show_how_to_get_started, InitCommand, PreviewCommand, ProvisionCommand,
};
use voice_provisioner::cli::{Cli, Commands};
use voice_provisioner::config::{ObservabilityConfig, ProvisionerConfig};
use voice_provisioner::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Skips config loading so a broken file can be replaced
        Some(Commands::Init { path, force }) => {
            init_telemetry(&ObservabilityConfig::default())?;
            tokio::runtime::Runtime::new()?
                .block_on(async { InitCommand::new(path, force).execute().await })
        }
        None => {
            load_config(cli.config.as_deref())?;
            tokio::runtime::Runtime::new()?.block_on(show_how_to_get_started())
        }
        Some(Commands::Provision {
            description,
            name,
            credential,
            vcard,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            tokio::runtime::Runtime::new()?.block_on(async {
                ProvisionCommand::new(description, name)
                    .with_credential(credential)
                    .with_vcard(vcard)
                    .execute(&config)
                    .await
            })
        }
        Some(Commands::Preview { description, name }) => {
            let config = load_config(cli.config.as_deref())?;
            tokio::runtime::Runtime::new()?.block_on(async {
                PreviewCommand::new(description, name).execute(&config).await
            })
        }
    }
}

/// Load `.env` and configuration, then start logging
fn load_config(extra_file: Option<&Path>) -> Result<ProvisionerConfig> {
    let env_file_loaded = ProvisionerConfig::load_env_file()?;
    let config = ProvisionerConfig::load_from(extra_file)?;
    init_telemetry(&config.observability)?;
    if env_file_loaded {
        tracing::info!("Loaded environment variables from .env file");
    }
    Ok(config)
}
