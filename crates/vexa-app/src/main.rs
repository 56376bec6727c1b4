//! Vexa application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the provider clients, turn handler, and session
//! 4. Start the axum REST API server

mod cli;

use clap::Parser;

use vexa_api::routes;
use vexa_api::state::AppState;
use vexa_core::config::VexaConfig;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing so the file can set the log level.
    let config_file = args.config_path();
    let config_exists = config_file.exists();
    let mut config = if config_exists {
        VexaConfig::load(&config_file)?
    } else {
        VexaConfig::default()
    };

    args.apply_to(&mut config);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Vexa v{}", env!("CARGO_PKG_VERSION"));
    if config_exists {
        tracing::info!(path = %config_file.display(), "Configuration loaded");
    } else {
        tracing::info!(path = %config_file.display(), "No config file found, using defaults");
    }
    config.validate()?;

    let api_key = config.provider.api_key();
    if api_key.is_none() {
        tracing::warn!(
            env = %config.provider.api_key_env,
            "Provider API key not set; requests will be unauthenticated"
        );
    }

    tracing::info!(
        generation_model = %config.generation.model,
        transcription_model = %config.transcription.model,
        base_url = %config.provider.base_url,
        max_turns = config.context.max_turns,
        scratch_dir = %config.general.scratch_path().display(),
        "Chat pipeline configured"
    );

    let state = AppState::from_config(config.clone(), api_key)?;

    routes::start_server(&config, state).await?;

    Ok(())
}
