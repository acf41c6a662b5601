//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use stmt_core::models::config::StmtConfig;
use stmt_oracle::GeminiBackend;

/// Load configuration from `--config`, the default config file, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StmtConfig> {
    if let Some(path) = config_path {
        return Ok(StmtConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(StmtConfig::from_file(&default_path)?)
    } else {
        Ok(StmtConfig::default())
    }
}

/// Check that `input` is an existing PDF file.
pub fn check_input(input: &Path) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension != "pdf" {
        anyhow::bail!("Unsupported file format: {} (expected a PDF)", input.display());
    }

    Ok(())
}

/// Build the Gemini oracle from configuration.
pub fn build_oracle(config: &StmtConfig) -> anyhow::Result<GeminiBackend> {
    let api_key = config.oracle.resolve_api_key()?;

    let backend = GeminiBackend::new(api_key)?
        .with_model(&config.oracle.model)
        .with_base_url(&config.oracle.base_url)
        .with_temperature(config.oracle.temperature)
        .with_timeout(Duration::from_secs(config.oracle.timeout_secs));

    debug!("Using Gemini model {}", backend.model());
    Ok(backend)
}
