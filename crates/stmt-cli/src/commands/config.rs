//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use stmt_core::models::config::StmtConfig;
use stmt_core::Workspace;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration (API key redacted)
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "oracle.model")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (parsed as JSON, falling back to a plain string)
        value: String,
    },

    /// Check that the configuration is usable
    Check,

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, &path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Check => check_config(&path),
        ConfigCommand::Path => show_path(&path),
    }
}

/// `<config dir>/stmt/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stmt")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<StmtConfig> {
    if path.exists() {
        Ok(StmtConfig::from_file(path)?)
    } else {
        Ok(StmtConfig::default())
    }
}

/// Dotted key to JSON pointer: `oracle.model` -> `/oracle/model`.
fn pointer(key: &str) -> String {
    key.split('.').fold(String::new(), |mut acc, part| {
        acc.push('/');
        acc.push_str(part);
        acc
    })
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let mut json = serde_json::to_value(load_or_default(path)?)?;
    if let Some(key) = json.pointer_mut("/oracle/api_key") {
        *key = Value::String("<redacted>".to_string());
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn init_config(args: InitArgs, default_path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| default_path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    StmtConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default(path)?)?;

    let value = json
        .pointer(&pointer(key))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let parsed: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(load_or_default(path)?)?;

    let (parent, field) = match key.rsplit_once('.') {
        Some((parent, field)) => (pointer(parent), field),
        None => (String::new(), key),
    };

    let section = json
        .pointer_mut(&parent)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
    section.insert(field.to_string(), parsed.clone());

    // Round-trip through the typed config so bad values are rejected.
    let config: StmtConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed)?
    );

    Ok(())
}

fn check_config(path: &Path) -> anyhow::Result<()> {
    let config = load_or_default(path)?;
    let mut problems = 0;

    match config.oracle.resolve_api_key() {
        Ok(_) => println!("{} API key found", style("✓").green()),
        Err(e) => {
            println!("{} {}", style("✗").red(), e);
            problems += 1;
        }
    }

    match Workspace::acquire(&config.workspace).and_then(Workspace::close) {
        Ok(()) => println!("{} Page workspace is writable", style("✓").green()),
        Err(e) => {
            println!("{} Page workspace unusable: {}", style("✗").red(), e);
            problems += 1;
        }
    }

    println!(
        "{} Model: {} ({}s timeout)",
        style("ℹ").blue(),
        config.oracle.model,
        config.oracle.timeout_secs
    );

    if problems > 0 {
        anyhow::bail!("{} configuration problem(s) found", problems);
    }

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'stmt config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer() {
        assert_eq!(pointer("oracle.model"), "/oracle/model");
        assert_eq!(pointer("output"), "/output");
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        set_config(&path, "extraction.max_pages", "3").unwrap();
        set_config(&path, "oracle.model", "gemini-2.0-flash").unwrap();

        let config = StmtConfig::from_file(&path).unwrap();
        assert_eq!(config.extraction.max_pages, 3);
        assert_eq!(config.oracle.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_set_rejects_bad_type_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(set_config(&path, "extraction.max_pages", "many").is_err());
        assert!(set_config(&path, "nope.field", "1").is_err());
        assert!(!path.exists());
    }
}
