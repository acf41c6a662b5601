//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::StmtError;

/// Placeholder values shipped in sample configs that must never be sent.
const PLACEHOLDER_KEYS: [&str; 3] = ["YOUR_API_KEY_HERE", "TU_API_KEY_AQUI", "changeme"];

/// Main configuration for the stmt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StmtConfig {
    /// Extraction oracle configuration.
    pub oracle: OracleConfig,

    /// Temporary page workspace configuration.
    pub workspace: WorkspaceConfig,

    /// Orchestration configuration.
    pub extraction: ExtractionConfig,

    /// Output sink configuration.
    pub output: OutputConfig,

    /// Log file configuration.
    pub logging: LoggingConfig,
}

/// Extraction oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Model name.
    pub model: String,

    /// REST endpoint root.
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Inline API key, used when the environment variable is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-page request timeout in seconds.
    pub timeout_secs: u64,

    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash-latest".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            timeout_secs: 120,
            temperature: 0.0,
        }
    }
}

impl OracleConfig {
    /// Resolve the API key: environment variable first, then the inline key.
    pub fn resolve_api_key(&self) -> Result<String, StmtError> {
        let from_env = std::env::var(&self.api_key_env).ok();
        let key = from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .map(|k| k.trim().to_string())
            .unwrap_or_default();

        if key.is_empty() || PLACEHOLDER_KEYS.contains(&key.as_str()) {
            return Err(StmtError::Config(format!(
                "no API key configured: set {} or oracle.api_key",
                self.api_key_env
            )));
        }

        Ok(key)
    }
}

/// Where materialized pages live while they wait for the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStorage {
    /// One temp file per page inside the workspace directory.
    #[default]
    Disk,
    /// Pages kept as in-memory buffers.
    Memory,
}

/// Temporary page workspace configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Parent directory for workspaces (system temp dir if unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,

    /// Workspace directory name prefix.
    pub prefix: String,

    /// Page materialization policy.
    pub storage: PageStorage,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            temp_root: None,
            prefix: "stmt-pages-".to_string(),
            storage: PageStorage::Disk,
        }
    }
}

/// Orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum pages to submit (0 = unlimited).
    pub max_pages: usize,

    /// Characters of a failed page's raw payload written to the log.
    pub log_payload_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            log_payload_chars: 500,
        }
    }
}

/// Output sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV field delimiter.
    pub delimiter: char,

    /// Column headers for date, description, debit and credit.
    pub headers: [String; 4],

    /// Worksheet name for XLSX output.
    pub sheet_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            headers: [
                "Date".to_string(),
                "Description".to_string(),
                "Debit".to_string(),
                "Credit".to_string(),
            ],
            sheet_name: "Transactions".to_string(),
        }
    }
}

/// Log file configuration. Console logging is controlled by `-v` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file path; rotated daily as `<stem>.<date>.<ext>`. No file logging if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Level for the log file (trace, debug, info, warn, error).
    pub level: String,

    /// Rotated log files to keep.
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
            max_files: 7,
        }
    }
}

impl StmtConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
