//! Configuration management for the CLI.
//!
//! The file is read once at startup and passed explicitly to every command.
//!
//! ```toml
//! [settings]
//! color = true
//! format = "table"
//!
//! [completion]
//! endpoint = "https://api.fireworks.ai/inference/v1/chat/completions"
//! api_key_env = "FIREWORKS_API_KEY"
//! timeout_secs = 30
//!
//! [ingest]
//! max_file_size_mb = 50
//!
//! [extraction]
//! max_corpus_chars = 30000
//!
//! [attributes.material_name]
//! system_prompt = "..."
//! model = "accounts/fireworks/models/llama-v3p1-70b-instruct"
//! ```

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use specsheet_extractor::{AttributeSpec, ExtractorConfig, Roster, DEFAULT_ATTRIBUTES};
use specsheet_ingest::IngestConfig;
use specsheet_llm::chat::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use std::fs;
use std::path::{Path, PathBuf};

/// Model written into template attribute entries
pub const TEMPLATE_MODEL: &str = "accounts/fireworks/models/llama-v3p1-70b-instruct";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Completion endpoint settings
    #[serde(default)]
    pub completion: CompletionSettings,

    /// Document validation and text extraction
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Attribute extraction
    #[serde(default)]
    pub extraction: ExtractorConfig,

    /// Attribute specs keyed by name; parsed leniently into a [`Roster`]
    #[serde(default)]
    pub attributes: toml::Table,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Chat-completions URL
    pub endpoint: String,

    /// Environment variable holding the default API key
    pub api_key_env: String,

    /// Client-side timeout (seconds)
    pub timeout_secs: u64,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".specsheet").join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default one.
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate every section except the attributes.
    ///
    /// Attributes are checked one by one when the roster is built, so a broken
    /// attribute never rejects the whole file.
    pub fn validate(&self) -> Result<()> {
        self.ingest
            .validate()
            .map_err(|e| CliError::Config(format!("[ingest] {}", e)))?;
        self.extraction
            .validate()
            .map_err(|e| CliError::Config(format!("[extraction] {}", e)))?;
        if self.completion.endpoint.trim().is_empty() {
            return Err(CliError::Config("[completion] endpoint must not be empty".into()));
        }
        if self.completion.timeout_secs == 0 {
            return Err(CliError::Config(
                "[completion] timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The attribute roster.
    pub fn roster(&self) -> Roster {
        Roster::from_table(&self.attributes)
    }

    /// Default API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.completion.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// A configuration with a placeholder entry for every default attribute.
    ///
    /// Entries carry only a prompt and a model; everything else falls back to
    /// the attribute defaults.
    pub fn template() -> Self {
        let mut attributes = toml::Table::new();
        for name in DEFAULT_ATTRIBUTES {
            let spec = AttributeSpec::new(*name, String::new(), TEMPLATE_MODEL);
            let mut entry = toml::Table::new();
            entry.insert(
                "system_prompt".to_string(),
                toml::Value::String(template_prompt(&spec)),
            );
            entry.insert("model".to_string(), toml::Value::String(spec.model));
            attributes.insert(name.to_string(), toml::Value::Table(entry));
        }

        Self {
            attributes,
            ..Self::default()
        }
    }
}

fn template_prompt(spec: &AttributeSpec) -> String {
    format!(
        "You analyze technical datasheets of automotive connector housings. \
         Determine the {} of the housing described in the combined documents. \
         Work through five checkpoints and mark each one you complete with ✓. \
         Reply exactly in this form:\n\
         {} <checkpoints>\n\
         {} <value in upper case, or NOT FOUND>",
        spec.label().to_lowercase(),
        spec.reasoning_marker,
        spec.answer_marker()
    )
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: "FIREWORKS_API_KEY".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_true() -> bool {
    true
}
