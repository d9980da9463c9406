use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::recovery::Extraction;

/// Client configuration, injected into [`crate::RecipeClient`] at construction
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// API key for the completion endpoint (falls back to GROQ_API_KEY)
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature for both prompts
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Token budget for the ingredient scan
    #[serde(default = "default_scan_max_tokens")]
    pub scan_max_tokens: u32,
    /// Token budget for the full recipe
    #[serde(default = "default_recipe_max_tokens")]
    pub recipe_max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub recovery: RecoveryConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// How model replies are turned into JSON
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RecoveryConfig {
    #[serde(default)]
    pub extraction: Extraction,
    /// Extra prompts sent after a malformed reply (at most 1)
    #[serde(default)]
    pub parse_retries: u32,
}

/// Document export settings
#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Directory rendered documents are written to (temp dir when unset)
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_footer")]
    pub footer: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            footer: default_footer(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            scan_max_tokens: default_scan_max_tokens(),
            recipe_max_tokens: default_recipe_max_tokens(),
            timeout: default_timeout(),
            recovery: RecoveryConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

pub(crate) const MAX_PARSE_RETRIES: u32 = 1;

// Default value functions
fn default_base_url() -> String {
    "https://api.groq.com/openai".to_string()
}

fn default_model() -> String {
    "meta-llama/llama-4-scout-17b-16e-instruct".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_scan_max_tokens() -> u32 {
    1024
}

fn default_recipe_max_tokens() -> u32 {
    2048
}

fn default_timeout() -> u64 {
    60
}

fn default_footer() -> String {
    "Generated by Recipe AI · Powered by Groq + Llama".to_string()
}

impl ClientConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SNAP__ prefix
    /// 2. recipe_snap.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_SNAP__RECOVERY__PARSE_RETRIES
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Request timeout, never shorter than one second
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.max(1))
    }

    /// Resolve the API key, preferring the configured value over GROQ_API_KEY
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn parse_retries(&self) -> u32 {
        self.recovery.parse_retries.min(MAX_PARSE_RETRIES)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe_snap").required(false))
        // Use double underscore for nested: RECIPE_SNAP__EXPORT__OUTPUT_DIR
        .add_source(
            Environment::with_prefix("RECIPE_SNAP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
