use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::provisioning::AgentDefaults;

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "voice-provisioner.toml";

/// Environment variable consulted when no credential is configured
pub const CREDENTIAL_ENV_VAR: &str = "VOICE_API_KEY";

/// Main configuration structure for the provisioner
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvisionerConfig {
    /// Platform API settings
    pub api: ApiConfig,
    /// Defaults used to synthesize the assistant and phone number
    pub agent: AgentDefaults,
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Contact card export
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Platform REST endpoint
    pub base_url: String,
    /// API key (can be set via env var)
    pub credential: Option<String>,
    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level, overridden by RUST_LOG
    pub log_level: String,
    /// Emit JSON log lines instead of text
    pub json_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write a contact card after every successful run
    pub auto_vcard: bool,
    /// Directory for automatically named contact cards
    pub directory: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.vapi.ai".to_string(),
            credential: None, // Will be read from env var or config file
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 2,
            burst_capacity: 5,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            auto_vcard: false,
            directory: PathBuf::from("."),
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. voice-provisioner.toml in the working directory
    /// 3. The explicitly requested file, if any
    /// 4. Environment variables (prefixed with VOICE_PROVISIONER_, `__` between sections)
    pub fn load_from(extra_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
        }

        if let Some(path) = extra_file {
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("VOICE_PROVISIONER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: ProvisionerConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// The configured credential, falling back to VOICE_API_KEY
    pub fn credential(&self) -> Option<String> {
        self.api
            .credential
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| std::env::var(CREDENTIAL_ENV_VAR).ok())
            .filter(|c| !c.trim().is_empty())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists. Returns whether one was loaded; runs
    /// before logging starts, so the caller reports it.
    pub fn load_env_file() -> Result<bool> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            return Ok(true);
        }
        Ok(false)
    }
}
