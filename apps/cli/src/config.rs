//! # CLI Configuration
//!
//! Configuration management for the `stockbook` binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --db ./shop.db --tenant shop-a                                     │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     STOCKBOOK_DB_PATH, STOCKBOOK_TENANT,                               │
//! │     STOCKBOOK_UTC_OFFSET_MINUTES, STOCKBOOK_LENIENT                    │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/stockbook/config.toml (Linux)                            │
//! │     ~/Library/Application Support/com.stockbook.stockbook/ (macOS)     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/var/lib/stockbook/stockbook.db"
//! max_connections = 5
//! acquire_timeout_secs = 30
//!
//! [tenant]
//! id = "shop-a"
//!
//! [report]
//! utc_offset_minutes = 300   # +05:00
//!
//! [input]
//! coercion = "strict"        # strict | lenient
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use stockbook_core::validation::CoercionMode;
use stockbook_core::TenantId;
use stockbook_db::DbConfig;
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// No tenant from flag, environment or file.
    #[error("No tenant configured: pass --tenant, set STOCKBOOK_TENANT, or set [tenant] id")]
    MissingTenant,

    #[error("Could not determine a platform config/data directory")]
    NoProjectDirs,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a command waits for a connection before failing.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

/// `[tenant]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantSettings {
    #[serde(default)]
    pub id: Option<String>,
}

/// `[report]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Offset used to decide which calendar day a sale falls on.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// `[input]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    /// How missing or non-numeric amounts are treated.
    #[serde(default)]
    pub coercion: CoercionMode,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockbookConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub tenant: TenantSettings,

    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub input: InputSettings,
}

impl StockbookConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    ///
    /// Command-line flags are applied by the caller afterwards.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoProjectDirs)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml()?)?;

        info!(?path, "Config saved");
        Ok(path)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.database.acquire_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "database.acquire_timeout_secs must be greater than 0".into(),
            ));
        }

        // Real-world offsets run from -12:00 to +14:00
        if !(-720..=840).contains(&self.report.utc_offset_minutes) {
            return Err(ConfigError::Invalid(format!(
                "report.utc_offset_minutes must be between -720 and 840, got {}",
                self.report.utc_offset_minutes
            )));
        }

        if let Some(ref id) = self.tenant.id {
            if id.trim().is_empty() {
                return Err(ConfigError::Invalid("tenant.id must not be blank".into()));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("STOCKBOOK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(tenant) = var("STOCKBOOK_TENANT") {
            debug!(tenant = %tenant, "Overriding tenant from environment");
            self.tenant.id = Some(tenant);
        }

        if let Some(offset) = var("STOCKBOOK_UTC_OFFSET_MINUTES") {
            match offset.trim().parse::<i32>() {
                Ok(m) => self.report.utc_offset_minutes = m,
                Err(_) => warn!(offset = %offset, "Ignoring non-numeric STOCKBOOK_UTC_OFFSET_MINUTES"),
            }
        }

        if let Some(lenient) = var("STOCKBOOK_LENIENT") {
            match lenient.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => self.input.coercion = CoercionMode::Lenient,
                "0" | "false" | "no" => self.input.coercion = CoercionMode::Strict,
                _ => warn!(value = %lenient, "Unknown STOCKBOOK_LENIENT value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The configured tenant.
    pub fn tenant(&self) -> ConfigResult<TenantId> {
        self.tenant
            .id
            .as_deref()
            .map(TenantId::new)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingTenant)
    }

    /// The reference offset for calendar-day grouping.
    pub fn utc_offset(&self) -> ConfigResult<FixedOffset> {
        FixedOffset::east_opt(self.report.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "utc offset out of range: {} minutes",
                self.report.utc_offset_minutes
            ))
        })
    }

    pub fn coercion(&self) -> CoercionMode {
        self.input.coercion
    }

    /// Resolved database path.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.stockbook.stockbook/stockbook.db`
    /// - **Windows**: `%APPDATA%\stockbook\stockbook\data\stockbook.db`
    /// - **Linux**: `~/.local/share/stockbook/stockbook.db`
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(ref path) = self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoProjectDirs)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join("stockbook.db"))
    }

    /// Pool settings for stockbook-db.
    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?)
            .max_connections(self.database.max_connections)
            .acquire_timeout(Duration::from_secs(self.database.acquire_timeout_secs)))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "stockbook", "stockbook")
}
