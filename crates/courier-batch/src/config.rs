//! # Courier Configuration
//!
//! Configuration for a discount run: the monthly cap, the provider price
//! lists, the input/output files and logging.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the binary)       │
//! │     --monthly-cap 12.50 --format json                                  │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     COURIER_MONTHLY_CAP=12.50                                          │
//! │     COURIER_CAP_RESET=calendar_month                                   │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/discounts/courier.toml (Linux)                           │
//! │     ~/Library/Application Support/com.courier.discounts/courier.toml   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     cap 10.00, LP + MR price lists, data/input.txt                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # courier.toml
//! [pricing]
//! monthly_cap = "10.00"
//! cap_reset = "never"        # never | calendar_month
//!
//! [[providers]]
//! id = "LP"
//! small = "1.50"
//! medium = "4.90"
//! large = "6.90"
//!
//! [[providers]]
//! id = "MR"
//! small = "2.00"
//! medium = "3.00"
//! large = "4.00"
//!
//! [io]
//! input = "data/input.txt"
//! output = "data/output.txt"
//! format = "text"            # text | json
//!
//! [logging]
//! level = "info"
//! file = "logs/app.log"
//! ```

use std::path::{Path, PathBuf};

use courier_core::validation::validate_monthly_cap;
use courier_core::{
    default_providers, CapReset, CatalogSet, DiscountEngine, Money, PriceCatalog, Size,
    DEFAULT_MONTHLY_CAP,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::{BatchError, BatchResult};
use crate::format::OutputFormat;

// =============================================================================
// Pricing Settings
// =============================================================================

/// Discount policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Total discount a run may grant. Default: 10.00
    #[serde(default = "default_monthly_cap")]
    pub monthly_cap: Money,

    /// When the accumulated discount total restarts.
    #[serde(default)]
    pub cap_reset: CapReset,
}

fn default_monthly_cap() -> Money {
    DEFAULT_MONTHLY_CAP
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            monthly_cap: default_monthly_cap(),
            cap_reset: CapReset::default(),
        }
    }
}

// =============================================================================
// Provider Settings
// =============================================================================

/// One provider's price list as written in the config file.
///
/// A size left out of the file is not offered by that provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<Money>,
}

impl ProviderSettings {
    pub fn to_catalog(&self) -> PriceCatalog {
        let prices = [
            (Size::Small, self.small),
            (Size::Medium, self.medium),
            (Size::Large, self.large),
        ];
        PriceCatalog::new(
            self.id.as_str(),
            prices
                .into_iter()
                .filter_map(|(size, price)| price.map(|p| (size, p))),
        )
    }
}

impl From<&PriceCatalog> for ProviderSettings {
    fn from(catalog: &PriceCatalog) -> Self {
        ProviderSettings {
            id: catalog.id().to_string(),
            small: catalog.listed_price(Size::Small),
            medium: catalog.listed_price(Size::Medium),
            large: catalog.listed_price(Size::Large),
        }
    }
}

fn default_provider_settings() -> Vec<ProviderSettings> {
    default_providers().iter().map(ProviderSettings::from).collect()
}

// =============================================================================
// I/O Settings
// =============================================================================

/// Where transactions come from and where results go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoSettings {
    /// Transaction file. Default: data/input.txt
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Result file; `-` writes to stdout. Default: data/output.txt
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,
}

fn default_input() -> PathBuf {
    PathBuf::from("data/input.txt")
}

fn default_output() -> PathBuf {
    PathBuf::from("data/output.txt")
}

impl Default for IoSettings {
    fn default() -> Self {
        IoSettings {
            input: default_input(),
            output: default_output(),
            format: OutputFormat::default(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Log verbosity and destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive for the console, e.g. `info` or
    /// `courier_core=debug,info`. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append-only log file. An empty path logs to stderr only.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("logs/app.log")
}

impl LoggingSettings {
    /// The log file to open, if file logging is on.
    pub fn file_path(&self) -> Option<&Path> {
        Some(self.file.as_path()).filter(|p| !p.as_os_str().is_empty())
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete configuration for a discount run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default = "default_provider_settings")]
    pub providers: Vec<ProviderSettings>,

    #[serde(default)]
    pub io: IoSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for CourierConfig {
    fn default() -> Self {
        CourierConfig {
            pricing: PricingSettings::default(),
            providers: default_provider_settings(),
            io: IoSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl CourierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (courier.toml)
    /// 3. Environment variables
    ///
    /// An explicitly given path that does not exist is an error; a missing
    /// file at the default location is not.
    pub fn load(config_path: Option<PathBuf>) -> BatchResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading courier config from file");
                config = Self::from_file(&path)?;
            } else if explicit {
                return Err(BatchError::InvalidConfig(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without applying overrides or validating.
    pub fn from_file(path: &Path) -> BatchResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| BatchError::file(path, e))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> BatchResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| BatchError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BatchError::file(parent, e))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| BatchError::file(&path, e))?;

        info!(?path, "Courier config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BatchResult<()> {
        validate_monthly_cap(self.pricing.monthly_cap)?;
        self.catalogs().validate()?;

        EnvFilter::try_new(&self.logging.level).map_err(|e| {
            BatchError::InvalidConfig(format!("logging.level '{}': {}", self.logging.level, e))
        })?;

        if self.io.input.as_os_str().is_empty() {
            return Err(BatchError::InvalidConfig("io.input must not be empty".into()));
        }
        if self.io.output.as_os_str().is_empty() {
            return Err(BatchError::InvalidConfig("io.output must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `COURIER_*` overrides. `lookup` is `std::env::var` in
    /// production and a map in tests.
    ///
    /// Unparseable values are logged and skipped; the file or default
    /// value stays in effect.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cap) = lookup("COURIER_MONTHLY_CAP") {
            match cap.parse::<Money>() {
                Ok(parsed) => {
                    debug!(monthly_cap = %parsed, "Overriding monthly cap from environment");
                    self.pricing.monthly_cap = parsed;
                }
                Err(e) => warn!(value = %cap, error = %e, "Ignoring COURIER_MONTHLY_CAP"),
            }
        }

        if let Some(reset) = lookup("COURIER_CAP_RESET") {
            match reset.parse::<CapReset>() {
                Ok(parsed) => {
                    debug!(cap_reset = %parsed, "Overriding cap reset from environment");
                    self.pricing.cap_reset = parsed;
                }
                Err(e) => warn!(value = %reset, error = %e, "Ignoring COURIER_CAP_RESET"),
            }
        }

        if let Some(input) = lookup("COURIER_INPUT") {
            debug!(input = %input, "Overriding input file from environment");
            self.io.input = PathBuf::from(input);
        }

        if let Some(output) = lookup("COURIER_OUTPUT") {
            debug!(output = %output, "Overriding output file from environment");
            self.io.output = PathBuf::from(output);
        }

        if let Some(format) = lookup("COURIER_FORMAT") {
            match format.parse::<OutputFormat>() {
                Ok(parsed) => self.io.format = parsed,
                Err(e) => warn!(value = %format, error = %e, "Ignoring COURIER_FORMAT"),
            }
        }

        if let Some(level) = lookup("COURIER_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(file) = lookup("COURIER_LOG_FILE") {
            self.logging.file = PathBuf::from(file);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "courier", "discounts")
            .map(|dirs| dirs.config_dir().join("courier.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The configured providers as a catalog set. A repeated identifier
    /// replaces the earlier entry.
    pub fn catalogs(&self) -> CatalogSet {
        self.providers.iter().map(ProviderSettings::to_catalog).collect()
    }

    /// Builds a discount engine from this configuration.
    pub fn build_engine(&self) -> BatchResult<DiscountEngine> {
        self.validate()?;

        let mut engine =
            DiscountEngine::new(self.pricing.monthly_cap).with_cap_reset(self.pricing.cap_reset);
        engine.extend(self.providers.iter().map(ProviderSettings::to_catalog));
        engine.validate()?;

        info!(
            providers = engine.catalogs().len(),
            monthly_cap = %engine.monthly_cap(),
            cap_reset = %self.pricing.cap_reset,
            "Discount engine ready"
        );
        Ok(engine)
    }
}
