use std::env;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Environment variable carrying the currency-conversion API key.
pub const CURRENCY_API_KEY_VAR: &str = "CARDLENS_CURRENCY_API_KEY";

/// Environment variable carrying the stock-quote API key.
pub const STOCKS_API_KEY_VAR: &str = "CARDLENS_STOCKS_API_KEY";

/// Default operations export path.
fn default_operations_file() -> PathBuf {
    PathBuf::from("operations.csv")
}

/// Default CSV field delimiter.
fn default_csv_delimiter() -> char {
    ','
}

/// Default audit log path.
fn default_audit_log() -> PathBuf {
    PathBuf::from("logs/reports.log")
}

/// Default currency everything converts into.
fn default_home_currency() -> String {
    "RUB".to_string()
}

/// Default currencies shown on the dashboard.
fn default_currencies() -> Vec<String> {
    vec!["USD".to_string(), "EUR".to_string()]
}

/// Default ticker symbols shown on the dashboard.
fn default_stocks() -> Vec<String> {
    ["AAPL", "AMZN", "GOOGL", "MSFT", "TSLA"]
        .map(str::to_string)
        .to_vec()
}

/// Dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Currency the dashboard converts tracked currencies into.
    pub home_currency: String,

    /// Currencies shown on the dashboard.
    pub currencies: Vec<String>,

    /// Ticker symbols shown on the dashboard.
    pub stocks: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            home_currency: default_home_currency(),
            currencies: default_currencies(),
            stocks: default_stocks(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the operations export (CSV or XLSX). If relative, resolved
    /// from the config file's directory.
    pub operations_file: PathBuf,

    /// Field delimiter for CSV exports. Must be a single ASCII character.
    pub csv_delimiter: char,

    /// Where report audit lines go. If relative, resolved from the config
    /// file's directory.
    pub audit_log: PathBuf,

    /// Dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operations_file: default_operations_file(),
            csv_delimiter: default_csv_delimiter(),
            audit_log: default_audit_log(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config, or start from defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve a configured path relative to the config file's directory.
    fn resolve_path(&self, config_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            config_dir.join(path)
        }
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./cardlens.toml` if it exists in current directory
/// 2. `~/.config/cardlens/cardlens.toml` (XDG config directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("cardlens.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cardlens").join("cardlens.toml");
    }

    // No config dir on this platform; stay local.
    local_config
}

/// Loaded configuration with resolved paths and API keys pulled from the
/// environment.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The resolved operations export path.
    pub operations_file: PathBuf,

    /// CSV field delimiter as a raw byte.
    pub csv_delimiter: u8,

    /// The resolved audit log path.
    pub audit_log: PathBuf,

    /// Currency the dashboard converts tracked currencies into.
    pub home_currency: String,

    /// Currencies shown on the dashboard.
    pub currencies: Vec<String>,

    /// Ticker symbols shown on the dashboard.
    pub stocks: Vec<String>,

    /// API key for the currency-conversion provider, when set.
    pub currency_api_key: Option<SecretString>,

    /// API key for the stock-quote provider, when set.
    pub stocks_api_key: Option<SecretString>,
}

impl ResolvedConfig {
    /// Read a config file and resolve it into runtime settings.
    ///
    /// Relative paths resolve against the config file's parent directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?
            .to_path_buf();

        let config = Config::load(&config_path)?;
        Self::resolve(config, &config_dir)
    }

    /// Load config, falling back to defaults if the file doesn't exist.
    ///
    /// Default relative paths then resolve against the config file's
    /// intended parent directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load(config_path);
        }

        let config_path = if config_path.is_relative() {
            env::current_dir()
                .context("Failed to get current directory")?
                .join(config_path)
        } else {
            config_path.to_path_buf()
        };
        let config_dir = config_path
            .parent()
            .context("Config path has no parent directory")?
            .to_path_buf();

        Self::resolve(Config::default(), &config_dir)
    }

    fn resolve(config: Config, config_dir: &Path) -> Result<Self> {
        ensure!(
            config.csv_delimiter.is_ascii(),
            "csv_delimiter must be a single ASCII character, got {:?}",
            config.csv_delimiter
        );

        Ok(Self {
            operations_file: config.resolve_path(config_dir, &config.operations_file),
            csv_delimiter: config.csv_delimiter as u8,
            audit_log: config.resolve_path(config_dir, &config.audit_log),
            home_currency: config.dashboard.home_currency,
            currencies: config.dashboard.currencies,
            stocks: config.dashboard.stocks,
            currency_api_key: secret_from_env(CURRENCY_API_KEY_VAR),
            stocks_api_key: secret_from_env(STOCKS_API_KEY_VAR),
        })
    }

    /// The currency API key, or an error telling the user how to set it.
    pub fn require_currency_api_key(&self) -> Result<&SecretString> {
        self.currency_api_key
            .as_ref()
            .with_context(|| format!("No currency API key; set {CURRENCY_API_KEY_VAR}"))
    }

    /// The stocks API key, or an error telling the user how to set it.
    pub fn require_stocks_api_key(&self) -> Result<&SecretString> {
        self.stocks_api_key
            .as_ref()
            .with_context(|| format!("No stocks API key; set {STOCKS_API_KEY_VAR}"))
    }
}

fn secret_from_env(var: &str) -> Option<SecretString> {
    env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}
