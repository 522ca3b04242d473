//! Application configuration for fomc-corpus.
//!
//! User config lives at `~/.fomc-corpus/fomc-corpus.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FomcError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "fomc-corpus.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".fomc-corpus";

// ---------------------------------------------------------------------------
// Config structs (matching fomc-corpus.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Target site settings.
    #[serde(default)]
    pub site: SiteConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Root directory for datasets and PDF dumps.
    #[serde(default = "default_base_dir")]
    pub base_dir: String,

    /// First year to fetch.
    #[serde(default = "default_from_year")]
    pub from_year: i32,

    /// Maximum concurrent document fetches.
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,

    /// Show progress while fetching.
    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            from_year: default_from_year(),
            max_threads: default_max_threads(),
            verbose: default_true(),
        }
    }
}

fn default_base_dir() -> String {
    "../data/FOMC/".into()
}
fn default_from_year() -> i32 {
    1990
}
fn default_max_threads() -> usize {
    10
}
fn default_true() -> bool {
    true
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin all listing and document URLs are built from.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional bound on each HTTP request. Unset means requests may block
    /// indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "https://www.federalreserve.gov".into()
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Site origin, e.g. `https://www.federalreserve.gov`.
    pub base_url: Url,
    /// Root directory for cache artifacts (PDF dumps).
    pub base_dir: PathBuf,
    /// Fetcher concurrency (K).
    pub max_threads: usize,
    /// Progress reporting only; has no behavioral effect.
    pub verbose: bool,
    /// Per-request timeout, if any.
    pub request_timeout: Option<Duration>,
}

impl PipelineConfig {
    /// Build a runtime config from an [`AppConfig`], validating it.
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let base_url = Url::parse(&config.site.base_url).map_err(|e| {
            FomcError::config(format!("invalid base_url {:?}: {e}", config.site.base_url))
        })?;

        if config.defaults.max_threads == 0 {
            return Err(FomcError::config("max_threads must be at least 1"));
        }

        Ok(Self {
            base_url,
            base_dir: PathBuf::from(&config.defaults.base_dir),
            max_threads: config.defaults.max_threads,
            verbose: config.defaults.verbose,
            request_timeout: config.site.request_timeout_secs.map(Duration::from_secs),
        })
    }

    /// Join a site-relative path onto the base URL.
    pub fn site_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| FomcError::config(format!("cannot join {path:?} onto base_url: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.fomc-corpus/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| FomcError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.fomc-corpus/fomc-corpus.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FomcError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| FomcError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FomcError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FomcError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FomcError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
