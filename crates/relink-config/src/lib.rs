//! Configuration management for Relink.
//!
//! Parses `relink.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The configuration describes the installation the link rewriter works
//! against: the public document root, the sites (base URLs, languages,
//! route tables) and the file storages with their file index.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `public_dir`
//! - `sites.base`

mod expand;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the public document root.
    pub public_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "relink.toml";

/// Public directory used when the config does not name one.
const DEFAULT_PUBLIC_DIR: &str = "public";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Public document root as written in TOML (relative to the config file).
    #[serde(rename = "public_dir")]
    public_dir_raw: Option<String>,
    /// Sites served by the installation.
    pub sites: Vec<SiteConfig>,
    /// File storages and their indexed files.
    pub storages: Vec<StorageConfig>,

    /// Resolved public document root (set after loading).
    #[serde(skip)]
    pub public_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// A site served by the installation.
#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// Unique site identifier.
    pub identifier: String,
    /// Base URL (e.g., `https://example.com/` or `https://example.com/shop/`).
    pub base: String,
    /// Site belongs to the installation but has no routing of its own.
    #[serde(default)]
    pub placeholder: bool,
    /// Site languages. Defaults to a single default language on `/`.
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageConfig>,
    /// Last path segment suffixes that select a page type (e.g., `feed.xml`).
    #[serde(default)]
    pub page_types: BTreeMap<String, u32>,
    /// Page routes.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// A site language.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Language id (0 is the default language).
    pub id: u32,
    /// Path prefix below the site base (e.g., `/de/`).
    #[serde(default = "default_language_base")]
    pub base: String,
}

/// A page route.
#[derive(Debug, Deserialize)]
pub struct RouteConfig {
    /// Route path, with optional `{placeholder}` segments.
    pub path: String,
    /// Target page id.
    pub page: u64,
    /// Page title shown in rewrite notices.
    pub title: Option<String>,
    /// Extra routing arguments. Keys may use bracket notation
    /// (`tx_news[action]`), values may reference placeholders.
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
}

/// A file storage.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Storage uid used in combined identifiers (`1:/doc.pdf`).
    pub uid: u32,
    /// Storage location below the public directory (e.g., `fileadmin/`).
    pub base_path: String,
    /// Indexed files of this storage.
    #[serde(default)]
    pub files: Vec<FileConfig>,
}

/// An indexed file.
#[derive(Debug, Deserialize)]
pub struct FileConfig {
    /// Stable file id.
    pub uid: u64,
    /// Identifier inside the storage (e.g., `/doc.pdf`).
    pub identifier: String,
    /// File title shown in rewrite notices.
    pub title: Option<String>,
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![LanguageConfig {
        id: 0,
        base: default_language_base(),
    }]
}

fn default_language_base() -> String {
    "/".to_owned()
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sites.base`").
        field: String,
        /// Error message (e.g., "${`SITE_BASE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a path field to start with a slash.
fn require_leading_slash(value: &str, field: &str) -> Result<(), ConfigError> {
    if !value.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must start with /, got \"{value}\""
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `relink.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(public_dir) = &settings.public_dir {
            self.public_dir.clone_from(public_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        Self::discover_config_from(&std::env::current_dir().ok()?)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            public_dir_raw: None,
            sites: Vec::new(),
            storages: Vec::new(),
            public_dir: base.join(DEFAULT_PUBLIC_DIR),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_sites()?;
        self.validate_storages()?;
        Ok(())
    }

    fn validate_sites(&self) -> Result<(), ConfigError> {
        let mut identifiers = HashSet::new();

        for site in &self.sites {
            require_non_empty(&site.identifier, "sites.identifier")?;
            if !identifiers.insert(site.identifier.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate site identifier \"{}\"",
                    site.identifier
                )));
            }

            let field = format!("sites.{}.base", site.identifier);
            require_non_empty(&site.base, &field)?;
            require_http_url(&site.base, &field)?;

            if site.languages.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "site \"{}\" needs at least one language",
                    site.identifier
                )));
            }
            let mut language_ids = HashSet::new();
            for language in &site.languages {
                if !language_ids.insert(language.id) {
                    return Err(ConfigError::Validation(format!(
                        "duplicate language id {} in site \"{}\"",
                        language.id, site.identifier
                    )));
                }
                require_leading_slash(
                    &language.base,
                    &format!("sites.{}.languages.base", site.identifier),
                )?;
            }

            for route in &site.routes {
                require_leading_slash(
                    &route.path,
                    &format!("sites.{}.routes.path", site.identifier),
                )?;
            }
        }

        Ok(())
    }

    fn validate_storages(&self) -> Result<(), ConfigError> {
        let mut uids = HashSet::new();

        for storage in &self.storages {
            if !uids.insert(storage.uid) {
                return Err(ConfigError::Validation(format!(
                    "duplicate storage uid {}",
                    storage.uid
                )));
            }
            for file in &storage.files {
                require_leading_slash(
                    &file.identifier,
                    &format!("storages.{}.files.identifier", storage.uid),
                )?;
            }
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref public_dir) = self.public_dir_raw {
            self.public_dir_raw = Some(expand::expand_env(public_dir, "public_dir")?);
        }

        for site in &mut self.sites {
            site.base = expand::expand_env(&site.base, "sites.base")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.public_dir =
            config_dir.join(self.public_dir_raw.as_deref().unwrap_or(DEFAULT_PUBLIC_DIR));
    }
}
