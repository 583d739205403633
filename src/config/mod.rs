use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub list: ListConfig,
}

/// Remote character API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub private_key: String,
    /// Serve the built-in fixtures even when keys are configured
    #[serde(default = "default_use_mock")]
    pub use_mock: bool,
    #[serde(default = "default_request_timeout")]
    pub timeout: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory backing the session store. In-memory when unset.
    pub session_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_seed_letters")]
    pub seed_letters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_search_limit")]
    pub limit: u32,
    #[serde(default = "default_debounce")]
    pub debounce: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_use_mock() -> bool {
    DEFAULT_USE_MOCK
}

fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_seed_letters() -> Vec<String> {
    DEFAULT_SEED_LETTERS.iter().map(|s| s.to_string()).collect()
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

fn default_debounce() -> String {
    DEFAULT_DEBOUNCE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            public_key: String::new(),
            private_key: String::new(),
            use_mock: default_use_mock(),
            timeout: default_request_timeout(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            seed_letters: default_seed_letters(),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
            debounce: default_debounce(),
        }
    }
}

impl ApiConfig {
    /// Fixtures are served when mocking is requested or either key is missing
    pub fn mock_mode(&self) -> bool {
        self.use_mock || self.public_key.is_empty() || self.private_key.is_empty()
    }

    pub fn timeout_duration(&self) -> Result<Duration> {
        humantime::parse_duration(&self.timeout)
            .with_context(|| format!("invalid api.timeout '{}'", self.timeout))
    }
}

impl ListConfig {
    pub fn debounce_duration(&self) -> Result<Duration> {
        humantime::parse_duration(&self.debounce)
            .with_context(|| format!("invalid list.debounce '{}'", self.debounce))
    }
}

impl Config {
    /// Defaults, then the TOML file when it exists, then `MARVEL_GALLERY_*` variables
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if Path::new(config_file).exists() {
            figment = figment.merge(Toml::file(config_file));
            info!("Loading configuration from: {}", config_file);
        }
        let mut config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to extract configuration")?;

        config.apply_legacy_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Fill keys and the mock switch from the variables the browser build used
    pub fn apply_legacy_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api.public_key.is_empty()
            && let Some(key) = lookup(LEGACY_PUBLIC_KEY_VAR)
        {
            self.api.public_key = key;
        }
        if self.api.private_key.is_empty()
            && let Some(key) = lookup(LEGACY_PRIVATE_KEY_VAR)
        {
            self.api.private_key = key;
        }
        if lookup(LEGACY_USE_MOCK_VAR).as_deref() == Some("true") {
            self.api.use_mock = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .with_context(|| format!("invalid api.base_url '{}'", self.api.base_url))?;
        self.api.timeout_duration()?;
        self.list.debounce_duration()?;

        if self.gallery.page_size == 0 {
            bail!("gallery.page_size must be greater than zero");
        }
        for letter in &self.gallery.seed_letters {
            let mut chars = letter.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_lowercase() => {}
                _ => bail!("gallery.seed_letters entry '{letter}' is not a single lowercase letter"),
            }
        }
        Ok(())
    }

    /// Write the default configuration as TOML
    pub fn write_default(config_file: &str) -> Result<()> {
        let contents = toml::to_string_pretty(&Self::default())?;
        std::fs::write(config_file, contents)?;
        info!("Created default config file: {}", config_file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_mock_mode() {
        let config = Config::default();
        assert!(config.api.mock_mode());
        assert_eq!(config.gallery.page_size, 40);
        assert_eq!(config.gallery.seed_letters.len(), 10);
        assert_eq!(config.api.timeout_duration().unwrap(), Duration::from_secs(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mock_mode_requires_both_keys() {
        let mut api = ApiConfig {
            public_key: "pub".to_string(),
            ..ApiConfig::default()
        };
        assert!(api.mock_mode());

        api.private_key = "priv".to_string();
        assert!(!api.mock_mode());

        api.use_mock = true;
        assert!(api.mock_mode());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
public_key = "pub"
private_key = "priv"
timeout = "5s"

[gallery]
page_size = 10
"#,
        )
        .unwrap();

        let config = Config::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.api.public_key, "pub");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_duration().unwrap(), Duration::from_secs(5));
        assert_eq!(config.gallery.page_size, 10);
        assert_eq!(config.gallery.seed_letters, default_seed_letters());
    }

    #[test]
    fn test_legacy_overrides_only_fill_missing_keys() {
        let vars: HashMap<&str, &str> = [
            (LEGACY_PUBLIC_KEY_VAR, "legacy-pub"),
            (LEGACY_PRIVATE_KEY_VAR, "legacy-priv"),
            (LEGACY_USE_MOCK_VAR, "true"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.api.public_key = "configured".to_string();
        config.apply_legacy_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api.public_key, "configured");
        assert_eq!(config.api.private_key, "legacy-priv");
        assert!(config.api.use_mock);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.gallery.seed_letters = vec!["ab".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gallery.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.timeout = "soon".to_string();
        assert!(config.validate().is_err());
    }
}
