/// Console configuration
use crate::error::{CliError, Result};
use dining_admin::ListConfig;
use dining_client::{GatewayConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "dining-admin.toml";

/// Environment variable prefix, e.g. `DINING_API__BASE_URL`.
pub const ENV_PREFIX: &str = "DINING";

const DEBOUNCE_RANGE_MS: std::ops::RangeInclusive<u64> = 50..=5000;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_session")]
    pub session: SessionSettings,

    #[serde(default = "default_lists")]
    pub lists: ListSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListSettings {
    #[serde(default = "default_users_page_size")]
    pub users_page_size: u32,

    #[serde(default = "default_catalog_page_size")]
    pub restaurants_page_size: u32,

    #[serde(default = "default_catalog_page_size")]
    pub meals_page_size: u32,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    #[serde(default = "default_users_search_debounce_ms")]
    pub users_search_debounce_ms: u64,
}

impl AdminConfig {
    /// Load configuration from defaults, a config file, and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(
            path,
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Same as [`AdminConfig::load`] with an explicit environment source.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(env);

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(CliError::Config(
                "api.base_url is required (set DINING_API__BASE_URL)".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "api.base_url must start with http:// or https:// (got {:?})",
                base_url
            )));
        }
        url::Url::parse(base_url)
            .map_err(|e| CliError::Config(format!("api.base_url is invalid: {}", e)))?;

        for (name, size) in [
            ("lists.users_page_size", self.lists.users_page_size),
            ("lists.restaurants_page_size", self.lists.restaurants_page_size),
            ("lists.meals_page_size", self.lists.meals_page_size),
        ] {
            if size == 0 {
                return Err(CliError::Config(format!("{} must be at least 1", name)));
            }
        }

        for (name, ms) in [
            ("lists.search_debounce_ms", self.lists.search_debounce_ms),
            ("lists.users_search_debounce_ms", self.lists.users_search_debounce_ms),
        ] {
            if !DEBOUNCE_RANGE_MS.contains(&ms) {
                return Err(CliError::Config(format!(
                    "{} must be between {} and {} (got {})",
                    name,
                    DEBOUNCE_RANGE_MS.start(),
                    DEBOUNCE_RANGE_MS.end(),
                    ms
                )));
            }
        }

        Ok(())
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.api.base_url.trim()).with_timeouts(
            Duration::from_secs(self.api.timeout_secs),
            Duration::from_secs(self.api.connect_timeout_secs),
        )
    }

    pub fn users_list(&self) -> ListConfig {
        ListConfig::users()
            .with_page_size(self.lists.users_page_size)
            .with_debounce(Duration::from_millis(self.lists.users_search_debounce_ms))
    }

    pub fn restaurants_list(&self) -> ListConfig {
        ListConfig::restaurants()
            .with_page_size(self.lists.restaurants_page_size)
            .with_debounce(Duration::from_millis(self.lists.search_debounce_ms))
    }

    pub fn meals_list(&self) -> ListConfig {
        ListConfig::meals()
            .with_page_size(self.lists.meals_page_size)
            .with_debounce(Duration::from_millis(self.lists.search_debounce_ms))
    }
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        base_url: default_base_url(),
        timeout_secs: default_timeout_secs(),
        connect_timeout_secs: default_connect_timeout_secs(),
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_session() -> SessionSettings {
    SessionSettings {
        path: default_session_path(),
    }
}

fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .map_or_else(|| PathBuf::from(".dining-admin"), |dir| dir.join("dining-admin"))
        .join("session.json")
}

fn default_lists() -> ListSettings {
    ListSettings {
        users_page_size: default_users_page_size(),
        restaurants_page_size: default_catalog_page_size(),
        meals_page_size: default_catalog_page_size(),
        search_debounce_ms: default_search_debounce_ms(),
        users_search_debounce_ms: default_users_search_debounce_ms(),
    }
}

fn default_users_page_size() -> u32 {
    100
}

fn default_catalog_page_size() -> u32 {
    9
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_users_search_debounce_ms() -> u64 {
    500
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            session: default_session(),
            lists: default_lists(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = AdminConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.lists.users_page_size, 100);
        assert_eq!(config.lists.meals_page_size, 9);
        assert!(config.session.path.ends_with("dining-admin/session.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_then_env_layering() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:4000\"\ntimeout_secs = 5\n\n[lists]\nmeals_page_size = 12"
        )
        .unwrap();

        let config = AdminConfig::load_with_env(
            Some(file.path()),
            env(&[("DINING_API__TIMEOUT_SECS", "7")]),
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:4000");
        assert_eq!(config.api.timeout_secs, 7);
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert_eq!(config.lists.meals_page_size, 12);
        assert_eq!(config.lists.restaurants_page_size, 9);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AdminConfig::load_with_env(Some(&dir.path().join("nope.toml")), env(&[]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = AdminConfig::default();
        config.api.base_url = String::new();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        config.api.base_url = "http://localhost:4000".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_lists() {
        let mut config = AdminConfig::default();
        config.lists.restaurants_page_size = 0;
        assert!(config.validate().is_err());

        let mut config = AdminConfig::default();
        config.lists.search_debounce_ms = 10;
        assert!(config.validate().is_err());

        config.lists.search_debounce_ms = 5000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_list_configs() {
        let mut config = AdminConfig::default();
        config.lists.meals_page_size = 12;
        let meals = config.meals_list();
        assert_eq!(meals.page_size, 12);
        assert_eq!(meals.residual_filters.len(), 2);
        assert_eq!(config.users_list().debounce, Duration::from_millis(500));
        assert_eq!(config.restaurants_list().debounce, Duration::from_millis(300));
    }
}
