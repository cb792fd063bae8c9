use crate::bing::{self, BING_BASE_URL, DEFAULT_MARKET, HttpClient};
use ::config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "BING_IMAGES";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Runtime settings. Fields are optional in every source so that unspecified
/// values fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scheme and host of the feed and image endpoints
    pub base_url: String,
    /// Feed market, e.g. `en-US`
    pub market: String,
    pub user_agent: String,
    /// connect and idle-read timeout in seconds; a body that keeps arriving is
    /// never cut off
    pub timeout_secs: u64,
    /// Where images are saved; the current directory when unset
    pub output_dir: Option<PathBuf>,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: BING_BASE_URL.to_string(),
            market: DEFAULT_MARKET.to_string(),
            user_agent: concat!("bing-images/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            output_dir: None,
            log_level: "warn".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// `<config dir>/bing-images/config.toml`, if the platform has a config dir
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bing-images").join("config.toml"))
    }

    /// Load settings from defaults, then the config file, then the environment.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match path {
            Some(path) => builder = builder.add_source(File::from(path).required(true)),
            None => {
                if let Some(default) = Self::default_path() {
                    builder = builder.add_source(File::from(default).required(false));
                }
            }
        }

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Directory images are written to
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// HTTP client for one run
    pub fn http_client(&self) -> bing::Result<HttpClient> {
        HttpClient::with_options(&self.base_url, &self.user_agent, self.timeout())
    }

    /// Effective settings as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod test {
    use super::{LogFormat, Settings};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.base_url, "https://www.bing.com");
        assert_eq!(settings.market, "en-US");
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.output_dir(), PathBuf::from("."));
        assert_eq!(settings.log_format, LogFormat::Text);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "market = \"de-DE\"\noutput_dir = \"/srv/wallpapers\"\nlog_format = \"json\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(path.as_path())).unwrap();

        assert_eq!(settings.market, "de-DE");
        assert_eq!(settings.output_dir, Some(PathBuf::from("/srv/wallpapers")));
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.base_url, "https://www.bing.com");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join("absent.toml");
        assert!(Settings::load(Some(absent.as_path())).is_err());
    }

    #[test]
    fn test_to_toml() {
        let toml = Settings::default().to_toml().unwrap();

        assert!(toml.contains("market = \"en-US\""));
        assert!(!toml.contains("output_dir"));
    }
}
