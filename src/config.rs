//! Layered settings.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `DEVWATCH_*` environment variables, then command-line flags.
//!
//! ```toml
//! base_url = "http://monitor.lan:8000"
//! refresh_secs = 30
//! auto_refresh = true
//! theme = "dark"
//!
//! [icons]
//! router = "R"
//! switch = "S"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::ui::ThemeChoice;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub file: Option<PathBuf>,
    pub refresh_secs: Option<u64>,
    pub auto_refresh: Option<bool>,
    pub log_file: Option<PathBuf>,
    pub theme: Option<ThemeChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    /// Read devices from a JSON file instead of the server.
    #[serde(default)]
    pub file: Option<PathBuf>,
    pub refresh_secs: u64,
    pub auto_refresh: bool,
    pub request_timeout_secs: u64,
    pub csrf_cookie: String,
    /// Fixed token; otherwise it is read from the session cookie.
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub theme: ThemeChoice,
    #[serde(default)]
    pub icons: HashMap<String, String>,
}

impl Settings {
    /// Load and validate settings.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("refresh_secs", 15u64)?
            .set_default("auto_refresh", false)?
            .set_default("request_timeout_secs", 10u64)?
            .set_default("csrf_cookie", "csrftoken")?
            .set_default("log_level", "info")?
            .set_default("theme", ThemeChoice::Auto.as_str())?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let path_string = |p: &PathBuf| p.to_string_lossy().into_owned();
        let settings: Settings = builder
            .add_source(Environment::with_prefix("DEVWATCH").try_parsing(true))
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("file", overrides.file.as_ref().map(path_string))?
            .set_override_option("refresh_secs", overrides.refresh_secs)?
            .set_override_option("auto_refresh", overrides.auto_refresh)?
            .set_override_option("log_file", overrides.log_file.as_ref().map(path_string))?
            .set_override_option("theme", overrides.theme.map(|t| t.as_str()))?
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.refresh_secs > 0, "refresh_secs must be at least 1");
        ensure!(self.request_timeout_secs > 0, "request_timeout_secs must be at least 1");
        ensure!(!self.base_url.trim().is_empty(), "base_url must not be empty");
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Log file location, defaulting to the system temp dir.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| std::env::temp_dir().join("devwatch.log"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None, &Overrides::default()).unwrap();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.refresh_interval(), Duration::from_secs(15));
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.csrf_cookie, "csrftoken");
        assert!(!settings.auto_refresh);
        assert!(settings.icons.is_empty());
        assert!(settings.log_path().ends_with("devwatch.log"));
    }

    #[test]
    fn test_file_values() {
        let file = write_config(
            r#"
            base_url = "http://monitor.lan:8000"
            refresh_secs = 30
            auto_refresh = true
            theme = "light"

            [icons]
            switch = "S"
            "#,
        );
        let settings = Settings::load(Some(file.path()), &Overrides::default()).unwrap();
        assert_eq!(settings.base_url, "http://monitor.lan:8000");
        assert_eq!(settings.refresh_secs, 30);
        assert!(settings.auto_refresh);
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert_eq!(settings.icons.get("switch").map(String::as_str), Some("S"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = write_config("refresh_secs = 30\nauto_refresh = true\n");
        let overrides = Overrides {
            refresh_secs: Some(5),
            auto_refresh: Some(false),
            theme: Some(ThemeChoice::Dark),
            ..Default::default()
        };
        let settings = Settings::load(Some(file.path()), &overrides).unwrap();
        assert_eq!(settings.refresh_secs, 5);
        assert!(!settings.auto_refresh);
        assert_eq!(settings.theme, ThemeChoice::Dark);
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let overrides = Overrides {
            refresh_secs: Some(0),
            ..Default::default()
        };
        assert!(Settings::load(None, &overrides).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/devwatch.toml");
        let result = Settings::load(Some(missing), &Overrides::default());
        assert!(result.is_err());
    }
}
