use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::transport::TransportOptions;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
///
/// [transport]
/// timeout = 5000
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// AMap web service key.
    pub api_key: Option<String>,

    /// Overrides the public weather endpoint, e.g. for a local proxy.
    pub endpoint: Option<String>,

    #[serde(default)]
    pub transport: TransportOptions,
}

impl Config {
    /// Return the configured API key, or an error with a hint on how to set it.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` and enter your AMap key."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "amap-weather", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `weather configure`"));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());

        assert!(!cfg.is_configured());
    }

    #[test]
    fn set_api_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("AMAP_KEY".into());

        assert_eq!(cfg.api_key().expect("key must exist"), "AMAP_KEY");
        assert!(cfg.is_configured());
    }

    #[test]
    fn parse_reads_transport_section() {
        let cfg = Config::parse(
            r#"
            api_key = "AMAP_KEY"

            [transport]
            timeout = 5000
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.api_key().unwrap(), "AMAP_KEY");
        assert_eq!(cfg.endpoint, None);
        assert_eq!(cfg.transport.timeout, Some(5000));
        assert!(cfg.transport.http_errors);
    }

    #[test]
    fn parse_empty_file_gives_defaults() {
        let cfg = Config::parse("").expect("empty config is valid");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("amap-weather-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("AMAP_KEY".into());
        cfg.transport = TransportOptions::default().with_timeout(750);

        cfg.save_to(&path).expect("save succeeds");
        let loaded = Config::load_from(&path).expect("load succeeds");
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("amap-weather-does-not-exist/config.toml");
        let cfg = Config::load_from(&path).expect("missing file is not an error");
        assert!(!cfg.is_configured());
    }
}
