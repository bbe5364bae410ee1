//! Application configuration loaded from a TOML file
//!
//! Lookup order: `$MELODECK_CONFIG`, then `config.toml` in the platform config
//! directory. Missing files fall back to defaults. `MELODECK_API_URL` overrides
//! the catalog base URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_MIN_QUERY_LEN;

const CONFIG_ENV: &str = "MELODECK_CONFIG";
const API_URL_ENV: &str = "MELODECK_API_URL";
const CONFIG_FILE: &str = "config.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "melodeck")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog API root, without a trailing slash
    pub api_base_url: String,
    pub search_debounce_ms: u64,
    pub min_query_len: usize,
    pub request_timeout_secs: u64,
    /// Where the library snapshot lives
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Genre shelves shown on the home screen
    pub genres: Vec<String>,
    /// When false the library only lives in memory
    pub persist_library: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let dirs = project_dirs();
        let data_dir = dirs
            .as_ref()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".melodeck"));
        let log_dir = dirs
            .as_ref()
            .map(|d| d.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from(".logs"));

        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            search_debounce_ms: 800,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            request_timeout_secs: 15,
            data_dir,
            log_dir,
            genres: ["pop", "rock", "hip-hop", "jazz", "electronic"]
                .iter()
                .map(|g| g.to_string())
                .collect(),
            persist_library: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment-selected or default location
    pub fn load() -> Result<Self> {
        let path = Self::resolve_path(std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let mut config = match path {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_api_override(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    /// Explicit path wins, otherwise the platform config directory
    pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| project_dirs().map(|d| d.config_dir().join(CONFIG_FILE)))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    fn apply_api_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.search_debounce(), Duration::from_millis(800));
        assert_eq!(config.min_query_len, 2);
        assert!(config.persist_library);
        assert!(!config.genres.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"
            api_base_url = "https://catalog.example/api/"
            genres = ["ambient"]
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://catalog.example/api");
        assert_eq!(config.genres, vec!["ambient".to_string()]);
        assert_eq!(config.search_debounce_ms, 800);
        assert_eq!(config.request_timeout_secs, 15);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "search_debounce_ms = 250\npersist_library = false\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.search_debounce(), Duration::from_millis(250));
        assert!(!config.persist_library);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "search_debounce_ms = \"soon\"").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        assert_eq!(AppConfig::resolve_path(Some(explicit.clone())), Some(explicit));
    }

    #[test]
    fn test_api_override() {
        let mut config = AppConfig::default();
        config.apply_api_override(Some("  ".to_string()));
        assert_eq!(config.api_base_url, "http://localhost:3000/api");

        config.apply_api_override(Some("https://other.example/".to_string()));
        assert_eq!(config.api_base_url, "https://other.example");
    }
}
