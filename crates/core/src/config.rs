// crates/core/src/config.rs
//! The configuration document.
//!
//! The document is owned and edited by the settings layer; this crate only
//! reads it to find the project root and any extra known hosting providers.

use crate::error::ConfigError;
use crate::repo_url::RepositoryUrlNormalizer;
use crate::resolve::resolve_directory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parsed `config.toml`. Missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root whose subdirectories are projects. Absolute or `~`-relative.
    pub project_directory: String,
    /// Extra hosts whose remotes get canonical repository URLs.
    pub known_hosts: Vec<String>,
}

impl Config {
    /// Normalizer with the built-in providers plus `known_hosts`.
    pub fn url_normalizer(&self) -> RepositoryUrlNormalizer {
        RepositoryUrlNormalizer::with_known_hosts(self.known_hosts.iter().cloned())
    }
}

/// Location of the configuration document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/proman/config.toml`
    pub fn default_location() -> Result<Self, ConfigError> {
        crate::paths::config_file_path()
            .map(Self::at)
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty document if either is
    /// missing. An existing document is left untouched.
    pub fn ensure_exists(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        if !self.path.exists() {
            std::fs::File::create(&self.path).map_err(|e| ConfigError::io(&self.path, e))?;
        }
        Ok(())
    }

    /// Read and parse the document. Re-read on every call so edits made by
    /// the settings layer are picked up by the next refresh.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let raw =
            std::fs::read_to_string(&self.path).map_err(|e| ConfigError::io(&self.path, e))?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Check a configuration, returning field name → problem for every field
/// that is unusable. An empty map means the configuration is valid.
pub fn validate_config(config: &Config) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    if let Err(e) = resolve_directory(&config.project_directory) {
        tracing::debug!(
            path = %config.project_directory,
            error = %e,
            "Validation failed on project directory"
        );
        errors.insert("project_directory".to_string(), e.to_string());
    }

    if let Some(host) = config.known_hosts.iter().find(|h| h.trim().is_empty()) {
        errors.insert(
            "known_hosts".to_string(),
            format!("host names cannot be blank (got {host:?})"),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_exists_creates_empty_document() {
        let tmp = TempDir::new().unwrap();
        let file = ConfigFile::at(tmp.path().join("proman").join("config.toml"));

        file.ensure_exists().unwrap();

        assert!(file.path().exists());
        assert_eq!(file.load().unwrap(), Config::default());
    }

    #[test]
    fn test_ensure_exists_keeps_existing_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "project_directory = \"~/code\"\n").unwrap();

        let file = ConfigFile::at(&path);
        file.ensure_exists().unwrap();

        assert_eq!(file.load().unwrap().project_directory, "~/code");
    }

    #[test]
    fn test_load_all_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "project_directory = \"/srv/projects\"\nknown_hosts = [\"gitlab.com\"]\ntheme = \"dark\"\n",
        )
        .unwrap();

        let config = ConfigFile::at(&path).load().unwrap();
        assert_eq!(config.project_directory, "/srv/projects");
        assert_eq!(config.known_hosts, vec!["gitlab.com".to_string()]);
    }

    #[test]
    fn test_load_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "project_directory = [").unwrap();

        let err = ConfigFile::at(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = ConfigFile::at(tmp.path().join("absent.toml")).load().unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validate_config() {
        let tmp = TempDir::new().unwrap();
        let valid = Config {
            project_directory: tmp.path().to_string_lossy().to_string(),
            known_hosts: vec![],
        };
        assert!(validate_config(&valid).is_empty());

        let errors = validate_config(&Config::default());
        assert_eq!(
            errors.get("project_directory").map(String::as_str),
            Some("target cannot be blank")
        );

        let errors = validate_config(&Config {
            known_hosts: vec![" ".into()],
            ..valid
        });
        assert!(errors.contains_key("known_hosts"));
        assert!(!errors.contains_key("project_directory"));
    }

    #[test]
    fn test_url_normalizer_uses_known_hosts() {
        let config = Config {
            known_hosts: vec!["gitlab.com".into()],
            ..Config::default()
        };
        assert_eq!(
            config
                .url_normalizer()
                .canonical_url("git@gitlab.com:x/y.git")
                .as_deref(),
            Some("https://gitlab.com/x/y/")
        );
    }
}
