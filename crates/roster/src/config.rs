//! Configuration management for roster.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::HashSet;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "roster";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "colaboradores.db";

/// Default content file, relative to the working directory.
const CONTENT_FILE_NAME: &str = "content.md";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ROSTER_`, sections split on `__`,
///    e.g. `ROSTER_STORAGE__DATABASE_PATH`)
/// 2. TOML config file at `~/.config/roster/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Descriptive content configuration.
    pub content: ContentConfig,
    /// Registration form configuration.
    pub form: FormConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/roster/colaboradores.db`
    pub database_path: Option<PathBuf>,
}

/// Content-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Markdown file shown verbatim as the session banner and `about` page.
    pub path: PathBuf,
}

/// Registration form configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Choices offered for the state field.
    pub states: Vec<String>,
    /// Choices offered for the role field.
    pub roles: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(CONTENT_FILE_NAME),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            states: default_states(),
            roles: default_roles(),
        }
    }
}

/// Brazilian federative unit codes.
fn default_states() -> Vec<String> {
    [
        "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
        "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Commonly registered roles.
fn default_roles() -> Vec<String> {
    [
        "Analista",
        "Desenvolvedor",
        "Gerente",
        "Coordenador",
        "Assistente",
        "Diretor",
        "Supervisor",
        "Técnico",
        "Estagiário",
        "Consultor",
        "Especialista",
        "Outro",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ROSTER_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a form option list holds blank or repeated entries.
    pub fn validate(&self) -> Result<()> {
        validate_options("form.states", &self.form.states)?;
        validate_options("form.roles", &self.form.roles)?;
        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the content file path.
    #[must_use]
    pub fn content_path(&self) -> PathBuf {
        self.content.path.clone()
    }
}

fn validate_options(key: &str, options: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for option in options {
        if option.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: format!("{key} contains a blank entry"),
            });
        }
        if !seen.insert(option.to_lowercase()) {
            return Err(Error::ConfigValidation {
                message: format!("{key} lists '{option}' more than once"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.content.path, PathBuf::from("content.md"));
        assert_eq!(config.form.states.len(), 27);
        assert!(config.form.roles.contains(&"Analista".to_string()));
        assert!(config.form.roles.contains(&"Outro".to_string()));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_blank_option() {
        let mut config = Config::default();
        config.form.roles.push("  ".to_string());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("form.roles"));
        assert!(err.contains("blank"));
    }

    #[test]
    fn test_validate_duplicate_option() {
        let mut config = Config::default();
        config.form.states.push("sp".to_string());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("form.states"));
        assert!(err.contains("'sp'"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("colaboradores.db"));
        assert!(path.to_string_lossy().contains("roster"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("roster"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Missing file falls back to defaults
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.form, FormConfig::default());
        assert_eq!(config.content, ContentConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
database_path = "/srv/roster/team.db"

[content]
path = "docs/about.md"

[form]
roles = ["Engineer", "Manager"]
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/srv/roster/team.db"));
        assert_eq!(config.content_path(), PathBuf::from("docs/about.md"));
        assert_eq!(config.form.roles, vec!["Engineer", "Manager"]);
        assert_eq!(config.form.states.len(), 27);
    }

    #[test]
    fn test_load_rejects_invalid_toml_options() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[form]\nroles = [\"A\", \"a\"]\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_form_config_deserialize() {
        let json = r#"{"states": ["SP", "RJ"]}"#;
        let form: FormConfig = serde_json::from_str(json).unwrap();
        assert_eq!(form.states, vec!["SP", "RJ"]);
        assert_eq!(form.roles, default_roles());
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("database_path"));
        assert!(json.contains("roles"));
    }
}
