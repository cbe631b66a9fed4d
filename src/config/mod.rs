//! @acp:module "Configuration"
//! @acp:summary "Project configuration loading and defaults"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = ".docsync.config.json";

/// @acp:summary "Main docsync configuration structure"
/// @acp:lock normal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding model classes, relative to the project root
    #[serde(default = "default_models_root")]
    pub models_root: PathBuf,

    /// Directory holding other annotated classes, walked recursively
    #[serde(default = "default_classes_root")]
    pub classes_root: PathBuf,

    /// Connection used by models without `protected $connection`
    #[serde(default = "default_connection")]
    pub default_connection: String,

    /// Connection name to schema source (`.json` snapshot, or a SQLite file)
    #[serde(default = "default_connections")]
    pub connections: HashMap<String, PathBuf>,

    /// Description inserted into model blocks without any free text; empty disables
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// `@mixin` targets every model block must carry
    #[serde(default = "default_mixins")]
    pub mixins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models_root: default_models_root(),
            classes_root: default_classes_root(),
            default_connection: default_connection(),
            connections: default_connections(),
            placeholder: default_placeholder(),
            mixins: default_mixins(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a .docsync.config.json file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn default_models_root() -> PathBuf {
    PathBuf::from("app/Models")
}

fn default_classes_root() -> PathBuf {
    PathBuf::from("app/Http")
}

fn default_connection() -> String {
    "mysql".to_string()
}

fn default_connections() -> HashMap<String, PathBuf> {
    HashMap::from([(
        "mysql".to_string(),
        PathBuf::from("database/schema/mysql.json"),
    )])
}

fn default_placeholder() -> String {
    "<Class description here>".to_string()
}

fn default_mixins() -> Vec<String> {
    vec!["\\Illuminate\\Database\\Eloquent\\Builder".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.models_root, PathBuf::from("app/Models"));
        assert_eq!(config.mixins, vec!["\\Illuminate\\Database\\Eloquent\\Builder"]);
    }

    #[test]
    fn test_partial_override() {
        let config: Config =
            serde_json::from_str(r#"{"placeholder": "", "default_connection": "sqlite"}"#).unwrap();
        assert!(config.placeholder.is_empty());
        assert_eq!(config.default_connection, "sqlite");
        assert_eq!(config.classes_root, PathBuf::from("app/Http"));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config
            .connections
            .insert("reporting".to_string(), PathBuf::from("database/reporting.sqlite"));
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(temp.path().join("nope.json")).is_err());
    }
}
