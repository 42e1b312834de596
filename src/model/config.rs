use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration from config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the built-in color theme
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Database location; falls back to the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            theme: default_theme(),
            db_path: None,
        }
    }
}

fn default_theme() -> String {
    "purple".into()
}

impl Config {
    /// Copy of this config with a different theme
    pub fn with_theme(&self, theme: &str) -> Config {
        Config {
            theme: theme.to_string(),
            ..self.clone()
        }
    }
}
