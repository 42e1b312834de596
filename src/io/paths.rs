use std::path::{Path, PathBuf};

use crate::model::Config;

/// Directory name used under the platform data and config directories
pub const APP_DIR: &str = "tsk";

/// Overrides the database location when `--db` is not given
pub const DB_ENV: &str = "TSK_DB";

/// Overrides the config file location
pub const CONFIG_ENV: &str = "TSK_CONFIG";

/// `$XDG_DATA_HOME/tsk` (or the platform equivalent), with a
/// `~/.local/share/tsk` fallback.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Location of config.toml, honoring `TSK_CONFIG`.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Database path by precedence: explicit flag, `TSK_DB`, config, data dir.
pub fn resolve_db_path(flag: Option<&Path>, config: &Config) -> PathBuf {
    let env = std::env::var_os(DB_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    pick_db_path(flag, env, config)
}

fn pick_db_path(flag: Option<&Path>, env: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or(env)
        .or_else(|| config.db_path.clone())
        .unwrap_or_else(|| data_dir().join("tsk.db"))
}

/// Where the interactive session writes its log
pub fn log_dir() -> PathBuf {
    data_dir()
}
