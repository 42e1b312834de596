use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::model::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config {path}: {source}")]
    Document {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
}

/// Read the config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `config` to `path`, keeping any comments and unknown keys already in
/// the file.
pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let existing = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let mut doc: toml_edit::DocumentMut =
        existing.parse().map_err(|source| ConfigError::Document {
            path: path.to_path_buf(),
            source,
        })?;
    apply_config(&mut doc, config);

    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(write_err)?;
    }
    atomic_write(path, doc.to_string().as_bytes()).map_err(write_err)?;
    debug!(path = %path.display(), theme = %config.theme, "config saved");
    Ok(())
}

/// Update the document's keys from `config`
fn apply_config(doc: &mut toml_edit::DocumentMut, config: &Config) {
    doc["theme"] = toml_edit::value(config.theme.as_str());
    match &config.db_path {
        Some(db) => doc["db_path"] = toml_edit::value(db.to_string_lossy().as_ref()),
        None => {
            doc.remove("db_path");
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_creates_file_and_loads_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tsk/config.toml");
        let config = Config::default().with_theme("forest");
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_save_preserves_comments_and_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let original = "# my settings\ntheme = \"purple\" # favourite\nextra = 3\n";
        fs::write(&path, original).unwrap();

        save_config(&path, &Config::default().with_theme("ocean")).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# my settings\n"));
        assert!(written.contains("theme = \"ocean\""));
        assert!(written.contains("extra = 3"));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "theme = [").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
