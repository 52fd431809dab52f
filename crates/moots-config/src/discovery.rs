//! Config file discovery.

use std::path::{Path, PathBuf};

use crate::{ClientConfig, ConfigError, Result};

/// Config filename within the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application name for platform directory resolution.
const APP_NAME: &str = "moots";

/// Environment variable to override the config directory.
const CONFIG_DIR_ENV: &str = "MOOTS_CONFIG_DIR";

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The effective configuration.
    pub config: ClientConfig,
    /// Directory the config was looked up in.
    pub dir: PathBuf,
    /// Whether `config.toml` existed and was read.
    pub loaded: bool,
}

impl LoadedConfig {
    /// Path of the config file, whether or not it exists.
    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Directory for the pending authorization slot.
    pub fn state_dir(&self) -> PathBuf {
        self.config.effective_state_dir(&self.dir)
    }
}

/// Get the moots config directory.
///
/// Checks `MOOTS_CONFIG_DIR` first, then falls back to the platform default
/// (`~/.config/moots` on Linux, `~/Library/Application Support/moots` on macOS).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the path of `config.toml` in the config directory.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CONFIG_FILE))
}

/// Load configuration from the default directory, applying environment
/// overrides.
pub fn load_config() -> Result<LoadedConfig> {
    load_config_with_options(None)
}

/// Load configuration from `dir`, or the default directory when `None`.
///
/// A missing config file is not an error; defaults are used.
pub fn load_config_with_options(dir: Option<&Path>) -> Result<LoadedConfig> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => config_dir().ok_or(ConfigError::NoConfigDir)?,
    };
    let path = dir.join(CONFIG_FILE);

    let (mut config, loaded) = if path.is_file() {
        let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        (ClientConfig::from_toml(&contents)?, true)
    } else {
        (ClientConfig::default(), false)
    };

    config.apply_env(|key| std::env::var(key).ok());

    Ok(LoadedConfig {
        config,
        dir,
        loaded,
    })
}

/// Save configuration to a file.
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_toml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let loaded = load_config_with_options(Some(temp.path())).unwrap();
        assert!(!loaded.loaded);
        assert_eq!(loaded.config.timeout_secs, ClientConfig::default().timeout_secs);
        assert_eq!(loaded.state_dir(), temp.path());
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let config = ClientConfig {
            timeout_secs: 7,
            ..Default::default()
        };
        save_config(&config, &temp.path().join("config.toml")).unwrap();

        let loaded = load_config_with_options(Some(temp.path())).unwrap();
        assert!(loaded.loaded);
        assert_eq!(loaded.config.timeout_secs, 7);
        assert_eq!(loaded.path(), temp.path().join("config.toml"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("config.toml"), "server = [").unwrap();

        let err = load_config_with_options(Some(temp.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
