//! Configuration file loading for the CLI
//!
//! This module finds the TOML configuration of a run, loads it and validates
//! it, so that a bad value is reported together with the file it came from.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use galleria::{GalleryError, config::AppConfig};

/// Configuration file looked up relative to the working directory.
const LOCAL_CONFIG: &str = "galleria/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid configuration in {}: {message}", path.display())]
    Validation { path: PathBuf, message: String },
}

impl From<ConfigError> for GalleryError {
    fn from(err: ConfigError) -> Self {
        GalleryError::Config(err.to_string())
    }
}

/// Where the configuration of a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    /// Path passed with `--config`.
    Explicit(PathBuf),
    /// `galleria/config.toml` in the working directory.
    Local(PathBuf),
    /// Platform configuration directory.
    System(PathBuf),
    /// No file; built-in defaults.
    Default,
}

impl ConfigSource {
    fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Local(path) | Self::System(path) => Some(path),
            Self::Default => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "explicit path {}", path.display()),
            Self::Local(path) => write!(f, "local path {}", path.display()),
            Self::System(path) => write!(f, "system path {}", path.display()),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

/// Find, load and validate the configuration
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (galleria/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns [`GalleryError::Config`] if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - Config file describes an invalid gallery
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, GalleryError> {
    let source = locate_config(explicit_path.as_ref().map(|path| path.as_ref()));
    info!(source:% = source; "Loading configuration");

    match source.path() {
        Some(path) => load_config_file(path),
        None => Ok(AppConfig::default()),
    }
}

fn locate_config(explicit_path: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit_path {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        return ConfigSource::Local(local_config.to_path_buf());
    }

    match ProjectDirs::from("com", "galleria", "galleria") {
        Some(proj_dirs) => {
            let system_config = proj_dirs.config_dir().join("config.toml");
            if system_config.exists() {
                return ConfigSource::System(system_config);
            }
            debug!(path = system_config.display().to_string(); "System configuration file not found");
        }
        None => debug!("Could not determine platform-specific config directory"),
    }

    ConfigSource::Default
}

/// Load and validate configuration from a TOML file
///
/// Validation runs before command-line overrides are applied, so a file
/// that is invalid on its own is rejected even if flags would repair it.
fn load_config_file(path: &Path) -> Result<AppConfig, GalleryError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    config.validate().map_err(|err| {
        let message = match err {
            GalleryError::Config(message) => message,
            other => other.to_string(),
        };
        ConfigError::Validation {
            path: path.to_path_buf(),
            message,
        }
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use galleria::config::AvatarFailurePolicy;
    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_load_explicit_file() {
        let file = config_file(
            "[gallery]\navatar_size = 32\non_avatar_error = \"skip\"\n\n[network]\nconcurrency = 2\n",
        );

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.gallery().avatar_size(), 32);
        assert_eq!(config.gallery().columns_per_row(), 10);
        assert_eq!(config.gallery().on_avatar_error(), AvatarFailurePolicy::Skip);
        assert_eq!(config.network().concurrency(), 2);
    }

    #[test]
    fn test_explicit_path_wins() {
        let file = config_file("");
        assert_eq!(
            locate_config(Some(file.path())),
            ConfigSource::Explicit(file.path().to_path_buf())
        );
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(GalleryError::Config(msg)) if msg.contains("Missing configuration file")));
    }

    #[test]
    fn test_invalid_toml_names_file() {
        let file = config_file("[gallery\navatar_size = ");
        let expected = file.path().display().to_string();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(GalleryError::Config(msg)) if msg.contains("TOML") && msg.contains(&expected)));
    }

    #[test]
    fn test_invalid_values_name_file() {
        let file = config_file("[gallery]\ncolumns_per_row = 0\n");
        let expected = file.path().display().to_string();

        let result = load_config(Some(file.path()));
        assert!(matches!(
            result,
            Err(GalleryError::Config(msg))
                if msg.contains(&expected) && msg.contains("columns_per_row must be at least 1")
        ));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ConfigSource::Default.to_string(), "built-in defaults");
        assert_eq!(ConfigSource::Default.path(), None);
        assert_eq!(
            ConfigSource::Local(PathBuf::from(LOCAL_CONFIG)).to_string(),
            "local path galleria/config.toml"
        );
    }
}
