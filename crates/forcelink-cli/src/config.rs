//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML layout configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{fs, path::Path};

use directories::ProjectDirs;
use log::{debug, info};

use forcelink::config::LayoutConfig;

use crate::error::CliError;

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (forcelink/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// Whatever is loaded is validated before it is returned.
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - A configured value is out of range
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<LayoutConfig, CliError> {
    let config = find_config(explicit_path)?;
    config.validate()?;
    Ok(config)
}

fn find_config(explicit_path: Option<impl AsRef<Path>>) -> Result<LayoutConfig, CliError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("forcelink/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "forcelink", "forcelink") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(LayoutConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: impl AsRef<Path>) -> Result<LayoutConfig, CliError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CliError::MissingConfig(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| CliError::ConfigParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_explicit_file_is_merged_over_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "iterations = 50\nanimate = false\n\n[async]\nenabled = false").unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.iterations(), 50);
        assert!(!config.animate());
        assert!(config.asynchronous().is_none());
        assert_eq!(config.step_budget(), 50);
        assert!(config.fit());
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = load_config(Some("does/not/exist.toml"));

        assert!(matches!(result, Err(CliError::MissingConfig(_))));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "iterations = \"many\"").unwrap();

        let result = load_config(Some(file.path()));

        assert!(matches!(result, Err(CliError::ConfigParse(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[physics]\ntheta = 1.5").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();

        assert!(err.to_string().contains("theta"), "{err}");
    }
}
