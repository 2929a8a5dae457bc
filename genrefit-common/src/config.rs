//! Configuration loading for genrefit
//!
//! Settings resolve with a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of the genrefit TOML config file
///
/// Every field is optional; missing fields fall through to the next
/// resolution tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the external audio analysis service
    pub extractor_url: Option<String>,
    /// Path to a JSON genre catalog file
    pub catalog_path: Option<PathBuf>,
    /// Per-request timeout for the analysis service, in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Default configuration file path for the platform
///
/// `~/.config/genrefit/config.toml` on Linux, the platform config dir
/// elsewhere. Returns `None` when the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("genrefit").join("config.toml"))
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "Config file loaded");
    Ok(config)
}

/// Load the config file from the default location, if one exists
///
/// A missing file is not an error — it resolves to the empty config so the
/// remaining tiers apply.
pub fn load_default_toml_config() -> Result<TomlConfig> {
    match default_config_path() {
        Some(path) if path.exists() => load_toml_config(&path),
        _ => Ok(TomlConfig::default()),
    }
}

/// Resolve one string setting through the CLI → ENV → TOML → default chain
pub fn resolve_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
    default: &str,
) -> String {
    if let Some(value) = cli_arg {
        return value.to_string();
    }
    if let Ok(value) = std::env::var(env_var_name) {
        if !value.trim().is_empty() {
            return value;
        }
    }
    if let Some(value) = toml_value {
        return value.to_string();
    }
    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const TEST_ENV_VAR: &str = "GENREFIT_TEST_SETTING";

    #[test]
    #[serial]
    fn test_cli_arg_wins_over_env() {
        std::env::set_var(TEST_ENV_VAR, "from-env");
        let value = resolve_setting(Some("from-cli"), TEST_ENV_VAR, Some("from-toml"), "default");
        std::env::remove_var(TEST_ENV_VAR);
        assert_eq!(value, "from-cli");
    }

    #[test]
    #[serial]
    fn test_env_wins_over_toml() {
        std::env::set_var(TEST_ENV_VAR, "from-env");
        let value = resolve_setting(None, TEST_ENV_VAR, Some("from-toml"), "default");
        std::env::remove_var(TEST_ENV_VAR);
        assert_eq!(value, "from-env");
    }

    #[test]
    #[serial]
    fn test_toml_wins_over_default() {
        std::env::remove_var(TEST_ENV_VAR);
        let value = resolve_setting(None, TEST_ENV_VAR, Some("from-toml"), "default");
        assert_eq!(value, "from-toml");
    }

    #[test]
    #[serial]
    fn test_default_when_nothing_set() {
        std::env::remove_var(TEST_ENV_VAR);
        let value = resolve_setting(None, TEST_ENV_VAR, None, "default");
        assert_eq!(value, "default");
    }

    #[test]
    fn test_load_toml_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "extractor_url = \"http://analysis.local:5000\"\nrequest_timeout_secs = 45"
        )
        .unwrap();

        let config = load_toml_config(file.path()).unwrap();
        assert_eq!(
            config.extractor_url.as_deref(),
            Some("http://analysis.local:5000")
        );
        assert_eq!(config.request_timeout_secs, Some(45));
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn test_load_toml_config_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "extractor_url = [not toml").unwrap();

        let err = load_toml_config(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
