//! Configuration resolution for the genrefit engine
//!
//! Settings resolve CLI → environment → TOML → compiled default. The
//! default analysis service address matches the service's standard local
//! port.

use crate::extractor::http::DEFAULT_TIMEOUT_SECS;
use genrefit_common::config::{load_default_toml_config, resolve_setting, TomlConfig};
use genrefit_common::Result;
use std::path::PathBuf;

/// Compiled default for the analysis service base URL
pub const DEFAULT_EXTRACTOR_URL: &str = "http://127.0.0.1:5000";

/// Environment variable overriding the analysis service base URL
pub const EXTRACTOR_URL_ENV: &str = "GENREFIT_EXTRACTOR_URL";

/// Environment variable overriding the catalog file path
pub const CATALOG_PATH_ENV: &str = "GENREFIT_CATALOG";

/// Resolved engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the external analysis service
    pub extractor_url: String,
    /// Genre catalog file; `None` selects the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Per-request timeout for the analysis service
    pub request_timeout_secs: u64,
}

impl EngineConfig {
    /// Resolve configuration using the default TOML config location
    pub fn resolve(cli_extractor_url: Option<&str>, cli_catalog: Option<&PathBuf>) -> Result<Self> {
        let toml_config = load_default_toml_config()?;
        Ok(Self::resolve_with(
            cli_extractor_url,
            cli_catalog,
            &toml_config,
        ))
    }

    /// Resolve configuration against an explicit TOML config
    pub fn resolve_with(
        cli_extractor_url: Option<&str>,
        cli_catalog: Option<&PathBuf>,
        toml_config: &TomlConfig,
    ) -> Self {
        let extractor_url = resolve_setting(
            cli_extractor_url,
            EXTRACTOR_URL_ENV,
            toml_config.extractor_url.as_deref(),
            DEFAULT_EXTRACTOR_URL,
        );

        let catalog_path = cli_catalog
            .cloned()
            .or_else(|| std::env::var(CATALOG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(|| toml_config.catalog_path.clone());

        Self {
            extractor_url,
            catalog_path,
            request_timeout_secs: toml_config
                .request_timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}
