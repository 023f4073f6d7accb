// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Keepsake.
//!
//! TOML configuration with strict key checking (`deny_unknown_fields`),
//! XDG file lookup, `KEEPSAKE_` environment overrides and annotated
//! diagnostics with typo suggestions.
//!
//! ```no_run
//! use keepsake_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, ConfigSource, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{KeepsakeConfig, LoadConfig, LogConfig, StorageConfig};

use std::path::{Path, PathBuf};

use diagnostic::INLINE_SOURCE;

/// Load configuration from the file hierarchy and validate it.
///
/// Figment errors are turned into diagnostics that point into the TOML
/// files they came from.
pub fn load_and_validate() -> Result<KeepsakeConfig, Vec<ConfigError>> {
    checked(loader::load_config(), hierarchy_sources)
}

/// Load one explicit config file and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<KeepsakeConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_sources([path.to_path_buf()])
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<KeepsakeConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![ConfigSource::new(INLINE_SOURCE, toml_content)]
    })
}

/// Validate a loaded config, or explain why loading failed. Sources are
/// only read back on failure.
fn checked(
    loaded: Result<KeepsakeConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<ConfigSource>,
) -> Result<KeepsakeConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::from_figment(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

fn hierarchy_sources() -> Vec<ConfigSource> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG_PATH))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_PATH.into());
    let mut paths = vec![local];
    paths.extend(loader::user_config_path());
    paths.push(loader::SYSTEM_CONFIG_PATH.into());
    read_sources(paths)
}

fn read_sources(paths: impl IntoIterator<Item = PathBuf>) -> Vec<ConfigSource> {
    paths
        .into_iter()
        .filter_map(|path| {
            let text = std::fs::read_to_string(&path).ok()?;
            Some(ConfigSource::new(path.display().to_string(), text))
        })
        .collect()
}
