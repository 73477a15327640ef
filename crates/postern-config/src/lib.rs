// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Postern delivery core.
//!
//! Configuration is TOML with strict key checking (`deny_unknown_fields`),
//! looked up through the XDG hierarchy and overridable with `POSTERN_*`
//! environment variables. Failures render as miette diagnostics with typo
//! suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use postern_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("auto-initiate: {}", config.handshake.auto_initiate);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PosternConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns the validated config, or every deserialization and validation
/// problem found, converted to diagnostics.
pub fn load_and_validate() -> Result<PosternConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from an explicit file and validate it.
pub fn load_and_validate_path(
    path: &std::path::Path,
) -> Result<PosternConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<PosternConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read whichever config files exist so diagnostics can point into them.
fn collect_toml_sources() -> Vec<(String, String)> {
    loader::config_paths()
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let display = std::fs::canonicalize(&path)
                .unwrap_or(path)
                .display()
                .to_string();
            Some((display, content))
        })
        .collect()
}
