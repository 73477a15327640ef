// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based loader.
//!
//! Lookup order, later entries overriding earlier ones: compiled defaults,
//! `/etc/postern/postern.toml`, `~/.config/postern/postern.toml`,
//! `./postern.toml`, then `POSTERN_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PosternConfig;

/// Config sections, used to map `POSTERN_SECTION_KEY` onto `section.key`.
const SECTIONS: &[&str] = &["client", "handshake", "media", "notification"];

/// Candidate config files, lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/postern/postern.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("postern/postern.toml"));
    }
    paths.push(PathBuf::from("postern.toml"));
    paths
}

/// Build the full layered Figment before extraction.
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(PosternConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<PosternConfig, figment::Error> {
    let figment = build_figment();
    tracing::debug!(paths = ?config_paths(), "loading configuration");
    figment.extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PosternConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PosternConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file plus env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PosternConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PosternConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `POSTERN_MEDIA_PREVIEW_CONTENT_TYPES` must become
/// `media.preview_content_types`, so only the first underscore after a
/// known section name is turned into a dot. `POSTERN_LOG` belongs to the
/// log filter, not the config.
fn env_provider() -> Env {
    Env::prefixed("POSTERN_")
        .ignore(&["LOG"])
        .map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

fn map_env_key(key: &str) -> String {
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(
            map_env_key("media_preview_content_types"),
            "media.preview_content_types"
        );
        assert_eq!(map_env_key("handshake_auto_initiate"), "handshake.auto_initiate");
        assert_eq!(map_env_key("client_log_level"), "client.log_level");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }

    #[test]
    fn local_file_has_highest_file_precedence() {
        let paths = config_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from("/etc/postern/postern.toml")));
        assert_eq!(paths.last(), Some(&PathBuf::from("postern.toml")));
    }
}
