// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::PosternConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &PosternConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.client.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "client.log_level `{}` must be one of {}",
                config.client.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.client.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "client.name must not be empty".to_string(),
        });
    }

    for content_type in &config.media.preview_content_types {
        if !is_mime_shaped(content_type) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "media.preview_content_types entry `{content_type}` is not a `type/subtype` content type"
                ),
            });
        }
    }

    if config.notification.expiry_warning_hours == 0 {
        errors.push(ConfigError::Validation {
            message: "notification.expiry_warning_hours must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_mime_shaped(value: &str) -> bool {
    let valid_token = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'))
    };
    match value.split_once('/') {
        Some((kind, subtype)) => valid_token(kind) && valid_token(subtype),
        None => false,
    }
}
