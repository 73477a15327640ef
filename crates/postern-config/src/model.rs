// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! Every struct rejects unknown keys so a typo fails loudly at startup
//! instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level Postern configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PosternConfig {
    /// Client identity and logging.
    #[serde(default)]
    pub client: ClientConfig,

    /// Key exchange behavior.
    #[serde(default)]
    pub handshake: HandshakeConfig,

    /// Media thumbnail and preview behavior.
    #[serde(default)]
    pub media: MediaConfig,

    /// MMS notification display.
    #[serde(default)]
    pub notification: NotificationConfig,
}

/// Client identity and logging.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Name reported in logs.
    #[serde(default = "default_client_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: default_client_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_client_name() -> String {
    "postern".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Key exchange behavior.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HandshakeConfig {
    /// Start a handshake automatically the first time an unsecured
    /// incoming message shows up in a one-to-one thread.
    #[serde(default = "default_true")]
    pub auto_initiate: bool,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            auto_initiate: true,
        }
    }
}

/// Media thumbnail and preview behavior.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Resolve and show thumbnails for media messages.
    #[serde(default = "default_true")]
    pub thumbnails: bool,

    /// Content types opened in the in-app preview. Anything else goes
    /// through the external viewer warning.
    #[serde(default = "default_preview_content_types")]
    pub preview_content_types: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            thumbnails: true,
            preview_content_types: default_preview_content_types(),
        }
    }
}

fn default_preview_content_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/gif", "image/webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// MMS notification display.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// Notifications expiring within this many hours are flagged.
    #[serde(default = "default_expiry_warning_hours")]
    pub expiry_warning_hours: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            expiry_warning_hours: default_expiry_warning_hours(),
        }
    }
}

fn default_expiry_warning_hours() -> u32 {
    24
}

fn default_true() -> bool {
    true
}

impl MediaConfig {
    /// Whether `content_type` opens in the in-app preview.
    pub fn is_previewable(&self, content_type: &str) -> bool {
        self.preview_content_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
    }
}
