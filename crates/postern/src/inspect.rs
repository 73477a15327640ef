// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postern inspect` implementation.

use std::path::Path;

use chrono::{DateTime, Utc};
use postern_config::PosternConfig;
use postern_conversation::{BindContext, resolve_item_view};
use postern_core::{Message, MessageFlags, PosternError};
use tracing::debug;

pub struct InspectOptions {
    pub push_destination: bool,
    pub group_thread: bool,
    pub now: DateTime<Utc>,
}

/// Resolve the item view of the message stored at `path`, as pretty JSON.
pub fn run_inspect(
    config: &PosternConfig,
    path: &Path,
    options: &InspectOptions,
) -> Result<String, PosternError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| PosternError::Internal(format!("cannot read {}: {e}", path.display())))?;
    inspect_str(config, &raw, options)
}

fn inspect_str(
    config: &PosternConfig,
    raw: &str,
    options: &InspectOptions,
) -> Result<String, PosternError> {
    let flags: MessageFlags = serde_json::from_str(raw)
        .map_err(|e| PosternError::Internal(format!("malformed message JSON: {e}")))?;
    let msg = Message::try_from(flags)?;
    debug!(message_id = %msg.id(), delivery = %msg.delivery(), "inspecting message");

    let ctx = BindContext {
        group_thread: options.group_thread,
        push_destination: options.push_destination,
        now: options.now,
    };
    let view = resolve_item_view(&msg, &ctx, &config.notification);
    serde_json::to_string_pretty(&view)
        .map_err(|e| PosternError::Internal(format!("cannot serialize view: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn options(push_destination: bool) -> InspectOptions {
        InspectOptions {
            push_destination,
            group_thread: false,
            now: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
        }
    }

    const FAILED_TEXT: &str = r#"{
        "id": 4,
        "thread_id": 1,
        "direction": "outgoing",
        "content_kind": "text",
        "recipient": { "id": 100, "number": "+15550100" },
        "failed": true,
        "date_sent": "2026-01-01T08:00:00Z",
        "date_received": "2026-01-01T08:00:00Z",
        "body": "hi"
    }"#;

    #[test]
    fn failed_message_resolves_push_pending_with_push_destination() {
        let json = inspect_str(&PosternConfig::default(), FAILED_TEXT, &options(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["transport"], "push_pending");
        assert_eq!(value["status"]["failed_indicator"], true);
        assert!(value["failure"].as_str().unwrap().contains("permanently"));
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let raw = FAILED_TEXT.replace(
            "\"failed\": true",
            "\"pending_secure_sms_fallback\": true, \"pending_insecure_sms_fallback\": true",
        );
        let err = inspect_str(&PosternConfig::default(), &raw, &options(false)).unwrap_err();
        assert!(matches!(err, PosternError::InvariantViolation(_)));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = inspect_str(&PosternConfig::default(), "{", &options(false)).unwrap_err();
        assert!(err.to_string().contains("malformed message JSON"));
    }
}
