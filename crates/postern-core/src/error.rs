// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Postern delivery core.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::types::MessageId;

/// Which download failure an MMS notification is stuck in.
///
/// Both are retryable, but through different affordances: a hard error
/// offers a manual retry, an unavailable APN sends the user to the MMS
/// preferences first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DownloadErrorKind {
    HardError,
    ApnUnavailable,
}

/// The primary error type used across all Postern crates.
#[derive(Debug, Error)]
pub enum PosternError {
    /// Delivery failed but the message is waiting for a fallback decision.
    #[error("delivery of message {message_id} failed, awaiting fallback approval")]
    TransientDelivery { message_id: MessageId },

    /// Delivery failed and no further attempt will be made.
    #[error("delivery of message {message_id} failed permanently")]
    PermanentDelivery { message_id: MessageId },

    /// Key exchange message is corrupted or stale and cannot be acted on.
    #[error("key exchange {message_id} cannot be processed: {reason}")]
    HandshakeIntegrity {
        message_id: MessageId,
        reason: String,
    },

    /// MMS download failed.
    #[error("download of message {message_id} failed: {kind}")]
    Download {
        message_id: MessageId,
        kind: DownloadErrorKind,
    },

    /// Slide deck or thumbnail resolution failed.
    #[error("media resolution for message {message_id} failed: {source}")]
    MediaResolution {
        message_id: MessageId,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An action was requested on a message whose state does not permit it.
    #[error("message {message_id} is {actual}, expected {expected}")]
    InvalidState {
        message_id: MessageId,
        expected: &'static str,
        actual: String,
    },

    /// Raw message flags break a model invariant.
    #[error("message invariant violated: {0}")]
    InvariantViolation(String),

    /// The message store could not complete an operation.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The message store has no record for the requested id.
    #[error("message {message_id} not found")]
    NotFound { message_id: MessageId },

    /// Configuration errors (invalid TOML, failed validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PosternError {
    /// Whether this error is surfaced to the user.
    ///
    /// Only delivery failures and handshake integrity problems reach the
    /// user, and only as an indicator that invites explicit remediation.
    /// Media resolution failures degrade the view silently.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            PosternError::TransientDelivery { .. }
                | PosternError::PermanentDelivery { .. }
                | PosternError::HandshakeIntegrity { .. }
                | PosternError::Download { .. }
        )
    }

    /// Whether the user can recover from this error through an explicit action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PosternError::TransientDelivery { .. } | PosternError::Download { .. }
        )
    }

    /// Wrap a resolver failure for the given message.
    pub fn media(
        message_id: MessageId,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PosternError::MediaResolution {
            message_id,
            source: source.into(),
        }
    }

    /// Wrap a store failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        PosternError::Storage {
            source: source.into(),
        }
    }
}
