// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot user decision on retrying a failed push delivery over SMS.
//!
//! Approving an insecure fallback is the only place in Postern where a
//! message's secure flag is cleared. The store call requires an
//! [`InsecureFallbackConsent`], which can only be built from a message that
//! is waiting on exactly that decision.

use std::sync::Arc;

use postern_core::{
    DeliveryState, InsecureFallbackConsent, Job, Message, MessageId, MessageStore, PosternError,
};
use serde::Serialize;
use strum::Display;
use tracing::info;

use crate::dispatcher::DeliveryJobDispatcher;

/// Which fallback the user is asked to approve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// Encrypted SMS/MMS.
    Secure,
    /// Plaintext SMS/MMS.
    Insecure,
}

/// Dialog content for a fallback decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalPrompt {
    pub message_id: MessageId,
    pub kind: FallbackKind,
    pub title: String,
    /// Warning shown for insecure fallback only.
    pub body: Option<String>,
}

const INSECURE_WARNING: &str = "This message will not be encrypted because the recipient \
is no longer a secure user. Send it unencrypted anyway?";

/// The delivery failure a message currently represents, if any.
///
/// A pending fallback is transient (the user can still approve it); a
/// failed message is permanent.
pub fn delivery_failure(msg: &Message) -> Option<PosternError> {
    match msg.delivery() {
        DeliveryState::PendingSecureSmsFallback | DeliveryState::PendingInsecureSmsFallback => {
            Some(PosternError::TransientDelivery {
                message_id: msg.id(),
            })
        }
        DeliveryState::Failed => Some(PosternError::PermanentDelivery {
            message_id: msg.id(),
        }),
        DeliveryState::Sent | DeliveryState::Pending => None,
    }
}

/// Approve or reject a pending SMS fallback.
pub struct FallbackApprovalWorkflow {
    store: Arc<dyn MessageStore>,
    dispatcher: Arc<DeliveryJobDispatcher>,
}

impl FallbackApprovalWorkflow {
    pub fn new(store: Arc<dyn MessageStore>, dispatcher: Arc<DeliveryJobDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Dialog content for `msg`.
    pub fn prompt(msg: &Message) -> Result<ApprovalPrompt, PosternError> {
        let kind = fallback_kind(msg)?;
        let medium = if msg.is_mms() { "MMS" } else { "SMS" };
        let (title, body) = match kind {
            FallbackKind::Secure => (format!("Send as encrypted {medium}?"), None),
            FallbackKind::Insecure => (
                format!("Send as unencrypted {medium}?"),
                Some(INSECURE_WARNING.to_string()),
            ),
        };
        Ok(ApprovalPrompt {
            message_id: msg.id(),
            kind,
            title,
            body,
        })
    }

    /// Approve the fallback and enqueue exactly one send job.
    ///
    /// The message is re-read from the store first; approving a message that
    /// is no longer waiting on a decision fails with `InvalidState` and
    /// touches nothing.
    ///
    /// For an insecure fallback the secure flag is cleared before the
    /// message is requeued. If a later store call fails, the message stays
    /// waiting on the insecure fallback with its secure flag already
    /// cleared and no job enqueued. Approving again completes the send;
    /// rejecting leaves it failed and unencrypted.
    pub async fn approve(&self, id: MessageId) -> Result<Job, PosternError> {
        let msg = self.store.message(id).await?;
        let kind = fallback_kind(&msg)?;

        if kind == FallbackKind::Insecure {
            let consent = InsecureFallbackConsent::from_approval(&msg)?;
            self.store.mark_insecure(&consent).await?;
        }
        self.store.mark_outbox(id).await?;
        self.store.mark_forced_sms(id).await?;

        info!(
            message_id = %id,
            thread_id = %msg.thread_id(),
            fallback = %kind,
            "sms fallback approved"
        );
        Ok(self.dispatcher.enqueue_send(&msg))
    }

    /// Reject the fallback. The message becomes permanently failed and no
    /// job is enqueued.
    pub async fn reject(&self, id: MessageId) -> Result<(), PosternError> {
        let msg = self.store.message(id).await?;
        let kind = fallback_kind(&msg)?;

        self.store.mark_sent_failed(id).await?;

        info!(
            message_id = %id,
            thread_id = %msg.thread_id(),
            fallback = %kind,
            "sms fallback rejected"
        );
        Ok(())
    }
}

fn fallback_kind(msg: &Message) -> Result<FallbackKind, PosternError> {
    match msg.delivery() {
        DeliveryState::PendingSecureSmsFallback => Ok(FallbackKind::Secure),
        DeliveryState::PendingInsecureSmsFallback => Ok(FallbackKind::Insecure),
        other => Err(PosternError::InvalidState {
            message_id: msg.id(),
            expected: "pending_sms_fallback",
            actual: other.to_string(),
        }),
    }
}
