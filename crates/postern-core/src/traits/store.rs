// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message store trait: read access plus the atomic `mark_*` mutations.

use async_trait::async_trait;

use crate::error::PosternError;
use crate::types::{DownloadStatus, InsecureFallbackConsent, Message, MessageId};

/// Persistent message storage.
///
/// Each `mark_*` call is atomic for a single message. Callers never mutate
/// a [`Message`] directly; they call through here and read a fresh snapshot.
#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    /// Reads the current snapshot of a message.
    async fn message(&self, id: MessageId) -> Result<Message, PosternError>;

    /// Clears the secure flag. Irreversible.
    ///
    /// Requires proof that the user approved the insecure fallback for
    /// this exact message.
    async fn mark_insecure(&self, consent: &InsecureFallbackConsent) -> Result<(), PosternError>;

    /// Moves the message back into the outbox (pending send).
    async fn mark_outbox(&self, id: MessageId) -> Result<(), PosternError>;

    /// Records that the message must travel over carrier SMS.
    async fn mark_forced_sms(&self, id: MessageId) -> Result<(), PosternError>;

    /// Marks the message as permanently failed.
    async fn mark_sent_failed(&self, id: MessageId) -> Result<(), PosternError>;

    /// Current download status of an MMS notification.
    async fn download_status(&self, id: MessageId) -> Result<DownloadStatus, PosternError>;
}
