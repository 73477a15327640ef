// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory message store for deterministic testing.
//!
//! `MockStore` keeps raw [`MessageFlags`] rows, applies each `mark_*` call
//! the way a real store would, and records the calls in order so tests can
//! assert on sequencing (for example that `mark_insecure` precedes
//! `mark_outbox`).

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use postern_core::{
    DownloadStatus, InsecureFallbackConsent, Message, MessageFlags, MessageId, MessageStore,
    PosternError,
};
use tokio::sync::Mutex;

/// A mutation observed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    MarkInsecure(MessageId),
    MarkOutbox(MessageId),
    MarkForcedSms(MessageId),
    MarkSentFailed(MessageId),
}

/// In-memory message store.
#[derive(Default)]
pub struct MockStore {
    rows: Arc<Mutex<HashMap<MessageId, MessageFlags>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    unavailable: AtomicBool,
    fail_once: Arc<Mutex<Option<StoreCall>>>,
    reads_before_failure: Arc<Mutex<Option<usize>>>,
}

impl MockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `messages`.
    pub async fn with_messages(messages: impl IntoIterator<Item = Message>) -> Self {
        let store = Self::new();
        for msg in messages {
            store.insert(msg).await;
        }
        store
    }

    /// Insert or replace a message.
    pub async fn insert(&self, msg: Message) {
        self.rows.lock().await.insert(msg.id(), msg.to_flags());
    }

    /// Every mutation observed so far, in call order.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    /// Make every subsequent call fail with a storage error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make the next occurrence of `call` fail with a storage error
    /// without applying it. Later calls succeed.
    pub async fn fail_once(&self, call: StoreCall) {
        *self.fail_once.lock().await = Some(call);
    }

    /// Let `reads` more `message` reads succeed, then fail the next one
    /// with a storage error. Reads after that succeed again.
    pub async fn fail_read_after(&self, reads: usize) {
        *self.reads_before_failure.lock().await = Some(reads);
    }

    fn check_available(&self) -> Result<(), PosternError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PosternError::storage("mock store unavailable"));
        }
        Ok(())
    }

    async fn mutate(
        &self,
        call: StoreCall,
        id: MessageId,
        apply: impl FnOnce(&mut MessageFlags),
    ) -> Result<(), PosternError> {
        self.check_available()?;
        {
            let mut fail_once = self.fail_once.lock().await;
            if *fail_once == Some(call) {
                *fail_once = None;
                return Err(PosternError::storage("injected store failure"));
            }
        }
        let mut rows = self.rows.lock().await;
        let row = rows
            .get_mut(&id)
            .ok_or(PosternError::NotFound { message_id: id })?;
        let mut updated = row.clone();
        apply(&mut updated);
        // Reject changes a real store's constraints would reject.
        Message::try_from(updated.clone())?;
        *row = updated;
        self.calls.lock().await.push(call);
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MockStore {
    async fn message(&self, id: MessageId) -> Result<Message, PosternError> {
        self.check_available()?;
        {
            let mut remaining = self.reads_before_failure.lock().await;
            match *remaining {
                Some(0) => {
                    *remaining = None;
                    return Err(PosternError::storage("injected read failure"));
                }
                Some(n) => *remaining = Some(n - 1),
                None => {}
            }
        }
        let rows = self.rows.lock().await;
        let flags = rows
            .get(&id)
            .cloned()
            .ok_or(PosternError::NotFound { message_id: id })?;
        Message::try_from(flags)
    }

    async fn mark_insecure(&self, consent: &InsecureFallbackConsent) -> Result<(), PosternError> {
        let id = consent.message_id();
        self.mutate(StoreCall::MarkInsecure(id), id, |row| row.secure = false)
            .await
    }

    async fn mark_outbox(&self, id: MessageId) -> Result<(), PosternError> {
        self.mutate(StoreCall::MarkOutbox(id), id, |row| {
            row.pending = true;
            row.failed = false;
            row.pending_secure_sms_fallback = false;
            row.pending_insecure_sms_fallback = false;
        })
        .await
    }

    async fn mark_forced_sms(&self, id: MessageId) -> Result<(), PosternError> {
        self.mutate(StoreCall::MarkForcedSms(id), id, |row| {
            row.forced_sms = true;
            row.push = false;
        })
        .await
    }

    async fn mark_sent_failed(&self, id: MessageId) -> Result<(), PosternError> {
        self.mutate(StoreCall::MarkSentFailed(id), id, |row| {
            row.failed = true;
            row.pending = false;
            row.pending_secure_sms_fallback = false;
            row.pending_insecure_sms_fallback = false;
        })
        .await
    }

    async fn download_status(&self, id: MessageId) -> Result<DownloadStatus, PosternError> {
        let msg = self.message(id).await?;
        msg.notification()
            .map(|n| n.download_status)
            .ok_or_else(|| PosternError::InvalidState {
                message_id: id,
                expected: "mms_notification",
                actual: msg.content_kind().to_string(),
            })
    }
}
