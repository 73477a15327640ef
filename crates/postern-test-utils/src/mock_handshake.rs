// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session, exemption and handshake collaborators for deterministic testing.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use postern_core::{
    HandshakeAcceptor, HandshakeInitiator, HandshakeRequest, PosternError, RecipientId,
    SessionValidator, ThreadExemptions, ThreadId,
};
use tokio::sync::Mutex;

/// Session lookup backed by a fixed set of recipients.
#[derive(Default)]
pub struct MockSessions {
    established: Mutex<HashSet<RecipientId>>,
}

impl MockSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions already established with `recipients`.
    pub fn with_sessions(recipients: impl IntoIterator<Item = RecipientId>) -> Self {
        Self {
            established: Mutex::new(recipients.into_iter().collect()),
        }
    }

    pub async fn establish(&self, recipient: RecipientId) {
        self.established.lock().await.insert(recipient);
    }
}

#[async_trait]
impl SessionValidator for MockSessions {
    async fn has_valid_session(&self, recipient: RecipientId) -> Result<bool, PosternError> {
        Ok(self.established.lock().await.contains(&recipient))
    }
}

/// In-memory auto-initiate latch.
///
/// Both calls yield to the scheduler before touching state, so concurrent
/// callers interleave between the check and the set unless something
/// serializes them.
#[derive(Default)]
pub struct MemoryExemptions {
    exempt: Mutex<HashSet<ThreadId>>,
    exempt_calls: Mutex<usize>,
}

impl MemoryExemptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `exempt` has been called.
    pub async fn exempt_calls(&self) -> usize {
        *self.exempt_calls.lock().await
    }
}

#[async_trait]
impl ThreadExemptions for MemoryExemptions {
    async fn is_exempt(&self, thread: ThreadId) -> Result<bool, PosternError> {
        tokio::task::yield_now().await;
        Ok(self.exempt.lock().await.contains(&thread))
    }

    async fn exempt(&self, thread: ThreadId) -> Result<(), PosternError> {
        tokio::task::yield_now().await;
        self.exempt.lock().await.insert(thread);
        *self.exempt_calls.lock().await += 1;
        Ok(())
    }
}

/// Records handshake initiations and acceptance requests.
#[derive(Default, Clone)]
pub struct RecordingHandshakes {
    initiated: Arc<Mutex<Vec<(ThreadId, RecipientId)>>>,
    accepted: Arc<Mutex<Vec<HandshakeRequest>>>,
}

impl RecordingHandshakes {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn initiated(&self) -> Vec<(ThreadId, RecipientId)> {
        self.initiated.lock().await.clone()
    }

    pub async fn accepted(&self) -> Vec<HandshakeRequest> {
        self.accepted.lock().await.clone()
    }
}

#[async_trait]
impl HandshakeInitiator for RecordingHandshakes {
    async fn initiate(&self, thread: ThreadId, recipient: RecipientId) -> Result<(), PosternError> {
        self.initiated.lock().await.push((thread, recipient));
        Ok(())
    }
}

#[async_trait]
impl HandshakeAcceptor for RecordingHandshakes {
    async fn accept(&self, request: HandshakeRequest) -> Result<(), PosternError> {
        self.accepted.lock().await.push(request);
        Ok(())
    }
}
