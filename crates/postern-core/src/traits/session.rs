// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session validity and per-thread auto-initiate exemption.

use async_trait::async_trait;

use crate::error::PosternError;
use crate::types::{RecipientId, ThreadId};

/// Answers whether a secure session with a recipient already exists.
#[async_trait]
pub trait SessionValidator: Send + Sync + 'static {
    async fn has_valid_session(&self, recipient: RecipientId) -> Result<bool, PosternError>;
}

/// Persistent one-way latch that suppresses auto-initiate for a thread.
#[async_trait]
pub trait ThreadExemptions: Send + Sync + 'static {
    async fn is_exempt(&self, thread: ThreadId) -> Result<bool, PosternError>;

    /// Sets the latch. There is no way to clear it.
    async fn exempt(&self, thread: ThreadId) -> Result<(), PosternError>;
}
