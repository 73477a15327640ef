// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry points into the handshake screens.

use async_trait::async_trait;

use crate::error::PosternError;
use crate::types::{HandshakeRequest, RecipientId, ThreadId};

/// Starts a new handshake for an unsecured conversation.
#[async_trait]
pub trait HandshakeInitiator: Send + Sync + 'static {
    async fn initiate(&self, thread: ThreadId, recipient: RecipientId) -> Result<(), PosternError>;
}

/// Opens the explicit acceptance flow for a received key exchange.
#[async_trait]
pub trait HandshakeAcceptor: Send + Sync + 'static {
    async fn accept(&self, request: HandshakeRequest) -> Result<(), PosternError>;
}
