// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key exchange coordinator.

use std::sync::Arc;

use postern_config::model::HandshakeConfig;
use postern_core::{
    HandshakeAcceptor, HandshakeInitiator, HandshakeRequest, Message, PosternError,
    SessionValidator, ThreadExemptions,
};
use serde::Serialize;
use strum::Display;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::request::{actionability, handshake_request};

/// Result of an auto-initiate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AutoInitiateOutcome {
    /// A handshake was started and the thread is now exempt.
    Initiated,
    /// The thread was exempted earlier; nothing happens.
    AlreadyExempt,
    /// The recipient already has a valid session.
    SessionEstablished,
    /// The message does not qualify (outgoing, secure, group).
    NotEligible,
    /// Auto-initiate is switched off in configuration.
    Disabled,
}

/// Why a click on a message did not open the handshake flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    NotKeyExchange,
    Outgoing,
    Processed,
    Stale,
    Corrupted,
}

/// Result of clicking a key exchange message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyExchangeClick {
    /// The acceptance flow was opened with this payload.
    Opened(HandshakeRequest),
    /// The click was a no-op.
    Ignored(IgnoreReason),
}

/// Drives handshake auto-initiate and key exchange clicks.
pub struct KeyExchangeCoordinator {
    sessions: Arc<dyn SessionValidator>,
    exemptions: Arc<dyn ThreadExemptions>,
    initiator: Arc<dyn HandshakeInitiator>,
    acceptor: Arc<dyn HandshakeAcceptor>,
    config: HandshakeConfig,
    /// Serializes the exemption check-and-set across concurrent binds.
    auto_initiate_lock: Mutex<()>,
}

impl KeyExchangeCoordinator {
    pub fn new(
        sessions: Arc<dyn SessionValidator>,
        exemptions: Arc<dyn ThreadExemptions>,
        initiator: Arc<dyn HandshakeInitiator>,
        acceptor: Arc<dyn HandshakeAcceptor>,
        config: HandshakeConfig,
    ) -> Self {
        Self {
            sessions,
            exemptions,
            initiator,
            acceptor,
            config,
            auto_initiate_lock: Mutex::new(()),
        }
    }

    /// Whether `msg` is the kind of message that can trigger auto-initiate:
    /// incoming, unsecured, one-to-one.
    pub fn is_candidate(msg: &Message, group_thread: bool) -> bool {
        !msg.is_outgoing() && msg.is_single_recipient() && !msg.is_secure() && !group_thread
    }

    /// Start a handshake for the message's thread if it has never been
    /// started there and no session exists yet.
    ///
    /// The thread is exempted before the handshake is initiated, so a
    /// failing initiator never causes a second prompt. Only the exemption
    /// check-and-set is serialized; a slow initiator for one thread does
    /// not hold up other threads.
    pub async fn auto_initiate(
        &self,
        msg: &Message,
        group_thread: bool,
    ) -> Result<AutoInitiateOutcome, PosternError> {
        if !self.config.auto_initiate {
            return Ok(AutoInitiateOutcome::Disabled);
        }
        if !Self::is_candidate(msg, group_thread) {
            return Ok(AutoInitiateOutcome::NotEligible);
        }

        let thread = msg.thread_id();
        let recipient = msg.recipient().id;

        {
            let _guard = self.auto_initiate_lock.lock().await;

            if self.exemptions.is_exempt(thread).await? {
                debug!(thread_id = %thread, "thread already exempt from auto-initiate");
                return Ok(AutoInitiateOutcome::AlreadyExempt);
            }
            if self.sessions.has_valid_session(recipient).await? {
                debug!(
                    thread_id = %thread,
                    recipient_id = %recipient,
                    "session already established"
                );
                return Ok(AutoInitiateOutcome::SessionEstablished);
            }

            self.exemptions.exempt(thread).await?;
        }

        // The exemption is the latch; the initiator runs unlocked.
        self.initiator.initiate(thread, recipient).await?;

        info!(
            thread_id = %thread,
            recipient_id = %recipient,
            message_id = %msg.id(),
            "auto-initiated handshake"
        );
        Ok(AutoInitiateOutcome::Initiated)
    }

    /// Handle a click on `msg`.
    ///
    /// Only incoming key exchanges that are neither processed, stale nor
    /// corrupted open the acceptance flow; every other click is ignored.
    pub async fn handle_click(&self, msg: &Message) -> Result<KeyExchangeClick, PosternError> {
        if let Err(reason) = actionability(msg) {
            debug!(message_id = %msg.id(), %reason, "key exchange click ignored");
            return Ok(KeyExchangeClick::Ignored(reason));
        }

        let request = handshake_request(msg)?;
        self.acceptor.accept(request.clone()).await?;

        info!(
            message_id = %msg.id(),
            thread_id = %msg.thread_id(),
            is_bundle = request.handshake.is_bundle,
            "opened handshake acceptance"
        );
        Ok(KeyExchangeClick::Opened(request))
    }
}
