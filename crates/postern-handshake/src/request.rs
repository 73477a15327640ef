// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Actionability checks and acceptance payload construction.

use postern_core::{
    Direction, Handshake, HandshakeRequest, KeyExchangeState, Message, PosternError,
};

use crate::coordinator::IgnoreReason;

/// Whether a click on `msg` may open the handshake acceptance flow.
///
/// Returns the reason the click is ignored otherwise. Checks run in a fixed
/// order, so an outgoing corrupted key exchange reports `Outgoing`.
pub fn actionability(msg: &Message) -> Result<(), IgnoreReason> {
    let state = msg.key_exchange();
    if !state.is_key_exchange() {
        return Err(IgnoreReason::NotKeyExchange);
    }
    if msg.is_outgoing() {
        return Err(IgnoreReason::Outgoing);
    }
    match state {
        KeyExchangeState::Processed => Err(IgnoreReason::Processed),
        KeyExchangeState::Stale => Err(IgnoreReason::Stale),
        KeyExchangeState::Corrupted => Err(IgnoreReason::Corrupted),
        _ => Ok(()),
    }
}

/// Build the acceptance payload for a key exchange message.
///
/// Corrupted and stale exchanges cannot be acted on and yield
/// [`PosternError::HandshakeIntegrity`]; other non-actionable messages yield
/// [`PosternError::InvalidState`].
pub fn handshake_request(msg: &Message) -> Result<HandshakeRequest, PosternError> {
    if let Err(reason) = actionability(msg) {
        return Err(match reason {
            IgnoreReason::Corrupted | IgnoreReason::Stale => PosternError::HandshakeIntegrity {
                message_id: msg.id(),
                reason: reason.to_string(),
            },
            _ => PosternError::InvalidState {
                message_id: msg.id(),
                expected: "actionable incoming key exchange",
                actual: reason.to_string(),
            },
        });
    }

    let recipient = msg.recipient();
    Ok(HandshakeRequest {
        handshake: Handshake {
            recipient_id: recipient.id,
            device_id: recipient.device_id,
            direction: msg.direction(),
            is_bundle: msg.key_exchange().is_bundle(),
        },
        body: msg.body().to_string(),
        thread_id: msg.thread_id(),
        message_id: msg.id(),
        is_identity_update: msg.key_exchange().is_identity_update(),
        is_push: msg.is_push(),
        sent: msg.direction() == Direction::Outgoing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use postern_core::{DeviceId, MessageId, RecipientId, ThreadId};
    use postern_test_utils::MessageBuilder;

    #[test]
    fn bundle_request_carries_every_field() {
        let msg = MessageBuilder::incoming_text(7)
            .thread(3)
            .recipient(42, "+15550142")
            .device(2)
            .push(true)
            .body("prekey-bundle")
            .key_exchange(KeyExchangeState::IncomingBundle)
            .build();

        let request = handshake_request(&msg).unwrap();
        assert_eq!(request.handshake.recipient_id, RecipientId(42));
        assert_eq!(request.handshake.device_id, DeviceId(2));
        assert!(request.handshake.is_bundle);
        assert_eq!(request.body, "prekey-bundle");
        assert_eq!(request.thread_id, ThreadId(3));
        assert_eq!(request.message_id, MessageId(7));
        assert!(request.is_push);
        assert!(!request.is_identity_update);
        assert!(!request.sent);
    }

    #[test]
    fn identity_update_is_flagged() {
        let msg = MessageBuilder::incoming_text(1)
            .key_exchange(KeyExchangeState::IdentityUpdate)
            .build();
        let request = handshake_request(&msg).unwrap();
        assert!(request.is_identity_update);
        assert!(!request.handshake.is_bundle);
    }

    #[test]
    fn corrupted_and_stale_are_integrity_errors() {
        for state in [KeyExchangeState::Corrupted, KeyExchangeState::Stale] {
            let msg = MessageBuilder::incoming_text(1).key_exchange(state).build();
            let err = handshake_request(&msg).unwrap_err();
            assert!(
                matches!(err, PosternError::HandshakeIntegrity { .. }),
                "{state:?} gave {err}"
            );
            assert!(err.is_user_facing());
        }
    }

    #[test]
    fn outgoing_is_invalid_state() {
        let msg = MessageBuilder::outgoing_text(1)
            .key_exchange(KeyExchangeState::OutgoingBundle)
            .build();
        assert_eq!(actionability(&msg), Err(IgnoreReason::Outgoing));
        assert!(matches!(
            handshake_request(&msg),
            Err(PosternError::InvalidState { .. })
        ));
    }

    #[test]
    fn plain_message_is_not_key_exchange() {
        let msg = MessageBuilder::incoming_text(1).build();
        assert_eq!(actionability(&msg), Err(IgnoreReason::NotKeyExchange));
    }
}
