// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport and caption resolution.

use postern_core::{DeliveryState, Message, Transport};
use serde::Serialize;
use strum::Display;

/// Which transport a message bubble presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    PushPending,
    SmsPending,
    PushSent,
    SmsSent,
}

/// How a bubble lays out media and caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CaptionState {
    NoMedia,
    Captionless,
    Captioned,
}

/// Resolve the transport a message presents.
///
/// `push_destination` says whether the recipient currently has an active
/// push session. The match arms form a priority cascade:
///
/// 1. pending or failed, push-capable destination, not forced to SMS: push pending
/// 2. pending, failed, or waiting on insecure fallback: SMS pending
/// 3. push message: push sent
/// 4. otherwise: SMS sent
///
/// An insecure fallback always resolves to SMS pending, whatever the
/// destination and whatever `forced_sms` says.
pub fn resolve_transport_state(msg: &Message, push_destination: bool) -> TransportState {
    let push_eligible = push_destination && !msg.is_forced_sms();

    match msg.delivery() {
        DeliveryState::Pending | DeliveryState::Failed if push_eligible => {
            TransportState::PushPending
        }
        DeliveryState::Pending
        | DeliveryState::Failed
        | DeliveryState::PendingInsecureSmsFallback => TransportState::SmsPending,
        DeliveryState::Sent | DeliveryState::PendingSecureSmsFallback => match msg.transport() {
            Transport::Push => TransportState::PushSent,
            Transport::Sms => TransportState::SmsSent,
        },
    }
}

/// Resolve the media caption layout of a message.
pub fn resolve_caption_state(msg: &Message) -> CaptionState {
    if !msg.has_media() {
        CaptionState::NoMedia
    } else if msg.is_mms() && msg.body().is_empty() {
        CaptionState::Captionless
    } else {
        CaptionState::Captioned
    }
}
