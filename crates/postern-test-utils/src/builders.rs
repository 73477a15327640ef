// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fluent builder for message snapshots.

use chrono::{DateTime, TimeZone, Utc};
use postern_core::{
    ContentKind, DeviceId, Direction, DownloadStatus, KeyExchangeState, Message, MessageFlags,
    MessageId, MmsNotification, Recipient, RecipientId, ThreadId,
};

/// Builds [`Message`] snapshots with sensible defaults.
///
/// Defaults: thread 1, recipient 100 (`+15550100`, device 1), single
/// recipient, insecure SMS, sent, body `"hello"`, dated 2026-01-01.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    flags: MessageFlags,
}

impl MessageBuilder {
    fn new(id: i64, direction: Direction, content_kind: ContentKind) -> Self {
        let date = Utc
            .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Self {
            flags: MessageFlags {
                id: MessageId(id),
                thread_id: ThreadId(1),
                direction,
                content_kind,
                recipient: Recipient {
                    id: RecipientId(100),
                    number: "+15550100".to_string(),
                    device_id: DeviceId(1),
                },
                single_recipient: true,
                group_action: false,
                secure: false,
                push: false,
                pending: false,
                failed: false,
                forced_sms: false,
                pending_secure_sms_fallback: false,
                pending_insecure_sms_fallback: false,
                key_exchange: KeyExchangeState::None,
                delivered: false,
                date_sent: date,
                date_received: date,
                body: "hello".to_string(),
                part_count: 0,
                notification: None,
            },
        }
    }

    pub fn incoming_text(id: i64) -> Self {
        Self::new(id, Direction::Incoming, ContentKind::Text)
    }

    pub fn outgoing_text(id: i64) -> Self {
        Self::new(id, Direction::Outgoing, ContentKind::Text)
    }

    pub fn incoming_media(id: i64, parts: usize) -> Self {
        Self::new(id, Direction::Incoming, ContentKind::Media).parts(parts)
    }

    pub fn outgoing_media(id: i64, parts: usize) -> Self {
        Self::new(id, Direction::Outgoing, ContentKind::Media).parts(parts)
    }

    /// An incoming MMS notification of 42 000 bytes expiring 2026-01-08.
    pub fn mms_notification(id: i64, status: DownloadStatus) -> Self {
        let expires_at = Utc
            .with_ymd_and_hms(2026, 1, 8, 9, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let mut builder = Self::new(id, Direction::Incoming, ContentKind::Media).body("");
        builder.flags.notification = Some(MmsNotification {
            size_bytes: 42_000,
            expires_at,
            download_status: status,
            content_location: format!("http://mmsc.example/{id}"),
        });
        builder
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.flags.direction = direction;
        self
    }

    pub fn thread(mut self, thread_id: i64) -> Self {
        self.flags.thread_id = ThreadId(thread_id);
        self
    }

    pub fn recipient(mut self, id: i64, number: &str) -> Self {
        self.flags.recipient.id = RecipientId(id);
        self.flags.recipient.number = number.to_string();
        self
    }

    pub fn device(mut self, device_id: u32) -> Self {
        self.flags.recipient.device_id = DeviceId(device_id);
        self
    }

    pub fn single_recipient(mut self, single: bool) -> Self {
        self.flags.single_recipient = single;
        self
    }

    pub fn group_action(mut self, group_action: bool) -> Self {
        self.flags.group_action = group_action;
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.flags.body = body.to_string();
        self
    }

    pub fn parts(mut self, parts: usize) -> Self {
        self.flags.part_count = parts;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.flags.secure = secure;
        self
    }

    pub fn push(mut self, push: bool) -> Self {
        self.flags.push = push;
        self
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.flags.pending = pending;
        self
    }

    pub fn failed(mut self, failed: bool) -> Self {
        self.flags.failed = failed;
        self
    }

    pub fn forced_sms(mut self, forced_sms: bool) -> Self {
        self.flags.forced_sms = forced_sms;
        self
    }

    /// Waiting on approval for encrypted SMS. Implies secure, not push.
    pub fn secure_fallback(mut self) -> Self {
        self.flags.pending_secure_sms_fallback = true;
        self.flags.secure = true;
        self.flags.push = false;
        self
    }

    /// Waiting on approval for unencrypted SMS. Implies secure, not push.
    pub fn insecure_fallback(mut self) -> Self {
        self.flags.pending_insecure_sms_fallback = true;
        self.flags.secure = true;
        self.flags.push = false;
        self
    }

    pub fn key_exchange(mut self, state: KeyExchangeState) -> Self {
        self.flags.key_exchange = state;
        self
    }

    pub fn delivered(mut self, delivered: bool) -> Self {
        self.flags.delivered = delivered;
        self
    }

    pub fn date_sent(mut self, at: DateTime<Utc>) -> Self {
        self.flags.date_sent = at;
        self
    }

    pub fn date_received(mut self, at: DateTime<Utc>) -> Self {
        self.flags.date_received = at;
        self
    }

    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        if let Some(notification) = self.flags.notification.as_mut() {
            notification.expires_at = at;
        }
        self
    }

    pub fn size_bytes(mut self, size: u64) -> Self {
        if let Some(notification) = self.flags.notification.as_mut() {
            notification.size_bytes = size;
        }
        self
    }

    /// The raw flags, possibly invalid.
    pub fn flags(self) -> MessageFlags {
        self.flags
    }

    /// Build a validated snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the flags break a model invariant.
    pub fn build(self) -> Message {
        match Message::try_from(self.flags) {
            Ok(msg) => msg,
            Err(e) => panic!("MessageBuilder produced an invalid message: {e}"),
        }
    }
}
