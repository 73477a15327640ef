// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message model and common types shared across the Postern crates.
//!
//! A [`Message`] is an immutable snapshot read from the message store. The
//! store keeps the raw boolean columns ([`MessageFlags`]); converting them
//! into a `Message` folds the delivery booleans into a single
//! [`DeliveryState`] and rejects combinations that break the model
//! invariants. Nothing outside a store implementation ever changes a
//! message: every mutation goes through a [`MessageStore`](crate::MessageStore)
//! `mark_*` call and a fresh snapshot is read back.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::PosternError;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(
    /// Store-assigned identifier for a message.
    MessageId(i64)
);
id_type!(
    /// Identifier for a conversation thread.
    ThreadId(i64)
);
id_type!(
    /// Identifier for a recipient (contact) record.
    RecipientId(i64)
);
id_type!(
    /// Device number of a recipient's registered device.
    DeviceId(u32)
);
id_type!(
    /// Identifier for a single media part.
    PartId(i64)
);
id_type!(
    /// Identifier for an enqueued job.
    JobId(Uuid)
);

/// Whether a message was received or sent by this device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Whether a message is plain text (SMS-shaped) or carries media (MMS-shaped).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Media,
}

/// The channel a message travelled over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Encrypted push channel, independent of the carrier.
    Push,
    /// Carrier SMS/MMS.
    Sms,
}

/// Delivery progress of a message, folded from the store's boolean columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Sent or received; nothing outstanding.
    Sent,
    /// Queued or in flight.
    Pending,
    /// The last delivery attempt failed. No automatic retry follows.
    Failed,
    /// Push delivery failed; waiting for the user to approve encrypted SMS.
    PendingSecureSmsFallback,
    /// Push delivery failed; waiting for the user to approve unencrypted SMS.
    PendingInsecureSmsFallback,
}

impl DeliveryState {
    /// Fold the store's delivery booleans into a single state.
    ///
    /// `failed` wins over `pending` when both are set. The two fallback
    /// flags are mutually exclusive, and neither may be combined with
    /// `pending` or `failed`.
    pub fn from_flags(
        pending: bool,
        failed: bool,
        pending_secure_sms_fallback: bool,
        pending_insecure_sms_fallback: bool,
    ) -> Result<Self, PosternError> {
        let fallback = pending_secure_sms_fallback || pending_insecure_sms_fallback;
        if fallback && (pending || failed) {
            return Err(PosternError::InvariantViolation(
                "a pending SMS fallback cannot also be pending or failed".into(),
            ));
        }
        match (pending_secure_sms_fallback, pending_insecure_sms_fallback) {
            (true, true) => Err(PosternError::InvariantViolation(
                "secure and insecure SMS fallback are mutually exclusive".into(),
            )),
            (true, false) => Ok(DeliveryState::PendingSecureSmsFallback),
            (false, true) => Ok(DeliveryState::PendingInsecureSmsFallback),
            (false, false) if failed => Ok(DeliveryState::Failed),
            (false, false) if pending => Ok(DeliveryState::Pending),
            (false, false) => Ok(DeliveryState::Sent),
        }
    }

    pub fn is_pending(self) -> bool {
        self == DeliveryState::Pending
    }

    pub fn is_failed(self) -> bool {
        self == DeliveryState::Failed
    }

    /// Whether the message is waiting on a fallback decision of either kind.
    pub fn is_pending_sms_fallback(self) -> bool {
        matches!(
            self,
            DeliveryState::PendingSecureSmsFallback | DeliveryState::PendingInsecureSmsFallback
        )
    }
}

/// Key exchange sub-state of a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum KeyExchangeState {
    /// Not a key exchange message.
    #[default]
    None,
    /// Incremental key update without a pre-key bundle.
    Incremental,
    /// Bundle key exchange sent by this device.
    OutgoingBundle,
    /// Bundle key exchange received from the peer.
    IncomingBundle,
    /// Key exchange that failed to parse or verify.
    Corrupted,
    /// Key exchange that has already been accepted.
    Processed,
    /// Key exchange superseded by a newer one.
    Stale,
    /// Peer's identity key changed.
    IdentityUpdate,
}

impl KeyExchangeState {
    pub fn is_key_exchange(self) -> bool {
        self != KeyExchangeState::None
    }

    pub fn is_bundle(self) -> bool {
        matches!(
            self,
            KeyExchangeState::OutgoingBundle | KeyExchangeState::IncomingBundle
        )
    }

    pub fn is_identity_update(self) -> bool {
        self == KeyExchangeState::IdentityUpdate
    }

    pub fn is_corrupted(self) -> bool {
        self == KeyExchangeState::Corrupted
    }

    /// Processed or stale: the exchange has been consumed or superseded.
    pub fn is_settled(self) -> bool {
        matches!(self, KeyExchangeState::Processed | KeyExchangeState::Stale)
    }
}

/// Download progress of an MMS notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    /// Waiting for an automatic download that the user may trigger early.
    PendingAuto,
    /// Download failed with a non-transient error.
    HardError,
    /// No MMS access point is configured.
    ApnUnavailable,
    /// Download is in progress.
    Downloading,
}

/// Header of an MMS that has not been downloaded yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MmsNotification {
    pub size_bytes: u64,
    pub expires_at: DateTime<Utc>,
    pub download_status: DownloadStatus,
    #[serde(default)]
    pub content_location: String,
}

/// The individual counterpart of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipient {
    pub id: RecipientId,
    /// Destination number used for carrier SMS.
    pub number: String,
    #[serde(default = "default_device_id")]
    pub device_id: DeviceId,
}

fn default_device_id() -> DeviceId {
    DeviceId(1)
}

fn default_true() -> bool {
    true
}

/// Raw message record as the store keeps it: one boolean per column.
///
/// This is the serialized form of [`Message`] and the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFlags {
    pub id: MessageId,
    pub thread_id: ThreadId,
    pub direction: Direction,
    pub content_kind: ContentKind,
    pub recipient: Recipient,
    #[serde(default = "default_true")]
    pub single_recipient: bool,
    #[serde(default)]
    pub group_action: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub forced_sms: bool,
    #[serde(default)]
    pub pending_secure_sms_fallback: bool,
    #[serde(default)]
    pub pending_insecure_sms_fallback: bool,
    #[serde(default)]
    pub key_exchange: KeyExchangeState,
    #[serde(default)]
    pub delivered: bool,
    pub date_sent: DateTime<Utc>,
    pub date_received: DateTime<Utc>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub part_count: usize,
    #[serde(default)]
    pub notification: Option<MmsNotification>,
}

/// An immutable, validated message snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MessageFlags", into = "MessageFlags")]
pub struct Message {
    id: MessageId,
    thread_id: ThreadId,
    direction: Direction,
    content_kind: ContentKind,
    recipient: Recipient,
    single_recipient: bool,
    group_action: bool,
    secure: bool,
    transport: Transport,
    delivery: DeliveryState,
    forced_sms: bool,
    key_exchange: KeyExchangeState,
    delivered: bool,
    date_sent: DateTime<Utc>,
    date_received: DateTime<Utc>,
    body: String,
    part_count: usize,
    notification: Option<MmsNotification>,
}

impl TryFrom<MessageFlags> for Message {
    type Error = PosternError;

    fn try_from(flags: MessageFlags) -> Result<Self, Self::Error> {
        let delivery = DeliveryState::from_flags(
            flags.pending,
            flags.failed,
            flags.pending_secure_sms_fallback,
            flags.pending_insecure_sms_fallback,
        )?;

        if delivery.is_pending_sms_fallback() && flags.push {
            return Err(PosternError::InvariantViolation(format!(
                "message {} is pending SMS fallback but marked as push",
                flags.id
            )));
        }
        if flags.push && flags.forced_sms {
            return Err(PosternError::InvariantViolation(format!(
                "message {} is marked as push but was forced over SMS",
                flags.id
            )));
        }
        if flags.notification.is_some() && flags.content_kind != ContentKind::Media {
            return Err(PosternError::InvariantViolation(format!(
                "message {} carries an MMS notification but is not a media message",
                flags.id
            )));
        }

        Ok(Message {
            id: flags.id,
            thread_id: flags.thread_id,
            direction: flags.direction,
            content_kind: flags.content_kind,
            recipient: flags.recipient,
            single_recipient: flags.single_recipient,
            group_action: flags.group_action,
            secure: flags.secure,
            transport: if flags.push {
                Transport::Push
            } else {
                Transport::Sms
            },
            delivery,
            forced_sms: flags.forced_sms,
            key_exchange: flags.key_exchange,
            delivered: flags.delivered,
            date_sent: flags.date_sent,
            date_received: flags.date_received,
            body: flags.body,
            part_count: flags.part_count,
            notification: flags.notification,
        })
    }
}

impl From<Message> for MessageFlags {
    fn from(msg: Message) -> Self {
        MessageFlags {
            id: msg.id,
            thread_id: msg.thread_id,
            direction: msg.direction,
            content_kind: msg.content_kind,
            recipient: msg.recipient,
            single_recipient: msg.single_recipient,
            group_action: msg.group_action,
            secure: msg.secure,
            push: msg.transport == Transport::Push,
            pending: msg.delivery == DeliveryState::Pending,
            failed: msg.delivery == DeliveryState::Failed,
            forced_sms: msg.forced_sms,
            pending_secure_sms_fallback: msg.delivery == DeliveryState::PendingSecureSmsFallback,
            pending_insecure_sms_fallback: msg.delivery
                == DeliveryState::PendingInsecureSmsFallback,
            key_exchange: msg.key_exchange,
            delivered: msg.delivered,
            date_sent: msg.date_sent,
            date_received: msg.date_received,
            body: msg.body,
            part_count: msg.part_count,
            notification: msg.notification,
        }
    }
}

impl Message {
    /// Raw flags for this snapshot, for store implementations that need to
    /// apply a `mark_*` change and re-validate.
    pub fn to_flags(&self) -> MessageFlags {
        self.clone().into()
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_outgoing(&self) -> bool {
        self.direction == Direction::Outgoing
    }

    pub fn content_kind(&self) -> ContentKind {
        self.content_kind
    }

    /// MMS-shaped: media messages and MMS notifications.
    pub fn is_mms(&self) -> bool {
        self.content_kind == ContentKind::Media
    }

    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    pub fn is_single_recipient(&self) -> bool {
        self.single_recipient
    }

    pub fn is_group_action(&self) -> bool {
        self.group_action
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn is_push(&self) -> bool {
        self.transport == Transport::Push
    }

    pub fn delivery(&self) -> DeliveryState {
        self.delivery
    }

    pub fn is_pending(&self) -> bool {
        self.delivery.is_pending()
    }

    pub fn is_failed(&self) -> bool {
        self.delivery.is_failed()
    }

    pub fn is_forced_sms(&self) -> bool {
        self.forced_sms
    }

    pub fn is_pending_sms_fallback(&self) -> bool {
        self.delivery.is_pending_sms_fallback()
    }

    pub fn is_pending_secure_sms_fallback(&self) -> bool {
        self.delivery == DeliveryState::PendingSecureSmsFallback
    }

    pub fn is_pending_insecure_sms_fallback(&self) -> bool {
        self.delivery == DeliveryState::PendingInsecureSmsFallback
    }

    pub fn key_exchange(&self) -> KeyExchangeState {
        self.key_exchange
    }

    pub fn is_key_exchange(&self) -> bool {
        self.key_exchange.is_key_exchange()
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    pub fn date_sent(&self) -> DateTime<Utc> {
        self.date_sent
    }

    pub fn date_received(&self) -> DateTime<Utc> {
        self.date_received
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn part_count(&self) -> usize {
        self.part_count
    }

    /// Media message with at least one part.
    pub fn has_media(&self) -> bool {
        self.is_mms() && self.notification.is_none() && self.part_count > 0
    }

    pub fn notification(&self) -> Option<&MmsNotification> {
        self.notification.as_ref()
    }

    pub fn is_mms_notification(&self) -> bool {
        self.notification.is_some()
    }
}

/// Kind of follow-up work handed to the job runner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    SendSms,
    SendMms,
    DownloadMms,
}

/// A unit of delivery work. Execution, retry and backoff belong to the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub message_id: MessageId,
    pub thread_id: ThreadId,
    pub kind: JobKind,
    /// Whether the job was started without a user action.
    pub automatic: bool,
    /// Carrier destination number, set for `SendSms` only.
    pub destination: Option<String>,
}

impl Job {
    fn new(msg: &Message, kind: JobKind, automatic: bool, destination: Option<String>) -> Self {
        Job {
            id: JobId(Uuid::new_v4()),
            message_id: msg.id(),
            thread_id: msg.thread_id(),
            kind,
            automatic,
            destination,
        }
    }

    pub fn send_sms(msg: &Message, destination: impl Into<String>) -> Self {
        Self::new(msg, JobKind::SendSms, false, Some(destination.into()))
    }

    pub fn send_mms(msg: &Message) -> Self {
        Self::new(msg, JobKind::SendMms, false, None)
    }

    pub fn download_mms(msg: &Message, automatic: bool) -> Self {
        Self::new(msg, JobKind::DownloadMms, automatic, None)
    }
}

/// Identity of a key exchange, built at the moment a key exchange action is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
    pub recipient_id: RecipientId,
    pub device_id: DeviceId,
    pub direction: Direction,
    pub is_bundle: bool,
}

/// Everything the handshake acceptance flow needs to process a key exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeRequest {
    pub handshake: Handshake,
    /// Raw key exchange body.
    pub body: String,
    pub thread_id: ThreadId,
    pub message_id: MessageId,
    pub is_identity_update: bool,
    pub is_push: bool,
    /// Whether this device sent the key exchange.
    pub sent: bool,
}

/// Proof that the user approved sending a specific message unencrypted.
///
/// The store's `mark_insecure` requires one of these, and the only
/// constructor checks that the message is actually waiting on an insecure
/// fallback decision. Clearing the secure flag therefore cannot happen
/// without passing through the approval path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsecureFallbackConsent {
    message_id: MessageId,
}

impl InsecureFallbackConsent {
    /// Record the user's approval for `msg`.
    pub fn from_approval(msg: &Message) -> Result<Self, PosternError> {
        if !msg.is_pending_insecure_sms_fallback() {
            return Err(PosternError::InvalidState {
                message_id: msg.id(),
                expected: "pending_insecure_sms_fallback",
                actual: msg.delivery().to_string(),
            });
        }
        Ok(InsecureFallbackConsent {
            message_id: msg.id(),
        })
    }

    pub fn message_id(&self) -> MessageId {
        self.message_id
    }
}

/// One renderable part of a media message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub part_id: PartId,
    pub content_type: String,
    pub uri: String,
}

impl Slide {
    /// Images and videos get a thumbnail; audio and documents do not.
    pub fn has_thumbnail(&self) -> bool {
        self.content_type.starts_with("image/") || self.content_type.starts_with("video/")
    }
}

/// Resolved part collection of a media message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    /// The slide whose thumbnail represents the whole message, if any.
    pub fn thumbnail_slide(&self) -> Option<&Slide> {
        self.slides.iter().find(|s| s.has_thumbnail())
    }
}

/// Decoded thumbnail image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Whether the image should fade in (it was not served from cache).
    pub animate: bool,
}
