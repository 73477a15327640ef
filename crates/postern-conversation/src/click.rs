// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcomes of clicking a conversation item or its thumbnail.

use chrono::{DateTime, Utc};
use postern_config::model::MediaConfig;
use postern_core::{HandshakeRequest, Job, Message, MessageId, RecipientId, Slide};
use postern_delivery::{ApprovalPrompt, PreferencesRedirect};
use serde::Serialize;

/// Message table the details screen reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailsTransport {
    Mms,
    Sms,
}

/// What a click on the item led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum ClickAction {
    /// Failed message: open its delivery details.
    ShowDetails {
        message_id: MessageId,
        transport: DetailsTransport,
        push_group: bool,
    },
    /// The handshake acceptance flow was opened.
    HandshakeOpened { request: HandshakeRequest },
    /// The user must approve or reject the SMS fallback.
    ApprovalPrompt { prompt: ApprovalPrompt },
    /// A manual MMS download was enqueued.
    DownloadEnqueued { job: Job },
    /// No APN configured: open the MMS preferences.
    OpenPreferences { redirect: PreferencesRedirect },
    /// Nothing to do.
    NoAction,
}

/// What a click on the item's thumbnail led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum ThumbnailClick {
    /// Open the in-app preview.
    MediaPreview {
        uri: String,
        content_type: String,
        /// Sender of an incoming message; unset for outgoing ones.
        recipient: Option<RecipientId>,
        date_received: DateTime<Utc>,
    },
    /// Warn that the media will leave encrypted storage before opening an
    /// external viewer.
    ExternalViewerWarning { uri: String, content_type: String },
}

impl ThumbnailClick {
    pub fn for_slide(msg: &Message, slide: &Slide, media: &MediaConfig) -> Self {
        if media.is_previewable(&slide.content_type) {
            ThumbnailClick::MediaPreview {
                uri: slide.uri.clone(),
                content_type: slide.content_type.clone(),
                recipient: (!msg.is_outgoing()).then(|| msg.recipient().id),
                date_received: msg.date_received(),
            }
        } else {
            ThumbnailClick::ExternalViewerWarning {
                uri: slide.uri.clone(),
                content_type: slide.content_type.clone(),
            }
        }
    }
}
