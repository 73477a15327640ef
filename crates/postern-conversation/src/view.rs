// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presentation state of a bound message.

use chrono::{DateTime, Utc};
use postern_config::model::NotificationConfig;
use postern_core::{Message, MessageId};
use postern_delivery::{
    ApprovalPrompt, DeliveryJobDispatcher, DownloadAffordance, FallbackApprovalWorkflow,
    NotificationCaption, delivery_failure, notification_caption,
};
use postern_handshake::AutoInitiateOutcome;
use postern_transport::{
    CaptionState, ItemStatus, TransportState, resolve_caption_state, resolve_status,
    resolve_transport_state,
};
use serde::Serialize;

/// Facts about the surrounding conversation supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindContext {
    pub group_thread: bool,
    /// The recipient currently has an active push session.
    pub push_destination: bool,
    pub now: DateTime<Utc>,
}

impl BindContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            group_thread: false,
            push_destination: false,
            now,
        }
    }
}

/// Caption and download affordance of an MMS notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationView {
    pub caption: NotificationCaption,
    pub affordance: DownloadAffordance,
    pub label: Option<&'static str>,
}

/// Everything a renderer needs for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub message_id: MessageId,
    pub transport: TransportState,
    pub caption: CaptionState,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval: Option<ApprovalPrompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_initiate: Option<AutoInitiateOutcome>,
}

/// Resolve the view of `msg`. Pure: no collaborator is consulted.
pub fn resolve_item_view(
    msg: &Message,
    ctx: &BindContext,
    notifications: &NotificationConfig,
) -> ItemView {
    let notification = msg.notification().and_then(|n| {
        let affordance = DeliveryJobDispatcher::download_affordance(msg)?;
        Some(NotificationView {
            caption: notification_caption(n, ctx.now, notifications.expiry_warning_hours),
            label: affordance.label(),
            affordance,
        })
    });

    ItemView {
        message_id: msg.id(),
        transport: resolve_transport_state(msg, ctx.push_destination),
        caption: resolve_caption_state(msg),
        status: resolve_status(msg, ctx.group_thread),
        notification,
        approval: FallbackApprovalWorkflow::prompt(msg).ok(),
        failure: delivery_failure(msg).map(|e| e.to_string()),
        auto_initiate: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use postern_core::DownloadStatus;
    use postern_test_utils::MessageBuilder;

    fn ctx() -> BindContext {
        BindContext::new(Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap())
    }

    #[test]
    fn notification_view_combines_caption_and_affordance() {
        let msg = MessageBuilder::mms_notification(1, DownloadStatus::PendingAuto).build();
        let view = resolve_item_view(&msg, &ctx(), &NotificationConfig::default());

        let notification = view.notification.unwrap();
        assert_eq!(notification.caption.text, "42 KB\nExpires in 7 days");
        assert_eq!(notification.affordance, DownloadAffordance::Download);
        assert_eq!(notification.label, None);
        assert_eq!(view.caption, CaptionState::NoMedia);
    }

    #[test]
    fn pending_fallback_view_carries_prompt_and_failure() {
        let msg = MessageBuilder::outgoing_text(1).insecure_fallback().build();
        let view = resolve_item_view(&msg, &ctx(), &NotificationConfig::default());

        assert_eq!(view.transport, TransportState::SmsPending);
        assert!(view.approval.is_some());
        assert!(view.failure.unwrap().contains("awaiting fallback approval"));
    }

    #[test]
    fn sent_message_has_no_extras() {
        let msg = MessageBuilder::incoming_text(1).build();
        let view = resolve_item_view(&msg, &ctx(), &NotificationConfig::default());
        assert!(view.notification.is_none());
        assert!(view.approval.is_none());
        assert!(view.failure.is_none());
        assert_eq!(view.transport, TransportState::SmsSent);
    }
}
