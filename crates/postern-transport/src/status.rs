// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status indicators, date label and clickability of a message bubble.

use chrono::{DateTime, Utc};
use postern_core::Message;
use serde::Serialize;

/// Short call-to-action shown under a bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorText {
    /// Failed message; details on click.
    ClickForDetails,
    /// Secure fallback pending for a media message.
    ApproveMms,
    /// Secure fallback pending for a text message.
    ApproveSms,
    /// Insecure fallback pending.
    ApproveUnencrypted,
}

/// What the date slot of a bubble shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DateLabel {
    NotDelivered,
    AwaitingApproval,
    Pending,
    Sent { at: DateTime<Utc> },
}

/// Resolved indicator state of a bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemStatus {
    /// Group updates render without a bubble and carry no status.
    pub has_bubble: bool,
    pub failed_indicator: bool,
    pub secure_indicator: bool,
    pub key_exchange_icon: bool,
    pub delivered_indicator: bool,
    pub pending_approval_indicator: bool,
    pub indicator_text: Option<IndicatorText>,
    pub date_label: DateLabel,
    pub clickable: bool,
    /// Show the sender's name above incoming messages in group threads.
    pub show_sender: bool,
}

/// Resolve the status of a bubble.
pub fn resolve_status(msg: &Message, group_thread: bool) -> ItemStatus {
    let key_exchange = msg.key_exchange();

    let (date_label, indicator_text, pending_approval_indicator) = if msg.is_failed() {
        (
            DateLabel::NotDelivered,
            Some(IndicatorText::ClickForDetails),
            false,
        )
    } else if msg.is_pending_sms_fallback() {
        let text = if msg.is_pending_insecure_sms_fallback() {
            IndicatorText::ApproveUnencrypted
        } else if msg.is_mms() {
            IndicatorText::ApproveMms
        } else {
            IndicatorText::ApproveSms
        };
        (DateLabel::AwaitingApproval, Some(text), true)
    } else if msg.is_pending() {
        (DateLabel::Pending, None, false)
    } else {
        // Push messages carry a reliable sender timestamp; carrier SMS does not.
        let at = if msg.is_push() {
            msg.date_sent()
        } else {
            msg.date_received()
        };
        (DateLabel::Sent { at }, None, false)
    };

    let clickable = msg.is_failed()
        || msg.is_pending_sms_fallback()
        || (key_exchange.is_key_exchange() && !key_exchange.is_corrupted() && !msg.is_outgoing());

    ItemStatus {
        has_bubble: !msg.is_group_action(),
        failed_indicator: msg.is_failed(),
        secure_indicator: msg.is_secure(),
        key_exchange_icon: key_exchange.is_key_exchange(),
        delivered_indicator: !key_exchange.is_key_exchange() && msg.is_delivered(),
        pending_approval_indicator,
        indicator_text,
        date_label,
        clickable,
        show_sender: group_thread && !msg.is_outgoing(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use postern_core::KeyExchangeState;
    use postern_test_utils::MessageBuilder;

    #[test]
    fn failed_message_asks_for_details() {
        let msg = MessageBuilder::outgoing_text(1).failed(true).build();
        let status = resolve_status(&msg, false);
        assert!(status.failed_indicator);
        assert!(status.clickable);
        assert_eq!(status.date_label, DateLabel::NotDelivered);
        assert_eq!(status.indicator_text, Some(IndicatorText::ClickForDetails));
    }

    #[test]
    fn fallback_wording_depends_on_kind() {
        let sms = MessageBuilder::outgoing_text(1).secure_fallback().build();
        let mms = MessageBuilder::outgoing_media(2, 1).secure_fallback().build();
        let insecure = MessageBuilder::outgoing_media(3, 1).insecure_fallback().build();

        assert_eq!(
            resolve_status(&sms, false).indicator_text,
            Some(IndicatorText::ApproveSms)
        );
        assert_eq!(
            resolve_status(&mms, false).indicator_text,
            Some(IndicatorText::ApproveMms)
        );
        let status = resolve_status(&insecure, false);
        assert_eq!(status.indicator_text, Some(IndicatorText::ApproveUnencrypted));
        assert!(status.pending_approval_indicator);
        assert!(status.clickable);
    }

    #[test]
    fn sent_timestamp_depends_on_transport() {
        let sent = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let received = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 5).unwrap();

        let push = MessageBuilder::incoming_text(1)
            .push(true)
            .date_sent(sent)
            .date_received(received)
            .build();
        assert_eq!(resolve_status(&push, false).date_label, DateLabel::Sent { at: sent });

        let sms = MessageBuilder::incoming_text(2)
            .date_sent(sent)
            .date_received(received)
            .build();
        assert_eq!(
            resolve_status(&sms, false).date_label,
            DateLabel::Sent { at: received }
        );
    }

    #[test]
    fn key_exchange_hides_delivery_receipt() {
        let msg = MessageBuilder::incoming_text(1)
            .key_exchange(KeyExchangeState::IncomingBundle)
            .delivered(true)
            .build();
        let status = resolve_status(&msg, false);
        assert!(status.key_exchange_icon);
        assert!(!status.delivered_indicator);
        assert!(status.clickable);
    }

    #[test]
    fn corrupted_or_outgoing_key_exchange_is_not_clickable() {
        let corrupted = MessageBuilder::incoming_text(1)
            .key_exchange(KeyExchangeState::Corrupted)
            .build();
        assert!(!resolve_status(&corrupted, false).clickable);

        let outgoing = MessageBuilder::outgoing_text(2)
            .key_exchange(KeyExchangeState::OutgoingBundle)
            .build();
        assert!(!resolve_status(&outgoing, false).clickable);
    }

    #[test]
    fn sender_shown_for_incoming_group_messages() {
        let incoming = MessageBuilder::incoming_text(1).build();
        let outgoing = MessageBuilder::outgoing_text(2).build();
        assert!(resolve_status(&incoming, true).show_sender);
        assert!(!resolve_status(&incoming, false).show_sender);
        assert!(!resolve_status(&outgoing, true).show_sender);
    }

    #[test]
    fn group_action_has_no_bubble() {
        let msg = MessageBuilder::incoming_text(1).group_action(true).build();
        assert!(!resolve_status(&msg, true).has_bubble);
    }
}
