// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size and expiration caption of an MMS notification.

use chrono::{DateTime, Utc};
use postern_core::MmsNotification;
use serde::Serialize;

/// Descriptive caption of a not-yet-downloaded MMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationCaption {
    /// Message size in whole kilobytes, rounded up.
    pub size_kb: u64,
    /// Relative expiration, e.g. `in 3 hours` or `expired`.
    pub expires: String,
    /// The message expires within the configured warning window.
    pub expiring_soon: bool,
    /// `"{size} KB\nExpires {relative}"`.
    pub text: String,
}

/// Build the caption for `notification` as seen at `now`.
pub fn notification_caption(
    notification: &MmsNotification,
    now: DateTime<Utc>,
    warning_hours: u32,
) -> NotificationCaption {
    let size_kb = notification.size_bytes.div_ceil(1024);
    let remaining = notification.expires_at - now;
    let expired = remaining <= chrono::Duration::zero();
    let expires = relative_expiry(remaining);
    let expiring_soon = !expired && remaining.num_hours() < i64::from(warning_hours);

    NotificationCaption {
        size_kb,
        text: format!("{size_kb} KB\nExpires {expires}"),
        expires,
        expiring_soon,
    }
}

fn relative_expiry(remaining: chrono::Duration) -> String {
    if remaining <= chrono::Duration::zero() {
        return "expired".to_string();
    }
    let (count, unit) = if remaining.num_days() > 0 {
        (remaining.num_days(), "day")
    } else if remaining.num_hours() > 0 {
        (remaining.num_hours(), "hour")
    } else {
        (remaining.num_minutes().max(1), "minute")
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("in {count} {unit}{plural}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use postern_core::DownloadStatus;

    fn notification(size_bytes: u64, expires_at: DateTime<Utc>) -> MmsNotification {
        MmsNotification {
            size_bytes,
            expires_at,
            download_status: DownloadStatus::PendingAuto,
            content_location: "http://mmsc.example/1".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn size_rounds_up_to_whole_kilobytes() {
        let caption = notification_caption(&notification(42_000, now() + Duration::days(7)), now(), 24);
        assert_eq!(caption.size_kb, 42);
        assert_eq!(
            notification_caption(&notification(1024, now()), now(), 24).size_kb,
            1
        );
        assert_eq!(
            notification_caption(&notification(1025, now()), now(), 24).size_kb,
            2
        );
    }

    #[test]
    fn text_combines_size_and_countdown() {
        let caption = notification_caption(
            &notification(42_000, now() + Duration::days(2) + Duration::hours(5)),
            now(),
            24,
        );
        assert_eq!(caption.text, "42 KB\nExpires in 2 days");
        assert!(!caption.expiring_soon);
    }

    #[test]
    fn hours_and_minutes_are_flagged_soon() {
        let hours = notification_caption(&notification(1, now() + Duration::minutes(200)), now(), 24);
        assert_eq!(hours.expires, "in 3 hours");
        assert!(hours.expiring_soon);

        let minute = notification_caption(&notification(1, now() + Duration::seconds(20)), now(), 24);
        assert_eq!(minute.expires, "in 1 minute");
    }

    #[test]
    fn past_expiration_reads_expired() {
        let caption = notification_caption(&notification(1, now() - Duration::hours(1)), now(), 24);
        assert_eq!(caption.expires, "expired");
        assert!(!caption.expiring_soon);
    }

    #[test]
    fn warning_window_is_configurable() {
        let n = notification(1, now() + Duration::hours(30));
        assert!(!notification_caption(&n, now(), 24).expiring_soon);
        assert!(notification_caption(&n, now(), 48).expiring_soon);
    }
}
