// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manual MMS download dispatch.

use std::sync::Arc;

use postern_core::{
    Direction, DownloadErrorKind, DownloadStatus, JobKind, MessageId, PosternError, ThreadId,
};
use postern_delivery::DeliveryJobDispatcher;
use postern_test_utils::{MessageBuilder, MockJobRunner, MockStore};

async fn dispatcher(
    messages: Vec<postern_core::Message>,
) -> (DeliveryJobDispatcher, Arc<MockStore>, Arc<MockJobRunner>) {
    let store = Arc::new(MockStore::with_messages(messages).await);
    let runner = Arc::new(MockJobRunner::new());
    (
        DeliveryJobDispatcher::new(store.clone(), runner.clone()),
        store,
        runner,
    )
}

#[tokio::test]
async fn pending_auto_and_hard_error_enqueue_manual_download() {
    let pending = MessageBuilder::mms_notification(1, DownloadStatus::PendingAuto)
        .thread(3)
        .build();
    let errored = MessageBuilder::mms_notification(2, DownloadStatus::HardError).build();
    let (dispatcher, _store, runner) = dispatcher(vec![pending.clone(), errored.clone()]).await;

    let first = dispatcher.enqueue_download(&pending).await.unwrap();
    let second = dispatcher.enqueue_download(&errored).await.unwrap();

    assert_eq!(first.kind, JobKind::DownloadMms);
    assert_eq!(first.message_id, MessageId(1));
    assert_eq!(first.thread_id, ThreadId(3));
    assert!(!first.automatic);
    assert_eq!(second.message_id, MessageId(2));
    assert_eq!(runner.jobs(), vec![first, second]);
}

#[tokio::test]
async fn apn_unavailable_reports_download_error_without_job() {
    let msg = MessageBuilder::mms_notification(1, DownloadStatus::ApnUnavailable).build();
    let (dispatcher, _store, runner) = dispatcher(vec![msg.clone()]).await;

    let err = dispatcher.enqueue_download(&msg).await.unwrap_err();
    assert!(matches!(
        err,
        PosternError::Download {
            kind: DownloadErrorKind::ApnUnavailable,
            ..
        }
    ));
    assert!(err.is_recoverable());
    assert_eq!(runner.job_count(), 0);
}

#[tokio::test]
async fn in_flight_download_is_not_enqueued_twice() {
    // Snapshot still says pending, the store already moved on.
    let stale = MessageBuilder::mms_notification(1, DownloadStatus::PendingAuto).build();
    let current = MessageBuilder::mms_notification(1, DownloadStatus::Downloading).build();
    let (dispatcher, _store, runner) = dispatcher(vec![current]).await;

    assert!(matches!(
        dispatcher.enqueue_download(&stale).await,
        Err(PosternError::InvalidState { .. })
    ));
    assert_eq!(runner.job_count(), 0);
}

#[tokio::test]
async fn outgoing_hard_error_has_no_retry() {
    let msg = MessageBuilder::mms_notification(1, DownloadStatus::HardError)
        .direction(Direction::Outgoing)
        .build();
    let (dispatcher, _store, runner) = dispatcher(vec![msg.clone()]).await;

    assert!(dispatcher.enqueue_download(&msg).await.is_err());
    assert_eq!(runner.job_count(), 0);
}

#[tokio::test]
async fn non_notification_cannot_be_downloaded() {
    let msg = MessageBuilder::incoming_media(1, 1).build();
    let (dispatcher, _store, runner) = dispatcher(vec![msg.clone()]).await;

    assert!(matches!(
        dispatcher.enqueue_download(&msg).await,
        Err(PosternError::InvalidState { .. })
    ));
    assert_eq!(runner.job_count(), 0);
}

#[tokio::test]
async fn send_job_matches_content_kind() {
    let text = MessageBuilder::outgoing_text(1).recipient(5, "+15550105").build();
    let media = MessageBuilder::outgoing_media(2, 3).build();
    let (dispatcher, _store, runner) = dispatcher(vec![]).await;

    let sms = dispatcher.enqueue_send(&text);
    let mms = dispatcher.enqueue_send(&media);

    assert_eq!(sms.kind, JobKind::SendSms);
    assert_eq!(sms.destination.as_deref(), Some("+15550105"));
    assert_eq!(mms.kind, JobKind::SendMms);
    assert_eq!(runner.job_count(), 2);
}
