// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job enqueue policy for sends and MMS downloads.

use std::sync::Arc;

use postern_core::{
    ContentKind, DownloadErrorKind, DownloadStatus, Job, JobRunner, Message, MessageId,
    MessageStore, PosternError, ThreadId,
};
use serde::Serialize;
use tracing::{debug, info};

/// Arguments for the MMS preferences screen opened when no APN is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreferencesRedirect {
    pub message_id: MessageId,
    pub thread_id: ThreadId,
    /// Always set: the download resumes on its own once preferences are fixed.
    pub automatic: bool,
}

/// What an MMS notification offers the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum DownloadAffordance {
    /// A download button.
    Download,
    /// A status label; clicking retries the download.
    Retry,
    /// A status label; clicking opens the MMS preferences.
    OpenPreferences(PreferencesRedirect),
    /// A status label only.
    Status { status: DownloadStatus },
}

impl DownloadAffordance {
    /// Label shown in place of the download button.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            DownloadAffordance::Download => None,
            DownloadAffordance::Retry => Some("Error downloading MMS, tap to retry"),
            DownloadAffordance::OpenPreferences(_) => Some("MMS settings required, tap to fix"),
            DownloadAffordance::Status { status } => Some(match status {
                DownloadStatus::Downloading => "Downloading",
                DownloadStatus::HardError => "Error downloading MMS",
                DownloadStatus::ApnUnavailable => "MMS settings required",
                DownloadStatus::PendingAuto => "Waiting for download",
            }),
        }
    }

    /// Whether invoking the affordance enqueues a download job.
    pub fn enqueues_download(&self) -> bool {
        matches!(
            self,
            DownloadAffordance::Download | DownloadAffordance::Retry
        )
    }
}

/// Decides and enqueues send and download jobs.
pub struct DeliveryJobDispatcher {
    store: Arc<dyn MessageStore>,
    runner: Arc<dyn JobRunner>,
}

impl DeliveryJobDispatcher {
    pub fn new(store: Arc<dyn MessageStore>, runner: Arc<dyn JobRunner>) -> Self {
        Self { store, runner }
    }

    /// Enqueue the send job matching the message's content kind.
    ///
    /// Text goes out as SMS to the recipient's number, media as MMS.
    pub fn enqueue_send(&self, msg: &Message) -> Job {
        let job = match msg.content_kind() {
            ContentKind::Media => Job::send_mms(msg),
            ContentKind::Text => Job::send_sms(msg, msg.recipient().number.clone()),
        };
        info!(
            message_id = %msg.id(),
            thread_id = %msg.thread_id(),
            job_id = %job.id,
            kind = %job.kind,
            "enqueued send job"
        );
        self.runner.enqueue(job.clone());
        job
    }

    /// The affordance an MMS notification exposes, or `None` for any other
    /// message.
    pub fn download_affordance(msg: &Message) -> Option<DownloadAffordance> {
        let notification = msg.notification()?;
        Some(affordance_for(msg, notification.download_status))
    }

    /// Start a manual download of an MMS notification.
    ///
    /// The download status is re-read from the store so a stale snapshot
    /// cannot enqueue a second job for a download already in flight.
    pub async fn enqueue_download(&self, msg: &Message) -> Result<Job, PosternError> {
        if !msg.is_mms_notification() {
            return Err(PosternError::InvalidState {
                message_id: msg.id(),
                expected: "mms_notification",
                actual: msg.content_kind().to_string(),
            });
        }

        let status = self.store.download_status(msg.id()).await?;
        match affordance_for(msg, status) {
            DownloadAffordance::Download | DownloadAffordance::Retry => {
                let job = Job::download_mms(msg, false);
                info!(
                    message_id = %msg.id(),
                    thread_id = %msg.thread_id(),
                    job_id = %job.id,
                    %status,
                    "enqueued manual MMS download"
                );
                self.runner.enqueue(job.clone());
                Ok(job)
            }
            DownloadAffordance::OpenPreferences(_) => Err(PosternError::Download {
                message_id: msg.id(),
                kind: DownloadErrorKind::ApnUnavailable,
            }),
            DownloadAffordance::Status { status } => {
                debug!(message_id = %msg.id(), %status, "download not available");
                Err(PosternError::InvalidState {
                    message_id: msg.id(),
                    expected: "downloadable notification",
                    actual: status.to_string(),
                })
            }
        }
    }
}

fn affordance_for(msg: &Message, status: DownloadStatus) -> DownloadAffordance {
    match status {
        DownloadStatus::PendingAuto => DownloadAffordance::Download,
        DownloadStatus::HardError if !msg.is_outgoing() => DownloadAffordance::Retry,
        DownloadStatus::ApnUnavailable if !msg.is_outgoing() => {
            DownloadAffordance::OpenPreferences(PreferencesRedirect {
                message_id: msg.id(),
                thread_id: msg.thread_id(),
                automatic: true,
            })
        }
        status => DownloadAffordance::Status { status },
    }
}
