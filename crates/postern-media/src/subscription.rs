// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancellable listener for one resolution stage.

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Handle to a running resolution stage.
///
/// Dropping the handle cancels the stage: its result is never sent.
#[must_use = "dropping a subscription cancels it"]
pub struct Subscription {
    _guard: DropGuard,
}

impl Subscription {
    /// Run `work` on the runtime and forward its output to `events` unless
    /// cancelled first.
    pub fn spawn<T, F>(work: F, events: mpsc::UnboundedSender<T>) -> Self
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let token = CancellationToken::new();
        let listener = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = listener.cancelled() => {}
                output = work => {
                    // The pipeline may already be gone.
                    let _ = events.send(output);
                }
            }
        });
        Self {
            _guard: token.drop_guard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn delivers_when_held() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = Subscription::spawn(async { 7 }, tx);
        assert_eq!(rx.recv().await, Some(7));
    }

    #[tokio::test]
    async fn dropped_subscription_never_delivers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (release, gate) = oneshot::channel::<u32>();

        let sub = Subscription::spawn(async move { gate.await.unwrap_or(0) }, tx);
        drop(sub);
        let _ = release.send(1);

        let received = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        // Either the channel closed with nothing in it, or nothing arrived in time.
        assert!(matches!(received, Ok(None) | Err(_)));
    }

    #[tokio::test]
    async fn dropping_ends_a_stalled_stage() {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let sub = Subscription::spawn(std::future::pending(), tx);
        drop(sub);

        // The task exits and drops its sender, closing the channel.
        let closed = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert_eq!(closed, Ok(None));
    }
}
