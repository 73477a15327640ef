// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auto-initiate idempotence and click handling against recording mocks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use postern_config::model::HandshakeConfig;
use postern_core::{HandshakeInitiator, KeyExchangeState, PosternError, RecipientId, ThreadId};
use postern_handshake::{AutoInitiateOutcome, IgnoreReason, KeyExchangeClick, KeyExchangeCoordinator};
use postern_test_utils::{MemoryExemptions, MessageBuilder, MockSessions, RecordingHandshakes};

struct Harness {
    coordinator: Arc<KeyExchangeCoordinator>,
    handshakes: RecordingHandshakes,
    exemptions: Arc<MemoryExemptions>,
}

fn harness_with(sessions: MockSessions, config: HandshakeConfig) -> Harness {
    let handshakes = RecordingHandshakes::new();
    let exemptions = Arc::new(MemoryExemptions::new());
    let coordinator = Arc::new(KeyExchangeCoordinator::new(
        Arc::new(sessions),
        exemptions.clone(),
        Arc::new(handshakes.clone()),
        Arc::new(handshakes.clone()),
        config,
    ));
    Harness {
        coordinator,
        handshakes,
        exemptions,
    }
}

fn harness() -> Harness {
    harness_with(MockSessions::new(), HandshakeConfig::default())
}

#[tokio::test]
async fn auto_initiate_fires_once_per_thread_across_sequential_messages() {
    let h = harness();

    let mut outcomes = Vec::new();
    for id in 1..=5 {
        let msg = MessageBuilder::incoming_text(id).thread(9).build();
        outcomes.push(h.coordinator.auto_initiate(&msg, false).await.unwrap());
    }

    assert_eq!(outcomes[0], AutoInitiateOutcome::Initiated);
    assert!(
        outcomes[1..]
            .iter()
            .all(|o| *o == AutoInitiateOutcome::AlreadyExempt)
    );
    assert_eq!(
        h.handshakes.initiated().await,
        vec![(ThreadId(9), RecipientId(100))]
    );
    assert_eq!(h.exemptions.exempt_calls().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn auto_initiate_fires_once_under_concurrent_binds() {
    let h = harness();

    let tasks: Vec<_> = (1..=8)
        .map(|id| {
            let coordinator = h.coordinator.clone();
            tokio::spawn(async move {
                let msg = MessageBuilder::incoming_text(id).thread(4).build();
                coordinator.auto_initiate(&msg, false).await.unwrap()
            })
        })
        .collect();

    let mut initiated = 0;
    for task in tasks {
        if task.await.unwrap() == AutoInitiateOutcome::Initiated {
            initiated += 1;
        }
    }

    assert_eq!(initiated, 1);
    assert_eq!(h.handshakes.initiated().await.len(), 1);
}

#[tokio::test]
async fn separate_threads_each_get_one_handshake() {
    let h = harness();
    for (id, thread) in [(1, 1), (2, 2), (3, 1), (4, 2)] {
        let msg = MessageBuilder::incoming_text(id).thread(thread).build();
        h.coordinator.auto_initiate(&msg, false).await.unwrap();
    }
    assert_eq!(h.handshakes.initiated().await.len(), 2);
}

#[tokio::test]
async fn established_session_skips_initiation_without_exempting() {
    let h = harness_with(
        MockSessions::with_sessions([RecipientId(100)]),
        HandshakeConfig::default(),
    );
    let msg = MessageBuilder::incoming_text(1).build();

    let outcome = h.coordinator.auto_initiate(&msg, false).await.unwrap();
    assert_eq!(outcome, AutoInitiateOutcome::SessionEstablished);
    assert!(h.handshakes.initiated().await.is_empty());
    assert_eq!(h.exemptions.exempt_calls().await, 0);
}

#[tokio::test]
async fn group_and_secure_messages_never_initiate() {
    let h = harness();
    let group = MessageBuilder::incoming_text(1).build();
    let secure = MessageBuilder::incoming_text(2).secure(true).build();

    assert_eq!(
        h.coordinator.auto_initiate(&group, true).await.unwrap(),
        AutoInitiateOutcome::NotEligible
    );
    assert_eq!(
        h.coordinator.auto_initiate(&secure, false).await.unwrap(),
        AutoInitiateOutcome::NotEligible
    );
    assert!(h.handshakes.initiated().await.is_empty());
}

#[tokio::test]
async fn disabled_config_never_initiates() {
    let h = harness_with(
        MockSessions::new(),
        HandshakeConfig {
            auto_initiate: false,
        },
    );
    let msg = MessageBuilder::incoming_text(1).build();
    assert_eq!(
        h.coordinator.auto_initiate(&msg, false).await.unwrap(),
        AutoInitiateOutcome::Disabled
    );
    assert!(h.handshakes.initiated().await.is_empty());
}

#[tokio::test]
async fn non_actionable_clicks_never_open_the_flow() {
    let h = harness();

    let cases = [
        (
            MessageBuilder::incoming_text(1).key_exchange(KeyExchangeState::Processed),
            IgnoreReason::Processed,
        ),
        (
            MessageBuilder::incoming_text(2).key_exchange(KeyExchangeState::Stale),
            IgnoreReason::Stale,
        ),
        (
            MessageBuilder::incoming_text(3).key_exchange(KeyExchangeState::Corrupted),
            IgnoreReason::Corrupted,
        ),
        (
            MessageBuilder::outgoing_text(4).key_exchange(KeyExchangeState::OutgoingBundle),
            IgnoreReason::Outgoing,
        ),
        (MessageBuilder::incoming_text(5), IgnoreReason::NotKeyExchange),
    ];

    for (builder, expected) in cases {
        let msg = builder.build();
        assert_eq!(
            h.coordinator.handle_click(&msg).await.unwrap(),
            KeyExchangeClick::Ignored(expected)
        );
    }
    assert!(h.handshakes.accepted().await.is_empty());
}

#[tokio::test]
async fn actionable_click_opens_acceptance_once() {
    let h = harness();
    let msg = MessageBuilder::incoming_text(11)
        .key_exchange(KeyExchangeState::IncomingBundle)
        .body("bundle")
        .build();

    let click = h.coordinator.handle_click(&msg).await.unwrap();
    let KeyExchangeClick::Opened(request) = click else {
        panic!("expected the acceptance flow to open");
    };
    assert!(request.handshake.is_bundle);

    let accepted = h.handshakes.accepted().await;
    assert_eq!(accepted, vec![request]);
}

/// Never completes for `stalled`; records every other thread.
struct StalledInitiator {
    stalled: ThreadId,
    inner: RecordingHandshakes,
}

#[async_trait]
impl HandshakeInitiator for StalledInitiator {
    async fn initiate(&self, thread: ThreadId, recipient: RecipientId) -> Result<(), PosternError> {
        if thread == self.stalled {
            std::future::pending::<()>().await;
        }
        self.inner.initiate(thread, recipient).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stalled_initiator_does_not_block_other_threads() {
    let handshakes = RecordingHandshakes::new();
    let exemptions = Arc::new(MemoryExemptions::new());
    let coordinator = Arc::new(KeyExchangeCoordinator::new(
        Arc::new(MockSessions::new()),
        exemptions.clone(),
        Arc::new(StalledInitiator {
            stalled: ThreadId(1),
            inner: handshakes.clone(),
        }),
        Arc::new(handshakes.clone()),
        HandshakeConfig::default(),
    ));

    let stalled = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            let msg = MessageBuilder::incoming_text(1).thread(1).build();
            coordinator.auto_initiate(&msg, false).await
        })
    };
    tokio::time::timeout(Duration::from_secs(2), async {
        while exemptions.exempt_calls().await == 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("thread 1 was never exempted");

    let msg = MessageBuilder::incoming_text(2).thread(2).build();
    let outcome = tokio::time::timeout(
        Duration::from_secs(2),
        coordinator.auto_initiate(&msg, false),
    )
    .await
    .expect("thread 2 waited on thread 1's initiator")
    .unwrap();

    assert_eq!(outcome, AutoInitiateOutcome::Initiated);
    assert_eq!(
        handshakes.initiated().await,
        vec![(ThreadId(2), RecipientId(100))]
    );
    assert!(!stalled.is_finished());
    stalled.abort();
}
