// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Postern crates.
//!
//! Provides deterministic, in-memory stand-ins for every collaborator
//! trait, plus a builder for valid message snapshots.
//!
//! # Components
//!
//! - [`MessageBuilder`] - fluent builder for [`Message`](postern_core::Message) snapshots
//! - [`MockStore`] - in-memory message store that records every `mark_*` call in order
//! - [`MockJobRunner`] - captures enqueued jobs
//! - [`MockSessions`], [`MemoryExemptions`] - session lookup and auto-initiate latch
//! - [`RecordingHandshakes`] - records handshake initiations and acceptance requests
//! - [`GatedSlideDeckResolver`], [`GatedThumbnailResolver`] - resolvers that complete only when released

pub mod builders;
pub mod gated;
pub mod mock_handshake;
pub mod mock_jobs;
pub mod mock_store;

pub use builders::MessageBuilder;
pub use gated::{GatedSlideDeckResolver, GatedThumbnailResolver};
pub use mock_handshake::{MemoryExemptions, MockSessions, RecordingHandshakes};
pub use mock_jobs::MockJobRunner;
pub use mock_store::{MockStore, StoreCall};
