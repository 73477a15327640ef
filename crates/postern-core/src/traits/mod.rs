// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits for everything outside the delivery core.
//!
//! Storage, job execution, session lookup, handshake screens and media
//! decoding all live elsewhere. Components receive them as
//! `Arc<dyn Trait + Send + Sync>` and use `#[async_trait]` where the
//! collaborator does I/O.

pub mod handshake;
pub mod jobs;
pub mod media;
pub mod session;
pub mod store;

pub use handshake::{HandshakeAcceptor, HandshakeInitiator};
pub use jobs::JobRunner;
pub use media::{SlideDeckResolver, ThumbnailResolver};
pub use session::{SessionValidator, ThreadExemptions};
pub use store::MessageStore;
