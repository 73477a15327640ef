// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Postern message delivery core.
//!
//! This crate provides the message model, the error taxonomy, and the
//! collaborator traits (message store, job runner, session and exemption
//! lookups, handshake entry points, media resolvers) that every other
//! Postern crate builds on. Collaborators are always passed in explicitly;
//! nothing in the workspace reaches for a process-wide singleton.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{DownloadErrorKind, PosternError};
pub use types::{
    ContentKind, DeliveryState, DeviceId, Direction, DownloadStatus, Handshake, HandshakeRequest,
    InsecureFallbackConsent, Job, JobId, JobKind, KeyExchangeState, Message, MessageFlags,
    MessageId, MmsNotification, PartId, Recipient, RecipientId, Slide, SlideDeck, ThreadId,
    Thumbnail, Transport,
};

// Re-export all collaborator traits at crate root.
pub use traits::{
    HandshakeAcceptor, HandshakeInitiator, JobRunner, MessageStore, SessionValidator,
    SlideDeckResolver, ThreadExemptions, ThumbnailResolver,
};
