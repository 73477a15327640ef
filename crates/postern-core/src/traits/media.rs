// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asynchronous media resolvers.
//!
//! Both resolvers run on the background pool. Their futures are `'static`
//! so the pipeline can spawn them; a failure is reported as an error value
//! and absorbed by the caller.

use async_trait::async_trait;

use crate::error::PosternError;
use crate::types::{MessageId, Slide, SlideDeck, Thumbnail};

/// Resolves a media message's parts into a slide deck.
#[async_trait]
pub trait SlideDeckResolver: Send + Sync + 'static {
    async fn resolve_deck(&self, message: MessageId) -> Result<SlideDeck, PosternError>;
}

/// Decodes the thumbnail of a single slide.
#[async_trait]
pub trait ThumbnailResolver: Send + Sync + 'static {
    async fn resolve_thumbnail(&self, slide: &Slide) -> Result<Thumbnail, PosternError>;
}
