// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-stage media resolution bound to one message at a time.

use std::sync::Arc;

use postern_config::model::MediaConfig;
use postern_core::{
    Message, MessageId, PosternError, Slide, SlideDeck, SlideDeckResolver, Thumbnail,
    ThumbnailResolver,
};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::subscription::Subscription;

/// What the media slot of a bubble shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum MediaView {
    /// Nothing bound, or the bound message carries no media.
    NoMedia,
    /// Resolution in progress.
    Loading,
    /// Thumbnail resolved for `slide`.
    Shown {
        slide: Slide,
        #[serde(skip)]
        thumbnail: Thumbnail,
    },
    /// Resolution failed or the deck has no thumbnail-eligible slide.
    Hidden,
}

/// Completion of a resolution stage, tagged with the generation that
/// started it.
#[derive(Debug)]
pub enum MediaEvent {
    DeckResolved {
        generation: u64,
        message_id: MessageId,
        result: Result<SlideDeck, PosternError>,
    },
    ThumbnailResolved {
        generation: u64,
        message_id: MessageId,
        slide: Slide,
        result: Result<Thumbnail, PosternError>,
    },
}

impl MediaEvent {
    pub fn generation(&self) -> u64 {
        match self {
            MediaEvent::DeckResolved { generation, .. }
            | MediaEvent::ThumbnailResolved { generation, .. } => *generation,
        }
    }

    pub fn message_id(&self) -> MessageId {
        match self {
            MediaEvent::DeckResolved { message_id, .. }
            | MediaEvent::ThumbnailResolved { message_id, .. } => *message_id,
        }
    }
}

struct Binding {
    message_id: MessageId,
    /// Generation of the stage currently allowed to deliver.
    generation: u64,
    /// Dropping this cancels the running stage.
    stage: Option<Subscription>,
    view: MediaView,
}

/// Resolves the slide deck and thumbnail of the bound message.
///
/// The pipeline is owned by a single consumer. Stages run on the runtime
/// and report through a channel; the owner drains it with
/// [`next_event`](Self::next_event) and feeds each event to
/// [`apply`](Self::apply), or uses [`process_next`](Self::process_next).
pub struct MediaPipeline {
    decks: Arc<dyn SlideDeckResolver>,
    thumbnails: Arc<dyn ThumbnailResolver>,
    config: MediaConfig,
    events_tx: mpsc::UnboundedSender<MediaEvent>,
    events_rx: mpsc::UnboundedReceiver<MediaEvent>,
    binding: Option<Binding>,
    generation: u64,
}

impl MediaPipeline {
    pub fn new(
        decks: Arc<dyn SlideDeckResolver>,
        thumbnails: Arc<dyn ThumbnailResolver>,
        config: MediaConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            decks,
            thumbnails,
            config,
            events_tx,
            events_rx,
            binding: None,
            generation: 0,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Bind to `msg`, cancelling whatever the previous binding had running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(&mut self, msg: &Message) {
        self.unbind();
        let generation = self.next_generation();
        let message_id = msg.id();

        if !msg.has_media() {
            self.binding = Some(Binding {
                message_id,
                generation,
                stage: None,
                view: MediaView::NoMedia,
            });
            return;
        }

        let decks = self.decks.clone();
        let stage = Subscription::spawn(
            async move {
                MediaEvent::DeckResolved {
                    generation,
                    message_id,
                    result: decks.resolve_deck(message_id).await,
                }
            },
            self.events_tx.clone(),
        );
        debug!(message_id = %message_id, generation, "slide deck resolution started");

        self.binding = Some(Binding {
            message_id,
            generation,
            stage: Some(stage),
            view: MediaView::Loading,
        });
    }

    /// Drop the binding. Any running stage is cancelled.
    pub fn unbind(&mut self) {
        if let Some(binding) = self.binding.take() {
            debug!(message_id = %binding.message_id, "media binding released");
        }
        // Invalidate anything already queued for the old binding.
        self.next_generation();
    }

    pub fn bound_message(&self) -> Option<MessageId> {
        self.binding.as_ref().map(|b| b.message_id)
    }

    pub fn view(&self) -> &MediaView {
        self.binding
            .as_ref()
            .map(|b| &b.view)
            .unwrap_or(&MediaView::NoMedia)
    }

    /// The slide whose thumbnail is on screen, if any.
    pub fn shown_slide(&self) -> Option<&Slide> {
        match self.view() {
            MediaView::Shown { slide, .. } => Some(slide),
            _ => None,
        }
    }

    /// Whether a stage is still running for the current binding.
    pub fn is_resolving(&self) -> bool {
        self.binding
            .as_ref()
            .is_some_and(|b| b.stage.is_some())
    }

    /// Wait for the next stage completion.
    pub async fn next_event(&mut self) -> Option<MediaEvent> {
        self.events_rx.recv().await
    }

    /// Wait for the next stage completion and apply it.
    ///
    /// Returns whether the view changed.
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    /// Apply a stage completion to the current binding.
    ///
    /// Events whose generation is not the binding's current one are
    /// discarded and `false` is returned.
    pub fn apply(&mut self, event: MediaEvent) -> bool {
        let current = self.binding.as_ref().map(|b| b.generation);
        if current != Some(event.generation()) {
            debug!(
                message_id = %event.message_id(),
                generation = event.generation(),
                current = ?current,
                "discarded stale media result"
            );
            return false;
        }

        match event {
            MediaEvent::DeckResolved {
                message_id, result, ..
            } => match result {
                Ok(deck) => self.on_deck(message_id, deck),
                Err(error) => {
                    warn!(message_id = %message_id, %error, "slide deck resolution failed");
                    self.settle(MediaView::Hidden);
                }
            },
            MediaEvent::ThumbnailResolved {
                message_id,
                slide,
                result,
                ..
            } => match result {
                Ok(thumbnail) => {
                    debug!(message_id = %message_id, part_id = %slide.part_id, "thumbnail shown");
                    self.settle(MediaView::Shown { slide, thumbnail });
                }
                Err(error) => {
                    let error = PosternError::media(message_id, error);
                    warn!(message_id = %message_id, %error, "thumbnail resolution failed");
                    self.settle(MediaView::Hidden);
                }
            },
        }
        true
    }

    fn on_deck(&mut self, message_id: MessageId, deck: SlideDeck) {
        if !self.config.thumbnails {
            debug!(message_id = %message_id, "thumbnails disabled");
            self.settle(MediaView::Hidden);
            return;
        }
        let Some(slide) = deck.thumbnail_slide().cloned() else {
            debug!(message_id = %message_id, "no thumbnail-eligible slide");
            self.settle(MediaView::Hidden);
            return;
        };

        // Fresh tag for the thumbnail stage; a late deck event can no longer apply.
        let generation = self.next_generation();
        let thumbnails = self.thumbnails.clone();
        let stage = Subscription::spawn(
            async move {
                let result = thumbnails.resolve_thumbnail(&slide).await;
                MediaEvent::ThumbnailResolved {
                    generation,
                    message_id,
                    slide,
                    result,
                }
            },
            self.events_tx.clone(),
        );
        debug!(message_id = %message_id, generation, "thumbnail resolution started");

        if let Some(binding) = self.binding.as_mut() {
            binding.generation = generation;
            binding.stage = Some(stage);
            binding.view = MediaView::Loading;
        }
    }

    fn settle(&mut self, view: MediaView) {
        if let Some(binding) = self.binding.as_mut() {
            binding.stage = None;
            binding.view = view;
        }
    }
}
