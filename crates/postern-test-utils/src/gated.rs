// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media resolvers whose results are released by the test.
//!
//! A request for a key that has not been released parks until
//! [`release`](GatedSlideDeckResolver::release) is called for it, which
//! lets tests reorder completions (for example finish a newer binding
//! before an older one). Released results stay available for later
//! requests of the same key.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use postern_core::{
    MessageId, PartId, PosternError, Slide, SlideDeck, SlideDeckResolver, Thumbnail,
    ThumbnailResolver,
};
use tokio::sync::{Notify, oneshot};

type Outcome<V> = Result<V, String>;

struct GateState<K, V> {
    released: HashMap<K, Outcome<V>>,
    waiting: HashMap<K, Vec<oneshot::Sender<Outcome<V>>>>,
    requests: Vec<K>,
}

struct Gate<K, V> {
    state: Mutex<GateState<K, V>>,
    requested: Notify,
}

impl<K, V> Gate<K, V>
where
    K: Eq + Hash + Copy,
    V: Clone,
{
    fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                released: HashMap::new(),
                waiting: HashMap::new(),
                requests: Vec::new(),
            }),
            requested: Notify::new(),
        }
    }

    async fn request(&self, key: K) -> Outcome<V> {
        let rx = {
            let mut state = self.state.lock().expect("gate state poisoned");
            state.requests.push(key);
            self.requested.notify_waiters();
            if let Some(outcome) = state.released.get(&key) {
                return outcome.clone();
            }
            let (tx, rx) = oneshot::channel();
            state.waiting.entry(key).or_default().push(tx);
            rx
        };
        rx.await
            .unwrap_or_else(|_| Err("gated resolver dropped".to_string()))
    }

    fn release(&self, key: K, outcome: Outcome<V>) {
        let mut state = self.state.lock().expect("gate state poisoned");
        for tx in state.waiting.remove(&key).unwrap_or_default() {
            let _ = tx.send(outcome.clone());
        }
        state.released.insert(key, outcome);
    }

    fn request_count(&self, key: K) -> usize {
        let state = self.state.lock().expect("gate state poisoned");
        state.requests.iter().filter(|k| **k == key).count()
    }

    async fn wait_for_request(&self, key: K) {
        loop {
            let notified = self.requested.notified();
            if self.request_count(key) > 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Slide deck resolver gated per message.
#[derive(Clone)]
pub struct GatedSlideDeckResolver {
    gate: Arc<Gate<MessageId, SlideDeck>>,
}

impl Default for GatedSlideDeckResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GatedSlideDeckResolver {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Gate::new()),
        }
    }

    /// A resolver with `decks` already released.
    pub fn ready(decks: impl IntoIterator<Item = (MessageId, SlideDeck)>) -> Self {
        let resolver = Self::new();
        for (id, deck) in decks {
            resolver.release(id, Ok(deck));
        }
        resolver
    }

    /// Complete every pending and future request for `id`.
    pub fn release(&self, id: MessageId, outcome: Result<SlideDeck, String>) {
        self.gate.release(id, outcome);
    }

    /// Wait until some caller has requested `id`.
    pub async fn wait_for_request(&self, id: MessageId) {
        self.gate.wait_for_request(id).await;
    }

    pub fn request_count(&self, id: MessageId) -> usize {
        self.gate.request_count(id)
    }
}

#[async_trait]
impl SlideDeckResolver for GatedSlideDeckResolver {
    async fn resolve_deck(&self, message: MessageId) -> Result<SlideDeck, PosternError> {
        self.gate
            .request(message)
            .await
            .map_err(|e| PosternError::media(message, e))
    }
}

/// Thumbnail resolver gated per part.
#[derive(Clone)]
pub struct GatedThumbnailResolver {
    gate: Arc<Gate<PartId, Thumbnail>>,
}

impl Default for GatedThumbnailResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GatedThumbnailResolver {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Gate::new()),
        }
    }

    /// A resolver with `thumbnails` already released.
    pub fn ready(thumbnails: impl IntoIterator<Item = (PartId, Thumbnail)>) -> Self {
        let resolver = Self::new();
        for (part, thumbnail) in thumbnails {
            resolver.release(part, Ok(thumbnail));
        }
        resolver
    }

    pub fn release(&self, part: PartId, outcome: Result<Thumbnail, String>) {
        self.gate.release(part, outcome);
    }

    pub async fn wait_for_request(&self, part: PartId) {
        self.gate.wait_for_request(part).await;
    }

    pub fn request_count(&self, part: PartId) -> usize {
        self.gate.request_count(part)
    }
}

#[async_trait]
impl ThumbnailResolver for GatedThumbnailResolver {
    async fn resolve_thumbnail(&self, slide: &Slide) -> Result<Thumbnail, PosternError> {
        // Thumbnail failures carry no message id; the pipeline attaches it.
        self.gate
            .request(slide.part_id)
            .await
            .map_err(|e| PosternError::Internal(format!("thumbnail {}: {e}", slide.part_id)))
    }
}
