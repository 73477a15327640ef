// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation item: one bound message and the actions it exposes.

use std::sync::Arc;

use postern_config::PosternConfig;
use postern_core::{
    HandshakeAcceptor, HandshakeInitiator, Job, JobRunner, Message, MessageId, MessageStore,
    PosternError, SessionValidator, SlideDeckResolver, ThreadExemptions, ThumbnailResolver,
};
use postern_delivery::{DeliveryJobDispatcher, DownloadAffordance, FallbackApprovalWorkflow};
use postern_handshake::{KeyExchangeClick, KeyExchangeCoordinator, actionability};
use postern_media::{MediaPipeline, MediaView};
use tracing::{debug, warn};

use crate::click::{ClickAction, DetailsTransport, ThumbnailClick};
use crate::view::{BindContext, ItemView, resolve_item_view};

/// External collaborators an item needs.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn MessageStore>,
    pub jobs: Arc<dyn JobRunner>,
    pub sessions: Arc<dyn SessionValidator>,
    pub exemptions: Arc<dyn ThreadExemptions>,
    pub initiator: Arc<dyn HandshakeInitiator>,
    pub acceptor: Arc<dyn HandshakeAcceptor>,
    pub decks: Arc<dyn SlideDeckResolver>,
    pub thumbnails: Arc<dyn ThumbnailResolver>,
}

/// Components shared by every item of a conversation.
pub struct ItemServices {
    store: Arc<dyn MessageStore>,
    coordinator: KeyExchangeCoordinator,
    dispatcher: Arc<DeliveryJobDispatcher>,
    approvals: FallbackApprovalWorkflow,
    decks: Arc<dyn SlideDeckResolver>,
    thumbnails: Arc<dyn ThumbnailResolver>,
    config: PosternConfig,
}

impl ItemServices {
    pub fn new(config: PosternConfig, collaborators: Collaborators) -> Self {
        let dispatcher = Arc::new(DeliveryJobDispatcher::new(
            collaborators.store.clone(),
            collaborators.jobs,
        ));
        Self {
            coordinator: KeyExchangeCoordinator::new(
                collaborators.sessions,
                collaborators.exemptions,
                collaborators.initiator,
                collaborators.acceptor,
                config.handshake.clone(),
            ),
            approvals: FallbackApprovalWorkflow::new(
                collaborators.store.clone(),
                dispatcher.clone(),
            ),
            dispatcher,
            store: collaborators.store,
            decks: collaborators.decks,
            thumbnails: collaborators.thumbnails,
            config,
        }
    }

    pub fn config(&self) -> &PosternConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &KeyExchangeCoordinator {
        &self.coordinator
    }
}

struct Bound {
    message: Message,
    ctx: BindContext,
    view: ItemView,
}

/// A conversation row bound to one message at a time.
pub struct ConversationItem {
    services: Arc<ItemServices>,
    media: MediaPipeline,
    bound: Option<Bound>,
}

impl ConversationItem {
    pub fn new(services: Arc<ItemServices>) -> Self {
        let media = MediaPipeline::new(
            services.decks.clone(),
            services.thumbnails.clone(),
            services.config.media.clone(),
        );
        Self {
            services,
            media,
            bound: None,
        }
    }

    /// Bind `msg`, replacing any previous binding.
    ///
    /// Starts media resolution and, for unsecured incoming one-to-one
    /// messages, the handshake auto-initiate check. An auto-initiate
    /// failure is logged and does not fail the bind.
    pub async fn bind(&mut self, msg: Message, ctx: BindContext) -> ItemView {
        self.media.bind(&msg);

        let mut view = resolve_item_view(&msg, &ctx, &self.services.config.notification);
        if KeyExchangeCoordinator::is_candidate(&msg, ctx.group_thread) {
            match self
                .services
                .coordinator
                .auto_initiate(&msg, ctx.group_thread)
                .await
            {
                Ok(outcome) => view.auto_initiate = Some(outcome),
                Err(error) => {
                    warn!(message_id = %msg.id(), %error, "auto-initiate check failed")
                }
            }
        }

        self.bound = Some(Bound {
            message: msg,
            ctx,
            view: view.clone(),
        });
        view
    }

    /// Release the bound message and cancel its media resolution.
    pub fn unbind(&mut self) {
        self.media.unbind();
        self.bound = None;
    }

    pub fn message(&self) -> Option<&Message> {
        self.bound.as_ref().map(|b| &b.message)
    }

    pub fn view(&self) -> Option<&ItemView> {
        self.bound.as_ref().map(|b| &b.view)
    }

    pub fn media_view(&self) -> &MediaView {
        self.media.view()
    }

    pub fn media(&mut self) -> &mut MediaPipeline {
        &mut self.media
    }

    /// Re-read the bound message from the store and bind the fresh snapshot.
    pub async fn refresh(&mut self) -> Result<ItemView, PosternError> {
        let (id, ctx) = self.bound_parts()?;
        let msg = self.services.store.message(id).await?;
        Ok(self.bind(msg, ctx).await)
    }

    /// Route a click on the item.
    ///
    /// Priority: failed message details, actionable key exchange, pending
    /// fallback approval, MMS notification download, nothing.
    pub async fn click(&self) -> Result<ClickAction, PosternError> {
        let Some(bound) = self.bound.as_ref() else {
            return Ok(ClickAction::NoAction);
        };
        let msg = &bound.message;

        if msg.is_failed() {
            return Ok(ClickAction::ShowDetails {
                message_id: msg.id(),
                transport: if msg.is_mms() {
                    DetailsTransport::Mms
                } else {
                    DetailsTransport::Sms
                },
                push_group: bound.ctx.group_thread && bound.ctx.push_destination,
            });
        }

        if actionability(msg).is_ok() {
            return match self.services.coordinator.handle_click(msg).await? {
                KeyExchangeClick::Opened(request) => Ok(ClickAction::HandshakeOpened { request }),
                KeyExchangeClick::Ignored(_) => Ok(ClickAction::NoAction),
            };
        }

        if msg.is_pending_sms_fallback() {
            let prompt = FallbackApprovalWorkflow::prompt(msg)?;
            return Ok(ClickAction::ApprovalPrompt { prompt });
        }

        match DeliveryJobDispatcher::download_affordance(msg) {
            Some(DownloadAffordance::Retry) | Some(DownloadAffordance::Download) => {
                let job = self.services.dispatcher.enqueue_download(msg).await?;
                Ok(ClickAction::DownloadEnqueued { job })
            }
            Some(DownloadAffordance::OpenPreferences(redirect)) => {
                Ok(ClickAction::OpenPreferences { redirect })
            }
            Some(DownloadAffordance::Status { .. }) | None => {
                debug!(message_id = %msg.id(), "click has no action");
                Ok(ClickAction::NoAction)
            }
        }
    }

    /// Route a click on the thumbnail, if one is shown.
    pub fn thumbnail_click(&self) -> Option<ThumbnailClick> {
        let bound = self.bound.as_ref()?;
        let slide = self.media.shown_slide()?;
        Some(ThumbnailClick::for_slide(
            &bound.message,
            slide,
            &self.services.config.media,
        ))
    }

    /// Approve the pending fallback and rebind the updated message.
    ///
    /// Once the send job is enqueued it is returned even if the rebind
    /// fails; the item then keeps its previous snapshot.
    pub async fn approve(&mut self) -> Result<Job, PosternError> {
        let (id, _) = self.bound_parts()?;
        let job = self.services.approvals.approve(id).await?;
        if let Err(error) = self.refresh().await {
            warn!(message_id = %id, job_id = %job.id, %error, "rebind after approval failed");
        }
        Ok(job)
    }

    /// Reject the pending fallback and rebind the failed message.
    ///
    /// A failed rebind after a successful rejection is logged, not returned.
    pub async fn reject(&mut self) -> Result<(), PosternError> {
        let (id, _) = self.bound_parts()?;
        self.services.approvals.reject(id).await?;
        if let Err(error) = self.refresh().await {
            warn!(message_id = %id, %error, "rebind after rejection failed");
        }
        Ok(())
    }

    /// Start a manual download of the bound MMS notification.
    pub async fn download(&self) -> Result<Job, PosternError> {
        let bound = self
            .bound
            .as_ref()
            .ok_or_else(|| PosternError::Internal("no message bound".into()))?;
        self.services.dispatcher.enqueue_download(&bound.message).await
    }

    fn bound_parts(&self) -> Result<(MessageId, BindContext), PosternError> {
        self.bound
            .as_ref()
            .map(|b| (b.message.id(), b.ctx))
            .ok_or_else(|| PosternError::Internal("no message bound".into()))
    }
}
