// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation item binding for Postern.
//!
//! A [`ConversationItem`] is bound to one message at a time. Binding
//! resolves the presentation ([`ItemView`]), starts media resolution and
//! runs the handshake auto-initiate check. User actions on the item
//! (click, thumbnail click, approve, reject, download) are routed to the
//! matching component.

pub mod click;
pub mod item;
pub mod view;

pub use click::{ClickAction, DetailsTransport, ThumbnailClick};
pub use item::{Collaborators, ConversationItem, ItemServices};
pub use view::{BindContext, ItemView, NotificationView, resolve_item_view};
