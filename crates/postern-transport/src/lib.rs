// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure, side-effect-free resolution of a message's display state.
//!
//! - [`resolve_transport_state`] decides which transport a bubble shows.
//! - [`resolve_caption_state`] decides how media and caption are laid out.
//! - [`resolve_status`] computes indicators, date label and clickability.

pub mod status;
pub mod transport;

pub use status::{DateLabel, IndicatorText, ItemStatus, resolve_status};
pub use transport::{CaptionState, TransportState, resolve_caption_state, resolve_transport_state};
