// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media resolution for the currently bound message.
//!
//! Resolution runs in two stages on the tokio runtime (slide deck, then the
//! thumbnail of the deck's designated slide) and reports back over a
//! channel to the [`MediaPipeline`], which is the only place view state
//! changes. Every stage is held through a [`Subscription`]; dropping it
//! stops delivery. Each stage also carries a generation number and the
//! pipeline applies a result only while that generation is current.

pub mod pipeline;
pub mod subscription;

pub use pipeline::{MediaEvent, MediaPipeline, MediaView};
pub use subscription::Subscription;
