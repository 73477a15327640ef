// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key exchange coordination for Postern.
//!
//! Two entry points drive the handshake state machine:
//!
//! - **auto-initiate** runs when an unsecured incoming message is bound in a
//!   one-to-one thread and starts at most one handshake per thread, guarded
//!   by a one-way exemption latch;
//! - **click handling** opens the acceptance flow for actionable incoming
//!   key exchange messages and ignores everything else.

pub mod coordinator;
pub mod request;

pub use coordinator::{AutoInitiateOutcome, IgnoreReason, KeyExchangeClick, KeyExchangeCoordinator};
pub use request::{actionability, handshake_request};
