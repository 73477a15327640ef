// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job runner trait.

use crate::types::Job;

/// External job execution engine.
///
/// Enqueueing is fire-and-forget: the runner owns execution, retry and
/// backoff, and reports nothing back to the caller.
pub trait JobRunner: Send + Sync + 'static {
    /// Hands a job to the runner. Must not block.
    fn enqueue(&self, job: Job);
}
