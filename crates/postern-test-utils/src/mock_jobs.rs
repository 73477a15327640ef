// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job runner that captures jobs instead of running them.

use std::sync::Mutex;

use postern_core::{Job, JobRunner};

/// Captures every enqueued job for assertion.
#[derive(Default)]
pub struct MockJobRunner {
    jobs: Mutex<Vec<Job>>,
}

impl MockJobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs enqueued so far, in order.
    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().map(|j| j.clone()).unwrap_or_default()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().map(|j| j.len()).unwrap_or_default()
    }
}

impl JobRunner for MockJobRunner {
    fn enqueue(&self, job: Job) {
        tracing::debug!(job_id = %job.id, kind = %job.kind, "mock runner captured job");
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.push(job);
        }
    }
}
