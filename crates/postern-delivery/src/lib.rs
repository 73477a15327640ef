// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery jobs and SMS fallback approval for Postern.
//!
//! [`DeliveryJobDispatcher`] owns every enqueue decision: send jobs after a
//! fallback approval and manual download jobs for MMS notifications. The
//! job runner itself is injected, so nothing here touches a global.
//!
//! [`FallbackApprovalWorkflow`] is the only path that may clear a message's
//! secure flag, and only after the user explicitly approves an insecure
//! fallback.

pub mod approval;
pub mod dispatcher;
pub mod notification;

pub use approval::{ApprovalPrompt, FallbackApprovalWorkflow, FallbackKind, delivery_failure};
pub use dispatcher::{DeliveryJobDispatcher, DownloadAffordance, PreferencesRedirect};
pub use notification::{NotificationCaption, notification_caption};
