//! Out-of-band anomaly notification for gatehouse.
//!
//! - [`AlertQueue`] — the request-path half: implements the core
//!   [`AnomalyNotifier`] contract by enqueueing onto an unbounded channel.
//! - [`AlertWorker`] — detached background consumer turning queued alerts
//!   into outbound email.
//! - [`EmailDelivery`] — SMTP transport via `lettre`.
//!
//! The request path only enqueues and never waits; delivery failures are
//! logged here and never reach a response.
//!
//! [`AnomalyNotifier`]: gatehouse_core::notify::AnomalyNotifier

pub mod email;
pub mod queue;

pub use email::{EmailConfig, EmailDelivery};
pub use queue::{AlertQueue, AlertWorker, OriginMismatchAlert};
