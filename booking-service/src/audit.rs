//! Audit event sink
//!
//! Emits structured (timestamp, action, outcome, actor, source address,
//! detail) records under the `audit` tracing target. The subscriber decides
//! where the records land; handlers only report what happened.

use std::net::SocketAddr;

/// Record an audit event for a completed booking action
pub fn record(action: &str, outcome: &str, actor: &str, source: Option<SocketAddr>, detail: &str) {
    let source = source.map_or_else(|| "unknown".to_string(), |addr| addr.to_string());
    tracing::info!(
        target: "audit",
        action,
        outcome,
        actor,
        source = %source,
        detail,
        "audit event"
    );
}

/// Record an inconsistency that needs manual reconciliation
///
/// Used when a compensating release fails after the reservation already
/// went through: the room is locked with no booking to show for it, and
/// that state must never vanish into a dropped error.
pub fn reconciliation(action: &str, detail: &str) {
    tracing::error!(
        target: "audit",
        action,
        outcome = "reconciliation_required",
        detail,
        "audit event"
    );
}
