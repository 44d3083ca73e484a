//! Audit event sink
//!
//! Emits structured (timestamp, action, outcome, actor, source address,
//! detail) records under the `audit` tracing target. The subscriber decides
//! where the records land; handlers only report what happened.

use std::net::SocketAddr;

/// Record an audit event for a completed catalog action
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
