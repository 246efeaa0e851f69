//! Structured lifecycle events for planning runs.
//!
//! Every event carries an `event = "plan.*"` field so log pipelines can
//! filter on it. Output format and level follow [`crate::telemetry`].

use tracing::{info, warn};

/// Span covering one planning run, tagged with the fault being planned.
pub fn plan_span(fault_id: &str, machine_id: &str, fault_type: &str) -> tracing::Span {
    tracing::info_span!(
        "repair_planner.plan",
        fault_id = %fault_id,
        machine_id = %machine_id,
        fault_type = %fault_type,
    )
}

pub fn emit_plan_started(fault_id: &str, machine_id: &str, fault_type: &str) {
    info!(
        event = "plan.started",
        fault_id = %fault_id,
        machine_id = %machine_id,
        fault_type = %fault_type,
    );
}

pub fn emit_context_fetched(fault_id: &str, technicians: usize, parts: usize) {
    info!(
        event = "plan.context_fetched",
        fault_id = %fault_id,
        technicians = technicians,
        parts = parts,
    );
}

pub fn emit_agent_invoked(fault_id: &str, response_len: usize) {
    info!(event = "plan.agent_invoked", fault_id = %fault_id, response_len = response_len);
}

pub fn emit_work_order_persisted(fault_id: &str, work_order_id: &str, number: &str) {
    info!(
        event = "plan.work_order_persisted",
        fault_id = %fault_id,
        work_order_id = %work_order_id,
        work_order_number = %number,
    );
}

/// Warning-level: the run ended without a work order.
pub fn emit_plan_failed(fault_id: &str, kind: &str, error: &dyn std::fmt::Display) {
    warn!(event = "plan.failed", fault_id = %fault_id, kind = %kind, error = %error);
}
