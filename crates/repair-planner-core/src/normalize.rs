//! Work-order normalization.
//!
//! Turns an agent-authored [`WorkOrderDraft`] into a complete [`WorkOrder`].
//! Each rule fires independently and only when its field is unset, except
//! `updated_at_utc`, which is stamped on every call. Task ordering and
//! duration totals are not validated.

use chrono::{DateTime, Utc};
use tracing::warn;

use maintenance_state::{
    DiagnosedFault, Technician, WorkOrder, WorkOrderPriority, WorkOrderType,
    DEFAULT_WORK_ORDER_STATUS,
};

use crate::draft::WorkOrderDraft;

/// Fill every absent field of `draft` using the current time.
pub fn apply_defaults(
    draft: WorkOrderDraft,
    fault: &DiagnosedFault,
    preferred: Option<&Technician>,
) -> WorkOrder {
    apply_defaults_at(draft, fault, preferred, Utc::now())
}

/// [`apply_defaults`] with an explicit clock.
pub fn apply_defaults_at(
    draft: WorkOrderDraft,
    fault: &DiagnosedFault,
    preferred: Option<&Technician>,
    now: DateTime<Utc>,
) -> WorkOrder {
    let created_at_utc = draft.created_at().unwrap_or(now);

    WorkOrder {
        id: non_blank(draft.id).unwrap_or_else(WorkOrder::new_id),
        work_order_number: non_blank(draft.work_order_number)
            .unwrap_or_else(|| WorkOrder::number_for(now)),
        machine_id: non_blank(draft.machine_id).unwrap_or_else(|| fault.machine_id.clone()),
        title: draft.title.unwrap_or_default(),
        description: draft.description.unwrap_or_default(),
        order_type: parse_or_default("type", draft.order_type, WorkOrderType::parse),
        priority: parse_or_default("priority", draft.priority, WorkOrderPriority::parse),
        status: non_blank(draft.status).unwrap_or_else(|| DEFAULT_WORK_ORDER_STATUS.to_string()),
        // Only a missing value falls back; an explicit "" is the agent's choice.
        assigned_to: draft
            .assigned_to
            .or_else(|| preferred.map(|t| t.id.clone())),
        notes: draft.notes,
        estimated_duration: draft.estimated_duration,
        parts_used: draft.parts_used.unwrap_or_default(),
        tasks: draft.tasks.unwrap_or_default(),
        created_at_utc,
        updated_at_utc: now,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or_default<T: Default>(
    field: &'static str,
    value: Option<String>,
    parse: fn(&str) -> Option<T>,
) -> T {
    let Some(raw) = non_blank(value) else {
        return T::default();
    };
    parse(&raw).unwrap_or_else(|| {
        warn!(field, value = %raw, "unrecognised value from agent, using default");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use maintenance_state::{RepairTask, WorkOrderPartUsage};

    fn fault() -> DiagnosedFault {
        DiagnosedFault {
            id: "F-1".to_string(),
            machine_id: "TCP-01".to_string(),
            fault_type: "curing_temperature_excessive".to_string(),
            severity: "high".to_string(),
            description: String::new(),
            detected_at_utc: Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap(),
            confidence: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 15, 42).unwrap()
    }

    #[test]
    fn empty_draft_gets_every_default() {
        let order = apply_defaults_at(WorkOrderDraft::default(), &fault(), None, now());

        assert!(!order.id.is_empty());
        assert_eq!(order.work_order_number, "WO-20261016091542");
        assert_eq!(order.machine_id, "TCP-01");
        assert_eq!(order.order_type, WorkOrderType::Corrective);
        assert_eq!(order.priority, WorkOrderPriority::Medium);
        assert_eq!(order.status, "new");
        assert_eq!(order.assigned_to, None);
        assert!(order.parts_used.is_empty());
        assert!(order.tasks.is_empty());
        assert_eq!(order.created_at_utc, now());
        assert_eq!(order.updated_at_utc, now());
    }

    #[test]
    fn blank_strings_count_as_unset_for_identity_fields() {
        let draft = WorkOrderDraft {
            id: Some("  ".to_string()),
            work_order_number: Some(String::new()),
            machine_id: Some(" ".to_string()),
            status: Some(String::new()),
            order_type: Some(" ".to_string()),
            ..Default::default()
        };
        let order = apply_defaults_at(draft, &fault(), None, now());
        assert!(!order.id.trim().is_empty());
        assert_eq!(order.work_order_number, "WO-20261016091542");
        assert_eq!(order.machine_id, "TCP-01");
        assert_eq!(order.status, "new");
        assert_eq!(order.order_type, WorkOrderType::Corrective);
    }

    #[test]
    fn preferred_technician_fills_only_a_missing_assignee() {
        let preferred = Technician::new("T2", "Alice", &["instrumentation"], true);

        let order = apply_defaults_at(WorkOrderDraft::default(), &fault(), Some(&preferred), now());
        assert_eq!(order.assigned_to.as_deref(), Some("T2"));

        let draft = WorkOrderDraft {
            assigned_to: Some(String::new()),
            ..Default::default()
        };
        let order = apply_defaults_at(draft, &fault(), Some(&preferred), now());
        assert_eq!(order.assigned_to.as_deref(), Some(""));

        let draft = WorkOrderDraft {
            assigned_to: Some("T7".to_string()),
            ..Default::default()
        };
        let order = apply_defaults_at(draft, &fault(), Some(&preferred), now());
        assert_eq!(order.assigned_to.as_deref(), Some("T7"));
    }

    #[test]
    fn agent_values_are_kept() {
        let draft = WorkOrderDraft {
            id: Some("wo-1".to_string()),
            work_order_number: Some("WO-1".to_string()),
            machine_id: Some("TCP-02".to_string()),
            title: Some("Replace SSR".to_string()),
            order_type: Some("Emergency".to_string()),
            priority: Some("CRITICAL".to_string()),
            status: Some("scheduled".to_string()),
            estimated_duration: Some(90),
            parts_used: Some(vec![WorkOrderPartUsage {
                part_id: "P2".to_string(),
                part_number: "TCP-SSR-40A".to_string(),
                quantity: 1,
            }]),
            tasks: Some(vec![RepairTask {
                sequence: 1,
                title: "Lockout".to_string(),
                ..Default::default()
            }]),
            created_at_utc: Some("2026-10-15T10:00:00Z".to_string()),
            ..Default::default()
        };
        let order = apply_defaults_at(draft, &fault(), None, now());

        assert_eq!(order.id, "wo-1");
        assert_eq!(order.work_order_number, "WO-1");
        assert_eq!(order.machine_id, "TCP-02");
        assert_eq!(order.order_type, WorkOrderType::Emergency);
        assert_eq!(order.priority, WorkOrderPriority::Critical);
        assert_eq!(order.status, "scheduled");
        assert_eq!(order.estimated_duration, Some(90));
        assert_eq!(order.parts_used.len(), 1);
        assert_eq!(order.tasks[0].title, "Lockout");
        assert_eq!(
            order.created_at_utc,
            Utc.with_ymd_and_hms(2026, 10, 15, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn unknown_enum_values_fall_back_to_defaults() {
        let draft = WorkOrderDraft {
            order_type: Some("urgent-fix".to_string()),
            priority: Some("p0".to_string()),
            ..Default::default()
        };
        let order = apply_defaults_at(draft, &fault(), None, now());
        assert_eq!(order.order_type, WorkOrderType::Corrective);
        assert_eq!(order.priority, WorkOrderPriority::Medium);
    }

    #[test]
    fn unparseable_created_at_is_replaced() {
        let draft = WorkOrderDraft {
            created_at_utc: Some("last tuesday".to_string()),
            ..Default::default()
        };
        let order = apply_defaults_at(draft, &fault(), None, now());
        assert_eq!(order.created_at_utc, now());
    }

    #[test]
    fn reapplying_defaults_only_advances_updated_at() {
        let preferred = Technician::new("T2", "Alice", &[], true);
        let first = apply_defaults_at(
            WorkOrderDraft {
                title: Some("Fix temp".to_string()),
                ..Default::default()
            },
            &fault(),
            Some(&preferred),
            now(),
        );

        let later = now() + Duration::minutes(5);
        let second = apply_defaults_at(
            WorkOrderDraft::from(&first),
            &fault(),
            Some(&preferred),
            later,
        );

        assert_eq!(second.updated_at_utc, later);
        assert_eq!(
            WorkOrder {
                updated_at_utc: first.updated_at_utc,
                ..second
            },
            first
        );
    }
}
