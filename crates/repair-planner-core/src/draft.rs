//! Lenient deserialization of agent-authored work orders.
//!
//! The agent's JSON is untrusted and inconsistent: keys arrive as
//! `assignedTo`, `AssignedTo` or `assigned_to`, numbers arrive as `"45"` or
//! `45.0`, and absent values arrive as `null`. The payload is first rewritten
//! into canonical form and then deserialized into a [`WorkOrderDraft`] whose
//! fields are all optional. Filling in defaults is the normalizer's job.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Number, Value};

use maintenance_state::{RepairTask, WorkOrder, WorkOrderPartUsage};

/// Canonical field names, looked up by their folded form.
const CANONICAL_KEYS: &[&str] = &[
    "id",
    "workOrderNumber",
    "machineId",
    "title",
    "description",
    "type",
    "priority",
    "status",
    "assignedTo",
    "notes",
    "estimatedDuration",
    "partsUsed",
    "tasks",
    "createdAtUtc",
    "updatedAtUtc",
    "partId",
    "partNumber",
    "quantity",
    "sequence",
    "estimatedDurationMinutes",
    "requiredSkills",
    "safetyNotes",
];

/// Fields that must be non-negative integers.
const INTEGER_KEYS: &[&str] = &[
    "estimatedDuration",
    "estimatedDurationMinutes",
    "sequence",
    "quantity",
];

/// A work order as proposed by the agent, before defaults are applied.
///
/// `None` means "unset". An explicit empty string is kept as `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkOrderDraft {
    pub id: Option<String>,
    pub work_order_number: Option<String>,
    pub machine_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub estimated_duration: Option<u32>,
    pub parts_used: Option<Vec<WorkOrderPartUsage>>,
    pub tasks: Option<Vec<RepairTask>>,
    pub created_at_utc: Option<String>,
}

impl WorkOrderDraft {
    /// `created_at_utc` parsed as RFC 3339; unparseable text counts as unset.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at_utc
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl From<&WorkOrder> for WorkOrderDraft {
    fn from(order: &WorkOrder) -> Self {
        WorkOrderDraft {
            id: Some(order.id.clone()),
            work_order_number: Some(order.work_order_number.clone()),
            machine_id: Some(order.machine_id.clone()),
            title: Some(order.title.clone()),
            description: Some(order.description.clone()),
            order_type: Some(order.order_type.as_str().to_string()),
            priority: Some(order.priority.as_str().to_string()),
            status: Some(order.status.clone()),
            assigned_to: order.assigned_to.clone(),
            notes: order.notes.clone(),
            estimated_duration: order.estimated_duration,
            parts_used: Some(order.parts_used.clone()),
            tasks: Some(order.tasks.clone()),
            created_at_utc: Some(order.created_at_utc.to_rfc3339()),
        }
    }
}

/// Parse extracted JSON text into a draft, tolerating key case and
/// string-typed numbers.
pub fn parse_work_order_draft(json: &str) -> Result<WorkOrderDraft, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    serde_json::from_value(canonicalize(value))
}

/// Fold a key for matching: lower-case, separators removed.
fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn canonical_key(key: &str) -> String {
    let folded = fold_key(key);
    CANONICAL_KEYS
        .iter()
        .find(|k| k.to_lowercase() == folded)
        .map(|k| k.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Rewrite keys to canonical names, drop nulls and non-text timestamps, and
/// coerce integer fields.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, val) in map {
                if val.is_null() {
                    continue;
                }
                let key = canonical_key(&key);
                // Timestamps are only read from text; anything else is unset.
                if key == "createdAtUtc" && !val.is_string() {
                    continue;
                }
                let val = if INTEGER_KEYS.contains(&key.as_str()) {
                    coerce_integer(val)
                } else {
                    canonicalize(val)
                };
                out.insert(key, val);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Turn `"45"`, `" 45 "`, `"45.0"` and `45.0` into `45`. Anything else is left
/// untouched so deserialization reports it.
fn coerce_integer(value: Value) -> Value {
    let as_float = match &value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) if !n.is_u64() => n.as_f64(),
        _ => None,
    };
    match as_float {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
            Value::Number(Number::from(f as u64))
        }
        _ => value,
    }
}
