//! Record definitions for the repair planner
//!
//! Domain records (camelCase JSON, shared with the planning agent):
//! - `DiagnosedFault`: upstream fault report, input to the pipeline
//! - `Technician`, `Part`: read-only roster and inventory snapshots
//! - `WorkOrder`, `WorkOrderPartUsage`, `RepairTask`: the persisted repair plan
//!
//! Database rows (snake_case, SurrealDB tables):
//! - technicians, parts, work_orders

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Module for serializing chrono DateTime to SurrealDB datetime format
mod surreal_datetime {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sd = SurrealDatetime::from(*date);
        serde::Serialize::serialize(&sd, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = SurrealDatetime::deserialize(deserializer)?;
        Ok(DateTime::from(sd))
    }
}

/// Status assigned to every freshly created work order.
pub const DEFAULT_WORK_ORDER_STATUS: &str = "new";

// ---------------------------------------------------------------------------
// Pipeline input
// ---------------------------------------------------------------------------

/// A diagnosed equipment fault, produced by an upstream diagnosis system.
///
/// Immutable input to the planning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosedFault {
    pub id: String,
    pub machine_id: String,
    /// Key into the fault requirement table (e.g. `curing_temperature_excessive`)
    pub fault_type: String,
    pub severity: String,
    #[serde(default)]
    pub description: String,
    pub detected_at_utc: DateTime<Utc>,
    /// Diagnosis confidence in `0.0..=1.0`, when the upstream system reports one
    #[serde(default)]
    pub confidence: Option<f64>,
}

// ---------------------------------------------------------------------------
// Roster and inventory snapshots
// ---------------------------------------------------------------------------

/// A maintenance technician as listed in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: String,
    pub name: String,
    /// Skill tags; order carries no meaning
    pub skills: Vec<String>,
    pub available: bool,
}

impl Technician {
    pub fn new(id: &str, name: &str, skills: &[&str], available: bool) -> Self {
        Technician {
            id: id.to_string(),
            name: name.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            available,
        }
    }

    /// Case-insensitive skill membership, folded with `to_lowercase` like the
    /// ranker and part lookups.
    pub fn has_skill(&self, skill: &str) -> bool {
        let wanted = skill.to_lowercase();
        self.skills.iter().any(|s| s.to_lowercase() == wanted)
    }
}

/// An inventory row for a spare part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: String,
    pub part_number: String,
    pub name: String,
    pub category: String,
    pub quantity_available: u32,
    pub unit_of_measure: String,
    pub location: String,
}

// ---------------------------------------------------------------------------
// Work order
// ---------------------------------------------------------------------------

/// Kind of maintenance a work order represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkOrderType {
    #[default]
    Corrective,
    Preventive,
    Emergency,
}

impl WorkOrderType {
    /// Case-insensitive parse; `None` for blank or unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "corrective" => Some(Self::Corrective),
            "preventive" => Some(Self::Preventive),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Corrective => "corrective",
            Self::Preventive => "preventive",
            Self::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for WorkOrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling priority of a work order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkOrderPriority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl WorkOrderPriority {
    /// Case-insensitive parse; `None` for blank or unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for WorkOrderPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A part line item inside a work order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkOrderPartUsage {
    pub part_id: String,
    pub part_number: String,
    pub quantity: u32,
}

/// One step of the repair plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepairTask {
    pub sequence: u32,
    pub title: String,
    pub description: String,
    pub estimated_duration_minutes: u32,
    pub required_skills: Vec<String>,
    pub safety_notes: Option<String>,
}

/// A persisted repair work order.
///
/// Invariants once normalized: `id` and `work_order_number` are non-empty,
/// `parts_used` and `tasks` are present (possibly empty), `created_at_utc` is
/// set once and `updated_at_utc` is refreshed on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    pub work_order_number: String,
    pub machine_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub order_type: WorkOrderType,
    pub priority: WorkOrderPriority,
    pub status: String,
    /// Technician id; referential integrity against the roster is best-effort
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    /// Total estimate in minutes
    pub estimated_duration: Option<u32>,
    pub parts_used: Vec<WorkOrderPartUsage>,
    pub tasks: Vec<RepairTask>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

impl WorkOrder {
    /// Human-readable work-order number derived from a UTC timestamp,
    /// e.g. `WO-20261016093012`.
    pub fn number_for(at: DateTime<Utc>) -> String {
        format!("WO-{}", at.format("%Y%m%d%H%M%S"))
    }

    /// Newly generated unique work-order identifier.
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Re-apply the identity and timestamp defaults a store requires before
    /// writing, without trusting that the caller normalized the order.
    pub fn prepare_for_insert(&mut self, now: DateTime<Utc>) {
        if self.id.trim().is_empty() {
            self.id = Self::new_id();
        }
        if self.work_order_number.trim().is_empty() {
            self.work_order_number = Self::number_for(now);
        }
        if self.status.trim().is_empty() {
            self.status = DEFAULT_WORK_ORDER_STATUS.to_string();
        }
        self.updated_at_utc = now;
    }
}

// ---------------------------------------------------------------------------
// Database rows
// ---------------------------------------------------------------------------

/// Row in the `technicians` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TechnicianRow {
    pub technician_id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub available: bool,
}

impl From<&Technician> for TechnicianRow {
    fn from(t: &Technician) -> Self {
        TechnicianRow {
            technician_id: t.id.clone(),
            name: t.name.clone(),
            skills: t.skills.clone(),
            available: t.available,
        }
    }
}

impl From<TechnicianRow> for Technician {
    fn from(row: TechnicianRow) -> Self {
        Technician {
            id: row.technician_id,
            name: row.name,
            skills: row.skills,
            available: row.available,
        }
    }
}

/// Row in the `parts` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PartRow {
    pub part_id: String,
    pub part_number: String,
    pub name: String,
    pub category: String,
    pub quantity_available: u32,
    pub unit_of_measure: String,
    pub location: String,
}

impl From<&Part> for PartRow {
    fn from(p: &Part) -> Self {
        PartRow {
            part_id: p.id.clone(),
            part_number: p.part_number.clone(),
            name: p.name.clone(),
            category: p.category.clone(),
            quantity_available: p.quantity_available,
            unit_of_measure: p.unit_of_measure.clone(),
            location: p.location.clone(),
        }
    }
}

impl From<PartRow> for Part {
    fn from(row: PartRow) -> Self {
        Part {
            id: row.part_id,
            part_number: row.part_number,
            name: row.name,
            category: row.category,
            quantity_available: row.quantity_available,
            unit_of_measure: row.unit_of_measure,
            location: row.location,
        }
    }
}

/// Row in the `work_orders` table, grouped by `status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WorkOrderRow {
    pub order_id: String,
    pub work_order_number: String,
    pub machine_id: String,
    pub title: String,
    pub description: String,
    pub order_type: String,
    pub priority: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub estimated_duration: Option<u32>,
    pub parts_used: Vec<WorkOrderPartUsage>,
    pub tasks: Vec<RepairTask>,
    #[serde(with = "surreal_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "surreal_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<WorkOrder> for WorkOrderRow {
    fn from(o: WorkOrder) -> Self {
        WorkOrderRow {
            order_id: o.id,
            work_order_number: o.work_order_number,
            machine_id: o.machine_id,
            title: o.title,
            description: o.description,
            order_type: o.order_type.as_str().to_string(),
            priority: o.priority.as_str().to_string(),
            status: o.status,
            assigned_to: o.assigned_to,
            notes: o.notes,
            estimated_duration: o.estimated_duration,
            parts_used: o.parts_used,
            tasks: o.tasks,
            created_at: o.created_at_utc,
            updated_at: o.updated_at_utc,
        }
    }
}

impl From<WorkOrderRow> for WorkOrder {
    fn from(row: WorkOrderRow) -> Self {
        WorkOrder {
            id: row.order_id,
            work_order_number: row.work_order_number,
            machine_id: row.machine_id,
            title: row.title,
            description: row.description,
            order_type: WorkOrderType::parse(&row.order_type).unwrap_or_default(),
            priority: WorkOrderPriority::parse(&row.priority).unwrap_or_default(),
            status: row.status,
            assigned_to: row.assigned_to,
            notes: row.notes,
            estimated_duration: row.estimated_duration,
            parts_used: row.parts_used,
            tasks: row.tasks,
            created_at_utc: row.created_at,
            updated_at_utc: row.updated_at,
        }
    }
}
