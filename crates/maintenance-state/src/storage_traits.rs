//! Storage trait definitions for the repair planner
//!
//! `MaintenanceStore` is the only seam between the planning pipeline and the
//! document store. It covers three logical operations the pipeline needs
//! (technician query, parts query, work-order create) plus read-back helpers.
//!
//! The trait is async and backend-agnostic. An in-memory fake is provided
//! for testing via the `fakes` module.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::schema::{Part, Technician, WorkOrder};

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Document store for technicians, parts inventory and work orders.
///
/// Guarantees:
/// - Reads are side-effect free snapshots.
/// - `create_work_order` is atomic per document and never overwrites an
///   existing order with the same identifier.
#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    /// Available technicians holding every skill in `required_skills`
    /// (case-insensitive). An empty skill list matches every available
    /// technician.
    async fn query_available_technicians(
        &self,
        required_skills: &[&str],
    ) -> StorageResult<Vec<Technician>>;

    /// Inventory rows whose part number is in `part_numbers`
    /// (case-insensitive). Empty input returns an empty result without
    /// touching the backend.
    async fn query_parts(&self, part_numbers: &[&str]) -> StorageResult<Vec<Part>>;

    /// Persist a new work order and return the stored record.
    ///
    /// Re-applies identifier, number, status and `updated_at_utc` defaults
    /// before writing. Fails with `StorageError::Duplicate` when the
    /// identifier is already taken.
    async fn create_work_order(&self, order: WorkOrder) -> StorageResult<WorkOrder>;

    /// Fetch a work order by identifier.
    async fn get_work_order(&self, id: &str) -> StorageResult<Option<WorkOrder>>;

    /// All work orders in a status group, newest first.
    async fn list_work_orders_by_status(&self, status: &str) -> StorageResult<Vec<WorkOrder>>;
}

/// Lower-cased copies of the given keys, for case-insensitive matching.
pub(crate) fn lowercase_all(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

/// True when the technician is available and holds every required skill.
pub(crate) fn technician_matches(technician: &Technician, required_skills: &[&str]) -> bool {
    technician.available && required_skills.iter().all(|s| technician.has_skill(s))
}
