//! SurrealDB-backed MaintenanceStore implementation
//!
//! Uses the row types from `schema` for persistence, converting to/from the
//! domain records at the boundary.

use async_trait::async_trait;
use chrono::Utc;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::handle::{self, StoreTarget};
use crate::schema::{Part, PartRow, Technician, TechnicianRow, WorkOrder, WorkOrderRow};
use crate::storage_traits::{
    lowercase_all, technician_matches, MaintenanceStore, StorageResult,
};

fn backend(err: surrealdb::Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

/// Record-exists and unique-index violations. Remote engines only carry the
/// message text, so the check is on that.
fn is_duplicate_key(err: &surrealdb::Error) -> bool {
    let msg = err.to_string();
    msg.contains("already exists") || msg.contains("already contains")
}

/// SurrealDB implementation of [`MaintenanceStore`].
#[derive(Clone)]
pub struct SurrealMaintenanceStore {
    db: Surreal<Any>,
}

impl SurrealMaintenanceStore {
    /// Open the store at `target` and apply the schema.
    pub async fn connect(target: &StoreTarget) -> crate::Result<Self> {
        let db = handle::connect(target).await?;
        info!("SurrealMaintenanceStore connected");
        Ok(Self { db })
    }

    /// In-memory instance for tests (`mem://`, `maintenance/main`).
    pub async fn in_memory() -> crate::Result<Self> {
        Self::connect(&StoreTarget::Memory).await
    }

    /// Connect to an explicit SurrealDB URL (`surrealkv://path`, `ws://host`, ...).
    pub async fn from_url(url: &str) -> crate::Result<Self> {
        Self::connect(&StoreTarget::Url(url.to_string())).await
    }

    /// Connect wherever the `SURREALDB_*` environment points (see
    /// [`StoreTarget::from_env`]).
    pub async fn from_env() -> crate::Result<Self> {
        Self::connect(&StoreTarget::from_env()).await
    }

    // ========== Roster / Inventory Seeding ==========

    /// Insert or replace a technician, keyed by technician id.
    #[instrument(skip(self, technician), fields(technician_id = %technician.id))]
    pub async fn upsert_technician(&self, technician: &Technician) -> StorageResult<()> {
        let row = TechnicianRow::from(technician);
        let _saved: Option<TechnicianRow> = self
            .db
            .upsert(("technicians", technician.id.clone()))
            .content(row)
            .await
            .map_err(backend)?;
        debug!("technician saved");
        Ok(())
    }

    /// Insert or replace an inventory row, keyed by part id.
    #[instrument(skip(self, part), fields(part_number = %part.part_number))]
    pub async fn upsert_part(&self, part: &Part) -> StorageResult<()> {
        let row = PartRow::from(part);
        let _saved: Option<PartRow> = self
            .db
            .upsert(("parts", part.id.clone()))
            .content(row)
            .await
            .map_err(backend)?;
        debug!("part saved");
        Ok(())
    }
}

#[async_trait]
impl MaintenanceStore for SurrealMaintenanceStore {
    #[instrument(skip(self), fields(skills = required_skills.len()))]
    async fn query_available_technicians(
        &self,
        required_skills: &[&str],
    ) -> StorageResult<Vec<Technician>> {
        let mut res = self
            .db
            .query(
                "SELECT technician_id, name, skills, available FROM technicians \
                 WHERE available = true ORDER BY name",
            )
            .await
            .map_err(backend)?;

        let rows: Vec<TechnicianRow> = res.take(0).map_err(backend)?;

        // Skill tags are matched case-insensitively, which the index cannot do.
        let technicians: Vec<Technician> = rows
            .into_iter()
            .map(Technician::from)
            .filter(|t| technician_matches(t, required_skills))
            .collect();

        debug!(found = technicians.len(), "technicians queried");
        Ok(technicians)
    }

    #[instrument(skip(self), fields(part_numbers = part_numbers.len()))]
    async fn query_parts(&self, part_numbers: &[&str]) -> StorageResult<Vec<Part>> {
        if part_numbers.is_empty() {
            return Ok(Vec::new());
        }

        let numbers = lowercase_all(part_numbers);
        let mut res = self
            .db
            .query(
                "SELECT part_id, part_number, name, category, quantity_available, \
                 unit_of_measure, location FROM parts \
                 WHERE string::lowercase(part_number) INSIDE $numbers ORDER BY part_number",
            )
            .bind(("numbers", numbers))
            .await
            .map_err(backend)?;

        let rows: Vec<PartRow> = res.take(0).map_err(backend)?;
        debug!(found = rows.len(), "parts queried");
        Ok(rows.into_iter().map(Part::from).collect())
    }

    #[instrument(skip(self, order), fields(machine_id = %order.machine_id))]
    async fn create_work_order(&self, order: WorkOrder) -> StorageResult<WorkOrder> {
        let mut order = order;
        order.prepare_for_insert(Utc::now());

        // Keyed by the order id, so CREATE itself rejects a second write.
        let order_id = order.id.clone();
        let row = WorkOrderRow::from(order);
        let created: Option<WorkOrderRow> = self
            .db
            .create(("work_orders", order_id.clone()))
            .content(row)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StorageError::Duplicate {
                        kind: "work order",
                        id: order_id.clone(),
                    }
                } else {
                    backend(e)
                }
            })?;

        let stored = created
            .map(WorkOrder::from)
            .ok_or_else(|| StorageError::Backend("failed to create work order".to_string()))?;

        info!(
            order_id = %order_id,
            number = %stored.work_order_number,
            status = %stored.status,
            "work order created"
        );
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get_work_order(&self, id: &str) -> StorageResult<Option<WorkOrder>> {
        let id_owned = id.to_string();
        let mut res = self
            .db
            .query("SELECT * FROM work_orders WHERE order_id = $id")
            .bind(("id", id_owned))
            .await
            .map_err(backend)?;

        let rows: Vec<WorkOrderRow> = res.take(0).map_err(backend)?;
        Ok(rows.into_iter().next().map(WorkOrder::from))
    }

    #[instrument(skip(self))]
    async fn list_work_orders_by_status(&self, status: &str) -> StorageResult<Vec<WorkOrder>> {
        let status_owned = status.to_string();
        let mut res = self
            .db
            .query("SELECT * FROM work_orders WHERE status = $status ORDER BY created_at DESC")
            .bind(("status", status_owned))
            .await
            .map_err(backend)?;

        let rows: Vec<WorkOrderRow> = res.take(0).map_err(backend)?;
        Ok(rows.into_iter().map(WorkOrder::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{WorkOrderPriority, WorkOrderType};

    fn sample_order(id: &str) -> WorkOrder {
        let now = Utc::now();
        WorkOrder {
            id: id.to_string(),
            work_order_number: String::new(),
            machine_id: "TCP-01".to_string(),
            title: "Replace thermocouple".to_string(),
            description: "Zone 2 reads high".to_string(),
            order_type: WorkOrderType::Corrective,
            priority: WorkOrderPriority::High,
            status: "new".to_string(),
            assigned_to: Some("T2".to_string()),
            notes: None,
            estimated_duration: Some(90),
            parts_used: vec![],
            tasks: vec![],
            created_at_utc: now,
            updated_at_utc: now,
        }
    }

    #[tokio::test]
    async fn test_surreal_connection_and_schema_creation() {
        let store = SurrealMaintenanceStore::in_memory().await;
        assert!(store.is_ok(), "Failed to connect: {:?}", store.err());
    }

    #[tokio::test]
    async fn test_work_order_is_retrievable_after_create() {
        let store = SurrealMaintenanceStore::in_memory().await.unwrap();

        let stored = store
            .create_work_order(sample_order("wo-1"))
            .await
            .unwrap();
        assert!(stored.work_order_number.starts_with("WO-"));

        let loaded = store.get_work_order("wo-1").await.unwrap().unwrap();
        assert_eq!(loaded.id, "wo-1");
        assert_eq!(loaded.priority, WorkOrderPriority::High);
        assert_eq!(loaded.assigned_to.as_deref(), Some("T2"));
        assert_eq!(loaded.work_order_number, stored.work_order_number);
    }

    #[tokio::test]
    async fn test_work_order_record_is_keyed_by_order_id() {
        let store = SurrealMaintenanceStore::in_memory().await.unwrap();
        store
            .create_work_order(sample_order("wo-1"))
            .await
            .unwrap();

        let mut res = store
            .db
            .query("SELECT VALUE meta::id(id) FROM work_orders")
            .await
            .unwrap();
        let keys: Vec<String> = res.take(0).unwrap();
        assert_eq!(keys, vec!["wo-1".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_id_store_one_order() {
        let store = SurrealMaintenanceStore::in_memory().await.unwrap();

        let (a, b) = tokio::join!(
            store.create_work_order(sample_order("wo-7")),
            store.create_work_order(sample_order("wo-7")),
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(store.list_work_orders_by_status("new").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_work_order_is_none() {
        let store = SurrealMaintenanceStore::in_memory().await.unwrap();
        assert!(store.get_work_order("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_technician_replaces_existing_row() {
        let store = SurrealMaintenanceStore::in_memory().await.unwrap();
        store
            .upsert_technician(&Technician::new("T1", "Ana", &["instrumentation"], true))
            .await
            .unwrap();
        store
            .upsert_technician(&Technician::new("T1", "Ana", &["instrumentation"], false))
            .await
            .unwrap();

        let found = store.query_available_technicians(&[]).await.unwrap();
        assert!(found.is_empty());
    }
}
