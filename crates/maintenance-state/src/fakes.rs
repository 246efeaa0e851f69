//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryMaintenanceStore`, which satisfies the `MaintenanceStore`
//! contract without any external dependencies and can be told to fail its
//! next operation for error-path tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StorageError;
use crate::schema::{Part, Technician, WorkOrder};
use crate::storage_traits::{lowercase_all, technician_matches, MaintenanceStore, StorageResult};

/// In-memory store backed by vectors and a `HashMap<order id, WorkOrder>`.
#[derive(Debug, Default)]
pub struct MemoryMaintenanceStore {
    technicians: Mutex<Vec<Technician>>,
    parts: Mutex<Vec<Part>>,
    work_orders: Mutex<HashMap<String, WorkOrder>>,
    queries: AtomicUsize,
    fail_next_query: AtomicBool,
    fail_next_write: AtomicBool,
}

impl MemoryMaintenanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a roster and inventory.
    pub fn with_data(technicians: Vec<Technician>, parts: Vec<Part>) -> Self {
        Self {
            technicians: Mutex::new(technicians),
            parts: Mutex::new(parts),
            ..Self::default()
        }
    }

    /// Make the next technician or parts query fail with a backend error.
    pub fn fail_next_query(&self) {
        self.fail_next_query.store(true, Ordering::SeqCst);
    }

    /// Make the next work-order write fail with a backend error.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Number of backend queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of work orders written so far.
    pub fn work_order_count(&self) -> usize {
        self.work_orders.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn take_query_failure(&self) -> StorageResult<()> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_query.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Backend("injected query failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MaintenanceStore for MemoryMaintenanceStore {
    async fn query_available_technicians(
        &self,
        required_skills: &[&str],
    ) -> StorageResult<Vec<Technician>> {
        self.take_query_failure()?;
        let technicians = self.technicians.lock().unwrap_or_else(|e| e.into_inner());
        let mut found: Vec<Technician> = technicians
            .iter()
            .filter(|t| technician_matches(t, required_skills))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn query_parts(&self, part_numbers: &[&str]) -> StorageResult<Vec<Part>> {
        if part_numbers.is_empty() {
            return Ok(Vec::new());
        }
        self.take_query_failure()?;
        let wanted = lowercase_all(part_numbers);
        let parts = self.parts.lock().unwrap_or_else(|e| e.into_inner());
        let mut found: Vec<Part> = parts
            .iter()
            .filter(|p| wanted.contains(&p.part_number.to_lowercase()))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.part_number.cmp(&b.part_number));
        Ok(found)
    }

    async fn create_work_order(&self, order: WorkOrder) -> StorageResult<WorkOrder> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Backend("injected write failure".to_string()));
        }
        let mut order = order;
        order.prepare_for_insert(Utc::now());

        let mut orders = self.work_orders.lock().unwrap_or_else(|e| e.into_inner());
        if orders.contains_key(&order.id) {
            return Err(StorageError::Duplicate {
                kind: "work order",
                id: order.id,
            });
        }
        orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn get_work_order(&self, id: &str) -> StorageResult<Option<WorkOrder>> {
        let orders = self.work_orders.lock().unwrap_or_else(|e| e.into_inner());
        Ok(orders.get(id).cloned())
    }

    async fn list_work_orders_by_status(&self, status: &str) -> StorageResult<Vec<WorkOrder>> {
        let orders = self.work_orders.lock().unwrap_or_else(|e| e.into_inner());
        let mut found: Vec<WorkOrder> = orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at_utc.cmp(&a.created_at_utc));
        Ok(found)
    }
}
