//! Maintenance-State: Document Store for the Repair Planner
//!
//! This crate owns the persistence layer of the repair planner. It defines the
//! records that flow through the planning pipeline and handles all I/O with
//! SurrealDB.
//!
//! ## Layer 0 - Data/Persistence
//!
//! Focus: read snapshots of the technician roster and parts inventory, and
//! single-document writes of new work orders.
//!
//! ## Key Components
//!
//! - `MaintenanceStore`: backend-agnostic trait used by the planner
//! - `SurrealMaintenanceStore`: SurrealDB implementation (memory, local file, remote)
//! - `WorkOrder`: the persisted repair plan and its line items
//! - `fakes::MemoryMaintenanceStore`: in-memory store for tests

mod error;
pub mod fakes;
mod handle;
pub mod migrations;
mod schema;
pub mod storage_traits;
mod surreal_store;

pub use error::{StateError, StorageError};
pub use handle::{ServerConfig, StoreTarget, DEFAULT_LOCAL_PATH};
pub use schema::{
    DiagnosedFault, Part, RepairTask, Technician, WorkOrder, WorkOrderPartUsage, WorkOrderPriority,
    WorkOrderType, DEFAULT_WORK_ORDER_STATUS,
};
pub use storage_traits::{MaintenanceStore, StorageResult};
pub use surreal_store::SurrealMaintenanceStore;

/// Result type for connection and schema operations
pub type Result<T> = std::result::Result<T, StateError>;
