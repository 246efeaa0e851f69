//! SurrealDB schema migrations and initialization
//!
//! Sets up the three tables the repair planner reads and writes, with the
//! indexes that back its lookups.

use crate::error::StateError;
use crate::Result;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

/// Initialize all repair planner tables in SurrealDB
///
/// Safe to call multiple times (idempotent).
pub async fn init_schema(db: &Surreal<Any>) -> Result<()> {
    info!("Initializing repair planner schema");

    init_technicians_table(db).await?;
    init_parts_table(db).await?;
    init_work_orders_table(db).await?;

    info!("Repair planner schema initialization complete");
    Ok(())
}

/// Initialize `technicians` table
///
/// Schema:
/// ```text
/// TABLE technicians {
///   technician_id:  STRING (unique)
///   name:           STRING
///   skills:         ARRAY<STRING>
///   available:      BOOL (indexed)
/// }
/// ```
async fn init_technicians_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing technicians table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS technicians SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_technician_id ON TABLE technicians COLUMNS technician_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_technician_available ON TABLE technicians COLUMNS available;
    "#;

    run_ddl(db, sql).await?;
    info!("✓ technicians table initialized");
    Ok(())
}

/// Initialize `parts` table
///
/// Schema:
/// ```text
/// TABLE parts {
///   part_id:             STRING
///   part_number:         STRING (unique)
///   name:                STRING
///   category:            STRING
///   quantity_available:  INT
///   unit_of_measure:     STRING
///   location:            STRING
/// }
/// ```
async fn init_parts_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing parts table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS parts SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_part_number ON TABLE parts COLUMNS part_number UNIQUE;
    "#;

    run_ddl(db, sql).await?;
    info!("✓ parts table initialized");
    Ok(())
}

/// Initialize `work_orders` table
///
/// Schema:
/// ```text
/// TABLE work_orders {
///   order_id:           STRING (unique, document key)
///   work_order_number:  STRING
///   machine_id:         STRING (indexed)
///   status:             STRING (indexed, grouping key)
///   parts_used:         ARRAY<OBJECT>
///   tasks:              ARRAY<OBJECT>
///   created_at:         DATETIME
///   updated_at:         DATETIME
///   ...
/// }
/// ```
///
/// Work orders are created once and never updated by the planner.
async fn init_work_orders_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing work_orders table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS work_orders AS
            SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR read FULL
                FOR update FULL
                FOR delete NONE;

        DEFINE INDEX IF NOT EXISTS idx_order_id ON TABLE work_orders COLUMNS order_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_work_order_status ON TABLE work_orders COLUMNS status;
        DEFINE INDEX IF NOT EXISTS idx_work_order_machine ON TABLE work_orders COLUMNS machine_id;
    "#;

    run_ddl(db, sql).await?;
    info!("✓ work_orders table initialized");
    Ok(())
}

async fn run_ddl(db: &Surreal<Any>, sql: &str) -> Result<()> {
    db.query(sql)
        .await?
        .check()
        .map_err(|e| StateError::SchemaSetup(e.to_string()))?;
    Ok(())
}
