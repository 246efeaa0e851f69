//! Schema initialization and on-disk persistence tests.

use chrono::Utc;
use maintenance_state::migrations::init_schema;
use maintenance_state::{
    MaintenanceStore, SurrealMaintenanceStore, WorkOrder, WorkOrderPriority, WorkOrderType,
};

#[tokio::test]
async fn init_schema_is_idempotent() {
    let db = surrealdb::engine::any::connect("mem://").await.unwrap();
    db.use_ns("maintenance").use_db("main").await.unwrap();

    init_schema(&db).await.expect("first init");
    init_schema(&db).await.expect("second init");
}

#[tokio::test]
async fn local_file_store_persists_work_orders() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("surrealkv://{}", dir.path().join("db").display());
    let now = Utc::now();

    let store = SurrealMaintenanceStore::from_url(&url).await.unwrap();
    store
        .create_work_order(WorkOrder {
            id: "wo-persist".to_string(),
            work_order_number: "WO-20260101000000".to_string(),
            machine_id: "TCP-07".to_string(),
            title: "Replace bladder".to_string(),
            description: String::new(),
            order_type: WorkOrderType::Emergency,
            priority: WorkOrderPriority::Critical,
            status: "new".to_string(),
            assigned_to: Some("T9".to_string()),
            notes: Some("press locked out".to_string()),
            estimated_duration: Some(240),
            parts_used: vec![],
            tasks: vec![],
            created_at_utc: now,
            updated_at_utc: now,
        })
        .await
        .unwrap();

    assert!(dir.path().join("db").exists());
    let loaded = store.get_work_order("wo-persist").await.unwrap().unwrap();
    assert_eq!(loaded.order_type, WorkOrderType::Emergency);
    assert_eq!(loaded.notes.as_deref(), Some("press locked out"));
    assert_eq!(loaded.created_at_utc, now);
}
