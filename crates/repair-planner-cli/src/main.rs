//! Repair Planner CLI
//!
//! The `repair-planner` command turns diagnosed equipment faults into stored
//! repair work orders.
//!
//! ## Commands
//!
//! - `seed`: load the demo technician roster and parts inventory
//! - `plan`: run one fault through the planning pipeline
//! - `show`: print a stored work order
//! - `register`: make sure the planning agent version exists

mod demo;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};

use maintenance_state::{DiagnosedFault, MaintenanceStore, StorageError, SurrealMaintenanceStore};
use repair_planner_core::config::ENV_ENDPOINT;
use repair_planner_core::metrics::METRICS;
use repair_planner_core::telemetry::init_tracing;
use repair_planner_core::{cancel_pair, AgentConfig, HttpPlanningAgent, PlanningAgent, RepairPlanner};

#[derive(Parser)]
#[command(name = "repair-planner")]
#[command(author = "Maintenance Platform Engineering")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plan repair work orders for diagnosed equipment faults", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// SurrealDB URL (mem://, surrealkv://path, ws://host); overrides SURREALDB_* settings
    #[arg(long, global = true)]
    db: Option<String>,

    /// Base URL of the planning agent service
    #[arg(long, env = "PLANNER_AGENT_ENDPOINT", global = true)]
    agent_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the demo technician roster and parts inventory
    Seed,

    /// Plan and store a work order for one fault
    Plan {
        /// Fault report (JSON); the built-in sample fault when omitted
        #[arg(short, long)]
        fault: Option<PathBuf>,

        /// Seed the demo roster and inventory first
        #[arg(long)]
        seed_demo: bool,
    },

    /// Print a stored work order
    Show {
        /// Work order id
        id: String,
    },

    /// Register the planning agent version if it does not exist yet
    Register,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so clap's env fallbacks see .env values.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Seed => {
            let store = connect(cli.db.as_deref()).await?;
            cmd_seed(&store).await
        }
        Commands::Plan { fault, seed_demo } => {
            let store = connect(cli.db.as_deref()).await?;
            let config = agent_config(cli.agent_endpoint)?;
            cmd_plan(store, config, fault.as_deref(), seed_demo).await
        }
        Commands::Show { id } => {
            let store = connect(cli.db.as_deref()).await?;
            cmd_show(&store, &id).await
        }
        Commands::Register => cmd_register(agent_config(cli.agent_endpoint)?).await,
    };

    METRICS.flush();
    result
}

async fn connect(url: Option<&str>) -> Result<SurrealMaintenanceStore> {
    let store = match url {
        Some(url) => SurrealMaintenanceStore::from_url(url).await,
        None => SurrealMaintenanceStore::from_env().await,
    };
    store.context("Failed to connect to the maintenance store")
}

fn agent_config(endpoint: Option<String>) -> Result<AgentConfig> {
    AgentConfig::from_lookup(|var| {
        if var == ENV_ENDPOINT {
            endpoint.clone()
        } else {
            std::env::var(var).ok()
        }
    })
    .context("Invalid planning agent configuration")
}

async fn cmd_seed(store: &SurrealMaintenanceStore) -> Result<()> {
    let technicians = demo::technicians();
    let parts = demo::parts();

    for technician in &technicians {
        store
            .upsert_technician(technician)
            .await
            .with_context(|| format!("Failed to save technician {}", technician.id))?;
    }
    for part in &parts {
        store
            .upsert_part(part)
            .await
            .with_context(|| format!("Failed to save part {}", part.part_number))?;
    }

    info!(
        technicians = technicians.len(),
        parts = parts.len(),
        "demo data seeded"
    );
    println!(
        "Seeded {} technicians and {} parts",
        technicians.len(),
        parts.len()
    );
    Ok(())
}

async fn cmd_plan(
    store: SurrealMaintenanceStore,
    config: AgentConfig,
    fault_path: Option<&Path>,
    seed_demo: bool,
) -> Result<()> {
    if seed_demo {
        cmd_seed(&store).await?;
    }

    let fault = match fault_path {
        Some(path) => load_fault(path)?,
        None => demo::sample_fault(Utc::now()),
    };

    let planner = RepairPlanner::from_config(Arc::new(store), config)
        .context("Failed to build planning agent client")?;
    planner
        .ensure_agent()
        .await
        .context("Failed to register planning agent version")?;

    let (cancel, signal) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling planning request");
            cancel.cancel();
        }
    });

    let order = planner
        .plan_and_create_work_order_with_cancel(&fault, &signal)
        .await
        .with_context(|| format!("Planning failed for fault {}", fault.id))?;

    println!("{}", serde_json::to_string_pretty(&order)?);
    Ok(())
}

fn load_fault(path: &Path) -> Result<DiagnosedFault> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fault file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse fault file {}", path.display()))
}

async fn cmd_show(store: &SurrealMaintenanceStore, id: &str) -> Result<()> {
    let Some(order) = store
        .get_work_order(id)
        .await
        .with_context(|| format!("Failed to load work order {id}"))?
    else {
        return Err(StorageError::NotFound {
            kind: "work order",
            id: id.to_string(),
        }
        .into());
    };
    println!("{}", serde_json::to_string_pretty(&order)?);
    Ok(())
}

async fn cmd_register(config: AgentConfig) -> Result<()> {
    let agent = HttpPlanningAgent::new(config).context("Failed to build planning agent client")?;
    let version = agent
        .ensure_version()
        .await
        .context("Failed to register planning agent version")?;
    println!("{}", serde_json::to_string_pretty(&version)?);
    Ok(())
}
