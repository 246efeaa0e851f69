//! Repair Planner Core
//!
//! Turns a diagnosed equipment fault into a persisted repair work order.
//!
//! ## Layer 1 - Planning
//!
//! Pure stages (`requirements`, `ranking`, `prompt`, `extract`, `draft`,
//! `normalize`) are composed by [`RepairPlanner`] around two I/O seams: the
//! [`maintenance_state::MaintenanceStore`] for roster, inventory and work
//! orders, and the [`PlanningAgent`] that drafts the plan.

pub mod agent;
pub mod cancel;
pub mod config;
pub mod draft;
pub mod error;
pub mod extract;
pub mod fakes;
pub mod metrics;
pub mod normalize;
pub mod obs;
pub mod planner;
pub mod prompt;
pub mod ranking;
pub mod requirements;
pub mod telemetry;

pub use agent::{AgentVersion, HttpPlanningAgent, PlanningAgent};
pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use config::AgentConfig;
pub use draft::{parse_work_order_draft, WorkOrderDraft};
pub use error::{AgentError, AgentResult, ConfigError, PlanningError, PlanningResult};
pub use extract::extract_json;
pub use normalize::{apply_defaults, apply_defaults_at};
pub use planner::RepairPlanner;
pub use prompt::{build_prompt, PlanningContext};
pub use ranking::select_best;
pub use requirements::{parts_for, skills_for};
