//! Fault-to-work-order planning pipeline.
//!
//! A straight line with no retries and no compensation: map requirements,
//! fetch roster and inventory, rank, prompt the agent, extract and parse its
//! answer, fill defaults, persist. The first failing stage ends the run and
//! nothing is written after it. The pipeline suspends only on the store reads,
//! the agent call and the store write. Reads and the agent call race the
//! cancel signal; the write is checked against it once and then awaited to
//! completion, since a dropped write may still land.

use std::sync::Arc;

use tracing::{debug, warn, Instrument};

use maintenance_state::{DiagnosedFault, MaintenanceStore, WorkOrder};

use crate::agent::{AgentVersion, HttpPlanningAgent, PlanningAgent};
use crate::cancel::CancelSignal;
use crate::config::AgentConfig;
use crate::draft::parse_work_order_draft;
use crate::error::{PlanningError, PlanningResult};
use crate::extract::extract_json;
use crate::metrics::METRICS;
use crate::normalize::apply_defaults;
use crate::obs;
use crate::prompt::{build_prompt, PlanningContext};
use crate::ranking::select_best;
use crate::requirements;

/// Plans repair work orders for diagnosed faults.
#[derive(Clone)]
pub struct RepairPlanner {
    store: Arc<dyn MaintenanceStore>,
    agent: Arc<dyn PlanningAgent>,
}

impl RepairPlanner {
    pub fn new(store: Arc<dyn MaintenanceStore>, agent: Arc<dyn PlanningAgent>) -> Self {
        Self { store, agent }
    }

    /// Planner backed by the HTTP agent described by `config`.
    pub fn from_config(
        store: Arc<dyn MaintenanceStore>,
        config: AgentConfig,
    ) -> PlanningResult<Self> {
        config.validate()?;
        let agent = HttpPlanningAgent::new(config)?;
        Ok(Self::new(store, Arc::new(agent)))
    }

    pub fn store(&self) -> &Arc<dyn MaintenanceStore> {
        &self.store
    }

    /// Register the agent version if needed. Repeat calls are cheap.
    pub async fn ensure_agent(&self) -> PlanningResult<AgentVersion> {
        Ok(self.agent.ensure_version().await?)
    }

    /// Run one fault through the pipeline and return the stored work order.
    pub async fn plan_and_create_work_order(
        &self,
        fault: &DiagnosedFault,
    ) -> PlanningResult<WorkOrder> {
        self.plan_and_create_work_order_with_cancel(fault, &CancelSignal::never())
            .await
    }

    /// [`plan_and_create_work_order`](Self::plan_and_create_work_order) that
    /// stops with [`PlanningError::Cancelled`] once `cancel` fires. A write that
    /// has already started is allowed to finish and its result is returned.
    pub async fn plan_and_create_work_order_with_cancel(
        &self,
        fault: &DiagnosedFault,
        cancel: &CancelSignal,
    ) -> PlanningResult<WorkOrder> {
        METRICS.inc_plans_started();
        obs::emit_plan_started(&fault.id, &fault.machine_id, &fault.fault_type);

        let span = obs::plan_span(&fault.id, &fault.machine_id, &fault.fault_type);
        let result = self.run(fault, cancel).instrument(span).await;
        match &result {
            Ok(order) => {
                METRICS.inc_plans_completed();
                obs::emit_work_order_persisted(&fault.id, &order.id, &order.work_order_number);
            }
            Err(err) => {
                METRICS.inc_plans_failed();
                if err.is_malformed_output() {
                    METRICS.inc_malformed_responses();
                }
                obs::emit_plan_failed(&fault.id, err.kind(), err);
            }
        }
        result
    }

    async fn run(&self, fault: &DiagnosedFault, cancel: &CancelSignal) -> PlanningResult<WorkOrder> {
        if fault.machine_id.trim().is_empty() {
            return Err(PlanningError::InvalidArgument(format!(
                "fault {} has no machine id",
                fault.id
            )));
        }

        // Mapping
        let required_skills = requirements::skills_for(&fault.fault_type);
        let required_parts = requirements::parts_for(&fault.fault_type);
        debug!(?required_skills, ?required_parts, "mapped fault requirements");

        // Context fetch
        let (technicians, inventory) = cancel
            .guard(async {
                tokio::try_join!(
                    self.store.query_available_technicians(required_skills),
                    self.store.query_parts(required_parts),
                )
            })
            .await?
            .map_err(|e| stage_failed("context_fetch", e))?;
        obs::emit_context_fetched(&fault.id, technicians.len(), inventory.len());

        // Ranking
        let preferred = select_best(&technicians, required_skills);
        debug!(preferred = ?preferred.map(|t| t.id.as_str()), "ranked technicians");

        // Prompting
        let prompt = build_prompt(&PlanningContext {
            fault,
            required_skills,
            required_parts,
            technicians: &technicians,
            parts: &inventory,
            preferred_technician: preferred,
        });
        let raw = cancel
            .guard(self.agent.invoke(&prompt))
            .await?
            .map_err(|e| stage_failed("agent_invoke", e))?;
        obs::emit_agent_invoked(&fault.id, raw.len());

        // Extraction
        let json = extract_json(&raw)
            .ok_or_else(|| stage_failed("extraction", PlanningError::EmptyAgentResponse))?;

        // Deserialization
        let draft = parse_work_order_draft(json).map_err(|e| {
            stage_failed(
                "deserialization",
                PlanningError::MalformedAgentOutput {
                    reason: e.to_string(),
                    payload: json.to_string(),
                },
            )
        })?;

        // Normalization
        let order = apply_defaults(draft, fault, preferred);

        // Persistence
        if cancel.is_cancelled() {
            return Err(PlanningError::Cancelled);
        }
        self.store
            .create_work_order(order)
            .await
            .map_err(|e| stage_failed("persistence", e))
    }
}

fn stage_failed(stage: &'static str, err: impl Into<PlanningError>) -> PlanningError {
    let err = err.into();
    match &err {
        PlanningError::MalformedAgentOutput { reason, payload } => {
            warn!(stage, %reason, %payload, "agent output rejected");
        }
        _ => warn!(stage, error = %err, "planning stage failed"),
    }
    err
}
