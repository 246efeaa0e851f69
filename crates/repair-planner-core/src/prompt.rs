//! Planning prompt construction.
//!
//! The agent sees nothing but this text, so every decision input is spelled
//! out: the fault, the mapped requirements, the technician roster, the matching
//! inventory and the ranker's preferred technician. Empty lists render as
//! explicit sentinels.

use std::fmt::Write;

use maintenance_state::{DiagnosedFault, Part, Technician};

/// Rendered in place of an empty technician list.
pub const NO_TECHNICIANS: &str = "no technicians available";
/// Rendered in place of an empty inventory list.
pub const NO_PARTS: &str = "no parts found";
/// Rendered when the ranker had no candidate to prefer.
pub const NO_PREFERRED_TECHNICIAN: &str = "None";

/// Decision inputs for one planning request.
#[derive(Debug, Clone, Copy)]
pub struct PlanningContext<'a> {
    pub fault: &'a DiagnosedFault,
    pub required_skills: &'a [&'a str],
    pub required_parts: &'a [&'a str],
    pub technicians: &'a [Technician],
    pub parts: &'a [Part],
    pub preferred_technician: Option<&'a Technician>,
}

/// Render the planning request text for the agent.
pub fn build_prompt(ctx: &PlanningContext<'_>) -> String {
    let mut out = String::with_capacity(2048);
    // Writing into a String cannot fail.
    let _ = write_prompt(&mut out, ctx);
    out
}

fn write_prompt(out: &mut String, ctx: &PlanningContext<'_>) -> std::fmt::Result {
    let fault = ctx.fault;

    writeln!(
        out,
        "Create a repair work order for the following diagnosed equipment fault."
    )?;
    writeln!(out)?;
    writeln!(out, "## Fault")?;
    writeln!(out, "- Fault ID: {}", fault.id)?;
    writeln!(out, "- Machine ID: {}", fault.machine_id)?;
    writeln!(out, "- Fault type: {}", fault.fault_type)?;
    writeln!(out, "- Severity: {}", fault.severity)?;
    writeln!(out, "- Description: {}", fault.description)?;
    writeln!(
        out,
        "- Detected at (UTC): {}",
        fault.detected_at_utc.to_rfc3339()
    )?;
    match fault.confidence {
        Some(c) => writeln!(out, "- Diagnosis confidence: {:.2}", c)?,
        None => writeln!(out, "- Diagnosis confidence: unknown")?,
    }
    writeln!(out)?;

    writeln!(out, "## Requirements")?;
    writeln!(out, "- Required skills: {}", join_or_none(ctx.required_skills))?;
    writeln!(out, "- Required parts: {}", join_or_none(ctx.required_parts))?;
    writeln!(out)?;

    writeln!(out, "## Available technicians")?;
    if ctx.technicians.is_empty() {
        writeln!(out, "- {}", NO_TECHNICIANS)?;
    }
    for t in ctx.technicians {
        writeln!(
            out,
            "- id: {}, name: {}, skills: [{}], available: {}",
            t.id,
            t.name,
            t.skills.join(", "),
            t.available
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Parts inventory")?;
    if ctx.parts.is_empty() {
        writeln!(out, "- {}", NO_PARTS)?;
    }
    for p in ctx.parts {
        writeln!(
            out,
            "- id: {}, part number: {}, name: {}, quantity available: {} {}",
            p.id, p.part_number, p.name, p.quantity_available, p.unit_of_measure
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Preferred technician")?;
    match ctx.preferred_technician {
        Some(t) => writeln!(out, "{} ({})", t.id, t.name)?,
        None => writeln!(out, "{}", NO_PREFERRED_TECHNICIAN)?,
    }
    writeln!(out)?;

    out.push_str(RESPONSE_CONTRACT);
    Ok(())
}

/// Output contract appended to every prompt.
const RESPONSE_CONTRACT: &str = r#"## Response format
Respond with a single JSON object and nothing else, using these fields:
{
  "title": string,
  "description": string,
  "type": "corrective" | "preventive" | "emergency",
  "priority": "critical" | "high" | "medium" | "low",
  "assignedTo": technician id from the list above, or null,
  "notes": string,
  "estimatedDuration": total minutes (integer),
  "partsUsed": [{ "partId": string, "partNumber": string, "quantity": integer }],
  "tasks": [{
    "sequence": integer,
    "title": string,
    "description": string,
    "estimatedDurationMinutes": integer,
    "requiredSkills": [string],
    "safetyNotes": string
  }]
}
Only assign a technician listed above and only use parts listed in the inventory.
"#;

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
