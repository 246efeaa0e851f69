//! Fault-type to repair-requirement mapping.
//!
//! A fixed table translates a diagnosed fault-type code into the technician
//! skills and spare part numbers a repair needs. The table is compiled in and
//! indexed once on first use; lookups are case-insensitive exact matches.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Skills required when the fault type is blank or unknown.
pub const FALLBACK_SKILLS: &[&str] = &["general_maintenance"];

/// Requirements for one fault-type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultRequirement {
    pub fault_type: &'static str,
    pub skills: &'static [&'static str],
    pub parts: &'static [&'static str],
}

const REQUIREMENTS: &[FaultRequirement] = &[
    FaultRequirement {
        fault_type: "curing_temperature_excessive",
        skills: &["temperature_control", "instrumentation", "plc_troubleshooting"],
        parts: &["TCP-TC-K200", "TCP-SSR-40A", "TCP-HTR-4KW"],
    },
    FaultRequirement {
        fault_type: "curing_temperature_low",
        skills: &["temperature_control", "instrumentation"],
        parts: &["TCP-HTR-4KW", "TCP-TC-K200"],
    },
    FaultRequirement {
        fault_type: "curing_pressure_low",
        skills: &["hydraulic_systems", "pneumatic_systems"],
        parts: &["TCP-VLV-PRV-01", "TCP-SEAL-KIT-01"],
    },
    FaultRequirement {
        fault_type: "hydraulic_leak",
        skills: &["hydraulic_systems"],
        parts: &["TCP-HOSE-HP-12", "TCP-SEAL-KIT-01"],
    },
    FaultRequirement {
        fault_type: "bladder_failure",
        skills: &["bladder_replacement", "curing_press_operation"],
        parts: &["TCP-BLD-52", "TCP-BLD-CLAMP"],
    },
    FaultRequirement {
        fault_type: "mold_misalignment",
        skills: &["mechanical_alignment", "curing_press_operation"],
        parts: &["TCP-MOLD-SHIM-SET"],
    },
    FaultRequirement {
        fault_type: "motor_overheating",
        skills: &["electrical_systems", "motor_repair"],
        parts: &["TCP-BRG-6205", "TCP-FAN-COOL-01"],
    },
    FaultRequirement {
        fault_type: "vibration_excessive",
        skills: &["vibration_analysis", "mechanical_alignment"],
        parts: &["TCP-BRG-6205", "TCP-CPL-ELAST"],
    },
    FaultRequirement {
        fault_type: "sensor_failure",
        skills: &["instrumentation", "plc_troubleshooting"],
        parts: &["TCP-TC-K200", "TCP-RTD-PT100"],
    },
    FaultRequirement {
        fault_type: "cycle_time_deviation",
        skills: &["plc_troubleshooting", "process_optimization"],
        parts: &[],
    },
];

fn index() -> &'static HashMap<String, &'static FaultRequirement> {
    static INDEX: OnceLock<HashMap<String, &'static FaultRequirement>> = OnceLock::new();
    INDEX.get_or_init(|| {
        REQUIREMENTS
            .iter()
            .map(|r| (r.fault_type.to_lowercase(), r))
            .collect()
    })
}

/// Look up the table entry for a fault type, if it is known.
pub fn lookup(fault_type: &str) -> Option<&'static FaultRequirement> {
    index().get(&fault_type.to_lowercase()).copied()
}

/// Every known fault-type entry, in table order.
pub fn known_fault_types() -> &'static [FaultRequirement] {
    REQUIREMENTS
}

/// Skills needed to repair `fault_type`; `["general_maintenance"]` when unknown.
pub fn skills_for(fault_type: &str) -> &'static [&'static str] {
    lookup(fault_type).map(|r| r.skills).unwrap_or(FALLBACK_SKILLS)
}

/// Part numbers needed to repair `fault_type`; empty when unknown.
pub fn parts_for(fault_type: &str) -> &'static [&'static str] {
    lookup(fault_type).map(|r| r.parts).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fault_returns_fixed_lists() {
        assert_eq!(
            skills_for("curing_temperature_excessive"),
            &["temperature_control", "instrumentation", "plc_troubleshooting"]
        );
        assert_eq!(
            parts_for("curing_temperature_excessive"),
            &["TCP-TC-K200", "TCP-SSR-40A", "TCP-HTR-4KW"]
        );
    }

    #[test]
    fn every_table_entry_is_reachable() {
        for entry in known_fault_types() {
            assert_eq!(skills_for(entry.fault_type), entry.skills);
            assert_eq!(parts_for(entry.fault_type), entry.parts);
            assert!(!entry.skills.is_empty(), "{} has no skills", entry.fault_type);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(skills_for("Hydraulic_LEAK"), &["hydraulic_systems"]);
        assert_eq!(parts_for("HYDRAULIC_LEAK"), &["TCP-HOSE-HP-12", "TCP-SEAL-KIT-01"]);
    }

    #[test]
    fn unknown_or_blank_fault_falls_back() {
        for code in ["", "   ", "conveyor_jam", "curing_temperature_excessive_x"] {
            assert_eq!(skills_for(code), &["general_maintenance"], "code {code:?}");
            assert!(parts_for(code).is_empty(), "code {code:?}");
        }
    }

    #[test]
    fn known_fault_without_parts_returns_empty_parts() {
        assert!(parts_for("cycle_time_deviation").is_empty());
        assert_eq!(
            skills_for("cycle_time_deviation"),
            &["plc_troubleshooting", "process_optimization"]
        );
    }
}
