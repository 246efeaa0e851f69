//! Demo roster, inventory and fault for a tire-curing press line.

use chrono::{DateTime, Utc};
use maintenance_state::{DiagnosedFault, Part, Technician};

pub fn technicians() -> Vec<Technician> {
    vec![
        Technician::new(
            "TECH-001",
            "Alice Moreau",
            &[
                "temperature_control",
                "instrumentation",
                "plc_troubleshooting",
                "process_optimization",
            ],
            true,
        ),
        Technician::new(
            "TECH-002",
            "Bruno Silva",
            &["instrumentation", "electrical_systems", "motor_repair"],
            true,
        ),
        Technician::new(
            "TECH-003",
            "Chen Wei",
            &["hydraulic_systems", "pneumatic_systems", "bladder_replacement"],
            true,
        ),
        Technician::new(
            "TECH-004",
            "Dana Kowalski",
            &[
                "mechanical_alignment",
                "curing_press_operation",
                "vibration_analysis",
                "bladder_replacement",
            ],
            true,
        ),
        Technician::new(
            "TECH-005",
            "Emeka Obi",
            &["temperature_control", "instrumentation", "plc_troubleshooting"],
            false,
        ),
        Technician::new(
            "TECH-006",
            "Farah Haddad",
            &["general_maintenance", "curing_press_operation", "hydraulic_systems"],
            true,
        ),
    ]
}

pub fn parts() -> Vec<Part> {
    [
        ("PART-001", "TCP-TC-K200", "Thermocouple type K, 200 mm", "sensors", 12, "A-01-03"),
        ("PART-002", "TCP-SSR-40A", "Solid state relay 40 A", "electrical", 4, "A-02-01"),
        ("PART-003", "TCP-HTR-4KW", "Platen heater cartridge 4 kW", "heating", 6, "A-02-04"),
        ("PART-004", "TCP-VLV-PRV-01", "Pressure relief valve", "hydraulics", 2, "B-01-02"),
        ("PART-005", "TCP-SEAL-KIT-01", "Cylinder seal kit", "hydraulics", 8, "B-01-05"),
        ("PART-006", "TCP-HOSE-HP-12", "High-pressure hose 12 mm", "hydraulics", 5, "B-03-01"),
        ("PART-007", "TCP-BLD-52", "Curing bladder 52 in", "bladders", 3, "C-01-01"),
        ("PART-008", "TCP-BLD-CLAMP", "Bladder clamp ring", "bladders", 10, "C-01-02"),
        ("PART-009", "TCP-MOLD-SHIM-SET", "Mold shim set", "mechanical", 2, "C-02-03"),
        ("PART-010", "TCP-BRG-6205", "Deep groove bearing 6205", "mechanical", 20, "D-01-01"),
        ("PART-011", "TCP-FAN-COOL-01", "Motor cooling fan", "electrical", 3, "D-01-04"),
        ("PART-012", "TCP-CPL-ELAST", "Elastomeric coupling", "mechanical", 4, "D-02-02"),
        ("PART-013", "TCP-RTD-PT100", "RTD sensor PT100", "sensors", 7, "A-01-04"),
    ]
    .into_iter()
    .map(|(id, number, name, category, qty, location)| Part {
        id: id.to_string(),
        part_number: number.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        quantity_available: qty,
        unit_of_measure: "ea".to_string(),
        location: location.to_string(),
    })
    .collect()
}

/// Over-temperature on press TCP-01, as the diagnosis service would report it.
pub fn sample_fault(now: DateTime<Utc>) -> DiagnosedFault {
    DiagnosedFault {
        id: format!("FAULT-{}", now.format("%Y%m%d%H%M%S")),
        machine_id: "TCP-01".to_string(),
        fault_type: "curing_temperature_excessive".to_string(),
        severity: "high".to_string(),
        description: "Platen zone 2 temperature 182C against a 170C setpoint for 6 consecutive \
                      cycles; heater duty cycle at 100%."
            .to_string(),
        detected_at_utc: now,
        confidence: Some(0.92),
    }
}
