//! Intervention plans
//!
//! Pure text generation: same incident and unit in, same plan out. A plan
//! always has the header and the trailer, even when no checklist exists for
//! the unit type.

use civicdispatch_domain::{Incident, Unit, UnitKind};

/// Last line of every plan
pub const PLAN_TRAILER: &str = "--- END OF PLAN ---";

/// Separator between header and checklist
pub const STEPS_HEADER: &str = "--- PROCEDURAL STEPS ---";

/// Plan for a registered unit assigned to `incident`
pub fn generate_intervention_plan(incident: &Incident, unit: &Unit) -> String {
    render_plan(incident, unit.unit_id(), unit.unit_type().tag())
}

/// Plan for an arbitrary unit type tag.
///
/// Tags that do not name a known kind produce header and trailer only.
pub fn render_plan(incident: &Incident, unit_id: &str, unit_type: &str) -> String {
    let mut lines = vec![
        format!("PLAN ID: {}-PLAN", incident.incident_id()),
        format!("Assigned Unit: {} ({})", unit_id, unit_type),
        format!("Target Location: {}", incident.location()),
        String::new(),
        STEPS_HEADER.to_string(),
    ];

    if let Ok(kind) = unit_type.parse::<UnitKind>() {
        lines.extend(checklist(kind, incident));
    }

    lines.push(PLAN_TRAILER.to_string());
    lines.join("\n")
}

fn checklist(kind: UnitKind, incident: &Incident) -> Vec<String> {
    let mut steps: Vec<&str> = match kind {
        UnitKind::Fire => vec![
            "Connect to nearest hydrant.",
            "Deploy ladder if structure is more than 2 floors.",
        ],
        UnitKind::Security => vec![
            "Establish 50m safety perimeter.",
            "Divert traffic from the main road.",
            "Apprehend suspects or secure the scene.",
        ],
        UnitKind::Medical => vec![
            "Perform initial triage.",
            "Stabilize patient for transport.",
            "Alert nearest hospital ER.",
        ],
        UnitKind::Hazmat => vec![
            "Isolate the area and set up hot, warm and cold zones.",
            "Identify the released substance.",
            "Open a decontamination corridor.",
        ],
    };

    if incident.severity().is_high() {
        match kind {
            UnitKind::Fire => steps.push("Call for backup water tankers."),
            UnitKind::Hazmat => steps.push("Request evacuation of the downwind area."),
            UnitKind::Medical | UnitKind::Security => {}
        }
    }

    steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect()
}
