//! Incident scenarios replayed by the node

use anyhow::Context;
use civicdispatch_core::Error;
use civicdispatch_dispatch::{DispatchHandle, DispatchResult, OperationalStats};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub incidents: Vec<ScenarioIncident>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioIncident {
    pub id: String,
    #[serde(rename = "type")]
    pub incident_type: String,
    pub severity: i64,
    pub location: String,
}

/// Per-incident line emitted with `--json`
#[derive(Debug, Serialize)]
struct IncidentReport<'a> {
    incident_id: &'a str,
    description: Option<&'a str>,
    error: Option<String>,
    plan: Option<String>,
    result: Option<DispatchResult>,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    stats: &'a OperationalStats,
    recent_activity: Vec<String>,
}

impl Scenario {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// The walk-through used when no scenario file is given
    pub fn demo() -> Self {
        let incident = |id: &str, kind: &str, severity, location: &str| ScenarioIncident {
            id: id.to_string(),
            incident_type: kind.to_string(),
            severity,
            location: location.to_string(),
        };
        Self {
            incidents: vec![
                incident("FIRE-2025-001", "Fire", 4, "Grand Plaza Hotel"),
                incident("MED-2025-001", "Medical", 3, "Intersection 5th & Main"),
                incident("SEC-2025-001", "Security", 2, "City Bank"),
            ],
        }
    }
}

/// Report, dispatch and plan every scenario incident through the worker,
/// then summarise.
///
/// A rejected report is printed and the run continues with the next one.
/// The plan shown is for the unit dispatch selected.
pub async fn run<W: Write>(
    handle: &DispatchHandle,
    scenario: &Scenario,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    for entry in &scenario.incidents {
        let incident = match handle
            .create_incident(&entry.id, &entry.incident_type, entry.severity, &entry.location)
            .await
        {
            Ok(incident) => incident,
            Err(Error::WorkerClosed) => return Err(Error::WorkerClosed.into()),
            Err(err) => {
                tracing::warn!(incident_id = %entry.id, error = %err, "incident report rejected");
                if json {
                    let report = IncidentReport {
                        incident_id: &entry.id,
                        description: None,
                        error: Some(err.to_string()),
                        plan: None,
                        result: None,
                    };
                    writeln!(out, "{}", serde_json::to_string(&report)?)?;
                } else {
                    writeln!(out, "\n[ERROR] {}: {}", entry.id, err)?;
                }
                continue;
            }
        };

        let result = handle.dispatch(incident.clone()).await?;
        let plan = match result.unit_id() {
            Some(unit_id) => handle.generate_plan(incident.clone(), unit_id).await?,
            None => None,
        };

        if json {
            let report = IncidentReport {
                incident_id: incident.incident_id(),
                description: Some(incident.description()),
                error: None,
                plan,
                result: Some(result),
            };
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        } else {
            writeln!(out, "\n[INCIDENT] {}", incident.description())?;
            match plan {
                Some(plan) => writeln!(out, "{}", plan)?,
                None => writeln!(out, "[INFO] No eligible {} unit to plan for", incident.incident_type())?,
            }
            writeln!(out, "[RESULT] {}", result)?;
        }
    }

    let stats = handle.stats().await?;
    let recent_activity = handle.recent_activity(5).await?;

    if json {
        let summary = Summary {
            stats: &stats,
            recent_activity,
        };
        writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    } else {
        writeln!(out, "\nSystem readiness: {:.1}%", stats.readiness_percentage)?;
        writeln!(out, "Status: {:?}", stats.readiness_level)?;
        writeln!(out, "Active incidents: {}", stats.active_incidents)?;
        writeln!(out, "Last {} events:", recent_activity.len())?;
        for line in recent_activity {
            writeln!(out, "  {}", line)?;
        }
    }
    Ok(())
}
