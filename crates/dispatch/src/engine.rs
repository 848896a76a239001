//! Dispatch engine
//!
//! Matches an incident to a unit with **first-eligible-match** semantics:
//! the candidates are the idle units whose kind answers the incident type,
//! taken in registry order, and only the first one is asked to respond. No
//! distance, load or severity ranking is applied; registration order is the
//! priority order.
//!
//! At most one unit is touched per dispatch call, and units filtered out are
//! never mutated. The engine needs `&mut self` for the whole
//! filter-select-respond sequence, so within one engine the sequence is
//! atomic. Concurrent hosts go through [`crate::worker::DispatchWorker`].

use civicdispatch_core::{ActivityLog, Error, LogEntry, Result};
use civicdispatch_domain::{Incident, IncidentType, Severity, Unit, UnitStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

use crate::plan;
use crate::registry::{InMemoryRegistry, OperationalStats, UnitRegistry};

/// Outcome of one dispatch attempt. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchResult {
    /// No idle unit of the matching kind exists
    NoAvailableUnit {
        incident_id: String,
        incident_type: String,
    },
    /// The selected unit accepted and is now on scene
    Dispatched { unit_id: String, location: String },
    /// The selected unit refused (e.g. low water, insufficient protection)
    Rejected { unit_id: String },
}

impl DispatchResult {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, DispatchResult::Dispatched { .. })
    }

    /// Unit that was asked to respond, if any
    pub fn unit_id(&self) -> Option<&str> {
        match self {
            DispatchResult::Dispatched { unit_id, .. } | DispatchResult::Rejected { unit_id } => {
                Some(unit_id)
            }
            DispatchResult::NoAvailableUnit { .. } => None,
        }
    }
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchResult::NoAvailableUnit {
                incident_id,
                incident_type,
            } => write!(
                f,
                "No available {} unit for incident {}",
                incident_type, incident_id
            ),
            DispatchResult::Dispatched { unit_id, location } => {
                write!(f, "Dispatch successful: {} dispatched to {}", unit_id, location)
            }
            DispatchResult::Rejected { unit_id } => {
                write!(f, "Dispatch rejected by unit {}", unit_id)
            }
        }
    }
}

/// Incident intake and unit dispatch over a [`UnitRegistry`]
#[derive(Debug)]
pub struct DispatchEngine<R = InMemoryRegistry> {
    registry: R,
    activity_log: ActivityLog,
    active_incidents: HashMap<String, Incident>,
    /// incident id -> unit dispatched to it
    assignments: HashMap<String, String>,
}

impl<R: UnitRegistry> DispatchEngine<R> {
    pub fn new(registry: R) -> Self {
        Self::with_log_capacity(registry, civicdispatch_core::event::DEFAULT_CAPACITY)
    }

    pub fn with_log_capacity(registry: R, capacity: usize) -> Self {
        Self {
            registry,
            activity_log: ActivityLog::new(capacity),
            active_incidents: HashMap::new(),
            assignments: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn into_registry(self) -> R {
        self.registry
    }

    pub fn register_unit(&mut self, unit: Unit) -> Result<()> {
        let unit_id = unit.unit_id().to_string();
        self.registry.add_unit(unit)?;
        self.log_event(format!("Unit {} registered", unit_id));
        Ok(())
    }

    /// Validate, index and archive a new incident.
    ///
    /// Severity is checked before anything else; a rejected report leaves
    /// the engine and registry untouched. A repeated id replaces the earlier
    /// in-progress entry.
    pub fn create_incident_report(
        &mut self,
        incident_id: &str,
        incident_type: &str,
        severity: i64,
        location: &str,
    ) -> Result<Incident> {
        let severity = Severity::new(severity)?;
        let incident_type: IncidentType = incident_type.parse().unwrap_or_else(|e| match e {});
        let incident = Incident::new(incident_id, incident_type, severity, location)?;

        if self.active_incidents.contains_key(incident_id) {
            warn!(incident_id, "incident id reused, replacing in-progress entry");
        }
        self.active_incidents
            .insert(incident_id.to_string(), incident.clone());
        self.registry.save_incident(incident.clone());

        info!(
            incident_id,
            incident_type = %incident.incident_type(),
            severity = severity.value(),
            location,
            "incident registered"
        );
        self.log_event(format!("Incident {} registered", incident_id));
        Ok(incident)
    }

    /// Idle units whose kind answers `incident`, in registry order
    pub fn eligible_units(&self, incident: &Incident) -> Vec<&Unit> {
        match incident.incident_type().responding_kind() {
            Some(kind) => self.registry.get_available_units_by_type(kind),
            None => Vec::new(),
        }
    }

    /// Ask the first eligible unit to respond to `incident`
    pub fn dispatch_nearest_unit(&mut self, incident: &Incident) -> DispatchResult {
        let selected = self
            .eligible_units(incident)
            .first()
            .map(|u| u.unit_id().to_string());

        let unit = selected
            .as_deref()
            .and_then(|unit_id| self.registry.get_unit_mut(unit_id));

        let Some(unit) = unit else {
            warn!(
                incident_id = %incident.incident_id(),
                incident_type = %incident.incident_type(),
                "no available unit"
            );
            let result = DispatchResult::NoAvailableUnit {
                incident_id: incident.incident_id().to_string(),
                incident_type: incident.incident_type().to_string(),
            };
            self.log_event(result.to_string());
            return result;
        };

        let unit_id = unit.unit_id().to_string();
        let result = if unit.respond_to_incident(incident.incident_id(), incident.severity()) {
            info!(unit_id = %unit_id, incident_id = %incident.incident_id(), "unit dispatched");
            self.assignments
                .insert(incident.incident_id().to_string(), unit_id.clone());
            DispatchResult::Dispatched {
                unit_id,
                location: incident.location().to_string(),
            }
        } else {
            warn!(unit_id = %unit_id, incident_id = %incident.incident_id(), "dispatch rejected");
            DispatchResult::Rejected { unit_id }
        };

        self.log_event(format!("{} (incident {})", result, incident.incident_id()));
        result
    }

    pub fn generate_intervention_plan(&self, incident: &Incident, unit: &Unit) -> String {
        plan::generate_intervention_plan(incident, unit)
    }

    /// Plan for a registered unit, looked up by id
    pub fn plan_for(&self, incident: &Incident, unit_id: &str) -> Option<String> {
        self.registry
            .get_unit_by_id(unit_id)
            .map(|unit| plan::generate_intervention_plan(incident, unit))
    }

    pub fn unit_status(&self, unit_id: &str) -> Option<UnitStatus> {
        self.registry.get_unit_by_id(unit_id).map(Unit::status)
    }

    /// Close an in-progress incident and return its unit to service.
    ///
    /// `unit_id` must be the unit dispatched to the incident. Every check
    /// runs before anything changes.
    pub fn resolve_incident(&mut self, incident_id: &str, unit_id: &str) -> Result<Incident> {
        if !self.active_incidents.contains_key(incident_id) {
            return Err(Error::IncidentNotFound(incident_id.to_string()));
        }
        if self.registry.get_unit_by_id(unit_id).is_none() {
            return Err(Error::UnitNotFound(unit_id.to_string()));
        }
        if self.assignments.get(incident_id).map(String::as_str) != Some(unit_id) {
            return Err(Error::UnitNotAssigned {
                incident_id: incident_id.to_string(),
                unit_id: unit_id.to_string(),
            });
        }

        let unit = self
            .registry
            .get_unit_mut(unit_id)
            .ok_or_else(|| Error::UnitNotFound(unit_id.to_string()))?;
        unit.complete_service()?;

        self.assignments.remove(incident_id);
        let incident = self
            .active_incidents
            .remove(incident_id)
            .ok_or_else(|| Error::IncidentNotFound(incident_id.to_string()))?;

        info!(incident_id, unit_id, "incident resolved");
        self.log_event(format!(
            "Incident {} resolved, unit {} back in service",
            incident_id, unit_id
        ));
        Ok(incident)
    }

    /// Unit dispatched to an in-progress incident
    pub fn assigned_unit(&self, incident_id: &str) -> Option<&str> {
        self.assignments.get(incident_id).map(String::as_str)
    }

    pub fn operational_stats(&self) -> OperationalStats {
        self.registry.operational_stats()
    }

    /// In-progress incidents, ordered by id
    pub fn active_incidents(&self) -> Vec<&Incident> {
        let mut incidents: Vec<_> = self.active_incidents.values().collect();
        incidents.sort_by(|a, b| a.incident_id().cmp(b.incident_id()));
        incidents
    }

    pub fn total_active_cases(&self) -> usize {
        self.active_incidents.len()
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.activity_log
    }

    /// Newest `count` activity entries, oldest first
    pub fn recent_activity(&self, count: usize) -> Vec<&LogEntry> {
        self.activity_log.tail(count)
    }

    fn log_event(&mut self, message: String) {
        self.activity_log.record(message);
    }
}
