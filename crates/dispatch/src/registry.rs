//! Unit and incident registry
//!
//! The dispatch engine only talks to storage through [`UnitRegistry`].
//! [`InMemoryRegistry`] is the stock implementation: units are kept in
//! registration order, which is also the dispatch priority order.

use civicdispatch_core::{ActivityLog, Error, Result};
use civicdispatch_domain::{Incident, Unit, UnitKind, UnitStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Storage operations the dispatch engine depends on
pub trait UnitRegistry {
    /// Register a unit; an id already present is rejected and nothing changes
    fn add_unit(&mut self, unit: Unit) -> Result<()>;

    fn get_unit_by_id(&self, unit_id: &str) -> Option<&Unit>;

    fn get_unit_mut(&mut self, unit_id: &str) -> Option<&mut Unit>;

    /// Every unit, in registration order
    fn get_all_units(&self) -> Vec<&Unit>;

    /// Idle units of one kind, in registration order
    fn get_available_units_by_type(&self, kind: UnitKind) -> Vec<&Unit> {
        self.get_all_units()
            .into_iter()
            .filter(|u| u.unit_type() == kind && u.availability())
            .collect()
    }

    /// Archive an incident; a repeated id replaces the earlier record
    fn save_incident(&mut self, incident: Incident);

    fn operational_stats(&self) -> OperationalStats;
}

/// Coarse fleet readiness band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessLevel {
    /// 75% or more of the fleet available
    Optimal,
    /// 40% to 75%
    Degraded,
    /// Below 40%, or no units registered
    Critical,
}

impl ReadinessLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 75.0 {
            ReadinessLevel::Optimal
        } else if percentage >= 40.0 {
            ReadinessLevel::Degraded
        } else {
            ReadinessLevel::Critical
        }
    }
}

/// Snapshot of fleet readiness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalStats {
    pub total_units: usize,
    pub available_units: usize,
    /// `available / total * 100`, 0 for an empty fleet
    pub readiness_percentage: f64,
    /// Incidents archived in the registry, resolved ones included. The
    /// engine's in-progress count is `DispatchEngine::total_active_cases`.
    pub active_incidents: usize,
    pub readiness_level: ReadinessLevel,
}

impl OperationalStats {
    pub fn new(total_units: usize, available_units: usize, active_incidents: usize) -> Self {
        let readiness_percentage = if total_units == 0 {
            0.0
        } else {
            available_units as f64 * 100.0 / total_units as f64
        };

        Self {
            total_units,
            available_units,
            readiness_percentage,
            active_incidents,
            readiness_level: ReadinessLevel::from_percentage(readiness_percentage),
        }
    }
}

/// Registry held entirely in memory
#[derive(Debug, Clone)]
pub struct InMemoryRegistry {
    units: Vec<Unit>,
    unit_index: HashMap<String, usize>,
    incident_history: Vec<Incident>,
    incident_index: HashMap<String, usize>,
    system_log: ActivityLog,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::with_log_capacity(civicdispatch_core::event::DEFAULT_CAPACITY)
    }

    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            units: Vec::new(),
            unit_index: HashMap::new(),
            incident_history: Vec::new(),
            incident_index: HashMap::new(),
            system_log: ActivityLog::new(capacity),
        }
    }

    /// Explicit status change (recovery, maintenance) for a registered unit
    pub fn update_unit_status(&mut self, unit_id: &str, status: UnitStatus) -> Result<()> {
        let unit = self
            .get_unit_mut(unit_id)
            .ok_or_else(|| Error::UnitNotFound(unit_id.to_string()))?;
        unit.set_status(status);
        self.system_log
            .record(format!("Status: Unit {} set to {}", unit_id, status));
        Ok(())
    }

    /// Archived incidents, in first-archived order
    pub fn get_incident_history(&self) -> &[Incident] {
        &self.incident_history
    }

    pub fn system_log(&self) -> &ActivityLog {
        &self.system_log
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry for InMemoryRegistry {
    fn add_unit(&mut self, unit: Unit) -> Result<()> {
        if self.unit_index.contains_key(unit.unit_id()) {
            return Err(Error::DuplicateUnitId(unit.unit_id().to_string()));
        }

        info!(unit_id = %unit.unit_id(), unit_type = %unit.unit_type(), "unit registered");
        self.system_log
            .record(format!("System: New Unit {} registered", unit.unit_id()));
        self.unit_index
            .insert(unit.unit_id().to_string(), self.units.len());
        self.units.push(unit);
        Ok(())
    }

    fn get_unit_by_id(&self, unit_id: &str) -> Option<&Unit> {
        self.unit_index.get(unit_id).map(|&i| &self.units[i])
    }

    fn get_unit_mut(&mut self, unit_id: &str) -> Option<&mut Unit> {
        let index = *self.unit_index.get(unit_id)?;
        self.units.get_mut(index)
    }

    fn get_all_units(&self) -> Vec<&Unit> {
        self.units.iter().collect()
    }

    fn save_incident(&mut self, incident: Incident) {
        debug!(incident_id = %incident.incident_id(), "incident archived");
        self.system_log
            .record(format!("Log: Incident {} archived", incident.incident_id()));

        match self.incident_index.get(incident.incident_id()) {
            Some(&i) => self.incident_history[i] = incident,
            None => {
                self.incident_index
                    .insert(incident.incident_id().to_string(), self.incident_history.len());
                self.incident_history.push(incident);
            }
        }
    }

    fn operational_stats(&self) -> OperationalStats {
        let available = self.units.iter().filter(|u| u.availability()).count();
        OperationalStats::new(self.units.len(), available, self.incident_history.len())
    }
}
