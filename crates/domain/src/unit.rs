//! Emergency-response units
//!
//! A [`Unit`] carries the fields every kind shares plus a [`UnitProfile`]
//! holding the kind-specific data. Eligibility for a call-out is decided in
//! one place, [`Unit::respond_to_incident`], by matching on the profile.

use civicdispatch_core::{Error, Result, UnitSpec};
use serde::Serialize;
use tracing::{info, warn};

use crate::eta::{EtaEstimator, FixedEta};
use crate::incident::Severity;
use crate::kind::UnitKind;
use crate::status::UnitStatus;

/// Water a fire unit must carry (strictly more than) to accept a call
pub const MIN_RESPONSE_WATER: i64 = 500;

/// Protection level a hazmat team needs for severity 4 and 5 incidents
pub const FULL_PROTECTION_LEVEL: &str = "A";

const DEFAULT_WATER_CAPACITY: i64 = 5000;
const DEFAULT_MEDICAL_TIER: &str = "Basic";
const DEFAULT_PATROL_ZONE: &str = "Zone-1";
const DEFAULT_OFFICER_COUNT: u32 = 2;
const DEFAULT_PROTECTION_LEVEL: &str = "C";

/// Kind-specific unit data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum UnitProfile {
    /// Fire engine
    Fire {
        /// Tank size in litres
        water_capacity: i64,
        /// Litres on board, never negative
        current_water: i64,
    },
    /// Ambulance
    Medical {
        /// Care level (e.g. "Basic", "Advanced")
        medical_tier: String,
    },
    /// Police patrol
    Security {
        /// Assigned patrol zone, never empty
        patrol_zone: String,
        /// Officers aboard
        officer_count: u32,
    },
    /// Hazardous materials team
    Hazmat {
        /// Protective equipment grade, "A" is the highest
        protection_level: String,
    },
}

impl UnitProfile {
    pub fn kind(&self) -> UnitKind {
        match self {
            UnitProfile::Fire { .. } => UnitKind::Fire,
            UnitProfile::Medical { .. } => UnitKind::Medical,
            UnitProfile::Security { .. } => UnitKind::Security,
            UnitProfile::Hazmat { .. } => UnitKind::Hazmat,
        }
    }
}

/// A registered emergency-response unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    unit_id: String,
    current_location: String,
    status: UnitStatus,
    profile: UnitProfile,
}

fn validate_location(location: &str) -> Result<()> {
    if location.trim().is_empty() {
        return Err(Error::InvalidLocation);
    }
    Ok(())
}

impl Unit {
    /// Create an idle unit with the given profile
    pub fn new(
        unit_id: impl Into<String>,
        location: impl Into<String>,
        profile: UnitProfile,
    ) -> Result<Self> {
        let location = location.into();
        validate_location(&location)?;

        if let UnitProfile::Security { patrol_zone, .. } = &profile {
            if patrol_zone.trim().is_empty() {
                return Err(Error::EmptyPatrolZone);
            }
        }

        let profile = match profile {
            UnitProfile::Fire {
                water_capacity,
                current_water,
            } => UnitProfile::Fire {
                water_capacity: water_capacity.max(0),
                current_water: current_water.max(0),
            },
            other => other,
        };

        Ok(Self {
            unit_id: unit_id.into(),
            current_location: location,
            status: UnitStatus::Idle,
            profile,
        })
    }

    /// Fire engine with a full tank
    pub fn fire(
        unit_id: impl Into<String>,
        location: impl Into<String>,
        water_capacity: i64,
    ) -> Result<Self> {
        Self::new(
            unit_id,
            location,
            UnitProfile::Fire {
                water_capacity,
                current_water: water_capacity,
            },
        )
    }

    pub fn medical(
        unit_id: impl Into<String>,
        location: impl Into<String>,
        medical_tier: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            unit_id,
            location,
            UnitProfile::Medical {
                medical_tier: medical_tier.into(),
            },
        )
    }

    pub fn security(
        unit_id: impl Into<String>,
        location: impl Into<String>,
        patrol_zone: impl Into<String>,
        officer_count: u32,
    ) -> Result<Self> {
        Self::new(
            unit_id,
            location,
            UnitProfile::Security {
                patrol_zone: patrol_zone.into(),
                officer_count,
            },
        )
    }

    pub fn hazmat(
        unit_id: impl Into<String>,
        location: impl Into<String>,
        protection_level: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            unit_id,
            location,
            UnitProfile::Hazmat {
                protection_level: protection_level.into(),
            },
        )
    }

    /// Build a unit from a `[[units]]` config entry
    pub fn from_spec(spec: &UnitSpec) -> Result<Self> {
        let kind: UnitKind = spec.kind.parse()?;
        let profile = match kind {
            UnitKind::Fire => {
                let capacity = spec.water_capacity.unwrap_or(DEFAULT_WATER_CAPACITY);
                UnitProfile::Fire {
                    water_capacity: capacity,
                    current_water: capacity,
                }
            }
            UnitKind::Medical => UnitProfile::Medical {
                medical_tier: spec
                    .medical_tier
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MEDICAL_TIER.to_string()),
            },
            UnitKind::Security => UnitProfile::Security {
                patrol_zone: spec
                    .patrol_zone
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PATROL_ZONE.to_string()),
                officer_count: spec.officer_count.unwrap_or(DEFAULT_OFFICER_COUNT),
            },
            UnitKind::Hazmat => UnitProfile::Hazmat {
                protection_level: spec
                    .protection_level
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PROTECTION_LEVEL.to_string()),
            },
        };
        Self::new(spec.id.clone(), spec.location.clone(), profile)
    }

    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    pub fn unit_type(&self) -> UnitKind {
        self.profile.kind()
    }

    pub fn profile(&self) -> &UnitProfile {
        &self.profile
    }

    pub fn current_location(&self) -> &str {
        &self.current_location
    }

    /// Move the unit; an empty location is rejected and nothing changes
    pub fn set_location(&mut self, location: impl Into<String>) -> Result<()> {
        let location = location.into();
        validate_location(&location)?;
        self.current_location = location;
        Ok(())
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    /// Derived from status; there is no setter
    pub fn availability(&self) -> bool {
        self.status.is_available()
    }

    /// Explicit external status update (recovery, manual override)
    pub fn set_status(&mut self, status: UnitStatus) {
        if self.status != status {
            info!(
                unit_id = %self.unit_id,
                from = %self.status,
                to = %status,
                "unit status updated"
            );
        }
        self.status = status;
    }

    /// Status update from operator text; unrecognised values are rejected
    pub fn set_status_str(&mut self, status: &str) -> Result<()> {
        let status: UnitStatus = status.parse()?;
        self.set_status(status);
        Ok(())
    }

    fn transition(&mut self, allowed_from: &[UnitStatus], to: UnitStatus) -> Result<()> {
        if !allowed_from.contains(&self.status) {
            return Err(Error::InvalidTransition {
                unit_id: self.unit_id.clone(),
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.set_status(to);
        Ok(())
    }

    /// OnScene -> Idle once the call is closed
    pub fn complete_service(&mut self) -> Result<()> {
        self.transition(&[UnitStatus::OnScene], UnitStatus::Idle)
    }

    /// Any status -> Maintenance
    pub fn begin_maintenance(&mut self) -> Result<()> {
        self.transition(&UnitStatus::ALL, UnitStatus::Maintenance)
    }

    /// Maintenance -> Idle after repair
    pub fn finish_repair(&mut self) -> Result<()> {
        self.transition(&[UnitStatus::Maintenance], UnitStatus::Idle)
    }

    /// Try to commit this unit to an incident.
    ///
    /// On success the unit moves to `OnScene` and `true` is returned. On
    /// failure the unit is left exactly as it was.
    pub fn respond_to_incident(&mut self, incident_id: &str, severity: Severity) -> bool {
        let available = self.availability();

        let accepted = match &self.profile {
            UnitProfile::Fire { current_water, .. } => {
                if available && *current_water > MIN_RESPONSE_WATER {
                    true
                } else {
                    warn!(
                        unit_id = %self.unit_id,
                        incident_id,
                        current_water,
                        status = %self.status,
                        "fire unit cannot respond (low water or busy)"
                    );
                    false
                }
            }
            UnitProfile::Medical { .. } => available,
            UnitProfile::Security { .. } => {
                if available && severity.is_high() {
                    warn!(
                        unit_id = %self.unit_id,
                        incident_id,
                        severity = severity.value(),
                        "high alert: moving to high-risk scene"
                    );
                }
                available
            }
            UnitProfile::Hazmat { protection_level } => {
                if severity.value() > 3 && protection_level != FULL_PROTECTION_LEVEL {
                    warn!(
                        unit_id = %self.unit_id,
                        incident_id,
                        severity = severity.value(),
                        protection_level = %protection_level,
                        "hazmat protection too low for incident"
                    );
                    false
                } else {
                    available
                }
            }
        };

        if accepted {
            self.set_status(UnitStatus::OnScene);
            info!(
                unit_id = %self.unit_id,
                unit_type = %self.unit_type(),
                incident_id,
                "unit responding"
            );
        } else if !available {
            warn!(unit_id = %self.unit_id, incident_id, status = %self.status, "unit busy");
        }
        accepted
    }

    /// ETA with the default flat per-kind estimator
    pub fn calculate_eta(&self, destination: &str) -> f64 {
        self.calculate_eta_with(&FixedEta, destination)
    }

    pub fn calculate_eta_with(&self, estimator: &dyn EtaEstimator, destination: &str) -> f64 {
        estimator.estimate(self.unit_type(), &self.current_location, destination)
    }

    pub fn get_unit_capabilities(&self) -> Vec<&'static str> {
        self.unit_type().capabilities().to_vec()
    }

    fn unsupported(&self, operation: &'static str) -> Error {
        Error::UnsupportedOperation {
            unit_id: self.unit_id.clone(),
            operation,
        }
    }

    // Fire

    pub fn water_capacity(&self) -> Option<i64> {
        match &self.profile {
            UnitProfile::Fire { water_capacity, .. } => Some(*water_capacity),
            _ => None,
        }
    }

    pub fn current_water(&self) -> Option<i64> {
        match &self.profile {
            UnitProfile::Fire { current_water, .. } => Some(*current_water),
            _ => None,
        }
    }

    /// Set the water level, capped at the tank capacity. Driving it negative
    /// empties the tank and sends the unit to maintenance.
    pub fn set_current_water(&mut self, value: i64) -> Result<()> {
        match &mut self.profile {
            UnitProfile::Fire {
                water_capacity,
                current_water,
            } => *current_water = value.clamp(0, (*water_capacity).max(0)),
            _ => return Err(self.unsupported("water level")),
        }

        if value < 0 {
            warn!(unit_id = %self.unit_id, "water exhausted, unit sent to maintenance");
            self.set_status(UnitStatus::Maintenance);
        }
        Ok(())
    }

    /// Draw `amount` litres, returning what is left
    pub fn consume_water(&mut self, amount: i64) -> Result<i64> {
        let current = self
            .current_water()
            .ok_or_else(|| self.unsupported("water level"))?;
        if amount < 0 {
            return Err(Error::InvalidWaterAmount(amount));
        }
        self.set_current_water(current.saturating_sub(amount))?;
        Ok(self.current_water().unwrap_or(0))
    }

    /// Top the tank back up to capacity
    pub fn refill(&mut self) -> Result<()> {
        let capacity = self
            .water_capacity()
            .ok_or_else(|| self.unsupported("refill"))?;
        self.set_current_water(capacity)
    }

    // Medical

    pub fn medical_tier(&self) -> Option<&str> {
        match &self.profile {
            UnitProfile::Medical { medical_tier } => Some(medical_tier),
            _ => None,
        }
    }

    // Security

    pub fn patrol_zone(&self) -> Option<&str> {
        match &self.profile {
            UnitProfile::Security { patrol_zone, .. } => Some(patrol_zone),
            _ => None,
        }
    }

    pub fn officer_count(&self) -> Option<u32> {
        match &self.profile {
            UnitProfile::Security { officer_count, .. } => Some(*officer_count),
            _ => None,
        }
    }

    pub fn set_patrol_zone(&mut self, zone: impl Into<String>) -> Result<()> {
        let zone = zone.into();
        let is_security = matches!(self.profile, UnitProfile::Security { .. });
        if !is_security {
            return Err(self.unsupported("patrol zone"));
        }
        if zone.trim().is_empty() {
            return Err(Error::EmptyPatrolZone);
        }
        if let UnitProfile::Security { patrol_zone, .. } = &mut self.profile {
            *patrol_zone = zone;
        }
        Ok(())
    }

    // Hazmat

    pub fn protection_level(&self) -> Option<&str> {
        match &self.profile {
            UnitProfile::Hazmat { protection_level } => Some(protection_level),
            _ => None,
        }
    }
}
