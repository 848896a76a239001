//! Unit status lifecycle
//!
//! `Idle -> OnScene -> Idle` for a normal call-out, `any -> Maintenance -> Idle`
//! for faults. There is no terminal state.

use civicdispatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operational status of an emergency-response unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    /// Ready at station, eligible for dispatch
    Idle,
    /// Committed to an incident
    OnScene,
    /// Out of service for repair or resupply
    Maintenance,
}

impl UnitStatus {
    /// All statuses in lifecycle order
    pub const ALL: [UnitStatus; 3] = [UnitStatus::Idle, UnitStatus::OnScene, UnitStatus::Maintenance];

    /// Availability is derived from status, never stored
    pub fn is_available(&self) -> bool {
        matches!(self, UnitStatus::Idle)
    }

    /// Operator-facing label
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Idle => "Idle",
            UnitStatus::OnScene => "On Scene",
            UnitStatus::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitStatus {
    type Err = Error;

    /// Accepts the display label or the variant name, ignoring case and
    /// surrounding whitespace. Anything else is rejected.
    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim();
        UnitStatus::ALL
            .into_iter()
            .find(|status| {
                label.eq_ignore_ascii_case(status.as_str())
                    || label.eq_ignore_ascii_case(&format!("{:?}", status))
            })
            .ok_or_else(|| Error::InvalidStatus(s.to_string()))
    }
}
