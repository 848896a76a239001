//! Incident records
//!
//! An incident is immutable once created. Validation happens here so that
//! every `Incident` value in the system already satisfies the severity and
//! location rules.

use civicdispatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::kind::UnitKind;

/// Incident severity, 1 (minor) to 5 (catastrophic) inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate a raw severity
    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(Error::InvalidSeverity(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Severity 4 and above
    pub fn is_high(&self) -> bool {
        self.0 >= 4
    }
}

impl TryFrom<i64> for Severity {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of emergency was reported.
///
/// Unrecognised text is kept verbatim as `Other`; such incidents match no unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentType {
    Fire,
    Medical,
    Security,
    Hazmat,
    Other(String),
}

impl IncidentType {
    /// The unit kind that answers this incident type (exact match, no substrings)
    pub fn responding_kind(&self) -> Option<UnitKind> {
        match self {
            IncidentType::Fire => Some(UnitKind::Fire),
            IncidentType::Medical => Some(UnitKind::Medical),
            IncidentType::Security => Some(UnitKind::Security),
            IncidentType::Hazmat => Some(UnitKind::Hazmat),
            IncidentType::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IncidentType::Fire => "Fire",
            IncidentType::Medical => "Medical",
            IncidentType::Security => "Security",
            IncidentType::Hazmat => "Hazmat",
            IncidentType::Other(name) => name,
        }
    }
}

impl FromStr for IncidentType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.parse::<UnitKind>() {
            Ok(UnitKind::Fire) => IncidentType::Fire,
            Ok(UnitKind::Medical) => IncidentType::Medical,
            Ok(UnitKind::Security) => IncidentType::Security,
            Ok(UnitKind::Hazmat) => IncidentType::Hazmat,
            Err(_) => IncidentType::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for IncidentType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(parsed) => parsed,
            Err(never) => match never {},
        }
    }
}

impl From<IncidentType> for String {
    fn from(value: IncidentType) -> Self {
        value.as_str().to_string()
    }
}

impl From<UnitKind> for IncidentType {
    fn from(kind: UnitKind) -> Self {
        match kind {
            UnitKind::Fire => IncidentType::Fire,
            UnitKind::Medical => IncidentType::Medical,
            UnitKind::Security => IncidentType::Security,
            UnitKind::Hazmat => IncidentType::Hazmat,
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reported emergency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incident {
    incident_id: String,
    incident_type: IncidentType,
    severity: Severity,
    location: String,
    description: String,
}

impl Incident {
    /// Build an incident, rejecting an empty id or location
    pub fn new(
        incident_id: impl Into<String>,
        incident_type: IncidentType,
        severity: Severity,
        location: impl Into<String>,
    ) -> Result<Self> {
        let incident_id = incident_id.into();
        let location = location.into();

        if incident_id.trim().is_empty() {
            return Err(Error::InvalidIncidentId);
        }
        if location.trim().is_empty() {
            return Err(Error::InvalidLocation);
        }

        let description = format!("Level {} {} at {}", severity, incident_type, location);
        Ok(Self {
            incident_id,
            incident_type,
            severity,
            location,
            description,
        })
    }

    pub fn incident_id(&self) -> &str {
        &self.incident_id
    }

    pub fn incident_type(&self) -> &IncidentType {
        &self.incident_type
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// `Level {severity} {type} at {location}`
    pub fn description(&self) -> &str {
        &self.description
    }
}
