//! Core error types
//!
//! One taxonomy shared by the domain, registry and dispatch crates. Boundary
//! validation failures are rejected before any state is touched; "no unit
//! available" is *not* an error and lives in the dispatch outcome instead.

use thiserror::Error;

/// Core error type for civicdispatch
#[derive(Debug, Error)]
pub enum Error {
    /// Severity outside the inclusive 1..=5 range
    #[error("Severity must be between 1 and 5, got {0}")]
    InvalidSeverity(i64),

    /// Empty or whitespace-only location
    #[error("Location must be a non-empty string")]
    InvalidLocation,

    /// Status text that does not name a known unit status
    #[error("Invalid status value: {0:?}")]
    InvalidStatus(String),

    /// Security unit patrol zone left empty
    #[error("Patrol zone cannot be empty")]
    EmptyPatrolZone,

    /// Incident reported without an identifier
    #[error("Incident id must be a non-empty string")]
    InvalidIncidentId,

    /// Unit kind text that does not name a known capability
    #[error("Unknown unit kind: {0:?}")]
    UnknownUnitKind(String),

    /// Registration of an id that is already present
    #[error("Unit {0} already exists")]
    DuplicateUnitId(String),

    /// Lookup of an id that was never registered
    #[error("Unit {0} not found")]
    UnitNotFound(String),

    /// Resolution of an incident that is not in progress
    #[error("Incident {0} is not in progress")]
    IncidentNotFound(String),

    /// Resolution attempted with a unit other than the one dispatched
    #[error("Unit {unit_id} is not assigned to incident {incident_id}")]
    UnitNotAssigned {
        /// Incident identifier
        incident_id: String,
        /// Unit named by the caller
        unit_id: String,
    },

    /// Negative water draw
    #[error("Water amount must not be negative, got {0}")]
    InvalidWaterAmount(i64),

    /// Explicit lifecycle action not allowed from the current status
    #[error("Unit {unit_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Unit identifier
        unit_id: String,
        /// Status before the attempted action
        from: String,
        /// Status the action would have produced
        to: String,
    },

    /// Type-specific action applied to a unit of another kind
    #[error("Unit {unit_id} does not support {operation}")]
    UnsupportedOperation {
        /// Unit identifier
        unit_id: String,
        /// Name of the rejected action
        operation: &'static str,
    },

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The dispatch worker task has shut down
    #[error("Dispatch worker is no longer running")]
    WorkerClosed,
}

impl Error {
    /// True for the boundary validation family (bad severity, location,
    /// status text, patrol zone, incident id, unit kind or water amount).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidSeverity(_)
                | Error::InvalidLocation
                | Error::InvalidStatus(_)
                | Error::EmptyPatrolZone
                | Error::InvalidIncidentId
                | Error::UnknownUnitKind(_)
                | Error::InvalidWaterAmount(_)
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;
