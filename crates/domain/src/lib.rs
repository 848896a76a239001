//! civicdispatch domain
//!
//! Pure domain types with no I/O:
//! - Unit kinds, status lifecycle and type-specific eligibility rules
//! - Immutable incident records with validated severity
//! - Pluggable, geography-free ETA estimation

pub mod eta;
pub mod incident;
pub mod kind;
pub mod status;
pub mod unit;

pub use eta::{EtaEstimator, FixedEta};
pub use incident::{Incident, IncidentType, Severity};
pub use kind::UnitKind;
pub use status::UnitStatus;
pub use unit::{Unit, UnitProfile, FULL_PROTECTION_LEVEL, MIN_RESPONSE_WATER};
