//! Travel-time estimation
//!
//! Estimators never consult live traffic or geography; they work from the
//! unit kind and the two location labels only.

use crate::kind::UnitKind;

/// Estimates minutes from a unit's location to a destination
pub trait EtaEstimator: Send + Sync {
    /// Estimated travel time in minutes
    fn estimate(&self, kind: UnitKind, origin: &str, destination: &str) -> f64;
}

/// Flat per-kind response times
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedEta;

impl FixedEta {
    pub fn minutes_for(kind: UnitKind) -> f64 {
        match kind {
            UnitKind::Fire => 12.5,
            UnitKind::Medical => 8.0,
            UnitKind::Security => 5.0,
            UnitKind::Hazmat => 15.0,
        }
    }
}

impl EtaEstimator for FixedEta {
    fn estimate(&self, kind: UnitKind, _origin: &str, _destination: &str) -> f64 {
        Self::minutes_for(kind)
    }
}
