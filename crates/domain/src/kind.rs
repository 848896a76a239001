//! Response capability kinds

use civicdispatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four response capabilities a unit can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Fire engine (water supply, suppression)
    Fire,
    /// Ambulance
    Medical,
    /// Police patrol
    Security,
    /// Hazardous materials team
    Hazmat,
}

impl UnitKind {
    /// Every kind, in registration-menu order
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Fire,
        UnitKind::Medical,
        UnitKind::Security,
        UnitKind::Hazmat,
    ];

    /// Stable type tag shared with incident types
    pub fn tag(&self) -> &'static str {
        match self {
            UnitKind::Fire => "Fire",
            UnitKind::Medical => "Medical",
            UnitKind::Security => "Security",
            UnitKind::Hazmat => "Hazmat",
        }
    }

    /// Display/matching metadata only; eligibility never reads this.
    pub fn capabilities(&self) -> &'static [&'static str] {
        match self {
            UnitKind::Fire => &["Fire Suppression", "Search and Rescue"],
            UnitKind::Medical => &["Emergency Medical Care", "Patient Transport"],
            UnitKind::Security => &["Traffic Control", "Security"],
            UnitKind::Hazmat => &["Chemical Detection", "Decontamination"],
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for UnitKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fire" => Ok(UnitKind::Fire),
            "medical" => Ok(UnitKind::Medical),
            "security" => Ok(UnitKind::Security),
            // legacy tag the hazmat team registered under
            "hazmat" | "radiation" => Ok(UnitKind::Hazmat),
            _ => Err(Error::UnknownUnitKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_parse_back() {
        for kind in UnitKind::ALL {
            assert_eq!(kind.tag().parse::<UnitKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("radiation".parse::<UnitKind>().unwrap(), UnitKind::Hazmat);
        assert_eq!(" FIRE ".parse::<UnitKind>().unwrap(), UnitKind::Fire);
        assert!("Firetruck".parse::<UnitKind>().is_err());
    }

    #[test]
    fn test_capabilities_are_static_per_kind() {
        assert_eq!(
            UnitKind::Fire.capabilities(),
            &["Fire Suppression", "Search and Rescue"]
        );
        for kind in UnitKind::ALL {
            assert_eq!(kind.capabilities().len(), 2);
        }
    }
}
