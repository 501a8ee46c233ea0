//! Per-field validity intervals expressed in API versions.

use serde::{Deserialize, Serialize};

use crate::{error::Error, version::SystemVersion};

/// The versions for which a field is part of the wire contract.
///
/// Both bounds are inclusive; an absent bound is open. A gate with neither
/// bound admits every version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawGate")]
pub struct VersionGate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    first: Option<SystemVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last: Option<SystemVersion>,
}

impl VersionGate {
    /// Creates a gate, rejecting one whose start lies after its end.
    pub fn new(first: Option<SystemVersion>, last: Option<SystemVersion>) -> Result<Self, Error> {
        if let (Some(first), Some(last)) = (first, last)
            && first > last
        {
            return Err(Error::InvalidGate { first, last });
        }
        Ok(Self { first, last })
    }

    pub const fn always() -> Self {
        Self {
            first: None,
            last: None,
        }
    }

    /// Active from `first` onwards.
    pub const fn since(first: SystemVersion) -> Self {
        Self {
            first: Some(first),
            last: None,
        }
    }

    /// Active up to and including `last`.
    pub const fn until(last: SystemVersion) -> Self {
        Self {
            first: None,
            last: Some(last),
        }
    }

    pub fn first(&self) -> Option<SystemVersion> {
        self.first
    }

    pub fn last(&self) -> Option<SystemVersion> {
        self.last
    }

    pub fn is_active(&self, target: &SystemVersion) -> bool {
        is_active(self, target)
    }
}

#[derive(Deserialize)]
struct RawGate {
    #[serde(default)]
    first: Option<SystemVersion>,
    #[serde(default)]
    last: Option<SystemVersion>,
}

impl TryFrom<RawGate> for VersionGate {
    type Error = Error;

    fn try_from(raw: RawGate) -> Result<Self, Self::Error> {
        VersionGate::new(raw.first, raw.last)
    }
}

/// A field is active iff `target` is within both present bounds.
pub fn is_active(gate: &VersionGate, target: &SystemVersion) -> bool {
    gate.first.is_none_or(|first| *target >= first) && gate.last.is_none_or(|last| *target <= last)
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1_0: SystemVersion = SystemVersion::new(1, 0, 0);
    const V1_5: SystemVersion = SystemVersion::new(1, 5, 0);
    const V2_0: SystemVersion = SystemVersion::new(2, 0, 0);

    #[test]
    fn test_unbounded_gate_is_always_active() {
        let gate = VersionGate::always();
        for target in [SystemVersion::new(0, 0, 0), V1_5, SystemVersion::new(99, 0, 0)] {
            assert!(gate.is_active(&target));
        }
    }

    #[test]
    fn test_until_is_inclusive() {
        let gate = VersionGate::until(V1_0);
        assert!(gate.is_active(&SystemVersion::new(0, 9, 0)));
        assert!(gate.is_active(&V1_0));
        assert!(!gate.is_active(&SystemVersion::new(1, 0, 1)));
    }

    #[test]
    fn test_since_is_inclusive() {
        let gate = VersionGate::since(V2_0);
        assert!(!gate.is_active(&V1_5));
        assert!(gate.is_active(&V2_0));
        assert!(gate.is_active(&SystemVersion::new(2, 3, 0)));
    }

    #[test]
    fn test_bounded_window() {
        let gate = VersionGate::new(Some(V1_0), Some(V1_5)).unwrap();
        assert!(gate.is_active(&SystemVersion::new(1, 2, 0)));
        assert!(!gate.is_active(&V2_0));
        assert!(!gate.is_active(&SystemVersion::new(0, 9, 9)));
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        assert!(matches!(
            VersionGate::new(Some(V2_0), Some(V1_0)),
            Err(Error::InvalidGate { .. })
        ));
    }

    #[test]
    fn test_gate_deserializes_from_strings() {
        let gate: VersionGate = serde_json::from_str(r#"{ "first": "2.0.0" }"#).unwrap();
        assert_eq!(gate, VersionGate::since(V2_0));

        let inverted =
            serde_json::from_str::<VersionGate>(r#"{ "first": "2.0.0", "last": "1.0.0" }"#);
        assert!(inverted.is_err());
    }
}
