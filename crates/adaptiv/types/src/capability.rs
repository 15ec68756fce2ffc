//! Capability attributes and state
//!
//! A capability is not simply on or off: it carries an assurance level plus
//! process attributes (surface finish, tolerance, cost) that can be written
//! independently of each other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Categorical trust level of an advertised capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssuranceState {
    /// Capability is guaranteed at the advertised quality.
    Assured,

    /// Capability is available with relaxed guarantees.
    Offered,

    /// Capability must not be dispatched.
    NotAvailable,
}

impl AssuranceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssuranceState::Assured => "assured",
            AssuranceState::Offered => "offered",
            AssuranceState::NotAvailable => "notAvailable",
        }
    }

    /// Whether work may be dispatched against this capability at all.
    pub fn is_dispatchable(&self) -> bool {
        !matches!(self, AssuranceState::NotAvailable)
    }
}

impl fmt::Display for AssuranceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssuranceState {
    type Err = CapabilityValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "assured" => Ok(AssuranceState::Assured),
            "offered" => Ok(AssuranceState::Offered),
            "notAvailable" => Ok(AssuranceState::NotAvailable),
            other => Err(CapabilityValueError::InvalidAssurance(other.to_string())),
        }
    }
}

/// Independently writable attribute of the milling capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityAttribute {
    AssuranceState,
    SurfaceFinishGrade,
    ToleranceClass,
    EnergyCostPerPart,
    CarbonFootprintPerPart,
}

impl CapabilityAttribute {
    pub const ALL: [CapabilityAttribute; 5] = [
        CapabilityAttribute::AssuranceState,
        CapabilityAttribute::SurfaceFinishGrade,
        CapabilityAttribute::ToleranceClass,
        CapabilityAttribute::EnergyCostPerPart,
        CapabilityAttribute::CarbonFootprintPerPart,
    ];

    /// Canonical submodel element path of this attribute.
    pub fn path(&self) -> &'static str {
        match self {
            CapabilityAttribute::AssuranceState => {
                "Capabilities/ProcessCapability:Milling/AssuranceState"
            }
            CapabilityAttribute::SurfaceFinishGrade => {
                "Capabilities/ProcessCapability:Milling/SurfaceFinishGrade"
            }
            CapabilityAttribute::ToleranceClass => {
                "Capabilities/ProcessCapability:Milling/ToleranceClass"
            }
            CapabilityAttribute::EnergyCostPerPart => {
                "Capabilities/ProcessCapability:Milling/EnergyCostPerPart_kWh"
            }
            CapabilityAttribute::CarbonFootprintPerPart => {
                "Capabilities/ProcessCapability:Milling/CarbonFootprintGPerPart"
            }
        }
    }

    /// Resolve an element path back to its attribute.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim();
        Self::ALL.into_iter().find(|attr| attr.path() == path)
    }
}

impl fmt::Display for CapabilityAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Errors raised when writing a value into a [`CapabilityState`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapabilityValueError {
    #[error("invalid assurance state: {0}")]
    InvalidAssurance(String),

    #[error("invalid numeric value for {attribute}: {value}")]
    InvalidNumber {
        attribute: CapabilityAttribute,
        value: String,
    },

    #[error(transparent)]
    UnknownAttribute(#[from] UnknownAttribute),
}

/// An element path that names no known capability attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown capability attribute path: {0}")]
pub struct UnknownAttribute(pub String);

/// Local view of an asset's advertised capability.
///
/// The live state is owned by the external registry; this struct mirrors
/// what has been written so previous values are known when auditing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapabilityState {
    pub assurance_state: Option<AssuranceState>,
    pub surface_finish_grade: Option<String>,
    pub tolerance_class: Option<String>,
    pub energy_cost_per_part: Option<String>,
    pub carbon_footprint_per_part: Option<String>,
}

impl CapabilityState {
    /// Current value of an attribute rendered as its literal string.
    pub fn get(&self, attribute: CapabilityAttribute) -> Option<String> {
        match attribute {
            CapabilityAttribute::AssuranceState => {
                self.assurance_state.map(|s| s.as_str().to_string())
            }
            CapabilityAttribute::SurfaceFinishGrade => self.surface_finish_grade.clone(),
            CapabilityAttribute::ToleranceClass => self.tolerance_class.clone(),
            CapabilityAttribute::EnergyCostPerPart => self.energy_cost_per_part.clone(),
            CapabilityAttribute::CarbonFootprintPerPart => self.carbon_footprint_per_part.clone(),
        }
    }

    /// Write an attribute, returning the previous value.
    pub fn set(
        &mut self,
        attribute: CapabilityAttribute,
        value: &str,
    ) -> Result<Option<String>, CapabilityValueError> {
        let previous = self.get(attribute);
        let value = value.trim();

        match attribute {
            CapabilityAttribute::AssuranceState => {
                self.assurance_state = Some(value.parse()?);
            }
            CapabilityAttribute::SurfaceFinishGrade => {
                self.surface_finish_grade = Some(value.to_string());
            }
            CapabilityAttribute::ToleranceClass => {
                self.tolerance_class = Some(value.to_string());
            }
            CapabilityAttribute::EnergyCostPerPart
            | CapabilityAttribute::CarbonFootprintPerPart => {
                if value.parse::<f64>().is_err() {
                    return Err(CapabilityValueError::InvalidNumber {
                        attribute,
                        value: value.to_string(),
                    });
                }
                let slot = if attribute == CapabilityAttribute::EnergyCostPerPart {
                    &mut self.energy_cost_per_part
                } else {
                    &mut self.carbon_footprint_per_part
                };
                *slot = Some(value.to_string());
            }
        }

        Ok(previous)
    }

    /// Write an attribute addressed by element path.
    pub fn set_path(
        &mut self,
        path: &str,
        value: &str,
    ) -> Result<Option<String>, CapabilityValueError> {
        let attribute =
            CapabilityAttribute::from_path(path).ok_or_else(|| UnknownAttribute(path.into()))?;
        self.set(attribute, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assurance_round_trip_strings() {
        for state in [
            AssuranceState::Assured,
            AssuranceState::Offered,
            AssuranceState::NotAvailable,
        ] {
            assert_eq!(state.as_str().parse::<AssuranceState>().unwrap(), state);
        }
        assert!("degraded".parse::<AssuranceState>().is_err());
        assert!(!AssuranceState::NotAvailable.is_dispatchable());
        assert!(AssuranceState::Offered.is_dispatchable());
    }

    #[test]
    fn test_assurance_serde_uses_camel_case() {
        let json = serde_json::to_string(&AssuranceState::NotAvailable).unwrap();
        assert_eq!(json, "\"notAvailable\"");
    }

    #[test]
    fn test_attribute_path_lookup() {
        for attr in CapabilityAttribute::ALL {
            assert_eq!(CapabilityAttribute::from_path(attr.path()), Some(attr));
        }
        assert_eq!(CapabilityAttribute::from_path("HealthIndex"), None);
    }

    #[test]
    fn test_set_returns_previous_value() {
        let mut state = CapabilityState::default();

        let prev = state
            .set(CapabilityAttribute::SurfaceFinishGrade, "A")
            .unwrap();
        assert_eq!(prev, None);

        let prev = state
            .set_path(CapabilityAttribute::SurfaceFinishGrade.path(), "B")
            .unwrap();
        assert_eq!(prev.as_deref(), Some("A"));
        assert_eq!(state.surface_finish_grade.as_deref(), Some("B"));
    }

    #[test]
    fn test_set_validates_typed_attributes() {
        let mut state = CapabilityState::default();

        assert!(state
            .set(CapabilityAttribute::AssuranceState, "bogus")
            .is_err());
        assert!(state
            .set(CapabilityAttribute::EnergyCostPerPart, "cheap")
            .is_err());
        assert!(state.set_path("Nope/Path", "x").is_err());

        state
            .set(CapabilityAttribute::EnergyCostPerPart, "1.25")
            .unwrap();
        assert_eq!(
            state.get(CapabilityAttribute::EnergyCostPerPart).as_deref(),
            Some("1.25")
        );
    }
}
