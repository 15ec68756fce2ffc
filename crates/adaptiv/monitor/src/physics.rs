//! Physics-based expectations.
//!
//! A [`SimulationProvider`] supplies the vibration an asset should exhibit
//! under given operating conditions. Real deployments plug in a co-simulation
//! runner; [`FallbackPhysicsModel`] evaluates the bearing wear equations in
//! closed form and is used whenever no simulation is available.

use adaptiv_types::AssetId;
use serde::{Deserialize, Serialize};

use crate::error::MonitorResult;

/// Lower bound on the expected vibration used as the residual denominator.
const MIN_EXPECTED_VIB: f64 = 0.1;

/// Steady-state outputs of a physics simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsExpectation {
    /// Expected vibration RMS [mm/s].
    pub vib_rms_expected: f64,

    /// Expected power loss [W].
    pub power_loss_expected: f64,

    /// Expected temperature rise [K].
    pub temperature_rise_expected: f64,
}

/// Source of physics expectations for an asset.
pub trait SimulationProvider: Send + Sync {
    /// Simulate steady-state behaviour at the given operating point.
    fn simulate(
        &self,
        asset_id: &AssetId,
        omega: f64,
        load: f64,
        wear: f64,
    ) -> MonitorResult<PhysicsExpectation>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Closed-form bearing wear model.
///
/// ```text
/// vib   = base + k1*omega + k2*load + k3*wear + k4*wear*omega
/// power = power_base + c1*load*omega + c2*wear*load
/// temp  = thermal_resistance * power
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPhysicsModel {
    pub vib_base: f64,
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
    pub power_base: f64,
    pub c1: f64,
    pub c2: f64,
    pub thermal_resistance: f64,
}

impl Default for FallbackPhysicsModel {
    fn default() -> Self {
        Self {
            vib_base: 0.5,
            k1: 0.001,
            k2: 0.002,
            k3: 3.0,
            k4: 0.005,
            power_base: 50.0,
            c1: 0.0001,
            c2: 0.5,
            thermal_resistance: 0.02,
        }
    }
}

impl FallbackPhysicsModel {
    pub fn expected(&self, omega: f64, load: f64, wear: f64) -> PhysicsExpectation {
        let vib_rms_expected = self.vib_base
            + self.k1 * omega
            + self.k2 * load
            + self.k3 * wear
            + self.k4 * wear * omega;
        let power_loss_expected = self.power_base + self.c1 * load * omega + self.c2 * wear * load;

        PhysicsExpectation {
            vib_rms_expected,
            power_loss_expected,
            temperature_rise_expected: self.thermal_resistance * power_loss_expected,
        }
    }
}

impl SimulationProvider for FallbackPhysicsModel {
    fn simulate(
        &self,
        _asset_id: &AssetId,
        omega: f64,
        load: f64,
        wear: f64,
    ) -> MonitorResult<PhysicsExpectation> {
        Ok(self.expected(omega, load, wear))
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

/// Relative deviation of a measurement from its expectation, capped at 1.
pub fn physics_residual(measured: f64, expected: f64) -> f64 {
    ((measured - expected).abs() / expected.max(MIN_EXPECTED_VIB)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_without_wear_matches_baseline() {
        let e = FallbackPhysicsModel::default().expected(100.0, 500.0, 0.0);
        assert!((e.vib_rms_expected - 1.6).abs() < 1e-12);
        // 50 + 0.0001 * 500 * 100
        assert!((e.power_loss_expected - 55.0).abs() < 1e-9);
        assert!((e.temperature_rise_expected - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_wear_raises_expectation() {
        let model = FallbackPhysicsModel::default();
        let fresh = model.expected(100.0, 500.0, 0.0);
        let worn = model.expected(100.0, 500.0, 0.5);

        // + 3.0 * 0.5 + 0.005 * 0.5 * 100
        assert!((worn.vib_rms_expected - fresh.vib_rms_expected - 1.75).abs() < 1e-9);
        // + 0.5 * 0.5 * 500
        assert!((worn.power_loss_expected - fresh.power_loss_expected - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_provider_delegates_to_model() {
        let model = FallbackPhysicsModel::default();
        let asset = AssetId::new("milling-01");
        let simulated = model.simulate(&asset, 120.0, 800.0, 0.1).unwrap();
        assert_eq!(simulated, model.expected(120.0, 800.0, 0.1));
        assert_eq!(model.name(), "fallback");
    }

    #[test]
    fn test_physics_residual() {
        assert_eq!(physics_residual(1.6, 1.6), 0.0);
        assert!((physics_residual(2.0, 1.6) - 0.25).abs() < 1e-9);
        assert_eq!(physics_residual(10.0, 1.6), 1.0);
        // Denominator floor
        assert!((physics_residual(0.05, 0.0) - 0.5).abs() < 1e-9);
    }
}
