//! DC cable voltage drop with material and temperature corrected resistivity.

use serde::{Deserialize, Serialize};

/// Temperature coefficient of conductor resistance (1/°C).
pub const RESISTANCE_TEMP_COEFF: f64 = 0.00393;

/// Temperature at which base resistivities are quoted (°C).
const RESISTIVITY_REF_TEMP_C: f64 = 20.0;

/// Default conductor operating temperature (°C).
pub const DEFAULT_CABLE_TEMP_C: f64 = 70.0;

/// Conductor material of the DC string cable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CableMaterial {
    #[default]
    Copper,
    Aluminum,
}

impl CableMaterial {
    /// Resistivity at 20 °C (Ω·mm²/m).
    pub fn base_resistivity(self) -> f64 {
        match self {
            Self::Copper => 0.0172,
            Self::Aluminum => 0.0282,
        }
    }

    /// Resistivity corrected to `temp_c` (Ω·mm²/m).
    pub fn resistivity_at(self, temp_c: f64) -> f64 {
        self.base_resistivity() * (1.0 + RESISTANCE_TEMP_COEFF * (temp_c - RESISTIVITY_REF_TEMP_C))
    }
}

/// Voltage drop (V) over a DC circuit of one-way length `length_m`.
///
/// The factor 2 accounts for the return conductor. A cross-section of zero
/// or less means no cable was selected and yields 0.
pub fn voltage_drop(
    current_a: f64,
    length_m: f64,
    cross_section_mm2: f64,
    material: CableMaterial,
    temp_c: f64,
) -> f64 {
    if cross_section_mm2 <= 0.0 {
        return 0.0;
    }
    2.0 * length_m * current_a * material.resistivity_at(temp_c) / cross_section_mm2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cross_section_yields_zero() {
        assert_eq!(voltage_drop(10.0, 100.0, 0.0, CableMaterial::Copper, 70.0), 0.0);
        assert_eq!(voltage_drop(10.0, 100.0, -4.0, CableMaterial::Aluminum, 70.0), 0.0);
    }

    #[test]
    fn aluminum_drops_more_than_copper() {
        let cu = voltage_drop(10.0, 50.0, 4.0, CableMaterial::Copper, 70.0);
        let al = voltage_drop(10.0, 50.0, 4.0, CableMaterial::Aluminum, 70.0);
        assert!(al > cu);
    }

    #[test]
    fn hot_cable_drops_more() {
        let hot = voltage_drop(10.0, 50.0, 4.0, CableMaterial::Copper, 70.0);
        let cold = voltage_drop(10.0, 50.0, 4.0, CableMaterial::Copper, 20.0);
        assert!(hot > cold);
        // At the reference temperature only the base resistivity applies.
        assert!((cold - 2.0 * 50.0 * 10.0 * 0.0172 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn material_parses_lowercase() {
        let m: CableMaterial = serde_json::from_str("\"aluminum\"").expect("should parse");
        assert_eq!(m, CableMaterial::Aluminum);
    }
}
