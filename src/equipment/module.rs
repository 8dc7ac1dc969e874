//! PV module datasheet values at standard test conditions (STC).

use serde::{Deserialize, Serialize};

/// Temperature coefficients in percent per °C.
///
/// Voltage coefficients are normally negative (voltage falls as the cell
/// heats up), the current coefficient slightly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TempCoefficients {
    /// Open-circuit voltage coefficient (%/°C).
    pub voc: f64,
    /// Maximum power coefficient (%/°C).
    pub pmax: f64,
    /// Short-circuit current coefficient (%/°C).
    pub isc: f64,
}

impl Default for TempCoefficients {
    fn default() -> Self {
        Self {
            voc: -0.26,
            pmax: -0.34,
            isc: 0.04,
        }
    }
}

/// PV module datasheet.
///
/// Reference data only: the engine reads it and never modifies it. The
/// default is a 585 W bifacial Q.PEAK DUO XL module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PvModule {
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model designation.
    pub model: String,
    /// Rated power at STC (W).
    pub pmax: f64,
    /// Open-circuit voltage (V).
    pub voc: f64,
    /// Short-circuit current (A).
    pub isc: f64,
    /// Voltage at maximum power (V).
    pub vmp: f64,
    /// Current at maximum power (A).
    pub imp: f64,
    /// Module efficiency (%).
    pub efficiency: f64,
    /// Temperature coefficients (%/°C).
    pub temp_coefficients: TempCoefficients,
    /// Module width (mm).
    pub width: f64,
    /// Module height (mm).
    pub height: f64,
    /// Module weight (kg).
    pub weight: f64,
}

impl Default for PvModule {
    fn default() -> Self {
        Self {
            manufacturer: "Hanwha Q CELLS".to_string(),
            model: "Q.PEAK DUO XL-G11.7 585".to_string(),
            pmax: 585.0,
            voc: 53.68,
            isc: 13.95,
            vmp: 44.88,
            imp: 13.04,
            efficiency: 21.7,
            temp_coefficients: TempCoefficients::default(),
            width: 1134.0,
            height: 2416.0,
            weight: 30.7,
        }
    }
}

impl PvModule {
    /// Module surface area in m².
    pub fn area_m2(&self) -> f64 {
        self.width * self.height / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_module_area() {
        let m = PvModule::default();
        assert!((m.area_m2() - 2.739_744).abs() < 1e-6);
    }

    #[test]
    fn partial_toml_keeps_default_coefficients() {
        let m: PvModule = toml::from_str("pmax = 600.0\n[temp_coefficients]\nvoc = -0.3\n")
            .expect("partial module should parse");
        assert_eq!(m.pmax, 600.0);
        assert_eq!(m.temp_coefficients.voc, -0.3);
        assert_eq!(m.temp_coefficients.pmax, -0.34);
        assert_eq!(m.vmp, 44.88);
    }
}
