use serde::{Deserialize, Serialize};

/// String inverter datasheet.
///
/// Voltages in V, currents in A, powers in kW (AC side). The default is a
/// 100 kW Q.VOLT commercial string inverter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Inverter {
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model designation.
    pub model: String,
    /// Absolute DC input voltage ceiling (V).
    pub max_input_voltage: f64,
    /// Lower bound of the MPPT window (V).
    pub min_mppt_voltage: f64,
    /// Upper bound of the MPPT window (V).
    pub max_mppt_voltage: f64,
    /// Voltage needed to start feeding in (V).
    pub startup_voltage: f64,
    /// Maximum input current per MPPT (A).
    pub max_input_current: f64,
    /// Maximum short-circuit current per MPPT (A).
    pub max_short_circuit_current: f64,
    /// Rated AC output power (kW).
    pub rated_output_power: f64,
    /// Maximum AC output power (kW).
    pub max_output_power: f64,
    /// Rated AC output voltage (V).
    pub rated_output_voltage: f64,
    /// Conversion efficiency (%).
    pub efficiency: f64,
    /// Number of MPPT channels.
    pub mppt_count: u32,
}

impl Default for Inverter {
    fn default() -> Self {
        Self {
            manufacturer: "Hanwha Q CELLS".to_string(),
            model: "Q.VOLT P100K".to_string(),
            max_input_voltage: 1100.0,
            min_mppt_voltage: 200.0,
            max_mppt_voltage: 1000.0,
            startup_voltage: 250.0,
            max_input_current: 26.0,
            max_short_circuit_current: 40.0,
            rated_output_power: 100.0,
            max_output_power: 110.0,
            rated_output_voltage: 380.0,
            efficiency: 98.7,
            mppt_count: 10,
        }
    }
}
