//! Electrical safety predicates for a sized array.

use serde::Serialize;

use super::array::TempCorrectedVoltages;
use super::cable::voltage_drop;
use crate::config::SystemConfig;
use crate::equipment::{Inverter, PvModule};

/// Maximum permitted DC voltage drop relative to the string operating voltage (%).
pub const MAX_VOLTAGE_DROP_PCT: f64 = 3.0;

/// String voltages: series count times the module value (V).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StringVoltages {
    pub voc_winter: f64,
    pub vmp_summer: f64,
    pub voc_summer: f64,
    pub vmp_winter: f64,
    /// Series count times STC Vmp, the voltage-drop reference.
    pub operating: f64,
}

impl StringVoltages {
    pub fn new(series_modules: u32, module: &PvModule, v: &TempCorrectedVoltages) -> Self {
        let n = f64::from(series_modules);
        Self {
            voc_winter: v.voc_winter * n,
            vmp_summer: v.vmp_summer * n,
            voc_summer: v.voc_summer * n,
            vmp_winter: v.vmp_winter * n,
            operating: module.vmp * n,
        }
    }
}

/// Six independent predicates plus the computed voltage drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SafetyCheck {
    /// Winter string Voc below the inverter's max input voltage.
    pub voc_safe: bool,
    /// Summer string Vmp minus cable drop above the MPPT floor.
    pub vmp_min_safe: bool,
    /// Winter string Vmp below the MPPT ceiling.
    pub vmp_max_safe: bool,
    /// Module Isc below the inverter's max short-circuit current.
    pub current_safe: bool,
    /// Summer string Voc above the inverter startup voltage.
    pub startup_safe: bool,
    pub voltage_drop_safe: bool,
    /// DC cable voltage drop (V).
    pub voltage_drop_v: f64,
    /// DC cable voltage drop relative to the operating string voltage (%).
    pub voltage_drop_pct: f64,
}

impl SafetyCheck {
    /// Evaluates every predicate. Never fails; the result is advisory.
    pub fn evaluate(
        module: &PvModule,
        inverter: &Inverter,
        system: &SystemConfig,
        strings: &StringVoltages,
    ) -> Self {
        let drop_v = voltage_drop(
            module.imp,
            system.cable_length,
            system.cable_cross_section,
            system.cable_material,
            system.cable_temp,
        );
        let drop_pct = if strings.operating > 0.0 {
            drop_v / strings.operating * 100.0
        } else {
            0.0
        };

        Self {
            voc_safe: strings.voc_winter < inverter.max_input_voltage,
            vmp_min_safe: strings.vmp_summer - drop_v > inverter.min_mppt_voltage,
            vmp_max_safe: strings.vmp_winter < inverter.max_mppt_voltage,
            current_safe: module.isc < inverter.max_short_circuit_current,
            startup_safe: strings.voc_summer > inverter.startup_voltage,
            voltage_drop_safe: drop_pct < MAX_VOLTAGE_DROP_PCT,
            voltage_drop_v: drop_v,
            voltage_drop_pct: drop_pct,
        }
    }

    /// Returns `true` only if all six predicates hold.
    pub fn passed(&self) -> bool {
        self.failures().is_empty()
    }

    /// Names of the failing predicates, in evaluation order.
    pub fn failures(&self) -> Vec<&'static str> {
        [
            (self.voc_safe, "max input voltage"),
            (self.vmp_min_safe, "min MPPT voltage"),
            (self.vmp_max_safe, "max MPPT voltage"),
            (self.current_safe, "short-circuit current"),
            (self.startup_safe, "startup voltage"),
            (self.voltage_drop_safe, "voltage drop"),
        ]
        .into_iter()
        .filter_map(|(ok, name)| (!ok).then_some(name))
        .collect()
    }
}
