//! Engineering side of the design: temperature correction, cable losses,
//! string sizing, and the safety verdict.

pub mod array;
pub mod cable;
pub mod groups;
pub mod safety;
pub mod temperature;

use std::fmt;

use serde::Serialize;

pub use array::{ArrayConfiguration, TempCorrectedVoltages};
pub use groups::InverterGroup;
pub use safety::{SafetyCheck, StringVoltages};

use crate::config::SystemConfig;
use crate::equipment::{Inverter, PvModule};

/// Complete engineering result for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayDesign {
    pub array: ArrayConfiguration,
    pub safety: SafetyCheck,
    pub module_voltages: TempCorrectedVoltages,
    pub string_voltages: StringVoltages,
    pub max_series_by_voltage: u32,
    pub min_series_by_voltage: u32,
    pub inverter_count: u32,
    /// Installed DC over total rated AC capacity (ratio, not percent).
    pub dc_ac_ratio: f64,
    pub bifacial_gain_pct: f64,
    pub inverter_groups: Vec<InverterGroup>,
}

/// Sizes the array and evaluates its electrical safety.
///
/// Never fails. An infeasible design has `array.series_modules == 0`.
pub fn compute_array_design(
    module: &PvModule,
    inverter: &Inverter,
    system: &SystemConfig,
) -> ArrayDesign {
    let sizing = array::size_array(module, inverter, system);
    let string_voltages =
        StringVoltages::new(sizing.array.series_modules, module, &sizing.voltages);
    let safety = SafetyCheck::evaluate(module, inverter, system, &string_voltages);
    let inverter_groups = groups::distribute_strings(
        sizing.array.parallel_strings,
        sizing.array.series_modules,
        sizing.inverter_count,
        module,
        inverter,
    );

    ArrayDesign {
        array: sizing.array,
        safety,
        module_voltages: sizing.voltages,
        string_voltages,
        max_series_by_voltage: sizing.max_series_by_voltage,
        min_series_by_voltage: sizing.min_series_by_voltage,
        inverter_count: sizing.inverter_count,
        dc_ac_ratio: sizing.dc_ac_ratio,
        bifacial_gain_pct: sizing.bifacial_gain_pct,
        inverter_groups,
    }
}

fn verdict(ok: bool) -> &'static str {
    if ok { "OK" } else { "FAIL" }
}

impl fmt::Display for ArrayDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Array Design ---")?;
        if !self.array.is_feasible() {
            return write!(
                f,
                "No feasible configuration: max {} in series by input voltage, \
                 min {} needed for MPPT",
                self.max_series_by_voltage, self.min_series_by_voltage
            );
        }
        let a = &self.array;
        writeln!(f, "Series modules:        {}", a.series_modules)?;
        writeln!(f, "Parallel strings:      {}", a.parallel_strings)?;
        writeln!(f, "Total modules:         {}", a.total_modules)?;
        writeln!(f, "DC capacity:           {:.2} kW", a.total_dc_capacity_kw)?;
        writeln!(f, "Bifacial gain:         {:.2}%", self.bifacial_gain_pct)?;
        writeln!(f, "Inverters:             {}", self.inverter_count)?;
        writeln!(f, "DC/AC ratio:           {:.3}", self.dc_ac_ratio)?;
        for g in &self.inverter_groups {
            writeln!(
                f,
                "  {} ({}): {} strings, {:.2} kW, {:.1} A, {:.1}%",
                g.label, g.id_range, g.strings, g.dc_capacity_kw, g.input_current_a, g.dc_ac_ratio_pct
            )?;
        }

        let s = &self.safety;
        let v = &self.string_voltages;
        writeln!(f, "--- Safety Check ---")?;
        writeln!(f, "Voc winter string:     {:.1} V [{}]", v.voc_winter, verdict(s.voc_safe))?;
        writeln!(f, "Vmp summer string:     {:.1} V [{}]", v.vmp_summer, verdict(s.vmp_min_safe))?;
        writeln!(f, "Vmp winter string:     {:.1} V [{}]", v.vmp_winter, verdict(s.vmp_max_safe))?;
        writeln!(f, "Short-circuit current: [{}]", verdict(s.current_safe))?;
        writeln!(f, "Voc summer string:     {:.1} V [{}]", v.voc_summer, verdict(s.startup_safe))?;
        writeln!(
            f,
            "Voltage drop:          {:.2}% [{}]",
            s.voltage_drop_pct,
            verdict(s.voltage_drop_safe)
        )?;
        write!(f, "Safety: {}", if s.passed() { "PASS" } else { "FAIL" })
    }
}
