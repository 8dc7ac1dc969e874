//! String sizing: series and parallel module counts, inverter count, DC/AC ratio.

use serde::Serialize;

use super::temperature::corrected_voltage;
use crate::config::{BifacialGain, SystemConfig};
use crate::equipment::{Inverter, PvModule};

/// Upper bound of the mounting-height factor in the albedo gain model.
const MAX_HEIGHT_FACTOR: f64 = 1.2;
/// Share of rear-side irradiance converted by a typical bifacial cell.
const BIFACIALITY: f64 = 0.7;

/// Module voltages corrected to the site temperature extremes (V).
///
/// Vmp is corrected with the Voc coefficient since datasheets carry none for Vmp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TempCorrectedVoltages {
    pub voc_winter: f64,
    pub voc_summer: f64,
    pub vmp_summer: f64,
    pub vmp_winter: f64,
}

impl TempCorrectedVoltages {
    /// Corrects the module's STC voltages to the winter and summer extremes.
    pub fn for_site(module: &PvModule, system: &SystemConfig) -> Self {
        let coeff = module.temp_coefficients.voc;
        let winter = system.ambient_temp_winter;
        let summer = system.ambient_temp_summer;
        Self {
            voc_winter: corrected_voltage(module.voc, coeff, winter),
            voc_summer: corrected_voltage(module.voc, coeff, summer),
            vmp_summer: corrected_voltage(module.vmp, coeff, summer),
            vmp_winter: corrected_voltage(module.vmp, coeff, winter),
        }
    }
}

/// Optimizer output. `series_modules == 0` means no feasible configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ArrayConfiguration {
    pub series_modules: u32,
    pub parallel_strings: u32,
    pub total_modules: u32,
    /// Installed DC capacity including bifacial gain (kW).
    pub total_dc_capacity_kw: f64,
}

impl ArrayConfiguration {
    /// Returns `true` if a string length satisfying both voltage bounds exists.
    pub fn is_feasible(&self) -> bool {
        self.series_modules > 0
    }
}

/// Result of the sizing step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    pub voltages: TempCorrectedVoltages,
    pub max_series_by_voltage: u32,
    pub min_series_by_voltage: u32,
    pub array: ArrayConfiguration,
    pub inverter_count: u32,
    pub bifacial_gain_pct: f64,
    pub dc_ac_ratio: f64,
}

/// Bifacial gain in percent.
///
/// The albedo model yields `albedo × 100 × min(1.2, 0.5 + h/2) × 0.7`,
/// rounded to two decimals.
pub fn bifacial_gain_pct(gain: &BifacialGain) -> f64 {
    match *gain {
        BifacialGain::None => 0.0,
        BifacialGain::Direct { gain_pct } => gain_pct,
        BifacialGain::Albedo {
            albedo,
            mounting_height,
        } => {
            let height_factor = (0.5 + mounting_height / 2.0).min(MAX_HEIGHT_FACTOR);
            round2(albedo * 100.0 * height_factor * BIFACIALITY)
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// `floor(numerator / denominator)` as a count, 0 for a non-positive denominator.
fn floor_count(numerator: f64, denominator: f64) -> u32 {
    if denominator > 0.0 {
        (numerator / denominator).floor().max(0.0) as u32
    } else {
        0
    }
}

/// `ceil(numerator / denominator)` as a count, 0 for a non-positive denominator.
fn ceil_count(numerator: f64, denominator: f64) -> u32 {
    if denominator > 0.0 {
        (numerator / denominator).ceil().max(0.0) as u32
    } else {
        0
    }
}

/// Sizes the array for the target capacity.
///
/// The longest string that stays under the inverter's absolute voltage on
/// the coldest day is chosen, provided it still clears the MPPT floor on the
/// hottest day. Otherwise the configuration is infeasible and every count
/// except the inverter count is zero.
///
/// # Arguments
///
/// * `module` - Module datasheet
/// * `inverter` - Inverter datasheet
/// * `system` - Target capacity, site temperatures, and bifacial model
///
/// # Returns
///
/// The sizing result. Never fails; check `array.is_feasible()`.
pub fn size_array(module: &PvModule, inverter: &Inverter, system: &SystemConfig) -> Sizing {
    let voltages = TempCorrectedVoltages::for_site(module, system);
    tracing::debug!(
        voc_winter = voltages.voc_winter,
        vmp_summer = voltages.vmp_summer,
        "temperature corrected module voltages"
    );

    let max_series = floor_count(inverter.max_input_voltage, voltages.voc_winter);
    let min_series = ceil_count(inverter.min_mppt_voltage, voltages.vmp_summer);
    let series_modules = if max_series < min_series { 0 } else { max_series };

    let modules_needed = ceil_count(system.target_capacity * 1000.0, module.pmax);
    let parallel_strings = if series_modules > 0 {
        modules_needed.div_ceil(series_modules)
    } else {
        0
    };
    let total_modules = series_modules * parallel_strings;

    let inverter_count = ceil_count(system.target_capacity, inverter.rated_output_power);
    let bifacial_gain_pct = bifacial_gain_pct(&system.bifacial);
    let total_dc_capacity_kw =
        f64::from(total_modules) * module.pmax / 1000.0 * (1.0 + bifacial_gain_pct / 100.0);

    let ac_capacity_kw = f64::from(inverter_count) * inverter.rated_output_power;
    let dc_ac_ratio = if ac_capacity_kw > 0.0 {
        total_dc_capacity_kw / ac_capacity_kw
    } else {
        0.0
    };

    if series_modules == 0 {
        tracing::warn!(
            max_series,
            min_series,
            "no string length satisfies both the input voltage and MPPT bounds"
        );
    }

    Sizing {
        voltages,
        max_series_by_voltage: max_series,
        min_series_by_voltage: min_series,
        array: ArrayConfiguration {
            series_modules,
            parallel_strings,
            total_modules,
            total_dc_capacity_kw,
        },
        inverter_count,
        bifacial_gain_pct,
        dc_ac_ratio,
    }
}
