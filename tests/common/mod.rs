//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use pv_designer::config::{BifacialGain, EconomicConfig, ProjectConfig, SystemConfig};
use pv_designer::equipment::{Inverter, PvModule};
use pv_designer::sim::generation::DAYS_IN_MONTH;
use pv_designer::weather::IrradianceRecord;

/// 585 W module with a −0.26 %/°C Voc coefficient.
pub fn default_module() -> PvModule {
    PvModule::default()
}

/// 100 kW inverter, 1100 V max input, 200–1000 V MPPT window.
pub fn default_inverter() -> Inverter {
    Inverter::default()
}

/// 500 kW target at −10 °C / 70 °C without bifacial gain.
pub fn monofacial_system() -> SystemConfig {
    SystemConfig {
        bifacial: BifacialGain::None,
        ..SystemConfig::default()
    }
}

/// Baseline economics with no tax, inflation, or degradation.
pub fn simple_economics() -> EconomicConfig {
    EconomicConfig {
        annual_degradation: 0.0,
        inflation_rate: 0.0,
        corporate_tax_rate: 0.0,
        ..EconomicConfig::default()
    }
}

/// Baseline project.
pub fn baseline_project() -> ProjectConfig {
    ProjectConfig::baseline()
}

/// Full year of hourly records with a clear-sky-like daily shape.
///
/// GHI peaks at `peak_w_m2` at noon and is zero outside 6:00–18:00.
pub fn tmy_year(peak_w_m2: f64) -> Vec<IrradianceRecord> {
    let mut records = Vec::with_capacity(8760);
    for (m, days) in DAYS_IN_MONTH.iter().enumerate() {
        for day in 1..=*days {
            for hour in 0..24_u32 {
                let x = (f64::from(hour) - 6.0) / 12.0;
                let ghi = if (0.0..=1.0).contains(&x) {
                    peak_w_m2 * (x * std::f64::consts::PI).sin()
                } else {
                    0.0
                };
                records.push(IrradianceRecord {
                    year: 2021,
                    month: m as u32 + 1,
                    day,
                    hour,
                    ghi,
                    ..IrradianceRecord::default()
                });
            }
        }
    }
    records
}
