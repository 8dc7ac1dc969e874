//! Distribution of parallel strings across inverters.

use serde::Serialize;

use crate::equipment::{Inverter, PvModule};

/// Inverters that carry the same number of strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InverterGroup {
    /// "High Load", "Normal Load", or "Balanced".
    pub label: &'static str,
    /// Inverter id range, e.g. `"Inv #1 ~ #3"`.
    pub id_range: String,
    pub inverter_count: u32,
    /// Strings per inverter.
    pub strings: u32,
    /// Modules per inverter.
    pub modules: u32,
    /// DC capacity per inverter (kW).
    pub dc_capacity_kw: f64,
    /// DC input current per inverter (A).
    pub input_current_a: f64,
    /// Per-inverter DC/AC ratio (%).
    pub dc_ac_ratio_pct: f64,
}

fn id_range(first: u32, last: u32) -> String {
    if first == last {
        format!("Inv #{first}")
    } else {
        format!("Inv #{first} ~ #{last}")
    }
}

/// Splits `parallel_strings` over `inverter_count` inverters as evenly as possible.
///
/// When the split is uneven, the first `parallel_strings % inverter_count`
/// inverters take one extra string. Idle inverters are listed as a "Normal
/// Load" group with zero strings, so the group counts always add up to
/// `inverter_count`. Returns no groups when either count is 0.
pub fn distribute_strings(
    parallel_strings: u32,
    series_modules: u32,
    inverter_count: u32,
    module: &PvModule,
    inverter: &Inverter,
) -> Vec<InverterGroup> {
    if inverter_count == 0 || parallel_strings == 0 {
        return Vec::new();
    }

    let base = parallel_strings / inverter_count;
    let remainder = parallel_strings % inverter_count;

    let group = |label, first, count, strings: u32| {
        let modules = strings * series_modules;
        let dc_capacity_kw = f64::from(modules) * module.pmax / 1000.0;
        let dc_ac_ratio_pct = if inverter.rated_output_power > 0.0 {
            dc_capacity_kw / inverter.rated_output_power * 100.0
        } else {
            0.0
        };
        InverterGroup {
            label,
            id_range: id_range(first, first + count - 1),
            inverter_count: count,
            strings,
            modules,
            dc_capacity_kw,
            input_current_a: f64::from(strings) * module.imp,
            dc_ac_ratio_pct,
        }
    };

    if remainder == 0 {
        return vec![group("Balanced", 1, inverter_count, base)];
    }

    let mut groups = vec![group("High Load", 1, remainder, base + 1)];
    let normal = inverter_count - remainder;
    if normal > 0 {
        groups.push(group("Normal Load", remainder + 1, normal, base));
    }
    groups
}
