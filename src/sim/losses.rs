//! Loss waterfall: itemized system losses compounded into a performance ratio.

use serde::{Deserialize, Serialize};

/// Itemized loss factors (%). `inverter_efficiency` is an efficiency, not a loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LossFactors {
    pub soiling: f64,
    pub shading: f64,
    /// Incidence angle modifier loss.
    pub iam: f64,
    pub mismatch: f64,
    /// Light-induced degradation.
    pub lid: f64,
    pub dc_wiring: f64,
    pub ac_wiring: f64,
    pub inverter_efficiency: f64,
    pub availability: f64,
}

impl Default for LossFactors {
    fn default() -> Self {
        Self {
            soiling: 2.0,
            shading: 1.0,
            iam: 2.0,
            mismatch: 1.5,
            lid: 1.0,
            dc_wiring: 1.5,
            ac_wiring: 0.8,
            inverter_efficiency: 98.7,
            availability: 0.5,
        }
    }
}

/// One bar of the waterfall chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossStep {
    pub label: &'static str,
    /// Percentage points removed by this step (0 for the first and last bars).
    pub loss: f64,
    /// Remaining performance after this step (%).
    pub value: f64,
}

/// Ordered waterfall from "Nominal" (100 %) to "Final PR".
///
/// Each loss is taken from the value left by the previous step, so losses
/// compound multiplicatively.
pub fn loss_waterfall(f: &LossFactors) -> Vec<LossStep> {
    let ordered = [
        ("Soiling", f.soiling),
        ("Shading", f.shading),
        ("IAM", f.iam),
        ("Mismatch", f.mismatch),
        ("LID", f.lid),
        ("DC Wiring", f.dc_wiring),
        ("Inverter", 100.0 - f.inverter_efficiency),
        ("AC Wiring", f.ac_wiring),
        ("Availability", f.availability),
    ];

    let mut current = 100.0;
    let mut steps = Vec::with_capacity(ordered.len() + 2);
    steps.push(LossStep {
        label: "Nominal",
        loss: 0.0,
        value: current,
    });
    for (label, pct) in ordered {
        let loss = current * pct / 100.0;
        current -= loss;
        steps.push(LossStep {
            label,
            loss,
            value: current,
        });
    }
    steps.push(LossStep {
        label: "Final PR",
        loss: 0.0,
        value: current,
    });
    steps
}

/// Final performance ratio of the waterfall (%).
pub fn waterfall_pr(f: &LossFactors) -> f64 {
    loss_waterfall(f).last().map_or(100.0, |s| s.value)
}
