//! Project configuration: TOML scenario files, JSON interchange, presets.
//!
//! Every section and every field carries a default, so partial documents
//! are filled in from the baseline project rather than rejected.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::design::cable::{CableMaterial, DEFAULT_CABLE_TEMP_C};
use crate::equipment::{Inverter, PvModule};
use crate::sim::bess::BessConfig;
use crate::sim::generation::GenerationMode;
use crate::sim::losses::LossFactors;
use crate::weather::IrradianceRecord;

/// Default monthly mean daily insolation (h/day), January to December.
pub const DEFAULT_MONTHLY_INSOLATION: [f64; 12] =
    [2.8, 3.2, 3.8, 4.2, 4.5, 4.2, 3.5, 3.8, 3.6, 3.5, 2.9, 2.7];

/// Complete input snapshot of one design run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// PV module datasheet.
    #[serde(default)]
    pub module: PvModule,
    /// Inverter datasheet.
    #[serde(default)]
    pub inverter: Inverter,
    /// Site and array design parameters.
    #[serde(default, alias = "config")]
    pub system: SystemConfig,
    /// Financial model parameters.
    #[serde(default, alias = "economicConfig")]
    pub economic: EconomicConfig,
}

/// How the rear-side gain of bifacial modules is obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum BifacialGain {
    /// Monofacial modules.
    None,
    /// Gain entered directly (%).
    Direct { gain_pct: f64 },
    /// Gain derived from ground albedo and mounting height (m).
    Albedo {
        albedo: f64,
        #[serde(default = "default_mounting_height")]
        mounting_height: f64,
    },
}

fn default_mounting_height() -> f64 {
    1.0
}

impl Default for BifacialGain {
    fn default() -> Self {
        Self::Albedo {
            albedo: 0.2,
            mounting_height: default_mounting_height(),
        }
    }
}

/// Site and array design parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Target DC capacity (kW).
    pub target_capacity: f64,
    /// One-way DC string cable length (m).
    pub cable_length: f64,
    /// DC cable cross-section (mm²).
    pub cable_cross_section: f64,
    /// DC cable conductor material.
    pub cable_material: CableMaterial,
    /// DC cable operating temperature (°C).
    pub cable_temp: f64,
    /// Coldest expected ambient temperature (°C).
    pub ambient_temp_winter: f64,
    /// Hottest expected module temperature (°C).
    pub ambient_temp_summer: f64,
    /// Bifacial gain model.
    pub bifacial: BifacialGain,
    /// Battery storage attached to the plant.
    pub bess: BessConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            target_capacity: 500.0,
            cable_length: 50.0,
            cable_cross_section: 6.0,
            cable_material: CableMaterial::Copper,
            cable_temp: DEFAULT_CABLE_TEMP_C,
            ambient_temp_winter: -10.0,
            ambient_temp_summer: 70.0,
            bifacial: BifacialGain::default(),
            bess: BessConfig::default(),
        }
    }
}

/// Financial model parameters. Rates and ratios are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicConfig {
    /// Generation profile precision.
    pub analysis_mode: GenerationMode,
    /// Mean daily peak-sun hours for the flat mode (h/day).
    pub daily_insolation: f64,
    /// Mean daily peak-sun hours per month for the monthly mode (h/day).
    pub monthly_insolation: Vec<f64>,
    /// Declared performance ratio used for yield (%).
    pub system_efficiency: f64,
    /// Itemized losses feeding the loss waterfall.
    pub loss_factors: LossFactors,
    /// Generation lost to inverter clipping (%).
    pub clipping_loss: f64,
    /// Linear annual module degradation (%/year).
    pub annual_degradation: f64,
    /// System marginal price (currency/kWh).
    pub smp: f64,
    /// Renewable energy certificate price (currency/MWh-certificate).
    pub rec_price: f64,
    /// REC weight multiplier.
    pub rec_weight: f64,
    /// Sell under a fixed PPA instead of SMP + REC.
    pub ppa_enabled: bool,
    /// PPA rate in year 1 (currency/kWh).
    pub ppa_rate: f64,
    /// PPA annual escalation (%).
    pub ppa_escalation: f64,
    /// Investment tax credit on construction cost (%).
    pub itc_percent: f64,
    /// NPV discount rate (%). `None` falls back to the loan rate, then 4.5 %.
    pub discount_rate: Option<f64>,
    /// Construction cost (currency/kW).
    pub installation_cost_per_kw: f64,
    /// Annual O&M cost in year 1 (currency/kW).
    pub maintenance_cost_per_kw: f64,
    /// Annual land lease in year 1 (currency/kW).
    pub lease_cost_per_kw: f64,
    /// Annual cost inflation (%).
    pub inflation_rate: f64,
    /// Share of the construction cost paid from equity (%).
    pub equity_percent: f64,
    /// Loan interest rate (%).
    pub loan_interest_rate: f64,
    /// Loan term including the grace period (years).
    pub loan_term: u32,
    /// Interest-only years at the start of the loan.
    pub loan_grace_period: u32,
    /// Corporate tax rate (%).
    pub corporate_tax_rate: f64,
    /// Straight-line depreciation period (years).
    pub depreciation_period: u32,
    /// Hourly irradiance records for the hourly mode. Never persisted.
    #[serde(skip)]
    pub weather: Vec<IrradianceRecord>,
}

impl Default for EconomicConfig {
    fn default() -> Self {
        Self {
            analysis_mode: GenerationMode::Flat,
            daily_insolation: 3.51,
            monthly_insolation: DEFAULT_MONTHLY_INSOLATION.to_vec(),
            system_efficiency: 80.0,
            loss_factors: LossFactors::default(),
            clipping_loss: 0.0,
            annual_degradation: 0.33,
            smp: 130.0,
            rec_price: 60_000.0,
            rec_weight: 1.0,
            ppa_enabled: false,
            ppa_rate: 150.0,
            ppa_escalation: 1.0,
            itc_percent: 0.0,
            discount_rate: Some(4.5),
            installation_cost_per_kw: 1_200_000.0,
            maintenance_cost_per_kw: 25_000.0,
            lease_cost_per_kw: 40_000.0,
            inflation_rate: 2.5,
            equity_percent: 20.0,
            loan_interest_rate: 1.75,
            loan_term: 15,
            loan_grace_period: 5,
            corporate_tax_rate: 10.0,
            depreciation_period: 20,
            weather: Vec::new(),
        }
    }
}

impl EconomicConfig {
    /// Returns a copy with `records` attached for the hourly mode.
    pub fn with_weather(mut self, records: Vec<IrradianceRecord>) -> Self {
        self.weather = records;
        self
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"economic.loan_term"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ProjectConfig {
    /// Returns the baseline project: 500 kW target, flat insolation, 80 % debt.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the baseline project analysed with monthly insolation values.
    pub fn monthly() -> Self {
        Self {
            economic: EconomicConfig {
                analysis_mode: GenerationMode::Monthly,
                ..EconomicConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns a PPA-financed project with a 30 % investment tax credit.
    pub fn ppa_itc() -> Self {
        Self {
            system: SystemConfig {
                target_capacity: 1000.0,
                bifacial: BifacialGain::Direct { gain_pct: 5.0 },
                ..SystemConfig::default()
            },
            economic: EconomicConfig {
                ppa_enabled: true,
                ppa_rate: 150.0,
                ppa_escalation: 1.0,
                itc_percent: 30.0,
                equity_percent: 30.0,
                loan_interest_rate: 4.0,
                loan_term: 12,
                loan_grace_period: 2,
                corporate_tax_rate: 20.0,
                ..EconomicConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "monthly", "ppa_itc"];

    /// Loads a project from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "monthly" => Ok(Self::monthly()),
            "ppa_itc" => Ok(Self::ppa_itc()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a project from a TOML scenario file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a project from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parses a project from a saved JSON document.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the JSON is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file(path)?;
        Self::from_json_str(&content)
    }

    /// Parses a JSON document, filling absent fields from the defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the JSON is invalid or contains unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Self::default().merge_json(s)
    }

    /// Serializes the project as a pretty-printed JSON document.
    ///
    /// Weather records are not included.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::new("json", e.to_string()))
    }

    /// Writes the project to `path` as JSON.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if serialization or the write fails.
    pub fn save_json_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|e| {
            ConfigError::new("config", format!("cannot write \"{}\": {e}", path.display()))
        })
    }

    /// Merges a partial JSON document onto this project.
    ///
    /// Objects merge key by key at every depth; any other value in the
    /// document replaces the current one. Weather records are carried over.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the document is not valid JSON or the merged
    /// result does not deserialize.
    pub fn merge_json(&self, doc: &str) -> Result<Self, ConfigError> {
        let patch: Value =
            serde_json::from_str(doc).map_err(|e| ConfigError::new("json", e.to_string()))?;
        let mut base =
            serde_json::to_value(self).map_err(|e| ConfigError::new("json", e.to_string()))?;
        merge_values(&mut base, normalize_interchange(patch));

        let mut merged: Self =
            serde_json::from_value(base).map_err(|e| ConfigError::new("json", e.to_string()))?;
        merged.economic.weather = self.economic.weather.clone();
        Ok(merged)
    }

    /// Validates the caller-level preconditions of the design pipeline.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let m = &self.module;
        if m.pmax <= 0.0 {
            errors.push(ConfigError::new("module.pmax", "must be > 0"));
        }
        for (field, value) in [
            ("module.width", m.width),
            ("module.height", m.height),
            ("module.weight", m.weight),
        ] {
            if value < 0.0 {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        if self.inverter.rated_output_power <= 0.0 {
            errors.push(ConfigError::new("inverter.rated_output_power", "must be > 0"));
        }
        if self.inverter.min_mppt_voltage > self.inverter.max_mppt_voltage {
            errors.push(ConfigError::new(
                "inverter.min_mppt_voltage",
                "must be <= inverter.max_mppt_voltage",
            ));
        }

        let s = &self.system;
        if s.target_capacity <= 0.0 {
            errors.push(ConfigError::new("system.target_capacity", "must be > 0"));
        }
        for (field, value) in [
            ("system.cable_length", s.cable_length),
            ("system.cable_cross_section", s.cable_cross_section),
        ] {
            if value < 0.0 {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }
        if let BifacialGain::Albedo {
            albedo,
            mounting_height,
        } = s.bifacial
        {
            if !(0.0..=1.0).contains(&albedo) {
                errors.push(ConfigError::new("system.bifacial.albedo", "must be in [0.0, 1.0]"));
            }
            if mounting_height < 0.0 {
                errors.push(ConfigError::new("system.bifacial.mounting_height", "must be >= 0"));
            }
        }

        let e = &self.economic;
        if e.equity_percent < 100.0 && e.loan_term <= e.loan_grace_period {
            errors.push(ConfigError::new(
                "economic.loan_term",
                "must be > economic.loan_grace_period when part of the cost is financed",
            ));
        }
        if !(0.0..=100.0).contains(&e.equity_percent) {
            errors.push(ConfigError::new("economic.equity_percent", "must be in [0, 100]"));
        }
        if e.analysis_mode == GenerationMode::Monthly && e.monthly_insolation.len() != 12 {
            errors.push(ConfigError::new(
                "economic.monthly_insolation",
                format!("must have 12 values, got {}", e.monthly_insolation.len()),
            ));
        }

        errors
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| {
        ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
    })
}

/// Interchange keys with no counterpart in the project model.
const IGNORED_KEYS: &[&str] = &["name", "image_url", "vat_included", "tmy_data"];

/// Interchange keys whose snake_case form differs from the field name.
const RENAMED_KEYS: &[(&str, &str)] = &[
    ("start_up_voltage", "startup_voltage"),
    ("iam_loss", "iam"),
];

/// Rewrites a camelCase interchange document into the project layout.
///
/// Keys become snake_case at every depth. The `config` and `economicConfig`
/// sections are renamed so that they merge onto the existing sections
/// instead of replacing them, economic storage settings move to the system
/// section, and the flat bifacial fields fold into one gain model.
fn normalize_interchange(patch: Value) -> Value {
    let mut patch = snake_case_keys(patch);
    if let Value::Object(map) = &mut patch {
        normalize_sections(map);
    }
    patch
}

fn normalize_sections(map: &mut Map<String, Value>) {
    for (alias, canonical) in [("config", "system"), ("economic_config", "economic")] {
        if let Some(v) = map.remove(alias) {
            map.entry(canonical).or_insert(v);
        }
    }

    if let Some(Value::Object(economic)) = map.get_mut("economic") {
        if let Some(Value::Object(losses)) = economic.get_mut("loss_factors") {
            losses.remove("system_efficiency");
        }
    }
    let economic_bess = map
        .get_mut("economic")
        .and_then(Value::as_object_mut)
        .and_then(|e| e.remove("bess"));
    if let Some(bess) = economic_bess {
        if let Value::Object(system) = map
            .entry("system")
            .or_insert_with(|| Value::Object(Map::new()))
        {
            system.entry("bess").or_insert(bess);
        }
    }

    if let Some(Value::Object(system)) = map.get_mut("system") {
        fold_bifacial(system);
    }
}

/// Folds `bifacial_gain`, `albedo` and `mounting_height` into `bifacial`.
/// An albedo takes precedence over a direct gain.
fn fold_bifacial(system: &mut Map<String, Value>) {
    let gain = system.remove("bifacial_gain");
    let albedo = system.remove("albedo");
    let height = system.remove("mounting_height");

    let mut model = Map::new();
    if let Some(albedo) = albedo {
        model.insert("model".to_string(), Value::from("albedo"));
        model.insert("albedo".to_string(), albedo);
    } else if let Some(gain) = gain {
        if gain.as_f64().is_some_and(|g| g > 0.0) {
            model.insert("model".to_string(), Value::from("direct"));
            model.insert("gain_pct".to_string(), gain);
        } else {
            model.insert("model".to_string(), Value::from("none"));
        }
    }
    if let Some(height) = height {
        model.insert("mounting_height".to_string(), height);
    }
    if !model.is_empty() {
        system.entry("bifacial").or_insert(Value::Object(model));
    }
}

fn snake_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter_map(|(key, v)| {
                    let key = to_snake_case(&key);
                    if IGNORED_KEYS.contains(&key.as_str()) {
                        return None;
                    }
                    let key = RENAMED_KEYS
                        .iter()
                        .find(|(from, _)| *from == key)
                        .map_or(key, |(_, to)| (*to).to_string());
                    Some((key, snake_case_keys(v)))
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(snake_case_keys).collect()),
        other => other,
    }
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn merge_values(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ProjectConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ProjectConfig::PRESETS {
            let cfg = ProjectConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ProjectConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[system]
target_capacity = 250.0

[economic]
smp = 150.0
"#;
        let cfg = ProjectConfig::from_toml_str(toml).expect("partial TOML should parse");
        assert_eq!(cfg.system.target_capacity, 250.0);
        assert_eq!(cfg.system.cable_length, 50.0);
        assert_eq!(cfg.economic.smp, 150.0);
        assert_eq!(cfg.economic.loan_term, 15);
        assert_eq!(cfg.module.pmax, 585.0);
    }

    #[test]
    fn toml_bifacial_variants() {
        let toml = r#"
[system.bifacial]
model = "direct"
gain_pct = 7.5
"#;
        let cfg = ProjectConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(cfg.system.bifacial, BifacialGain::Direct { gain_pct: 7.5 });

        let toml = "[system.bifacial]\nmodel = \"albedo\"\nalbedo = 0.3\n";
        let cfg = ProjectConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(
            cfg.system.bifacial,
            BifacialGain::Albedo {
                albedo: 0.3,
                mounting_height: 1.0
            }
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = "[economic]\nbogus_field = true\n";
        assert!(ProjectConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn json_round_trip_preserves_settings() {
        let cfg = ProjectConfig::ppa_itc();
        let json = cfg.to_json_string().expect("should serialize");
        let back = ProjectConfig::from_json_str(&json).expect("should parse");
        assert_eq!(back, cfg);
    }

    #[test]
    fn merge_json_keeps_existing_values() {
        let mut current = ProjectConfig::baseline();
        current.system.target_capacity = 800.0;
        current.economic.smp = 99.0;

        let merged = current
            .merge_json(r#"{"economic": {"loan_term": 10}}"#)
            .expect("merge should succeed");
        assert_eq!(merged.economic.loan_term, 10);
        assert_eq!(merged.economic.smp, 99.0);
        assert_eq!(merged.system.target_capacity, 800.0);
        // the source is untouched
        assert_eq!(current.economic.loan_term, 15);
    }

    #[test]
    fn merge_json_accepts_interchange_aliases() {
        let merged = ProjectConfig::baseline()
            .merge_json(r#"{"config": {"target_capacity": 120.0}, "economicConfig": {"smp": 140.0}}"#)
            .expect("aliases should merge");
        assert_eq!(merged.system.target_capacity, 120.0);
        assert_eq!(merged.system.cable_length, 50.0);
        assert_eq!(merged.economic.smp, 140.0);
    }

    #[test]
    fn merge_json_accepts_camel_case_documents() {
        let doc = r#"{
            "module": {"pmax": 600, "tempCoefficients": {"voc": -0.25}, "imageUrl": "x.png"},
            "inverter": {"maxInputVoltage": 1500, "startUpVoltage": 300},
            "config": {"name": "site A", "targetCapacity": 300, "cableLength": 80,
                       "cableMaterial": "aluminum", "albedo": 0.3, "mountingHeight": 1.5,
                       "bifacialGain": 8},
            "economicConfig": {"analysisMode": "basic", "recPrice": 70000, "loanTerm": 10,
                               "vatIncluded": false, "lossFactors": {"iamLoss": 2.5},
                               "bess": {"enabled": true, "capacityKwh": 100, "powerKw": 50}}
        }"#;
        let merged = ProjectConfig::baseline()
            .merge_json(doc)
            .expect("camelCase document should merge");
        assert_eq!(merged.module.pmax, 600.0);
        assert_eq!(merged.module.temp_coefficients.voc, -0.25);
        assert_eq!(merged.inverter.max_input_voltage, 1500.0);
        assert_eq!(merged.inverter.startup_voltage, 300.0);
        assert_eq!(merged.system.target_capacity, 300.0);
        assert_eq!(merged.system.cable_length, 80.0);
        assert_eq!(merged.system.cable_material, CableMaterial::Aluminum);
        assert_eq!(
            merged.system.bifacial,
            BifacialGain::Albedo {
                albedo: 0.3,
                mounting_height: 1.5
            }
        );
        assert_eq!(merged.economic.analysis_mode, GenerationMode::Flat);
        assert_eq!(merged.economic.rec_price, 70_000.0);
        assert_eq!(merged.economic.loan_term, 10);
        assert_eq!(merged.economic.loss_factors.iam, 2.5);
        assert!(merged.system.bess.is_active());
        assert_eq!(merged.system.bess.power_kw, 50.0);
    }

    #[test]
    fn merge_json_direct_bifacial_gain_and_detailed_mode() {
        let merged = ProjectConfig::baseline()
            .merge_json(r#"{"config": {"bifacialGain": 6}, "economicConfig": {"analysisMode": "detailed"}}"#)
            .expect("should merge");
        assert_eq!(merged.system.bifacial, BifacialGain::Direct { gain_pct: 6.0 });
        assert_eq!(merged.economic.analysis_mode, GenerationMode::Hourly);

        let merged = ProjectConfig::baseline()
            .merge_json(r#"{"config": {"bifacialGain": 0}}"#)
            .expect("should merge");
        assert_eq!(merged.system.bifacial, BifacialGain::None);
    }

    #[test]
    fn merge_json_still_rejects_unknown_camel_case_fields() {
        let err = ProjectConfig::baseline().merge_json(r#"{"config": {"targetCapacityy": 1}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn merge_json_null_discount_rate_enables_fallback() {
        let merged = ProjectConfig::baseline()
            .merge_json(r#"{"economic": {"discount_rate": null}}"#)
            .expect("merge should succeed");
        assert_eq!(merged.economic.discount_rate, None);
    }

    #[test]
    fn merge_json_carries_weather_over() {
        let mut cfg = ProjectConfig::baseline();
        cfg.economic.weather = vec![IrradianceRecord::default(); 3];
        let merged = cfg.merge_json("{}").expect("empty merge");
        assert_eq!(merged.economic.weather.len(), 3);
        let json = cfg.to_json_string().expect("should serialize");
        assert!(!json.contains("weather"));
    }

    #[test]
    fn merge_json_rejects_garbage() {
        assert!(ProjectConfig::baseline().merge_json("{not json").is_err());
    }

    #[test]
    fn validation_catches_short_loan_term() {
        let mut cfg = ProjectConfig::baseline();
        cfg.economic.loan_term = 3;
        cfg.economic.loan_grace_period = 5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "economic.loan_term"));
    }

    #[test]
    fn validation_rejects_loan_without_amortization_years() {
        for (term, grace) in [(5, 5), (0, 0)] {
            let mut cfg = ProjectConfig::baseline();
            cfg.economic.loan_term = term;
            cfg.economic.loan_grace_period = grace;
            let errors = cfg.validate();
            assert!(
                errors.iter().any(|e| e.field == "economic.loan_term"),
                "term {term}, grace {grace} should be rejected"
            );
        }
    }

    #[test]
    fn validation_ignores_loan_terms_for_full_equity() {
        let mut cfg = ProjectConfig::baseline();
        cfg.economic.equity_percent = 100.0;
        cfg.economic.loan_term = 0;
        cfg.economic.loan_grace_period = 0;
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validation_catches_non_positive_ratings() {
        let mut cfg = ProjectConfig::baseline();
        cfg.module.pmax = 0.0;
        cfg.inverter.rated_output_power = -5.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "module.pmax"));
        assert!(errors.iter().any(|e| e.field == "inverter.rated_output_power"));
    }

    #[test]
    fn validation_catches_negative_dimensions() {
        let mut cfg = ProjectConfig::baseline();
        cfg.module.width = -1.0;
        cfg.system.cable_length = -10.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "module.width"));
        assert!(errors.iter().any(|e| e.field == "system.cable_length"));
    }

    #[test]
    fn validation_catches_short_monthly_profile() {
        let mut cfg = ProjectConfig::monthly();
        cfg.economic.monthly_insolation.truncate(11);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "economic.monthly_insolation"));
    }

    #[test]
    fn config_error_display_names_field() {
        let e = ConfigError::new("economic.loan_term", "must be >= 0");
        assert_eq!(e.to_string(), "config error: economic.loan_term: must be >= 0");
    }
}
