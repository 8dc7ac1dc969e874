mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pv_designer::config::SystemConfig;
use pv_designer::design::cable::{CableMaterial, voltage_drop};
use pv_designer::design::compute_array_design;
use pv_designer::design::temperature::corrected_voltage;
use pv_designer::equipment::{Inverter, PvModule, TempCoefficients};

#[test]
fn winter_voc_sets_eighteen_modules_per_string() {
    let module = common::default_module();
    let inverter = common::default_inverter();
    let system = common::monofacial_system();

    let design = compute_array_design(&module, &inverter, &system);

    assert!((design.module_voltages.voc_winter - 58.57).abs() < 0.01);
    assert_eq!(design.max_series_by_voltage, 18);
    assert_eq!(design.array.series_modules, 18);
    assert!(design.safety.passed(), "failures: {:?}", design.safety.failures());
}

#[test]
fn bifacial_albedo_adds_fourteen_percent() {
    let design = compute_array_design(
        &common::default_module(),
        &common::default_inverter(),
        &SystemConfig::default(),
    );
    assert_eq!(design.bifacial_gain_pct, 14.0);
    let nameplate = f64::from(design.array.total_modules) * 0.585;
    assert!((design.array.total_dc_capacity_kw - nameplate * 1.14).abs() < 1e-9);
}

#[test]
fn infeasible_window_reports_zero_modules_without_error() {
    let inverter = Inverter {
        max_input_voltage: 400.0,
        min_mppt_voltage: 380.0,
        ..common::default_inverter()
    };
    let design = compute_array_design(&common::default_module(), &inverter, &common::monofacial_system());
    // 400 / 58.56 = 6, 380 / 39.63 = 10
    assert_eq!(design.array.series_modules, 0);
    assert_eq!(design.array.total_modules, 0);
    assert!(design.to_string().contains("No feasible configuration"));
}

#[test]
fn strings_spread_over_inverters() {
    let design = compute_array_design(
        &common::default_module(),
        &common::default_inverter(),
        &common::monofacial_system(),
    );
    let strings: u32 = design
        .inverter_groups
        .iter()
        .map(|g| g.inverter_count * g.strings)
        .sum();
    let inverters: u32 = design.inverter_groups.iter().map(|g| g.inverter_count).sum();
    assert_eq!(strings, design.array.parallel_strings);
    assert_eq!(inverters, design.inverter_count);
}

#[test]
fn no_correction_at_reference_temperature() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let v = rng.random_range(1.0..100.0);
        let coeff = rng.random_range(-1.0..1.0);
        assert_eq!(corrected_voltage(v, coeff, 25.0), v);
    }
}

#[test]
fn aluminum_and_heat_increase_voltage_drop() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let current = rng.random_range(0.5..30.0);
        let length = rng.random_range(1.0..500.0);
        let section = rng.random_range(1.5..50.0);
        let cu = voltage_drop(current, length, section, CableMaterial::Copper, 70.0);
        let al = voltage_drop(current, length, section, CableMaterial::Aluminum, 70.0);
        let cu_cool = voltage_drop(current, length, section, CableMaterial::Copper, 20.0);
        assert!(al > cu);
        assert!(cu > cu_cool);
    }
}

/// Random but physically plausible equipment and sites.
fn random_inputs(rng: &mut StdRng) -> (PvModule, Inverter, SystemConfig) {
    let voc = rng.random_range(30.0..60.0);
    let module = PvModule {
        pmax: rng.random_range(300.0..700.0),
        voc,
        vmp: voc * rng.random_range(0.75..0.9),
        temp_coefficients: TempCoefficients {
            voc: rng.random_range(-0.4..-0.2),
            ..TempCoefficients::default()
        },
        ..PvModule::default()
    };
    let max_mppt = rng.random_range(600.0..1400.0);
    let inverter = Inverter {
        max_input_voltage: max_mppt + rng.random_range(50.0..300.0),
        min_mppt_voltage: rng.random_range(150.0..600.0),
        max_mppt_voltage: max_mppt,
        rated_output_power: rng.random_range(20.0..250.0),
        ..Inverter::default()
    };
    let system = SystemConfig {
        target_capacity: rng.random_range(50.0..5000.0),
        ambient_temp_winter: rng.random_range(-30.0..5.0),
        ambient_temp_summer: rng.random_range(40.0..80.0),
        ..SystemConfig::default()
    };
    (module, inverter, system)
}

#[test]
fn series_count_never_exceeds_voltage_bound() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..500 {
        let (module, inverter, system) = random_inputs(&mut rng);
        let design = compute_array_design(&module, &inverter, &system);
        let bound = (inverter.max_input_voltage / design.module_voltages.voc_winter).floor() as u32;
        assert!(design.array.series_modules <= bound);
    }
}

#[test]
fn total_modules_is_series_times_parallel() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut feasible = 0;
    for _ in 0..500 {
        let (module, inverter, system) = random_inputs(&mut rng);
        let design = compute_array_design(&module, &inverter, &system);
        let a = design.array;
        if a.series_modules > 0 {
            feasible += 1;
            assert_eq!(a.total_modules, a.series_modules * a.parallel_strings);
            // rounding up never falls short of the target
            assert!(f64::from(a.total_modules) * module.pmax >= system.target_capacity * 1000.0);
        }
    }
    assert!(feasible > 0, "seeded inputs should produce feasible designs");
}
