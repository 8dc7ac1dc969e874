//! PV plant designer entry point: CLI wiring around the design pipeline.

use std::path::Path;
use std::process;

use pv_designer::config::ProjectConfig;
use pv_designer::io::export::{export_cashflow_csv, export_monthly_csv};
use pv_designer::pipeline::{ProjectResult, compute};
use pv_designer::weather::read_tmy_file;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    config_path: Option<String>,
    preset: Option<String>,
    tmy_path: Option<String>,
    cashflow_out: Option<String>,
    monthly_out: Option<String>,
    save_config: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("pv-designer: utility-scale PV plant design and financial model");
    eprintln!();
    eprintln!("Usage: pv-designer [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load project from a TOML scenario file");
    eprintln!("  --config <path>          Load project from a saved JSON document");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ProjectConfig::PRESETS.join(", ")
    );
    eprintln!("  --tmy <path>             Attach hourly TMY irradiance from CSV");
    eprintln!("  --cashflow-out <path>    Export the yearly cash flow to CSV");
    eprintln!("  --monthly-out <path>     Export the monthly generation profile to CSV");
    eprintln!("  --save-config <path>     Save the effective project as JSON");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the run");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario, --config or --preset is given, the baseline preset is used.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostic output.");
}

/// Returns the value following the flag at `args[*i]`, or exits.
fn flag_value(args: &[String], i: &mut usize, what: &str) -> String {
    *i += 1;
    if *i >= args.len() {
        eprintln!("error: {} requires {what}", args[*i - 1]);
        process::exit(1);
    }
    args[*i].clone()
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        config_path: None,
        preset: None,
        tmy_path: None,
        cashflow_out: None,
        monthly_out: None,
        save_config: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => cli.scenario_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--config" => cli.config_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--preset" => cli.preset = Some(flag_value(&args, &mut i, "a name argument")),
            "--tmy" => cli.tmy_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--cashflow-out" => {
                cli.cashflow_out = Some(flag_value(&args, &mut i, "a path argument"));
            }
            "--monthly-out" => {
                cli.monthly_out = Some(flag_value(&args, &mut i, "a path argument"));
            }
            "--save-config" => {
                cli.save_config = Some(flag_value(&args, &mut i, "a path argument"));
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let raw = flag_value(&args, &mut i, "a u16 argument");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Loads the project: --scenario, then --config, then --preset, then baseline.
fn load_project(cli: &CliArgs) -> ProjectConfig {
    let loaded = if let Some(ref path) = cli.scenario_path {
        ProjectConfig::from_toml_file(Path::new(path))
    } else if let Some(ref path) = cli.config_path {
        ProjectConfig::from_json_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        ProjectConfig::from_preset(name)
    } else {
        Ok(ProjectConfig::baseline())
    };

    let mut project = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(ref path) = cli.tmy_path {
        match read_tmy_file(Path::new(path)) {
            Ok(records) => {
                project.economic = project.economic.with_weather(records);
            }
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }
    project
}

fn print_report(result: &ProjectResult) {
    println!("{}", result.design);

    let sim = &result.simulation;
    println!();
    println!("--- Generation ---");
    println!("Mode:                  {}", sim.generation_mode);
    println!(
        "Year-one generation:   {:.1} MWh",
        sim.yearly.first().map_or(0.0, |y| y.annual_generation) / 1000.0
    );
    println!("Waterfall PR:          {:.2}%", sim.waterfall_final_pr);

    println!();
    println!("--- Cash Flow ---");
    for y in &sim.yearly {
        println!("{y}");
    }

    println!();
    println!("{}", sim.kpis);

    println!();
    println!("--- Sensitivity ---");
    for s in &sim.sensitivity {
        println!("{:<20} net profit {:.0}, ROI {:.1}%", s.scenario, s.net_profit, s.roi);
    }

    let env = &sim.environmental_impact;
    println!();
    println!("--- Environmental Impact (annual) ---");
    println!("CO2 reduction:         {:.1} t", env.co2_reduction_t);
    println!("Pine tree equivalent:  {:.0}", env.pine_trees);
    println!("Oil substitution:      {:.1} TOE", env.oil_substitution_toe);

    if let Some(ref bess) = sim.bess {
        println!();
        println!("--- Battery Storage (20 years) ---");
        println!("Stored energy:         {:.1} MWh", bess.stored_energy_mwh);
        println!("Discharged energy:     {:.1} MWh", bess.discharged_energy_mwh);
        println!("Peak-shaving benefit:  {:.0}", bess.peak_shaving_benefit);
        println!("Capex:                 {:.0}", bess.capex);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();
    let project = load_project(&cli);

    let errors = project.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let result = compute(&project);
    if !result.design.array.is_feasible() {
        println!("{}", result.design);
        eprintln!("error: no feasible array configuration, economics skipped");
        process::exit(2);
    }
    print_report(&result);

    if let Some(ref path) = cli.cashflow_out {
        if let Err(e) = export_cashflow_csv(&result.simulation.yearly, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Cash flow written to {path}");
    }

    if let Some(ref path) = cli.monthly_out {
        if let Err(e) = export_monthly_csv(&result.simulation, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Monthly generation written to {path}");
    }

    if let Some(ref path) = cli.save_config {
        if let Err(e) = project.save_json_file(Path::new(path)) {
            eprintln!("error: {e}");
            process::exit(1);
        }
        eprintln!("Project saved to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(pv_designer::api::AppState {
            config: project,
            result,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(pv_designer::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
