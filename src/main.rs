//! pv-econ entry point — CLI wiring and scenario-driven evaluation.

use std::path::Path;
use std::process;

use pv_econ::calculator::{ScenarioOutcome, run_scenario};
use pv_econ::config::ScenarioConfig;
use pv_econ::io::export::{export_amortization_csv, export_flows_csv};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    flows_out: Option<String>,
    amortization_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("pv-econ — PV installation economics calculator");
    eprintln!();
    eprintln!("Usage: pv-econ [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>          Load scenario from TOML config file");
    eprintln!("  --preset <name>            Use a built-in preset (residential_baseline)");
    eprintln!("  --flows-out <path>         Export monthly energy flows to CSV");
    eprintln!("  --amortization-out <path>  Export the amortization table to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                    Start REST API server after the calculation");
        eprintln!("  --port <u16>               API server port (default: 3000)");
    }
    eprintln!("  --help                     Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the residential baseline is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        flows_out: None,
        amortization_out: None,
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
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--flows-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --flows-out requires a path argument");
                    process::exit(1);
                }
                cli.flows_out = Some(args[i].clone());
            }
            "--amortization-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --amortization-out requires a path argument");
                    process::exit(1);
                }
                cli.amortization_out = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
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

fn main() {
    let cli = parse_args();

    // Load scenario: --scenario takes priority, then --preset, then the default
    let scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::residential_baseline()
    };

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Run
    let outcome = match run_scenario(&scenario) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    match &outcome {
        ScenarioOutcome::Evaluation(report) => {
            // Amortization table first, then the summary
            for row in &report.amortization {
                println!("{row}");
            }
            println!("\n{report}");

            if let Some(ref path) = cli.flows_out {
                if let Err(e) = export_flows_csv(&report.balance, Path::new(path)) {
                    eprintln!("error: failed to write CSV: {e}");
                    process::exit(1);
                }
                eprintln!("Monthly flows written to {path}");
            }
            if let Some(ref path) = cli.amortization_out {
                if let Err(e) = export_amortization_csv(&report.amortization, Path::new(path)) {
                    eprintln!("error: failed to write CSV: {e}");
                    process::exit(1);
                }
                eprintln!("Amortization table written to {path}");
            }
        }
        ScenarioOutcome::Sizing(report) => {
            println!("{report}");
            if cli.flows_out.is_some() || cli.amortization_out.is_some() {
                eprintln!("note: CSV export applies to evaluation modes only");
            }
        }
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let ScenarioOutcome::Evaluation(report) = outcome else {
            eprintln!("error: --serve requires an evaluation mode scenario");
            process::exit(1);
        };
        let state = Arc::new(pv_econ::api::AppState { report });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(pv_econ::api::serve(state, addr));
    }
}
