//! Headless fire spread runner.
//!
//! Reads a `SimulationConfig` as JSON from the first argument (a path) or
//! stdin, runs the simulation, and streams one frame per line as JSON.
//! Pass `--pretty` to print a human-readable progress table instead.

use std::fs;
use std::io::Read;
use std::process::ExitCode;

use firesim_core::{simulate, SimulationConfig};
use tracing::error;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let pretty = args.iter().any(|a| a == "--pretty");
    let path = args.iter().find(|a| !a.starts_with("--"));

    let raw = match path {
        Some(path) => match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                error!("cannot read config file '{path}': {err}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buf = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut buf) {
                error!("cannot read config from stdin: {err}");
                return ExitCode::FAILURE;
            }
            buf
        }
    };

    let config: SimulationConfig = match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration JSON: {err}");
            return ExitCode::FAILURE;
        }
    };

    let sim = match simulate(config) {
        Ok(sim) => sim,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if pretty {
        println!(
            "{:>8}  {:>12}  {:>10}  {:>12}  {:>14}",
            "t (h)", "area (ha)", "ROS m/min", "HFI kW/m", "fire type"
        );
    }

    for frame in sim {
        match frame {
            Ok(frame) if pretty => {
                let fire_type = serde_json::to_string(&frame.fire_type)
                    .unwrap_or_default()
                    .replace('"', "");
                println!(
                    "{:>8.2}  {:>12.3}  {:>10.2}  {:>12.1}  {:>14}",
                    frame.time_hours,
                    frame.area_ha,
                    frame.head_ros_m_min,
                    frame.max_hfi_kw_m,
                    fire_type
                );
            }
            Ok(frame) => match serde_json::to_string(&frame) {
                Ok(line) => println!("{line}"),
                Err(err) => {
                    error!("frame serialization failed: {err}");
                    return ExitCode::FAILURE;
                }
            },
            Err(err) => {
                error!("simulation failed: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
