//! Logsim - Digital Logic Simulator
//!
//! Parses a circuit definition file, simulates it for a number of cycles and
//! prints one trace per monitored output.
//!
//! # Usage
//!
//! ```bash
//! logsim circuit.txt --cycles 20 --seed 7 --switch SW1=1 --monitor G1
//! ```

use std::path::PathBuf;

use clap::Parser;
use logsim_core::{
    circuit::Signal,
    dsl::{self, Reporter},
    error::{LogsimError, Result},
    Simulator, SimulatorConfig, DEFAULT_CYCLES,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Cycle-based digital logic simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit definition file
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Number of cycles to simulate
    #[arg(short, long, default_value_t = DEFAULT_CYCLES)]
    cycles: usize,

    /// Seed for clock phases and flip-flop start states
    #[arg(long)]
    seed: Option<u64>,

    /// Settling pass limit per cycle
    #[arg(long)]
    max_passes: Option<usize>,

    /// Set a switch before running, e.g. `SW1=1`
    #[arg(short, long = "switch", value_name = "NAME=LEVEL", value_parser = parse_switch)]
    switches: Vec<(String, Signal)>,

    /// Monitor an extra output, e.g. `D1.QBAR`
    #[arg(short, long = "monitor", value_name = "SIGNAL")]
    monitors: Vec<String>,
}

fn parse_switch(arg: &str) -> std::result::Result<(String, Signal), String> {
    let (name, level) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=0 or NAME=1, got `{arg}`"))?;
    let level = match level.trim() {
        "0" => Signal::Low,
        "1" => Signal::High,
        other => return Err(format!("switch level must be 0 or 1, got `{other}`")),
    };
    Ok((name.trim().to_string(), level))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut reporter = Reporter::stderr();
    let circuit = match dsl::parse_file_with_seed(&args.circuit_file, args.seed, &mut reporter) {
        Ok(circuit) => circuit,
        Err(LogsimError::ParseFailed { errors, unconnected }) => {
            for input in &unconnected {
                eprintln!("  unconnected: {}", input);
            }
            return Err(LogsimError::ParseFailed { errors, unconnected });
        }
        Err(err) => return Err(err),
    };
    info!(file = %args.circuit_file.display(), devices = circuit.network.devices().len(), "circuit loaded");

    let mut config = SimulatorConfig::new();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(limit) = args.max_passes {
        config = config.with_max_passes(limit);
    }
    let mut simulator = Simulator::with_config(circuit, config);

    for (name, level) in &args.switches {
        simulator.set_switch(name, *level)?;
    }
    for signal in &args.monitors {
        simulator.add_monitor(signal)?;
    }
    debug!(switches = ?simulator.switches(), "switches");

    simulator.run(args.cycles)?;
    print!("{}", simulator.display_signals());

    Ok(())
}
