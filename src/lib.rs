//! # Logsim Core
//!
//! A cycle-based digital logic simulator driven by a textual circuit
//! definition language.
//!
//! This library provides:
//! - A lexer and error-recovering parser for circuit definition files
//! - Gates, switches, clocks, signal generators and D-type flip-flops
//! - A settling network engine with combinational loop detection
//! - Monitors that record and render per-cycle signal traces
//!
//! ## Architecture
//!
//! - [`names`] - Symbol table shared by every stage
//! - [`dsl`] - Lexer, parser and diagnostics for definition files
//! - [`devices`] - Device registry and per-kind behaviour
//! - [`circuit`] - Connections between devices and the loaded [`Circuit`]
//! - [`monitors`] - Recorded signal histories
//! - [`solver`] - Cycle execution and the [`Simulator`] driver
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! logsim counter.txt --cycles 20 --switch EN=1
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use logsim_core::{dsl, Simulator};
//!
//! let mut reporter = dsl::Reporter::stderr();
//! let circuit = dsl::parse_file("counter.txt".as_ref(), &mut reporter)?;
//! let mut sim = Simulator::new(circuit);
//! sim.run(20)?;
//! print!("{}", sim.display_signals());
//! # Ok::<(), logsim_core::LogsimError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmLogicSim } from 'logsim_core';
//!
//! const sim = new WasmLogicSim(source, undefined);
//! sim.run(20);
//! console.log(sim.display_signals());
//! ```

pub mod circuit;
pub mod devices;
pub mod dsl;
pub mod error;
pub mod monitors;
pub mod names;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{LogsimError, Result};
pub use solver::{Simulator, SimulatorConfig, DEFAULT_CYCLES};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmLogicSim;
