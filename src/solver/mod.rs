//! Cycle-based logic simulation.
//!
//! Each simulated cycle runs in four phases:
//!
//! ```text
//! sample DATA -> tick sources -> settle gates/flip-flops -> commit memory
//! ```
//!
//! Settling re-evaluates every gate and flip-flop in declaration order,
//! reading whatever its drivers currently output, and repeats until a full
//! pass changes nothing. For an acyclic network this reaches the same fixed
//! point whatever the declaration order; a network that has not settled
//! after one pass per device contains a combinational loop and the cycle
//! fails without changing any state.

mod settle;
mod simulator;

pub use settle::execute_cycle;
pub use simulator::{Simulator, SimulatorConfig};

/// Default number of cycles for a run.
pub const DEFAULT_CYCLES: usize = 10;
