//! Circuit representation and validation.
//!
//! A [`Circuit`] bundles everything one definition file produces: the symbol
//! table, the [`Network`] of devices and connections, and the monitor set.
//! Loading another file means building a fresh `Circuit`.

mod graph;
mod types;
mod validate;

pub use graph::Network;
pub use types::*;
pub use validate::{check_network, unconnected_inputs};

use crate::devices::Devices;
use crate::monitors::Monitors;
use crate::names::Names;

/// One loaded circuit and its session state.
#[derive(Debug, Default)]
pub struct Circuit {
    pub names: Names,
    pub network: Network,
    pub monitors: Monitors,
}

impl Circuit {
    /// Create an empty circuit with entropy-seeded initial states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty circuit whose clock phases and flip-flop memories
    /// come from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            names: Names::new(),
            network: Network::new(Devices::with_seed(seed)),
            monitors: Monitors::new(),
        }
    }

    /// Qualified name of a signal, e.g. `"D1.Q"`.
    pub fn signal_name(&self, signal: SignalRef) -> String {
        signal.qualified_name(&self.names)
    }

    /// Resolve a qualified signal name against the devices of this circuit.
    pub fn signal_ref(&self, name: &str) -> Option<SignalRef> {
        self.network.devices().get_signal_ids(&self.names, name)
    }
}
