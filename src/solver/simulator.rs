//! Main simulator interface.

use tracing::{debug, info};

use crate::circuit::{Circuit, Signal, SignalRef};
use crate::devices::DeviceKind;
use crate::error::{LogsimError, NetworkError, Result};
use crate::names::Names;

/// Configuration for the simulator.
#[derive(Debug, Clone, Default)]
pub struct SimulatorConfig {
    /// Seed for clock phases and flip-flop memories drawn at cold start.
    /// `None` draws from system entropy.
    pub seed: Option<u64>,
    /// Settling pass limit per cycle. `None` uses one pass per device.
    pub max_passes: Option<usize>,
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make runs reproducible from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the settling pass limit.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }
}

/// Drives a parsed circuit cycle by cycle and records its monitors.
#[derive(Debug)]
pub struct Simulator {
    circuit: Circuit,
    config: SimulatorConfig,
    cycles_completed: usize,
}

impl Simulator {
    /// Create a new simulator for the given circuit with default configuration.
    pub fn new(circuit: Circuit) -> Self {
        Self::with_config(circuit, SimulatorConfig::default())
    }

    /// Create a new simulator for the given circuit with custom configuration.
    pub fn with_config(mut circuit: Circuit, config: SimulatorConfig) -> Self {
        if let Some(seed) = config.seed {
            circuit.network.devices_mut().reseed(seed);
        }
        Self {
            circuit,
            config,
            cycles_completed: 0,
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn names(&self) -> &Names {
        &self.circuit.names
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Cycles recorded since the last [`run`](Self::run).
    pub fn cycles_completed(&self) -> usize {
        self.cycles_completed
    }

    /// Cold-start the circuit, clear all histories and simulate `cycles`
    /// cycles.
    pub fn run(&mut self, cycles: usize) -> Result<()> {
        self.circuit.monitors.reset_monitors();
        self.cycles_completed = 0;
        self.circuit.network.devices_mut().cold_startup();
        info!(cycles, "starting run");
        self.execute(cycles)
    }

    /// Simulate `cycles` more cycles, keeping state and histories.
    ///
    /// Before any run this behaves like [`run`](Self::run).
    pub fn continue_run(&mut self, cycles: usize) -> Result<()> {
        if self.cycles_completed == 0 {
            return self.run(cycles);
        }
        info!(cycles, from = self.cycles_completed, "continuing run");
        self.execute(cycles)
    }

    fn execute(&mut self, cycles: usize) -> Result<()> {
        for _ in 0..cycles {
            self.step()?;
        }
        Ok(())
    }

    /// Simulate a single cycle and record every monitor.
    pub fn step(&mut self) -> Result<()> {
        let network = &mut self.circuit.network;
        let outcome = match self.config.max_passes {
            Some(limit) => network.execute_network_with_limit(limit),
            None => network.execute_network(),
        };
        match outcome {
            Ok(passes) => {
                debug!(cycle = self.cycles_completed + 1, passes, "cycle complete");
            }
            Err(NetworkError::Oscillating { .. }) => {
                return Err(LogsimError::Oscillation {
                    cycle: self.cycles_completed + 1,
                });
            }
            Err(err) => return Err(err.into()),
        }
        self.circuit.monitors.record_signals(&self.circuit.network);
        self.cycles_completed += 1;
        Ok(())
    }

    /// Set the switch named `name` to `level`.
    pub fn set_switch(&mut self, name: &str, level: Signal) -> Result<()> {
        let id = self
            .circuit
            .names
            .query(name)
            .filter(|&id| self.circuit.network.devices().get_device(id).is_some())
            .ok_or_else(|| LogsimError::UnknownSignal {
                name: name.to_string(),
            })?;
        if !self.circuit.network.devices_mut().set_switch(id, level) {
            return Err(LogsimError::NotASwitch {
                name: name.to_string(),
            });
        }
        debug!(switch = name, %level, "switch set");
        Ok(())
    }

    /// Names of all switches, in declaration order.
    pub fn switches(&self) -> Vec<&str> {
        self.circuit
            .network
            .devices()
            .find_devices(Some(DeviceKind::Switch))
            .into_iter()
            .filter_map(|id| self.circuit.names.get_name_string(id))
            .collect()
    }

    /// Start monitoring the output with qualified name `signal_name`.
    pub fn add_monitor(&mut self, signal_name: &str) -> Result<()> {
        let signal = self.resolve(signal_name)?;
        self.circuit
            .monitors
            .make_monitor(&self.circuit.network, signal, self.cycles_completed)?;
        Ok(())
    }

    /// Stop monitoring `signal_name`.
    pub fn remove_monitor(&mut self, signal_name: &str) -> Result<()> {
        let signal = self.resolve(signal_name)?;
        self.circuit.monitors.remove_monitor(signal)?;
        Ok(())
    }

    /// Monitored and unmonitored output names.
    pub fn signal_names(&self) -> (Vec<String>, Vec<String>) {
        self.circuit
            .monitors
            .get_signal_names(&self.circuit.network, &self.circuit.names)
    }

    /// Recorded history of a monitored output.
    pub fn history(&self, signal_name: &str) -> Option<&[Option<Signal>]> {
        let signal = self.circuit.signal_ref(signal_name)?;
        self.circuit.monitors.get_monitor_signal(signal)
    }

    /// Text rendering of every monitored trace.
    pub fn display_signals(&self) -> String {
        self.circuit.monitors.display_signals(&self.circuit.names)
    }

    fn resolve(&self, signal_name: &str) -> Result<SignalRef> {
        self.circuit
            .signal_ref(signal_name)
            .ok_or_else(|| LogsimError::UnknownSignal {
                name: signal_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{self, Reporter};
    use crate::error::MonitorError;
    use Signal::{High, Low};

    const GATES: &str = "
        DEVICES {
            A = SWITCH(initial_state: 1);
            B = SWITCH(initial_state: 0);
            S = SIGGEN(waveform: __--_);
            X = XOR;
            G = AND(number_of_inputs: 3);
        }
        CONNECT {
            A = X.I1;
            B = X.I2;
            A = G.I1;
            B = G.I2;
            S = G.I3;
        }
        MONITOR {
            X;
            G;
        }
        END
    ";

    fn simulator(source: &str, config: SimulatorConfig) -> Simulator {
        let mut reporter = Reporter::silent();
        let circuit = dsl::parse(source, &mut reporter).unwrap();
        Simulator::with_config(circuit, config)
    }

    fn levels(history: Option<&[Option<Signal>]>) -> Vec<Signal> {
        history.unwrap().iter().map(|s| s.unwrap()).collect()
    }

    #[test]
    fn test_gates_fed_by_switches_and_siggen() {
        let mut sim = simulator(GATES, SimulatorConfig::new());
        sim.run(10).unwrap();

        assert_eq!(sim.cycles_completed(), 10);
        assert_eq!(levels(sim.history("X")), vec![High; 10]);
        assert_eq!(levels(sim.history("G")), vec![Low; 10]);

        sim.set_switch("B", High).unwrap();
        sim.run(10).unwrap();
        assert_eq!(levels(sim.history("X")), vec![Low; 10]);

        // A AND B AND S follows the generator: __--_ repeated
        let expected: Vec<Signal> = "__--___--_"
            .chars()
            .map(|c| Signal::from_bool(c == '-'))
            .collect();
        assert_eq!(levels(sim.history("G")), expected);
    }

    #[test]
    fn test_rerun_is_reproducible() {
        let mut sim = simulator(GATES, SimulatorConfig::new());
        sim.set_switch("B", High).unwrap();
        sim.run(7).unwrap();
        let first = sim.display_signals();
        sim.run(7).unwrap();
        assert_eq!(sim.display_signals(), first);
    }

    #[test]
    fn test_continue_run_and_late_monitor() {
        let mut sim = simulator(GATES, SimulatorConfig::new());
        sim.run(3).unwrap();
        sim.add_monitor("S").unwrap();
        sim.continue_run(2).unwrap();

        assert_eq!(sim.cycles_completed(), 5);
        assert_eq!(sim.history("X").unwrap().len(), 5);
        assert_eq!(
            sim.history("S").unwrap(),
            &[None, None, None, Some(High), Some(Low)][..]
        );
        assert!(matches!(
            sim.add_monitor("S"),
            Err(LogsimError::Monitor(MonitorError::MonitorPresent))
        ));
    }

    #[test]
    fn test_remove_monitor_and_signal_names() {
        let mut sim = simulator(GATES, SimulatorConfig::new());
        sim.remove_monitor("X").unwrap();
        let (monitored, unmonitored) = sim.signal_names();
        assert_eq!(monitored, vec!["G"]);
        assert_eq!(unmonitored, vec!["A", "B", "S", "X"]);
        assert!(matches!(
            sim.remove_monitor("X"),
            Err(LogsimError::Monitor(MonitorError::NotMonitored))
        ));
        assert!(matches!(
            sim.remove_monitor("Nope"),
            Err(LogsimError::UnknownSignal { .. })
        ));
    }

    #[test]
    fn test_set_switch_errors() {
        let mut sim = simulator(GATES, SimulatorConfig::new());
        assert!(matches!(sim.set_switch("X", High), Err(LogsimError::NotASwitch { .. })));
        assert!(matches!(sim.set_switch("Q", High), Err(LogsimError::UnknownSignal { .. })));
        assert_eq!(sim.switches(), vec!["A", "B"]);
    }

    #[test]
    fn test_seeded_clock_runs_repeat() {
        let source = "
            DEVICES { C = CLOCK(cycle: 3); D = DTYPE; Z = SWITCH(initial_state: 0); }
            CONNECT { C = D.CLK; D.QBAR = D.DATA; Z = D.SET; Z = D.CLEAR; }
            MONITOR { C; D.Q; }
            END
        ";
        let traces = |seed| {
            let mut sim = simulator(source, SimulatorConfig::new().with_seed(seed));
            sim.run(24).unwrap();
            sim.display_signals()
        };
        assert_eq!(traces(11), traces(11));

        let mut sim = simulator(source, SimulatorConfig::new().with_seed(4));
        sim.run(24).unwrap();
        let clock = levels(sim.history("C"));
        let toggles = clock.windows(2).filter(|w| w[0] != w[1]).count();
        assert!((7..=8).contains(&toggles), "{toggles}");
    }

    #[test]
    fn test_oscillation_reports_cycle() {
        let source = "
            DEVICES { G = NAND(number_of_inputs: 1); }
            CONNECT { G = G.I1; }
            MONITOR { G; }
            END
        ";
        let mut sim = simulator(source, SimulatorConfig::new());
        sim.run(2).unwrap_err();
        assert!(matches!(sim.run(2), Err(LogsimError::Oscillation { cycle: 1 })));
        assert_eq!(sim.cycles_completed(), 0);
    }

    #[test]
    fn test_pass_limit_from_config() {
        let mut sim = simulator(GATES, SimulatorConfig::new().with_max_passes(1));
        assert!(matches!(sim.run(1), Err(LogsimError::Oscillation { cycle: 1 })));
    }
}
