//! Signal recording for monitored outputs.
//!
//! A monitor records one entry per completed simulation cycle. Monitors
//! added part way through a run are padded with blank entries for the
//! cycles they missed, so every history lines up with the cycle count.

use std::fmt;

use tracing::debug;

use crate::circuit::{Network, Signal, SignalRef};
use crate::error::MonitorError;
use crate::names::Names;

/// How one recorded entry is drawn relative to the entry before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    Low,
    High,
    Rising,
    Falling,
    /// No value was recorded for this cycle
    Blank,
}

impl Trace {
    /// Classify `level` given the previous cycle's entry.
    pub fn classify(previous: Option<Signal>, level: Option<Signal>) -> Self {
        match (previous, level) {
            (_, None) => Trace::Blank,
            (Some(Signal::Low), Some(Signal::High)) => Trace::Rising,
            (Some(Signal::High), Some(Signal::Low)) => Trace::Falling,
            (_, Some(Signal::High)) => Trace::High,
            (_, Some(Signal::Low)) => Trace::Low,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Trace::Low => '_',
            Trace::High => '-',
            Trace::Rising => '/',
            Trace::Falling => '\\',
            Trace::Blank => ' ',
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A monitored output and its history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub signal: SignalRef,
    pub history: Vec<Option<Signal>>,
}

impl Monitor {
    pub fn traces(&self) -> Vec<Trace> {
        let mut previous = None;
        self.history
            .iter()
            .map(|&level| {
                let trace = Trace::classify(previous, level);
                previous = level;
                trace
            })
            .collect()
    }
}

/// The set of monitored outputs, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct Monitors {
    monitors: Vec<Monitor>,
}

impl Monitors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start monitoring an output of `network`.
    ///
    /// `cycles_completed` blank entries are recorded up front so the new
    /// history lines up with the others.
    pub fn make_monitor(
        &mut self,
        network: &Network,
        signal: SignalRef,
        cycles_completed: usize,
    ) -> Result<(), MonitorError> {
        let device = network
            .devices()
            .get_device(signal.device)
            .ok_or(MonitorError::DeviceAbsent)?;

        if !device.outputs.contains_key(&signal.port) {
            return Err(MonitorError::NotOutput);
        }

        if self.is_monitored(signal) {
            return Err(MonitorError::MonitorPresent);
        }

        debug!(device = %signal.device, port = ?signal.port, "monitor added");
        self.monitors.push(Monitor {
            signal,
            history: vec![None; cycles_completed],
        });
        Ok(())
    }

    /// Stop monitoring `signal` and drop its history.
    pub fn remove_monitor(&mut self, signal: SignalRef) -> Result<(), MonitorError> {
        let index = self
            .monitors
            .iter()
            .position(|m| m.signal == signal)
            .ok_or(MonitorError::NotMonitored)?;
        self.monitors.remove(index);
        Ok(())
    }

    pub fn is_monitored(&self, signal: SignalRef) -> bool {
        self.monitors.iter().any(|m| m.signal == signal)
    }

    /// Recorded history of `signal`, if it is monitored.
    pub fn get_monitor_signal(&self, signal: SignalRef) -> Option<&[Option<Signal>]> {
        self.monitors
            .iter()
            .find(|m| m.signal == signal)
            .map(|m| m.history.as_slice())
    }

    /// Clear every history, keeping the monitored set.
    pub fn reset_monitors(&mut self) {
        for monitor in &mut self.monitors {
            monitor.history.clear();
        }
    }

    /// Append the current level of every monitored output.
    pub fn record_signals(&mut self, network: &Network) {
        for monitor in &mut self.monitors {
            monitor.history.push(network.get_output_signal(monitor.signal));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.iter()
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Qualified names of monitored outputs, and of every other output in
    /// the network.
    pub fn get_signal_names(&self, network: &Network, names: &Names) -> (Vec<String>, Vec<String>) {
        let monitored = self
            .monitors
            .iter()
            .map(|m| m.signal.qualified_name(names))
            .collect();

        let unmonitored = network
            .devices()
            .iter()
            .flat_map(|device| {
                device
                    .outputs
                    .keys()
                    .map(move |&port| SignalRef::new(device.id, port))
            })
            .filter(|&signal| !self.is_monitored(signal))
            .map(|signal| signal.qualified_name(names))
            .collect();

        (monitored, unmonitored)
    }

    /// Length of the longest monitored name, for aligning traces.
    pub fn get_margin(&self, names: &Names) -> Option<usize> {
        self.monitors
            .iter()
            .map(|m| m.signal.qualified_name(names).chars().count())
            .max()
    }

    /// Render every history as one text line per monitor.
    pub fn display_signals(&self, names: &Names) -> String {
        let margin = self.get_margin(names).unwrap_or(0);
        let mut out = String::new();
        for monitor in &self.monitors {
            let name = monitor.signal.qualified_name(names);
            let trace: String = monitor.traces().into_iter().map(Trace::as_char).collect();
            out.push_str(&format!("{:<width$}: {}\n", name, trace, width = margin));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Port;
    use crate::devices::{DeviceKind, Devices, Property};
    use crate::names::Name;
    use Signal::{High, Low};

    fn network() -> (Names, Network, [Name; 3]) {
        let mut names = Names::new();
        let ids = [
            names.lookup_one("Sw1"),
            names.lookup_one("D1"),
            names.lookup_one("G1"),
        ];
        let mut devices = Devices::with_seed(3);
        devices.make_device(ids[0], DeviceKind::Switch, Some(Property::Number(1))).unwrap();
        devices.make_device(ids[1], DeviceKind::DType, None).unwrap();
        devices.make_device(ids[2], DeviceKind::Xor, None).unwrap();
        (names, Network::new(devices), ids)
    }

    #[test]
    fn test_make_monitor_errors() {
        let (mut names, network, [sw1, d1, g1]) = network();
        let mut monitors = Monitors::new();

        monitors.make_monitor(&network, SignalRef::new(sw1, None), 0).unwrap();
        assert_eq!(
            monitors.make_monitor(&network, SignalRef::new(sw1, None), 0),
            Err(MonitorError::MonitorPresent)
        );
        assert_eq!(
            monitors.make_monitor(&network, SignalRef::new(d1, Some(Port::Data)), 0),
            Err(MonitorError::NotOutput)
        );
        assert_eq!(
            monitors.make_monitor(&network, SignalRef::new(d1, None), 0),
            Err(MonitorError::NotOutput)
        );
        assert_eq!(
            monitors.make_monitor(&network, SignalRef::new(g1, Some(Port::Q)), 0),
            Err(MonitorError::NotOutput)
        );
        let ghost = names.lookup_one("Ghost");
        assert_eq!(
            monitors.make_monitor(&network, SignalRef::new(ghost, None), 0),
            Err(MonitorError::DeviceAbsent)
        );
        assert_eq!(monitors.len(), 1);
    }

    #[test]
    fn test_record_and_reset() {
        let (_, network, [sw1, d1, _]) = network();
        let mut monitors = Monitors::new();
        let sw = SignalRef::new(sw1, None);
        let q = SignalRef::new(d1, Some(Port::Q));
        monitors.make_monitor(&network, sw, 0).unwrap();

        monitors.record_signals(&network);
        monitors.record_signals(&network);
        monitors.make_monitor(&network, q, 2).unwrap();
        monitors.record_signals(&network);

        assert_eq!(monitors.get_monitor_signal(sw), Some(&[Some(High); 3][..]));
        assert_eq!(monitors.get_monitor_signal(q), Some(&[None, None, Some(Low)][..]));

        monitors.reset_monitors();
        assert_eq!(monitors.get_monitor_signal(sw), Some(&[][..]));
        assert_eq!(monitors.len(), 2);
    }

    #[test]
    fn test_remove_monitor() {
        let (_, network, [sw1, _, g1]) = network();
        let mut monitors = Monitors::new();
        let sw = SignalRef::new(sw1, None);
        monitors.make_monitor(&network, sw, 0).unwrap();
        assert_eq!(monitors.remove_monitor(sw), Ok(()));
        assert_eq!(
            monitors.remove_monitor(SignalRef::new(g1, None)),
            Err(MonitorError::NotMonitored)
        );
        assert!(monitors.is_empty());
    }

    #[test]
    fn test_signal_names_and_margin() {
        let (names, network, [sw1, d1, _]) = network();
        let mut monitors = Monitors::new();
        monitors.make_monitor(&network, SignalRef::new(sw1, None), 0).unwrap();
        monitors.make_monitor(&network, SignalRef::new(d1, Some(Port::QBar)), 0).unwrap();

        let (monitored, unmonitored) = monitors.get_signal_names(&network, &names);
        assert_eq!(monitored, vec!["Sw1", "D1.QBAR"]);
        assert_eq!(unmonitored, vec!["D1.Q", "G1"]);
        assert_eq!(monitors.get_margin(&names), Some(7));
        assert_eq!(Monitors::new().get_margin(&names), None);
    }

    #[test]
    fn test_traces() {
        let (_, _, [sw1, _, _]) = network();
        let monitor = Monitor {
            signal: SignalRef::new(sw1, None),
            history: vec![None, Some(Low), Some(High), Some(High), Some(Low), Some(Low)],
        };
        assert_eq!(
            monitor.traces(),
            vec![Trace::Blank, Trace::Low, Trace::Rising, Trace::High, Trace::Falling, Trace::Low]
        );
    }

    #[test]
    fn test_display_signals() {
        let (names, network, [sw1, d1, _]) = network();
        let mut monitors = Monitors::new();
        monitors.make_monitor(&network, SignalRef::new(sw1, None), 0).unwrap();
        monitors.record_signals(&network);
        monitors.make_monitor(&network, SignalRef::new(d1, Some(Port::Q)), 1).unwrap();
        monitors.record_signals(&network);

        assert_eq!(monitors.display_signals(&names), "Sw1 : --\nD1.Q:  _\n");
    }
}
