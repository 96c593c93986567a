//! Edge-triggered D-type flip-flop.

use crate::circuit::Signal;

/// Internal state of a DTYPE device.
///
/// DATA is sampled once at the start of each cycle, before any source
/// advances, so the value captured on a rising CLK edge is the level DATA had
/// just before the edge. SET and CLEAR act asynchronously; CLEAR wins when
/// both are high.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipFlop {
    pub memory: Signal,
    /// CLK level at the end of the previous committed cycle; `None` right
    /// after a cold start, when no edge can be detected yet
    pub last_clk: Option<Signal>,
    pub data_sample: Signal,
}

impl FlipFlop {
    pub fn new(memory: Signal) -> Self {
        Self {
            memory,
            last_clk: None,
            data_sample: Signal::Low,
        }
    }

    /// Memory level implied by the current input levels.
    pub fn next_memory(&self, clk: Signal, set: Signal, clear: Signal) -> Signal {
        let rising = self.last_clk == Some(Signal::Low) && clk == Signal::High;
        let mut memory = if rising { self.data_sample } else { self.memory };
        if set.is_high() {
            memory = Signal::High;
        }
        if clear.is_high() {
            memory = Signal::Low;
        }
        memory
    }

    /// Accept the settled state of a completed cycle.
    pub fn commit(&mut self, memory: Signal, clk: Signal) {
        self.memory = memory;
        self.last_clk = Some(clk);
    }
}
