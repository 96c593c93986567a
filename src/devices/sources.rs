//! Signal sources: switches, clocks and signal generators.
//!
//! Sources have no inputs. Clocks and signal generators advance exactly once
//! per simulated cycle, before the rest of the network settles.

use crate::circuit::Signal;

/// A user-controlled constant level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    pub level: Signal,
}

impl Switch {
    pub fn new(level: Signal) -> Self {
        Self { level }
    }
}

/// A square-wave clock that toggles every `half_period` cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    pub half_period: u64,
    /// Cycles elapsed since the last toggle, always below `half_period`
    pub counter: u64,
}

impl Clock {
    pub fn new(half_period: u64, counter: u64) -> Self {
        Self {
            half_period,
            counter: counter % half_period.max(1),
        }
    }

    /// Advance one cycle, returning the new output level.
    pub fn tick(&mut self, output: Signal) -> Signal {
        self.counter += 1;
        if self.counter >= self.half_period {
            self.counter = 0;
            !output
        } else {
            output
        }
    }
}

/// A compiled `_`/`-` waveform.
///
/// `"__----__"` compiles to period 8, run ends `[2, 6, 8]` and a LOW start:
/// the level flips at every run end and wraps back to `start` after `period`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    pub period: usize,
    /// Cumulative end positions of each run of equal characters
    pub runs: Vec<usize>,
    pub start: Signal,
}

impl Waveform {
    /// Whether `text` is a non-empty sequence of `_` and `-` only.
    pub fn is_valid(text: &str) -> bool {
        !text.is_empty() && text.chars().all(|c| c == '_' || c == '-')
    }

    /// Compile a waveform string; `None` if it is not valid.
    pub fn compile(text: &str) -> Option<Self> {
        if !Self::is_valid(text) {
            return None;
        }

        let bytes = text.as_bytes();
        let mut runs = Vec::new();
        for i in 1..bytes.len() {
            if bytes[i] != bytes[i - 1] {
                runs.push(i);
            }
        }
        runs.push(bytes.len());

        Some(Self {
            period: bytes.len(),
            runs,
            start: Signal::from_bool(bytes[0] == b'-'),
        })
    }

    /// Level at `position` within one period.
    pub fn level_at(&self, position: usize) -> Signal {
        let position = position % self.period;
        let crossed = self.runs.iter().take_while(|&&end| end <= position).count();
        if crossed % 2 == 0 {
            self.start
        } else {
            !self.start
        }
    }
}

/// A device replaying a [`Waveform`] cyclically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Siggen {
    pub waveform: Waveform,
    /// Position of the level emitted on the next cycle
    pub cursor: usize,
}

impl Siggen {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            cursor: 0,
        }
    }

    /// Emit the level for this cycle and move the cursor on.
    pub fn tick(&mut self) -> Signal {
        let level = self.waveform.level_at(self.cursor);
        self.cursor = (self.cursor + 1) % self.waveform.period;
        level
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Signal::{High, Low};

    #[test]
    fn test_compile_waveforms() {
        let w = Waveform::compile("__----__").unwrap();
        assert_eq!((w.period, w.runs.clone(), w.start), (8, vec![2, 6, 8], Low));

        let w = Waveform::compile("----").unwrap();
        assert_eq!((w.period, w.runs.clone(), w.start), (4, vec![4], High));

        let w = Waveform::compile("-").unwrap();
        assert_eq!((w.period, w.runs.clone(), w.start), (1, vec![1], High));

        let w = Waveform::compile("-_-_").unwrap();
        assert_eq!(w.runs, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_invalid_waveforms() {
        assert!(Waveform::compile("").is_none());
        assert!(Waveform::compile("__--asd").is_none());
        assert!(Waveform::compile("123").is_none());
        assert!(Waveform::compile("_ -").is_none());
    }

    #[test]
    fn test_siggen_replays_waveform() {
        let text = "__----__";
        let mut siggen = Siggen::new(Waveform::compile(text).unwrap());
        let emitted: String = (0..16)
            .map(|_| if siggen.tick().is_high() { '-' } else { '_' })
            .collect();
        assert_eq!(emitted, format!("{text}{text}"));
        assert_eq!(siggen.cursor, 0);
    }

    #[test]
    fn test_clock_toggles_every_half_period() {
        let mut clock = Clock::new(3, 0);
        let mut level = Low;
        let mut seen = Vec::new();
        for _ in 0..9 {
            level = clock.tick(level);
            seen.push(level);
        }
        assert_eq!(seen, vec![Low, Low, High, High, High, Low, Low, Low, High]);
    }

    #[test]
    fn test_clock_half_period_one_toggles_each_cycle() {
        let mut clock = Clock::new(1, 0);
        assert_eq!(clock.tick(Low), High);
        assert_eq!(clock.tick(High), Low);
    }
}
