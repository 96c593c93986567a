//! Core types for circuit representation.

use std::fmt;
use std::ops::Not;

use crate::names::{Name, Names};

/// Devices are identified by the interned id of their declared name.
pub type DeviceId = Name;

/// Maximum number of inputs on a variable-input gate.
pub const MAX_GATE_INPUTS: u8 = 16;

/// A logic level carried on a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    Low,
    High,
}

impl Signal {
    /// Convert a boolean level.
    pub fn from_bool(high: bool) -> Self {
        if high {
            Signal::High
        } else {
            Signal::Low
        }
    }

    pub fn is_high(self) -> bool {
        self == Signal::High
    }
}

impl Not for Signal {
    type Output = Signal;

    fn not(self) -> Signal {
        match self {
            Signal::Low => Signal::High,
            Signal::High => Signal::Low,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Low => write!(f, "0"),
            Signal::High => write!(f, "1"),
        }
    }
}

/// A named device port.
///
/// Devices with a single output expose it without a port name; that output
/// is written as `None` wherever an `Option<Port>` appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Port {
    /// Numbered gate input `I1`..`I16`
    Input(u8),
    Data,
    Clk,
    Set,
    Clear,
    Q,
    QBar,
}

impl Port {
    /// The numbered gate input `I{n}`, if `n` is in range.
    pub fn numbered(n: u8) -> Option<Self> {
        (1..=MAX_GATE_INPUTS).contains(&n).then_some(Port::Input(n))
    }

    /// Parse a port from its textual name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "DATA" => Some(Port::Data),
            "CLK" => Some(Port::Clk),
            "SET" => Some(Port::Set),
            "CLEAR" => Some(Port::Clear),
            "Q" => Some(Port::Q),
            "QBAR" => Some(Port::QBar),
            _ => s
                .strip_prefix('I')
                .filter(|digits| !digits.starts_with('0'))
                .and_then(|digits| digits.parse::<u8>().ok())
                .and_then(Port::numbered),
        }
    }

    /// Whether this port can only ever be an input.
    pub fn is_input(self) -> bool {
        !self.is_output()
    }

    /// Whether this port can only ever be an output.
    pub fn is_output(self) -> bool {
        matches!(self, Port::Q | Port::QBar)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Input(n) => write!(f, "I{}", n),
            Port::Data => write!(f, "DATA"),
            Port::Clk => write!(f, "CLK"),
            Port::Set => write!(f, "SET"),
            Port::Clear => write!(f, "CLEAR"),
            Port::Q => write!(f, "Q"),
            Port::QBar => write!(f, "QBAR"),
        }
    }
}

/// One end of a connection: a device and one of its ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalRef {
    pub device: DeviceId,
    pub port: Option<Port>,
}

impl SignalRef {
    pub fn new(device: DeviceId, port: Option<Port>) -> Self {
        Self { device, port }
    }

    /// Qualified display name: `device.port`, or bare `device`.
    pub fn qualified_name(&self, names: &Names) -> String {
        let device = names.get_name_string(self.device).unwrap_or("?");
        match self.port {
            Some(port) => format!("{}.{}", device, port),
            None => device.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_names_roundtrip() {
        for text in ["I1", "I16", "DATA", "CLK", "SET", "CLEAR", "Q", "QBAR"] {
            let port = Port::from_name(text).unwrap();
            assert_eq!(port.to_string(), text);
        }
        assert_eq!(Port::from_name("I0"), None);
        assert_eq!(Port::from_name("I17"), None);
        assert_eq!(Port::from_name("I01"), None);
        assert_eq!(Port::from_name("q"), None);
    }

    #[test]
    fn test_port_direction() {
        assert!(Port::Q.is_output());
        assert!(Port::QBar.is_output());
        assert!(Port::Input(3).is_input());
        assert!(Port::Clk.is_input());
    }

    #[test]
    fn test_signal_not() {
        assert_eq!(!Signal::Low, Signal::High);
        assert_eq!(!Signal::High, Signal::Low);
        assert!(Signal::from_bool(true).is_high());
    }

    #[test]
    fn test_qualified_name() {
        let mut names = Names::new();
        let d1 = names.lookup_one("D1");
        assert_eq!(SignalRef::new(d1, Some(Port::QBar)).qualified_name(&names), "D1.QBAR");
        assert_eq!(SignalRef::new(d1, None).qualified_name(&names), "D1");
    }
}
