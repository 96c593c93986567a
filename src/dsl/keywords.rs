//! Reserved words of the definition language.

use std::fmt;

use crate::circuit::{Port, MAX_GATE_INPUTS};

/// Every reserved word, in the order it is interned.
///
/// Interning these first gives each keyword the id equal to its index here.
pub const KEYWORDS: [&str; 39] = [
    "DEVICES",
    "CONNECT",
    "MONITOR",
    "END",
    "CLOCK",
    "SWITCH",
    "AND",
    "NAND",
    "OR",
    "NOR",
    "DTYPE",
    "XOR",
    "Q",
    "QBAR",
    "DATA",
    "CLK",
    "SET",
    "CLEAR",
    "I1",
    "I2",
    "I3",
    "I4",
    "I5",
    "I6",
    "I7",
    "I8",
    "I9",
    "I10",
    "I11",
    "I12",
    "I13",
    "I14",
    "I15",
    "I16",
    "cycle",
    "initial_state",
    "number_of_inputs",
    "SIGGEN",
    "waveform",
];

/// A reserved word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Sections
    Devices,
    Connect,
    Monitor,
    End,
    // Device kinds
    Clock,
    Switch,
    And,
    Nand,
    Or,
    Nor,
    DType,
    Xor,
    Siggen,
    // Ports
    Q,
    QBar,
    Data,
    Clk,
    Set,
    Clear,
    Input(u8),
    // Property names
    Cycle,
    InitialState,
    NumberOfInputs,
    Waveform,
}

impl Keyword {
    /// Classify `text` as a keyword, case-sensitively.
    pub fn from_name(text: &str) -> Option<Self> {
        let keyword = match text {
            "DEVICES" => Self::Devices,
            "CONNECT" => Self::Connect,
            "MONITOR" => Self::Monitor,
            "END" => Self::End,
            "CLOCK" => Self::Clock,
            "SWITCH" => Self::Switch,
            "AND" => Self::And,
            "NAND" => Self::Nand,
            "OR" => Self::Or,
            "NOR" => Self::Nor,
            "DTYPE" => Self::DType,
            "XOR" => Self::Xor,
            "SIGGEN" => Self::Siggen,
            "Q" => Self::Q,
            "QBAR" => Self::QBar,
            "DATA" => Self::Data,
            "CLK" => Self::Clk,
            "SET" => Self::Set,
            "CLEAR" => Self::Clear,
            "cycle" => Self::Cycle,
            "initial_state" => Self::InitialState,
            "number_of_inputs" => Self::NumberOfInputs,
            "waveform" => Self::Waveform,
            _ => match Port::from_name(text)? {
                Port::Input(n) => Self::Input(n),
                _ => return None,
            },
        };
        Some(keyword)
    }

    /// The port this keyword names, if any.
    pub fn as_port(self) -> Option<Port> {
        match self {
            Self::Q => Some(Port::Q),
            Self::QBar => Some(Port::QBar),
            Self::Data => Some(Port::Data),
            Self::Clk => Some(Port::Clk),
            Self::Set => Some(Port::Set),
            Self::Clear => Some(Port::Clear),
            Self::Input(n) if (1..=MAX_GATE_INPUTS).contains(&n) => Some(Port::Input(n)),
            _ => None,
        }
    }

    /// Keywords that open a section or terminate the file.
    pub fn is_section(self) -> bool {
        matches!(self, Self::Devices | Self::Connect | Self::Monitor | Self::End)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(n) => write!(f, "I{}", n),
            Self::Devices => f.write_str("DEVICES"),
            Self::Connect => f.write_str("CONNECT"),
            Self::Monitor => f.write_str("MONITOR"),
            Self::End => f.write_str("END"),
            Self::Clock => f.write_str("CLOCK"),
            Self::Switch => f.write_str("SWITCH"),
            Self::And => f.write_str("AND"),
            Self::Nand => f.write_str("NAND"),
            Self::Or => f.write_str("OR"),
            Self::Nor => f.write_str("NOR"),
            Self::DType => f.write_str("DTYPE"),
            Self::Xor => f.write_str("XOR"),
            Self::Siggen => f.write_str("SIGGEN"),
            Self::Q => f.write_str("Q"),
            Self::QBar => f.write_str("QBAR"),
            Self::Data => f.write_str("DATA"),
            Self::Clk => f.write_str("CLK"),
            Self::Set => f.write_str("SET"),
            Self::Clear => f.write_str("CLEAR"),
            Self::Cycle => f.write_str("cycle"),
            Self::InitialState => f.write_str("initial_state"),
            Self::NumberOfInputs => f.write_str("number_of_inputs"),
            Self::Waveform => f.write_str("waveform"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyword_classifies() {
        for text in KEYWORDS {
            let keyword = Keyword::from_name(text).unwrap();
            assert_eq!(keyword.to_string(), text);
        }
    }

    #[test]
    fn test_non_keywords() {
        for text in ["devices", "I0", "I17", "Clock1", "QBAR2", "Waveform"] {
            assert_eq!(Keyword::from_name(text), None, "{text}");
        }
    }

    #[test]
    fn test_ports() {
        assert_eq!(Keyword::Input(16).as_port(), Some(Port::Input(16)));
        assert_eq!(Keyword::QBar.as_port(), Some(Port::QBar));
        assert_eq!(Keyword::Clock.as_port(), None);
        assert!(Keyword::End.is_section());
        assert!(!Keyword::Switch.is_section());
    }
}
