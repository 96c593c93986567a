//! Error types for the logic simulator.
//!
//! Each component reports failures through its own closed enum
//! ([`LexError`], [`SyntaxError`], [`DeviceError`], [`NetworkError`],
//! [`MonitorError`]). The parser turns these into user-facing diagnostics by
//! matching on the variant. [`LogsimError`] is the crate-level error returned
//! to drivers such as the CLI.

use thiserror::Error;

/// Result type alias using [`LogsimError`].
pub type Result<T> = std::result::Result<T, LogsimError>;

/// Unified error type for driver-level operations.
#[derive(Error, Debug)]
pub enum LogsimError {
    /// Error reading the circuit definition file
    #[error("Failed to read definition file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The definition file contained errors; diagnostics were already reported
    ///
    /// `unconnected` names the dangling inputs when the network was reported
    /// incomplete.
    #[error("Total of {errors} error(s) detected")]
    ParseFailed {
        errors: usize,
        unconnected: Vec<String>,
    },

    /// The network did not settle within a cycle
    #[error("Network oscillating at cycle {cycle}")]
    Oscillation { cycle: usize },

    /// No device with this signal name
    #[error("Unknown signal '{name}'")]
    UnknownSignal { name: String },

    /// Named device is not a switch
    #[error("'{name}' is not a switch")]
    NotASwitch { name: String },

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

/// A character the lexer cannot start any token with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("invalid character '{ch}' at line {line}, column {column}")]
    InvalidCharacter { ch: char, line: usize, column: usize },
}

/// How the parser resumes after reporting a [`SyntaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Carry on from the current token.
    Resume,
    /// Skip to the next `;`, `{`, `}` or end of input, consuming it.
    SkipStatement,
    /// Skip to the next `{` or section keyword.
    SkipList,
}

/// Grammar violations found by the parser.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Expected a device name")]
    NotDeviceName,
    #[error("Expected an '=' sign")]
    NoEquals,
    #[error("Expected a '(' sign")]
    NoLeftBracket,
    #[error("Expected a ')' sign")]
    NoRightBracket,
    #[error("Expected 'number_of_inputs'")]
    NotNumInputs,
    #[error("Expected a ':' sign")]
    NoColon,
    #[error("Expected 'initial_state'")]
    NotInitialState,
    #[error("Expected 'cycle'")]
    NotCycle,
    #[error("Invalid device type")]
    InvalidDevice,
    #[error("Expected an integer value")]
    NotNumber,
    #[error("Expected the keyword 'DEVICES'")]
    NoDevicesKeyword,
    #[error("Expected a ';' sign")]
    NoSemicolon,
    #[error("Expected a '{{' sign")]
    NoLeftCurly,
    #[error("Expected a '}}' sign")]
    NoRightCurly,
    #[error("Expected a '.' sign")]
    NoDot,
    #[error("Invalid device port")]
    InvalidPort,
    #[error("Expected device port")]
    PortAbsent,
    #[error("Expected the keyword 'CONNECT'")]
    NoConnectKeyword,
    #[error("Expected the keyword 'MONITOR'")]
    NoMonitorKeyword,
    #[error("Unexpected symbols after 'END'")]
    AfterEnd,
    #[error("Expected the keyword 'END'")]
    NoEnd,
    #[error("Invalid device property")]
    InvalidProperty,
    #[error("Invalid use of reserved keyword as a name.")]
    UsedKeyword,
    #[error("Expected a list")]
    NoList,
    #[error("Expected logic levels (underscores and dashes)")]
    NotLogic,
    #[error("Expected 'waveform'")]
    NotWaveform,
}

impl SyntaxError {
    /// Recovery strategy for this error.
    pub fn recovery(self) -> Recovery {
        match self {
            Self::NoLeftCurly
            | Self::NoRightCurly
            | Self::NoSemicolon
            | Self::NoDevicesKeyword
            | Self::NoConnectKeyword
            | Self::NoMonitorKeyword => Recovery::Resume,
            Self::NoList => Recovery::SkipList,
            _ => Recovery::SkipStatement,
        }
    }

    /// Errors that are about meaning rather than shape, even though the
    /// parser detects them.
    pub fn is_semantic(self) -> bool {
        matches!(self, Self::UsedKeyword)
    }
}

/// Failures when creating a device.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Invalid device property")]
    InvalidQualifier,
    #[error("Expected a device property for initialisation")]
    NoQualifier,
    #[error("Expected no device property for this device")]
    QualifierPresent,
    #[error("Device already exists in the device list")]
    DevicePresent,
    #[error("Invalid type of device")]
    BadDevice,
}

/// Failures when wiring or running the network.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Cannot connect an input port to another input port.")]
    InputToInput,
    #[error("Cannot connect an output port to another output port.")]
    OutputToOutput,
    #[error("Input port of device already connected.")]
    InputConnected,
    #[error("Specified port does not exist.")]
    PortAbsent,
    #[error("A stated device is not in the device list.")]
    DeviceAbsent,
    #[error("Not all inputs in the network are connected")]
    UnconnectedInputs,
    #[error("Network did not settle within {passes} passes")]
    Oscillating { passes: usize },
}

/// Failures when adding or removing monitors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    #[error("A stated device is not in the device list.")]
    DeviceAbsent,
    #[error("Expected an output signal")]
    NotOutput,
    #[error("Monitor already exists in the monitor list")]
    MonitorPresent,
    #[error("Signal is not being monitored")]
    NotMonitored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_tiers() {
        assert_eq!(SyntaxError::NoRightCurly.recovery(), Recovery::Resume);
        assert_eq!(SyntaxError::NoSemicolon.recovery(), Recovery::Resume);
        assert_eq!(SyntaxError::NoList.recovery(), Recovery::SkipList);
        assert_eq!(SyntaxError::NoEquals.recovery(), Recovery::SkipStatement);
        assert_eq!(SyntaxError::UsedKeyword.recovery(), Recovery::SkipStatement);
    }

    #[test]
    fn test_brace_messages() {
        assert_eq!(SyntaxError::NoLeftCurly.to_string(), "Expected a '{' sign");
        assert_eq!(SyntaxError::NoRightCurly.to_string(), "Expected a '}' sign");
    }
}
