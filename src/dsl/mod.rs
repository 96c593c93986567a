//! Parser for logic circuit definition files.
//!
//! A definition file lists devices, then the wiring between them, then the
//! outputs to record. Keywords are case-sensitive; `#` starts a comment that
//! runs to the next `#`.
//!
//! # Grammar Overview
//!
//! ```text
//! circuit         = "DEVICES" "{" { device_decl } "}"
//!                   "CONNECT" "{" { connection_decl } "}"
//!                   "MONITOR" "{" { monitor_decl } "}"
//!                   "END"
//! device_decl     = name "=" device_spec ";"
//! device_spec     = ("AND" | "OR" | "NAND" | "NOR") "(" "number_of_inputs" ":" number ")"
//!                 | "SWITCH" "(" "initial_state" ":" number ")"
//!                 | "CLOCK" "(" "cycle" ":" number ")"
//!                 | "SIGGEN" "(" "waveform" ":" logic ")"
//!                 | "XOR" | "DTYPE"
//! connection_decl = signame "=" signame ";"
//! monitor_decl    = signame ";"
//! signame         = name [ "." port ]
//!
//! name            = letter { letter | digit | '_' }
//! number          = digit { digit }
//! logic           = ('_' | '-') { '_' | '-' }
//! port            = "I1" .. "I16" | "DATA" | "CLK" | "SET" | "CLEAR" | "Q" | "QBAR"
//! ```
//!
//! # Device Types
//!
//! | Type | Inputs | Outputs | Property |
//! |------|--------|---------|----------|
//! | AND, OR, NAND, NOR | `I1`..`In` | unnamed | `number_of_inputs`, 1 to 16 |
//! | XOR | `I1`, `I2` | unnamed | none |
//! | DTYPE | `DATA`, `CLK`, `SET`, `CLEAR` | `Q`, `QBAR` | none |
//! | SWITCH | none | unnamed | `initial_state`, 0 or 1 |
//! | CLOCK | none | unnamed | `cycle`, half period in cycles |
//! | SIGGEN | none | unnamed | `waveform`, `_` low and `-` high |
//!
//! # Example
//!
//! ```text
//! # A toggling flip-flop #
//! DEVICES {
//!     CK = CLOCK(cycle: 2);
//!     D1 = DTYPE;
//!     LOW = SWITCH(initial_state: 0);
//! }
//! CONNECT {
//!     CK = D1.CLK;
//!     D1.QBAR = D1.DATA;
//!     LOW = D1.SET;
//!     LOW = D1.CLEAR;
//! }
//! MONITOR {
//!     CK;
//!     D1.Q;
//! }
//! END
//! ```

mod diagnostics;
mod keywords;
mod lexer;
mod parser;

pub use diagnostics::{Category, Reporter};
pub use keywords::{Keyword, KEYWORDS};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use std::path::Path;

use crate::circuit::Circuit;
use crate::error::{LogsimError, Result};

/// Parse a definition into a fresh circuit.
pub fn parse(input: &str, reporter: &mut Reporter) -> Result<Circuit> {
    parse_into(input, Circuit::new(), reporter)
}

/// Parse a definition into `circuit`, typically one created with a seed.
pub fn parse_into(input: &str, mut circuit: Circuit, reporter: &mut Reporter) -> Result<Circuit> {
    let (ok, errors, dangling) = {
        let mut parser = Parser::new(input, &mut circuit, reporter);
        let ok = parser.parse_network();
        (ok, parser.error_count(), parser.unconnected_inputs().to_vec())
    };
    if ok {
        return Ok(circuit);
    }
    Err(LogsimError::ParseFailed {
        errors,
        unconnected: dangling.into_iter().map(|s| circuit.signal_name(s)).collect(),
    })
}

/// Parse a definition file.
pub fn parse_file(path: &Path, reporter: &mut Reporter) -> Result<Circuit> {
    parse_file_with_seed(path, None, reporter)
}

/// Parse a definition file, drawing initial device states from `seed` if
/// one is given.
pub fn parse_file_with_seed(path: &Path, seed: Option<u64>, reporter: &mut Reporter) -> Result<Circuit> {
    let content = std::fs::read_to_string(path).map_err(|e| LogsimError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let circuit = match seed {
        Some(seed) => Circuit::with_seed(seed),
        None => Circuit::new(),
    };
    parse_into(&content, circuit, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reports_failure() {
        let mut reporter = Reporter::silent();
        let err = parse("DEVICES { A = XOR }", &mut reporter).unwrap_err();
        assert!(matches!(err, LogsimError::ParseFailed { errors, .. } if errors > 0));
        assert_eq!(
            reporter.log().last().map(String::as_str),
            Some(format!("Total of {} errors detected\n", reporter.error_count()).as_str())
        );
    }

    #[test]
    fn test_reused_reporter_counts_per_parse() {
        let mut reporter = Reporter::silent();
        parse("DEVICES { A = XOR }", &mut reporter).unwrap_err();
        let before = reporter.error_count();
        assert!(before > 0);

        let err = parse("DEVICES {}\nCONNECT {}\nMONITOR {}\n", &mut reporter).unwrap_err();
        assert!(matches!(err, LogsimError::ParseFailed { errors: 1, .. }));
        assert_eq!(reporter.error_count(), before + 1);
    }

    #[test]
    fn test_parse_failure_names_dangling_inputs() {
        let mut reporter = Reporter::silent();
        let source = "DEVICES { G = XOR; }\nCONNECT { }\nMONITOR { }\nEND";
        match parse(source, &mut reporter) {
            Err(LogsimError::ParseFailed { errors, unconnected }) => {
                assert_eq!(errors, 1);
                assert_eq!(unconnected, vec!["G.I1", "G.I2"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let source = "DEVICES { G = XOR }\nCONNECT { }\nMONITOR { }\nEND";
        match parse(source, &mut reporter) {
            Err(LogsimError::ParseFailed { unconnected, .. }) => assert!(unconnected.is_empty()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_module_example_parses() {
        let source = "
# A toggling flip-flop #
DEVICES {
    CK = CLOCK(cycle: 2);
    D1 = DTYPE;
    LOW = SWITCH(initial_state: 0);
}
CONNECT {
    CK = D1.CLK;
    D1.QBAR = D1.DATA;
    LOW = D1.SET;
    LOW = D1.CLEAR;
}
MONITOR {
    CK;
    D1.Q;
}
END
";
        let mut reporter = Reporter::silent();
        let circuit = parse(source, &mut reporter).unwrap();
        assert_eq!(circuit.network.devices().len(), 3);
        assert_eq!(circuit.monitors.len(), 2);
    }

    #[test]
    fn test_parse_file_missing() {
        let mut reporter = Reporter::silent();
        let err = parse_file(Path::new("/nonexistent/circuit.txt"), &mut reporter).unwrap_err();
        assert!(matches!(err, LogsimError::FileReadError { .. }));
    }
}
