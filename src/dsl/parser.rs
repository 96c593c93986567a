//! Recursive-descent parser for definition files.
//!
//! The parser builds devices, connections and monitors directly into a
//! [`Circuit`] as it goes. Errors are reported through a [`Reporter`] and
//! never stop parsing: each error picks a [`Recovery`] strategy and the
//! parser carries on, so one pass reports as many problems as it can.
//! Nothing is built once any error has been seen.

use std::fmt::Display;
use std::mem;

use tracing::{debug, info};

use super::diagnostics::{Category, Reporter};
use super::keywords::Keyword;
use super::lexer::{Lexer, Token, TokenKind};
use crate::circuit::{self, Circuit, Network, SignalRef, MAX_GATE_INPUTS};
use crate::devices::{DeviceKind, Property};
use crate::error::{NetworkError, Recovery, SyntaxError};
use crate::monitors::Monitors;

/// Parser for definition files.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    network: &'a mut Network,
    monitors: &'a mut Monitors,
    reporter: &'a mut Reporter,
    current: Token,
    previous: Token,
    /// Reporter error count when this parser was created
    baseline: usize,
    unconnected: Vec<SignalRef>,
}

impl<'a> Parser<'a> {
    /// Create a parser that builds into `circuit`.
    pub fn new(input: &'a str, circuit: &'a mut Circuit, reporter: &'a mut Reporter) -> Self {
        let Circuit {
            names,
            network,
            monitors,
        } = circuit;
        let mut lexer = Lexer::new(input, names);
        let current = lexer.next_token();
        let baseline = reporter.error_count();
        Self {
            lexer,
            network,
            monitors,
            reporter,
            previous: current.clone(),
            current,
            baseline,
            unconnected: Vec::new(),
        }
    }

    /// Errors reported by this parser so far.
    pub fn error_count(&self) -> usize {
        self.reporter.error_count() - self.baseline
    }

    /// Inputs left dangling when the network was reported incomplete.
    ///
    /// Empty unless that error was raised.
    pub fn unconnected_inputs(&self) -> &[SignalRef] {
        &self.unconnected
    }

    /// Parse the whole file. Returns `true` if no errors were found.
    ///
    /// Whatever was built before the first error stays in the circuit.
    pub fn parse_network(&mut self) -> bool {
        if self.current.is_eof() {
            self.reporter
                .error("Error: Cannot parse an empty text file\n".to_string());
        } else {
            self.list(
                Keyword::Devices,
                SyntaxError::NoDevicesKeyword,
                &[Keyword::Connect, Keyword::Monitor, Keyword::End],
                Self::device,
            );
            self.list(
                Keyword::Connect,
                SyntaxError::NoConnectKeyword,
                &[Keyword::Monitor, Keyword::End],
                Self::connection,
            );

            if self.error_count() == 0 && !circuit::check_network(self.network) {
                self.unconnected = circuit::unconnected_inputs(self.network);
                debug!(unconnected = self.unconnected.len(), "network incomplete");
                self.reporter.error(format!(
                    "{}: {}\n",
                    Category::Semantic,
                    NetworkError::UnconnectedInputs
                ));
            }

            self.list(
                Keyword::Monitor,
                SyntaxError::NoMonitorKeyword,
                &[Keyword::End],
                Self::monitor,
            );

            if self.current.is(Keyword::End) {
                self.advance();
                if !self.current.is_eof() {
                    self.syntax_error(SyntaxError::AfterEnd, false, false);
                }
            } else {
                self.syntax_error(SyntaxError::NoEnd, true, true);
            }
        }

        match self.error_count() {
            0 => {
                info!(
                    devices = self.network.devices().len(),
                    monitors = self.monitors.len(),
                    "definition file parsed"
                );
                true
            }
            1 => {
                self.reporter.emit("Total of 1 error detected\n".to_string());
                false
            }
            n => {
                self.reporter.emit(format!("Total of {} errors detected\n", n));
                false
            }
        }
    }

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.previous = mem::replace(&mut self.current, next);
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    fn at_any(&self, keywords: &[Keyword]) -> bool {
        self.current
            .keyword()
            .map_or(false, |keyword| keywords.contains(&keyword))
    }

    /// Report a syntax error at the current token, or just after the
    /// previous one, then recover.
    fn syntax_error(&mut self, error: SyntaxError, at_previous: bool, after: bool) {
        let token = if at_previous {
            self.previous.clone()
        } else {
            self.current.clone()
        };
        debug!(line = token.line, column = token.column, %error, "syntax error");

        let category = if error.is_semantic() {
            Category::Semantic
        } else {
            Category::Syntax
        };
        let mut message = format!(
            "Line {}: {}: {}\n{}\n",
            token.line,
            category,
            error,
            self.lexer.source_line(token.line)
        );
        if category == Category::Syntax {
            message.push_str(&Lexer::caret_line(&token, after));
            message.push('\n');
        }
        self.reporter.error(message);
        self.recover(error.recovery());
    }

    /// Report an error raised while building the circuit. The statement has
    /// already been parsed, so no tokens are skipped.
    fn semantic_error(&mut self, error: impl Display) {
        let line = self.current.line;
        debug!(line, %error, "semantic error");
        self.reporter.error(format!(
            "Line {}: {}: {}\n{}\n",
            line,
            Category::Semantic,
            error,
            self.lexer.source_line(line)
        ));
    }

    fn recover(&mut self, recovery: Recovery) {
        match recovery {
            Recovery::Resume => {}
            Recovery::SkipStatement => {
                while !matches!(
                    self.current.kind,
                    TokenKind::Semicolon | TokenKind::RightCurly | TokenKind::LeftCurly | TokenKind::Eof
                ) {
                    self.advance();
                }
                self.advance();
            }
            Recovery::SkipList => {
                while !matches!(self.current.kind, TokenKind::LeftCurly | TokenKind::Eof)
                    && !self.at_any(&[Keyword::Connect, Keyword::Monitor, Keyword::End])
                {
                    self.advance();
                }
            }
        }
    }

    /// Parse `KEYWORD "{" {item} "}"`.
    ///
    /// `following` are the keywords of later sections; meeting one inside
    /// the list means its closing brace is missing.
    fn list(
        &mut self,
        keyword: Keyword,
        missing: SyntaxError,
        following: &[Keyword],
        item: fn(&mut Self),
    ) {
        if self.current.is(keyword) {
            self.advance();
            if self.at(&TokenKind::LeftCurly) {
                self.advance();
            } else {
                self.syntax_error(SyntaxError::NoLeftCurly, true, true);
            }
        } else {
            self.syntax_error(missing, false, false);
            if self.at(&TokenKind::LeftCurly) {
                self.advance();
            } else {
                // Neither keyword nor brace: treat the list as absent
                self.recover(SyntaxError::NoList.recovery());
                return;
            }
        }

        loop {
            if self.at(&TokenKind::RightCurly) {
                self.advance();
                break;
            }
            if self.current.is_eof() || self.at_any(following) {
                self.syntax_error(SyntaxError::NoRightCurly, true, true);
                break;
            }
            item(self);
        }
    }

    /// `name "=" device_spec ";"`
    fn device(&mut self) {
        let id = match self.current.kind {
            TokenKind::Name(id) => id,
            TokenKind::Keyword(..) => return self.syntax_error(SyntaxError::UsedKeyword, false, false),
            _ => return self.syntax_error(SyntaxError::NotDeviceName, false, false),
        };
        self.advance();
        if !self.at(&TokenKind::Equals) {
            return self.syntax_error(SyntaxError::NoEquals, false, false);
        }
        self.advance();

        let Some((kind, property)) = self.device_spec() else {
            return;
        };
        self.advance();
        if !self.at(&TokenKind::Semicolon) {
            self.syntax_error(SyntaxError::NoSemicolon, true, true);
        }

        if self.error_count() == 0 {
            if let Err(err) = self.network.devices_mut().make_device(id, kind, property) {
                self.semantic_error(err);
            }
        }
        if self.at(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Parse a device kind and its property, leaving its last token
    /// current.
    fn device_spec(&mut self) -> Option<(DeviceKind, Option<Property>)> {
        let kind = match self.current.keyword().map(DeviceKind::try_from) {
            Some(Ok(kind)) => kind,
            _ => {
                self.syntax_error(SyntaxError::InvalidDevice, false, false);
                return None;
            }
        };

        let (name, missing) = match kind {
            DeviceKind::Xor | DeviceKind::DType => return Some((kind, None)),
            DeviceKind::And | DeviceKind::Or | DeviceKind::Nand | DeviceKind::Nor => {
                (Keyword::NumberOfInputs, SyntaxError::NotNumInputs)
            }
            DeviceKind::Switch => (Keyword::InitialState, SyntaxError::NotInitialState),
            DeviceKind::Clock => (Keyword::Cycle, SyntaxError::NotCycle),
            DeviceKind::Siggen => (Keyword::Waveform, SyntaxError::NotWaveform),
        };

        self.advance();
        if !self.at(&TokenKind::LeftBracket) {
            self.syntax_error(SyntaxError::NoLeftBracket, false, false);
            return None;
        }
        self.advance();
        if !self.current.is(name) {
            self.syntax_error(missing, false, false);
            return None;
        }
        self.advance();
        if !self.at(&TokenKind::Colon) {
            self.syntax_error(SyntaxError::NoColon, false, false);
            return None;
        }
        self.advance();

        let value = self.current.kind.clone();
        let property = match (value, kind) {
            (TokenKind::Logic(text), DeviceKind::Siggen) => Property::Waveform(text),
            (_, DeviceKind::Siggen) => {
                self.syntax_error(SyntaxError::NotLogic, false, false);
                return None;
            }
            (TokenKind::Number(n), _) => {
                let in_range = match kind {
                    DeviceKind::Switch => n <= 1,
                    DeviceKind::Clock => true,
                    _ => (1..=MAX_GATE_INPUTS as u64).contains(&n),
                };
                if !in_range {
                    self.syntax_error(SyntaxError::InvalidProperty, false, false);
                    return None;
                }
                Property::Number(n)
            }
            _ => {
                self.syntax_error(SyntaxError::NotNumber, false, false);
                return None;
            }
        };

        self.advance();
        if !self.at(&TokenKind::RightBracket) {
            self.syntax_error(SyntaxError::NoRightBracket, false, false);
            return None;
        }
        Some((kind, Some(property)))
    }

    /// `signame "=" signame ";"` with an output on the left and an input
    /// on the right.
    fn connection(&mut self) {
        let Some(output) = self.signame(false) else {
            return;
        };
        if !self.at(&TokenKind::Equals) {
            return self.syntax_error(SyntaxError::NoEquals, true, true);
        }
        self.advance();
        let Some(input) = self.signame(true) else {
            return;
        };
        if !self.at(&TokenKind::Semicolon) {
            self.syntax_error(SyntaxError::NoSemicolon, true, true);
        }

        if self.error_count() == 0 {
            if let Err(err) = self.network.make_connection(input, output) {
                self.semantic_error(err);
            }
        }
        if self.at(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// `signame ";"`
    fn monitor(&mut self) {
        let Some(signal) = self.signame(false) else {
            return;
        };
        if !self.at(&TokenKind::Semicolon) {
            self.syntax_error(SyntaxError::NoSemicolon, true, true);
        }

        if self.error_count() == 0 {
            if let Err(err) = self.monitors.make_monitor(self.network, signal, 0) {
                self.semantic_error(err);
            }
        }
        if self.at(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// `name ["." port]`
    ///
    /// Input signals must name an input port. Output signals may name `Q` or
    /// `QBAR`, or be a bare device name.
    fn signame(&mut self, input: bool) -> Option<SignalRef> {
        let TokenKind::Name(device) = self.current.kind else {
            self.syntax_error(SyntaxError::NotDeviceName, false, false);
            return None;
        };
        self.advance();

        if !self.at(&TokenKind::Dot) {
            if self.current.keyword().and_then(Keyword::as_port).is_some() {
                self.syntax_error(SyntaxError::NoDot, true, true);
                return None;
            }
            if input {
                self.syntax_error(SyntaxError::PortAbsent, true, true);
                return None;
            }
            return Some(SignalRef::new(device, None));
        }
        self.advance();

        match self.current.keyword().and_then(Keyword::as_port) {
            Some(port) if port.is_input() == input => {
                self.advance();
                Some(SignalRef::new(device, Some(port)))
            }
            _ => {
                let at_eof = self.current.is_eof();
                self.syntax_error(SyntaxError::InvalidPort, at_eof, at_eof);
                None
            }
        }
    }
}
