//! Diagnostic output for the parser.

use std::fmt;
use std::io::{self, Write};

use tracing::warn;

/// Whether a diagnostic concerns the shape or the meaning of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Syntax,
    Semantic,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Syntax => write!(f, "Syntax Error"),
            Category::Semantic => write!(f, "Semantic Error"),
        }
    }
}

/// Collects diagnostics and counts errors.
///
/// Every message is written to a live sink and kept in an in-memory log with
/// identical text, so a caller can replay the transcript after parsing.
pub struct Reporter {
    sink: Box<dyn Write>,
    log: Vec<String>,
    error_count: usize,
}

impl Reporter {
    /// Report to standard error.
    pub fn stderr() -> Self {
        Self::with_sink(Box::new(io::stderr()))
    }

    /// Keep the log only.
    pub fn silent() -> Self {
        Self::with_sink(Box::new(io::sink()))
    }

    pub fn with_sink(sink: Box<dyn Write>) -> Self {
        Self {
            sink,
            log: Vec::new(),
            error_count: 0,
        }
    }

    /// Record one error. `text` is the full, newline-terminated message.
    pub fn error(&mut self, text: String) {
        self.error_count += 1;
        self.emit(text);
    }

    /// Record a message that is not itself an error.
    pub fn emit(&mut self, text: String) {
        if let Err(err) = self.sink.write_all(text.as_bytes()) {
            warn!(%err, "failed to write diagnostic");
        }
        self.log.push(text);
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Messages in the order they were reported.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// The whole transcript as one string.
    pub fn transcript(&self) -> String {
        self.log.concat()
    }

    pub fn into_log(self) -> Vec<String> {
        self.log
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("log", &self.log)
            .field("error_count", &self.error_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_matches_log() {
        let shared = Shared::default();
        let mut reporter = Reporter::with_sink(Box::new(shared.clone()));
        reporter.error("Line 1: Syntax Error: Expected a ';' sign\nA = XOR\n       ^\n".into());
        reporter.emit("Total of 1 error detected\n".into());

        let written = String::from_utf8(shared.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, reporter.transcript());
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.log().len(), 2);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Syntax.to_string(), "Syntax Error");
        assert_eq!(Category::Semantic.to_string(), "Semantic Error");
    }
}
