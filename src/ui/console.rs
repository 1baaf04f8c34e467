//! Output and error channels

use std::fmt::Display;
use std::io::{self, Stderr, Stdout, Write};

/// Pair of user-visible channels: `out` for results and banners, `err` for
/// failures. Commands receive it by reference so tests can capture both.
pub struct Console<O: Write = Stdout, E: Write = Stderr> {
    out: O,
    err: E,
}

impl Console {
    /// Console bound to the process stdout/stderr
    pub fn stdio() -> Self {
        Self {
            out: io::stdout(),
            err: io::stderr(),
        }
    }
}

impl Console<Vec<u8>, Vec<u8>> {
    /// In-memory console (for tests and captured output)
    pub fn buffered() -> Self {
        Self {
            out: Vec::new(),
            err: Vec::new(),
        }
    }

    /// Everything written to the output channel so far
    pub fn out_text(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    /// Everything written to the error channel so far
    pub fn err_text(&self) -> String {
        String::from_utf8_lossy(&self.err).into_owned()
    }
}

impl<O: Write, E: Write> Console<O, E> {
    /// Create a console over arbitrary writers
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Raw access to the output channel (for renderers)
    pub fn out(&mut self) -> &mut O {
        &mut self.out
    }

    /// Write one line to the output channel
    pub fn println(&mut self, line: impl Display) {
        // A closed pipe must not abort the command
        let _ = writeln!(self.out, "{}", line);
    }

    /// Write one line to the error channel
    pub fn eprintln(&mut self, line: impl Display) {
        let _ = writeln!(self.err, "{}", line);
    }
}
