//! Console sink used for user-facing messages.
//!
//! The pack command reports success and failure through an injected [`Echo`]
//! rather than printing directly, so callers decide where messages go and
//! tests can capture them.

use std::cell::RefCell;
use std::io::Write;

/// A single-method capability for emitting plain-text console messages.
pub trait Echo {
    /// Emits one message.
    fn echo(&self, message: &str);
}

/// Writes each message as a line to an underlying writer.
///
/// # Examples
///
/// ```
/// use shellfoundry_packager::echo::{Echo, WriterEcho};
///
/// let echo = WriterEcho::new(Vec::new());
/// echo.echo("shell.yml file is missing");
/// assert_eq!(echo.into_inner(), b"shell.yml file is missing\n");
/// ```
#[derive(Debug)]
pub struct WriterEcho<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> WriterEcho<W> {
    /// Wraps `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    /// Returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> Echo for WriterEcho<W> {
    fn echo(&self, message: &str) {
        if writeln!(self.writer.borrow_mut(), "{message}").is_err() {
            // Best-effort output; ignore write failures.
        }
    }
}

/// Echoes to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutEcho;

impl Echo for StdoutEcho {
    fn echo(&self, message: &str) {
        let mut stdout = std::io::stdout().lock();
        if writeln!(stdout, "{message}").is_err() {
            // Best-effort output; ignore write failures.
        }
    }
}
