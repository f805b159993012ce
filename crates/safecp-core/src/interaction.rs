//! Operator interaction capability
//!
//! The copy engine never touches a terminal directly. Everything it needs
//! from the operator goes through [`InteractionAdapter`]: one prompt, one
//! line of input back. The binary supplies a terminal-aware adapter; tests
//! and piped runs use [`LineAdapter`] over arbitrary streams.

use std::cell::RefCell;
use std::io::{BufRead, Write};

use thiserror::Error;

/// Errors raised while talking to the operator
#[derive(Error, Debug)]
pub enum InteractionError {
    /// The input stream is exhausted
    #[error("input closed")]
    Eof,

    /// Reading or writing the terminal failed
    #[error("terminal I/O failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for InteractionError {
    fn from(err: std::io::Error) -> Self {
        InteractionError::Io(err.to_string())
    }
}

pub type InteractionResult<T> = Result<T, InteractionError>;

/// A single serialized conversation with one operator
pub trait InteractionAdapter {
    /// Show `prompt` and read one line, without its line terminator
    fn ask_line(&self, prompt: &str) -> InteractionResult<String>;

    /// Progress and protocol messages
    fn print_info(&self, message: &str);

    /// Per-source announcements
    fn print_header(&self, message: &str) {
        self.print_info(message)
    }

    /// Skips and refusals
    fn print_warning(&self, message: &str);

    /// Failures
    fn print_error(&self, message: &str);
}

impl<T: InteractionAdapter + ?Sized> InteractionAdapter for &T {
    fn ask_line(&self, prompt: &str) -> InteractionResult<String> {
        (**self).ask_line(prompt)
    }

    fn print_info(&self, message: &str) {
        (**self).print_info(message)
    }

    fn print_header(&self, message: &str) {
        (**self).print_header(message)
    }

    fn print_warning(&self, message: &str) {
        (**self).print_warning(message)
    }

    fn print_error(&self, message: &str) {
        (**self).print_error(message)
    }
}

/// Line-oriented adapter over any reader/writer pair
///
/// Prompts are written verbatim (no newline appended) and flushed before
/// reading, matching a plain `printf` + `fgets` terminal conversation.
pub struct LineAdapter<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> LineAdapter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    /// Recover the output stream (used by tests to inspect the transcript)
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    fn emit(&self, text: &str) {
        let mut out = self.output.borrow_mut();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl<R: BufRead, W: Write> InteractionAdapter for LineAdapter<R, W> {
    fn ask_line(&self, prompt: &str) -> InteractionResult<String> {
        self.emit(prompt);

        let mut line = String::new();
        let read = self.input.borrow_mut().read_line(&mut line)?;
        if read == 0 {
            return Err(InteractionError::Eof);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn print_info(&self, message: &str) {
        self.emit(&format!("{}\n", message));
    }

    fn print_warning(&self, message: &str) {
        self.emit(&format!("{}\n", message));
    }

    fn print_error(&self, message: &str) {
        self.emit(&format!("{}\n", message));
    }
}
