//! CLI adapter implementation using dialoguer for interactive prompts
//!
//! On a terminal, prompt header lines are printed as-is and the final line is
//! read through a dialoguer `Input` so the operator gets line editing. Piped
//! input falls back to a plain `read_line` on stdin, which keeps scripted
//! runs byte-for-byte predictable.

use std::fmt::Write as FmtWrite;
use std::io::{BufRead, IsTerminal, Write};

use console::{Style, Term};
use dialoguer::Input;
use dialoguer::theme::Theme;

use safecp_core::interaction::{InteractionAdapter, InteractionError, InteractionResult};

use crate::colors::{COLORS, paint};

/// Theme that renders prompts verbatim, with no decoration of its own
struct PlainTheme {
    answer_style: Style,
}

impl PlainTheme {
    fn new() -> Self {
        Self {
            answer_style: Style::new().cyan(),
        }
    }
}

impl Theme for PlainTheme {
    fn format_input_prompt(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        _default: Option<&str>,
    ) -> std::fmt::Result {
        write!(f, "{}", prompt)
    }

    fn format_input_prompt_selection(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        sel: &str,
    ) -> std::fmt::Result {
        write!(f, "{}{}", prompt, self.answer_style.apply_to(sel))
    }
}

/// Split a prompt into its header lines and the final input line
fn split_prompt(prompt: &str) -> (Option<&str>, &str) {
    match prompt.rfind('\n') {
        Some(idx) => (Some(&prompt[..idx]), &prompt[idx + 1..]),
        None => (None, prompt),
    }
}

/// CLI adapter for terminal-based operator interaction
pub struct CliAdapter {
    is_tty: bool,
    color_stdout: bool,
    color_stderr: bool,
}

impl CliAdapter {
    pub fn new() -> Self {
        Self {
            is_tty: std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
            color_stdout: std::io::stdout().is_terminal(),
            color_stderr: std::io::stderr().is_terminal(),
        }
    }

    #[allow(dead_code)]
    pub fn with_tty(is_tty: bool) -> Self {
        Self {
            is_tty,
            color_stdout: is_tty,
            color_stderr: is_tty,
        }
    }

    #[allow(dead_code)]
    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// Print a success line (used for the end-of-run summary)
    pub fn print_success(&self, message: &str) {
        println!("{}", paint(message, COLORS.success, self.color_stdout));
        let _ = std::io::stdout().flush();
    }

    fn ask_tty(&self, prompt: &str) -> InteractionResult<String> {
        let (header, line) = split_prompt(prompt);
        if let Some(header) = header {
            println!("{}", header);
        }

        let theme = PlainTheme::new();
        Input::<String>::with_theme(&theme)
            .with_prompt(line)
            .allow_empty(true)
            .interact_text_on(&Term::stdout())
            .map_err(Self::convert_dialoguer_error)
    }

    fn ask_piped(&self, prompt: &str) -> InteractionResult<String> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(InteractionError::Eof);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn convert_dialoguer_error(err: dialoguer::Error) -> InteractionError {
        match err {
            dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                InteractionError::Eof
            }
            other => InteractionError::Io(other.to_string()),
        }
    }
}

impl Default for CliAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionAdapter for CliAdapter {
    fn ask_line(&self, prompt: &str) -> InteractionResult<String> {
        if self.is_tty {
            self.ask_tty(prompt)
        } else {
            self.ask_piped(prompt)
        }
    }

    fn print_info(&self, message: &str) {
        println!("{}", message);
        let _ = std::io::stdout().flush();
    }

    fn print_header(&self, message: &str) {
        println!("{}", paint(message, COLORS.active, self.color_stdout));
        let _ = std::io::stdout().flush();
    }

    fn print_warning(&self, message: &str) {
        println!("{}", paint(message, COLORS.warning, self.color_stdout));
        let _ = std::io::stdout().flush();
    }

    fn print_error(&self, message: &str) {
        eprintln!("{}", paint(message, COLORS.fail, self.color_stderr));
        let _ = std::io::stderr().flush();
    }
}
