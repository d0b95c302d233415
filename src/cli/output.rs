//! Colored terminal output.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, IsTerminal, Write};

/// Writes user-facing progress to stdout and problems to stderr.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    stdout_choice: ColorChoice,
    stderr_choice: ColorChoice,
}

impl OutputManager {
    /// Creates a manager; `quiet` suppresses everything except errors.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose: verbose && !quiet,
            quiet,
            stdout_choice: color_choice(io::stdout().is_terminal()),
            stderr_choice: color_choice(io::stderr().is_terminal()),
        }
    }

    /// Prints a detail line in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        let mut out = StandardStream::stdout(self.stdout_choice);
        out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
        write!(out, "  · ")?;
        out.reset()?;
        writeln!(out, "{}", message)
    }

    /// Prints a step that is starting.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(self.stdout_choice);
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(out, "→ ")?;
        out.reset()?;
        writeln!(out, "{}", message)
    }

    /// Prints a completed step.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(self.stdout_choice);
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(out, "✓ ")?;
        out.reset()?;
        writeln!(out, "{}", message)
    }

    /// Prints a warning to stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut err = StandardStream::stderr(self.stderr_choice);
        err.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        write!(err, "warning: ")?;
        err.reset()?;
        writeln!(err, "{}", message)
    }

    /// Prints an error to stderr, even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        let mut err = StandardStream::stderr(self.stderr_choice);
        err.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(err, "error: ")?;
        err.reset()?;
        writeln!(err, "{}", message)
    }

    /// Prints a bold section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(self.stdout_choice);
        out.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(out, "{}", title)?;
        out.reset()
    }

    /// Prints an indented line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(self.stdout_choice);
        writeln!(out, "  {}", message)
    }
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
