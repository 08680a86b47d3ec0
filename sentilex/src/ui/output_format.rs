//! Styled status messages on stderr.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Whether stderr should receive ANSI colours.
pub fn stderr_supports_color() -> bool {
    io::stderr().is_terminal()
}

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, color: bool) -> io::Result<()> {
    if color {
        writeln!(writer, "{}", message.cyan())
    } else {
        writeln!(writer, "{}", message)
    }
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, color: bool) -> io::Result<()> {
    if color {
        writeln!(writer, "{} {}", "Warning:".yellow().bold(), message.yellow())
    } else {
        writeln!(writer, "Warning: {}", message)
    }
}

pub fn print_error_message<W: Write>(writer: &mut W, message: &str, color: bool) -> io::Result<()> {
    if color {
        writeln!(writer, "{} {}", "Error:".red().bold(), message.red())
    } else {
        writeln!(writer, "Error: {}", message)
    }
}

/// Prints a warning to stderr, ignoring write failures.
pub fn warn_msg(message: impl AsRef<str>) {
    let _ = print_warn_message(&mut io::stderr(), message.as_ref(), stderr_supports_color());
}

pub fn info_msg(message: impl AsRef<str>) {
    let _ = print_info_message(&mut io::stderr(), message.as_ref(), stderr_supports_color());
}
