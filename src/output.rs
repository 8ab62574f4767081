//! Terminal output for agent-pr.
//!
//! stdout carries exactly one JSON document per run (a success result or an
//! error report) so agents can parse it. Everything meant for humans goes
//! to stderr, colored.

use std::io::{self, Write};

use serde::Serialize;

use crate::error::{AgentPrError, ErrorKind};

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

pub use colors::*;

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{RED}{BOLD}Error:{RESET} {}", msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{YELLOW}Warning:{RESET} {}", msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    eprintln!("{CYAN}Info:{RESET} {}", msg);
}

/// Print a hint line under an error.
pub fn print_hint(hint: &str) {
    eprintln!("{GRAY}Hint: {}{RESET}", hint);
}

/// Print a progress line for an operation about to hit the API.
pub fn print_progress(msg: &str) {
    eprintln!("{CYAN}{}...{RESET}", msg);
}

/// Print a success line.
pub fn print_success(msg: &str) {
    eprintln!("{GREEN}{}{RESET}", msg);
}

#[derive(Serialize)]
struct Success<'a, T: Serialize> {
    status: &'static str,
    #[serde(flatten)]
    result: &'a T,
}

/// Machine-readable form of an error.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&AgentPrError> for ErrorReport {
    fn from(err: &AgentPrError) -> Self {
        let (comment_id, index, field) = match err {
            AgentPrError::DuplicateReply { comment_id } => (Some(*comment_id), None, None),
            AgentPrError::Validation { index, field, .. } => (None, *index, Some(field.clone())),
            _ => (None, None, None),
        };

        Self {
            error: err.to_string(),
            kind: err.kind(),
            status: err.status(),
            hint: err.hint(),
            comment_id,
            index,
            field,
        }
    }
}

/// Serialize `value` as one line of JSON.
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut writer, value)?;
    writeln!(writer)
}

/// Write `{"status": "ok", ...result}`.
pub fn write_success<W: Write, T: Serialize>(writer: W, result: &T) -> io::Result<()> {
    write_json(
        writer,
        &Success {
            status: "ok",
            result,
        },
    )
}

/// Emit a success result on stdout.
pub fn emit_success<T: Serialize>(result: &T) {
    if let Err(e) = write_success(io::stdout().lock(), result) {
        print_error(&format!("Failed to write result: {}", e));
    }
}

/// Report an error: colored text on stderr, JSON on stdout.
pub fn emit_error(err: &AgentPrError) {
    print_error(&err.to_string());
    if let Some(hint) = err.hint() {
        print_hint(hint);
    }
    if let Err(e) = write_json(io::stdout().lock(), &ErrorReport::from(err)) {
        print_error(&format!("Failed to write result: {}", e));
    }
}
