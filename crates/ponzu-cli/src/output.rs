//! Formatted output helpers for CLI commands.
//!
//! Provides the console progress reporter, colored status lines, and
//! human-readable byte formatting.

#![allow(clippy::print_stderr)]

use std::path::Path;

use ponzu_common::constants::APP_NAME;
use ponzu_toolchain::pipeline::{Reporter, Step};
use ponzu_toolchain::process::Invocation;
use ponzu_vendor::merge::Conflict;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Prints pipeline progress to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn step_started(&self, step: Step) {
        eprintln!("  {BOLD}=>{RESET} {step}");
    }

    fn conflict(&self, conflict: &Conflict) {
        eprintln!("  {YELLOW}warning:{RESET} {}", conflict_message(conflict));
    }

    fn invocation(&self, invocation: &Invocation) {
        eprintln!("  {DIM}$ {invocation}{RESET}");
    }

    fn dependency_command(&self, command: &str) {
        eprintln!("  {DIM}{}{RESET}", dependency_message(command));
    }
}

/// Echo line for a custom dependency command.
#[must_use]
pub fn dependency_message(command: &str) -> String {
    format!("{APP_NAME} docker: {command}")
}

/// Describes an overwritten vendored file.
#[must_use]
pub fn conflict_message(conflict: &Conflict) -> String {
    format!(
        "{} conflicts with an existing vendored file and was overwritten ({})",
        conflict.relative.display(),
        conflict.destination.display()
    )
}

/// Prints the tool banner.
pub fn print_header() {
    eprintln!();
    eprintln!("  {BOLD}{APP_NAME}{RESET} {DIM}v{}{RESET}", env!("CARGO_PKG_VERSION"));
    eprintln!();
}

/// Prints a success line for a produced file, with its size when readable.
pub fn print_artifact(label: &str, path: &Path) {
    let size = std::fs::metadata(path)
        .map(|m| format!(" {DIM}({}){RESET}", format_bytes(m.len())))
        .unwrap_or_default();
    eprintln!();
    eprintln!("  {GREEN}{BOLD}{label}{RESET} {}{size}", path.display());
}

/// Prints a plain success line.
pub fn print_done(message: &str) {
    eprintln!();
    eprintln!("  {GREEN}{BOLD}{message}{RESET}");
}

/// Formats a byte count into a human-readable string (e.g., "128 MiB").
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
