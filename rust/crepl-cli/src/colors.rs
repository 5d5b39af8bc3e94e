//! ANSI color helpers for CLI output.
//!
//! Coloring is global and on by default; the binary switches it off when
//! stdout is not a terminal or `NO_COLOR` is set.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(true);

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether the current process should emit color at all.
pub fn detect() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

fn paint_with(enabled: bool, code: &str, s: &str) -> String {
    if enabled {
        format!("\x1b[{}m{}\x1b[0m", code, s)
    } else {
        s.to_string()
    }
}

fn paint(code: &str, s: &str) -> String {
    paint_with(ENABLED.load(Ordering::Relaxed), code, s)
}

pub fn red(s: &str) -> String {
    paint("31", s)
}

pub fn yellow(s: &str) -> String {
    paint("33", s)
}

pub fn cyan(s: &str) -> String {
    paint("36", s)
}

pub fn bold(s: &str) -> String {
    paint("1", s)
}

pub fn gray(s: &str) -> String {
    paint("90", s)
}

/// Right-aligned bold green status word, e.g. `   Compiling`.
pub fn status_label(label: &str) -> String {
    paint("1;32", &format!("{:>12}", label))
}
