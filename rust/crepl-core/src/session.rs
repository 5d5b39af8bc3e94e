//! The accumulating program for one REPL lifetime.
//!
//! A [`Session`] owns the four code sections, the print slot, the insertion
//! history and the compiler command. All mutation goes through the methods
//! here so the history always mirrors the sections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::debug;

use crate::classify::{classify, Route};
use crate::history::InsertionHistory;
use crate::pprint::{generate_print_snippet, PrintKind, STREAM_INCLUDE};
use crate::section::{SectionKind, SectionStore};

/// Include seeded into every fresh session.
pub const DEFAULT_INCLUDE: &str = "#include <stdio.h>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown pretty-print kind '{0}' (expected one of: {kinds})", kinds = PrintKind::names().join(", "))]
    UnknownPrintKind(String),
    #[error("compiler command must name a program")]
    EmptyCompiler,
}

// =============================================================================
// Compiler command
// =============================================================================

/// Program and flags used to compile the generated source.
///
/// The source path is appended as the last argument at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerCommand {
    pub program: String,
    #[serde(default)]
    pub flags: Vec<String>,
}

impl Default for CompilerCommand {
    fn default() -> Self {
        Self {
            program: "g++".to_string(),
            flags: Vec::new(),
        }
    }
}

impl CompilerCommand {
    /// Build from an argv-style list: the first entry is the program.
    pub fn from_args<I, S>(args: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program = args
            .next()
            .filter(|p: &String| !p.trim().is_empty())
            .ok_or(SessionError::EmptyCompiler)?;
        Ok(Self {
            program,
            flags: args.collect(),
        })
    }

    /// The command as an argv list, program first.
    pub fn args(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.flags.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for CompilerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args().join(" "))
    }
}

// =============================================================================
// Undo
// =============================================================================

/// What an undo removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reverted {
    Print(String),
    Fragment { kind: SectionKind, text: String },
}

/// Result of [`Session::undo`].
///
/// `history_was_empty` and `reverted` are independent: a pending print is
/// cleared even when there was no history to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoOutcome {
    pub history_was_empty: bool,
    pub reverted: Option<Reverted>,
}

impl UndoOutcome {
    pub fn changed_state(&self) -> bool {
        self.reverted.is_some()
    }
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    store: SectionStore,
    history: InsertionHistory,
    compiler: CompilerCommand,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CompilerCommand::default(), DEFAULT_INCLUDE)
    }
}

impl Session {
    /// Create a session seeded with `default_include`.
    ///
    /// The seed is not recorded in the history, so it can never be undone.
    /// An empty seed leaves the include section empty.
    pub fn new(compiler: CompilerCommand, default_include: &str) -> Self {
        let mut store = SectionStore::new();
        if !default_include.is_empty() {
            store.push(SectionKind::Include, default_include.to_string());
        }
        Self {
            store,
            history: InsertionHistory::new(),
            compiler,
        }
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Append `text` to the section for `kind`.
    ///
    /// Any pending print is dropped: it described the program before this
    /// edit.
    pub fn add_fragment(&mut self, kind: SectionKind, text: impl Into<String>) {
        let text = text.into();
        if let Some(dropped) = self.store.take_print() {
            debug!(print = %dropped, "pending print superseded");
        }
        debug!(section = %kind, fragment = %text, "append");
        self.store.push(kind, text);
        self.history.record(kind);
    }

    pub fn add_include(&mut self, text: impl Into<String>) {
        self.add_fragment(SectionKind::Include, text);
    }

    pub fn add_namespace(&mut self, text: impl Into<String>) {
        self.add_fragment(SectionKind::Namespace, text);
    }

    pub fn add_function(&mut self, text: impl Into<String>) {
        self.add_fragment(SectionKind::Function, text);
    }

    pub fn add_command(&mut self, text: impl Into<String>) {
        self.add_fragment(SectionKind::Command, text);
    }

    /// Replace the pending print statement. Never touches the history.
    pub fn set_print(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(fragment = %text, "set print");
        self.store.set_print(text);
    }

    /// Classify `fragment` and store it where it belongs.
    pub fn add_code(&mut self, fragment: impl Into<String>, in_main: bool) -> Route {
        let fragment = fragment.into();
        let route = classify(&fragment, in_main);
        match route {
            Route::Section(kind) => self.add_fragment(kind, fragment),
            Route::Print => self.set_print(fragment),
        }
        route
    }

    /// Revert the most recent edit.
    pub fn undo(&mut self) -> UndoOutcome {
        let history_was_empty = self.history.is_empty();
        if history_was_empty {
            debug!("undo with empty history");
        }

        let reverted = if let Some(print) = self.store.take_print() {
            Some(Reverted::Print(print))
        } else {
            self.history.pop().and_then(|kind| {
                self.store
                    .pop(kind)
                    .map(|text| Reverted::Fragment { kind, text })
            })
        };
        debug!(?reverted, history = self.history.len(), "undo");

        UndoOutcome {
            history_was_empty,
            reverted,
        }
    }

    /// Add `include` unless an identical include is already present.
    ///
    /// Returns `true` when the include was added.
    pub fn ensure_include(&mut self, include: &str) -> bool {
        if self.store.contains(SectionKind::Include, include) {
            return false;
        }
        self.add_include(include);
        true
    }

    /// Install a pretty-print snippet for `var` as the pending print.
    pub fn pretty_print(&mut self, kind: PrintKind, var: &str) {
        self.ensure_include(STREAM_INCLUDE);
        self.set_print(generate_print_snippet(kind, var));
    }

    /// [`Session::pretty_print`] with the kind given by name.
    ///
    /// Unknown kinds leave the session untouched.
    pub fn pretty_print_named(&mut self, kind: &str, var: &str) -> Result<(), SessionError> {
        let kind = PrintKind::from_str(kind)
            .map_err(|_| SessionError::UnknownPrintKind(kind.to_string()))?;
        self.pretty_print(kind, var);
        Ok(())
    }

    // ── Compiler ────────────────────────────────────────────────────

    pub fn compiler(&self) -> &CompilerCommand {
        &self.compiler
    }

    /// Replace the compiler command, returning the previous one.
    pub fn set_compiler<I, S>(&mut self, args: I) -> Result<CompilerCommand, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next = CompilerCommand::from_args(args)?;
        debug!(compiler = %next, "compiler changed");
        Ok(std::mem::replace(&mut self.compiler, next))
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn section(&self, kind: SectionKind) -> &[String] {
        self.store.section(kind)
    }

    pub fn print(&self) -> Option<&str> {
        self.store.print()
    }

    pub fn history(&self) -> &InsertionHistory {
        &self.history
    }

    /// The full text of the generated source file.
    pub fn assemble(&self) -> String {
        crate::assemble::assemble(self)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "compiler: {}", self.compiler)?;
        for kind in SectionKind::iter() {
            writeln!(f, "{}: {:?}", kind, self.section(kind))?;
        }
        writeln!(f, "print: {:?}", self.print().unwrap_or(""))?;
        let order: Vec<String> = self.history.iter().map(|k| k.to_string()).collect();
        write!(f, "history: [{}]", order.join(", "))
    }
}
