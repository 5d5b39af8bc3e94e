//! crepl core
//!
//! The session model behind the crepl loop: ordered code sections, the
//! pending print slot, the undo history, fragment routing, and the assembler
//! that turns a session into the text of a compilable source file.

pub mod assemble;
pub mod capture;
pub mod classify;
pub mod history;
pub mod pprint;
pub mod section;
pub mod session;

pub use assemble::assemble;
pub use capture::{Capture, CaptureKind, Feed};
pub use classify::{classify, Route};
pub use pprint::{generate_print_snippet, PrintKind};
pub use section::SectionKind;
pub use session::{CompilerCommand, Reverted, Session, SessionError, UndoOutcome};
