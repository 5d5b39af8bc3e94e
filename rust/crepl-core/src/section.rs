//! Ordered fragment buckets and the single pending print slot.

use strum::{Display, EnumIter};

/// The four places a fragment can land in the generated program.
///
/// Variants are listed in the order their sections appear in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SectionKind {
    Include,
    Namespace,
    Function,
    Command,
}

/// Fragment storage for one session.
///
/// Each section keeps fragments verbatim in insertion order. The print slot
/// holds at most one fragment; an empty string is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionStore {
    includes: Vec<String>,
    namespaces: Vec<String>,
    functions: Vec<String>,
    commands: Vec<String>,
    print: Option<String>,
}

impl SectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::Include => &self.includes,
            SectionKind::Namespace => &self.namespaces,
            SectionKind::Function => &self.functions,
            SectionKind::Command => &self.commands,
        }
    }

    fn section_mut(&mut self, kind: SectionKind) -> &mut Vec<String> {
        match kind {
            SectionKind::Include => &mut self.includes,
            SectionKind::Namespace => &mut self.namespaces,
            SectionKind::Function => &mut self.functions,
            SectionKind::Command => &mut self.commands,
        }
    }

    pub fn push(&mut self, kind: SectionKind, text: String) {
        self.section_mut(kind).push(text);
    }

    /// Remove and return the newest fragment of `kind`.
    pub fn pop(&mut self, kind: SectionKind) -> Option<String> {
        self.section_mut(kind).pop()
    }

    pub fn contains(&self, kind: SectionKind, text: &str) -> bool {
        self.section(kind).iter().any(|fragment| fragment == text)
    }

    pub fn print(&self) -> Option<&str> {
        self.print.as_deref()
    }

    /// Replace the print slot. Empty text empties the slot.
    pub fn set_print(&mut self, text: String) -> Option<String> {
        let previous = self.print.take();
        if !text.is_empty() {
            self.print = Some(text);
        }
        previous
    }

    pub fn take_print(&mut self) -> Option<String> {
        self.print.take()
    }

    /// Total number of fragments across the four sections (print excluded).
    pub fn fragment_count(&self) -> usize {
        self.includes.len() + self.namespaces.len() + self.functions.len() + self.commands.len()
    }
}
