//! LIFO record of section mutations, used only to drive undo.

use crate::section::SectionKind;

/// Which section received each append, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertionHistory {
    records: Vec<SectionKind>,
}

impl InsertionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: SectionKind) {
        self.records.push(kind);
    }

    pub fn pop(&mut self) -> Option<SectionKind> {
        self.records.pop()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SectionKind> + '_ {
        self.records.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_order() {
        let mut history = InsertionHistory::new();
        history.record(SectionKind::Include);
        history.record(SectionKind::Command);
        history.record(SectionKind::Include);

        assert_eq!(history.len(), 3);
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            [SectionKind::Include, SectionKind::Command, SectionKind::Include]
        );
        assert_eq!(history.pop(), Some(SectionKind::Include));
        assert_eq!(history.pop(), Some(SectionKind::Command));
        assert_eq!(history.pop(), Some(SectionKind::Include));
        assert_eq!(history.pop(), None);
        assert!(history.is_empty());
    }
}
