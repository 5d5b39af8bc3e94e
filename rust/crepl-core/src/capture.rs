//! Multi-line entry: function and block capture.
//!
//! The REPL owns a [`Capture`] and feeds it one line at a time while a
//! capture is open. Lines accumulate with a `\n` after each; a terminator
//! keyword closes the capture and yields the accumulated fragment, which is
//! then routed through [`Session::add_code`](crate::Session::add_code) with
//! the kind's `in_main` flag.

/// The two kinds of multi-line entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// A top-level definition, placed before `main`.
    Function,
    /// A run of statements placed inside `main`.
    Block,
}

impl CaptureKind {
    /// Recognise the keyword that opens a capture.
    pub fn from_opener(line: &str) -> Option<Self> {
        match line {
            "func" | "function" => Some(Self::Function),
            "multi" | "multiline" => Some(Self::Block),
            _ => None,
        }
    }

    pub fn terminators(self) -> &'static [&'static str] {
        match self {
            Self::Function => &["endfunc", "endfunction"],
            Self::Block => &["endmulti", "endmultiline"],
        }
    }

    pub fn is_terminator(self, line: &str) -> bool {
        self.terminators().contains(&line)
    }

    /// Whether the captured fragment falls back to `main` or to top level.
    pub fn in_main(self) -> bool {
        matches!(self, Self::Block)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Block => "multiline",
        }
    }
}

/// What feeding a line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// The line was accumulated; the capture is still open.
    Continue,
    /// A terminator closed the capture.
    Finished {
        kind: CaptureKind,
        fragment: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Capture {
    #[default]
    Normal,
    Capturing {
        kind: CaptureKind,
        buffer: String,
    },
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a capture, discarding any capture already in progress.
    pub fn begin(&mut self, kind: CaptureKind) {
        *self = Self::Capturing {
            kind,
            buffer: String::new(),
        };
    }

    pub fn kind(&self) -> Option<CaptureKind> {
        match self {
            Self::Normal => None,
            Self::Capturing { kind, .. } => Some(*kind),
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.kind().is_some()
    }

    /// Feed one raw line. Returns `None` when no capture is open.
    pub fn feed(&mut self, line: &str) -> Option<Feed> {
        let Self::Capturing { kind, buffer } = self else {
            return None;
        };

        if kind.is_terminator(line) {
            let kind = *kind;
            let fragment = std::mem::take(buffer);
            *self = Self::Normal;
            return Some(Feed::Finished { kind, fragment });
        }

        buffer.push_str(line);
        buffer.push('\n');
        Some(Feed::Continue)
    }

    /// Abandon the open capture, returning what had been accumulated.
    pub fn cancel(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Self::Normal => None,
            Self::Capturing { buffer, .. } => Some(buffer),
        }
    }
}
