//! Line-at-a-time REPL logic, independent of any terminal.
//!
//! The [`Driver`] owns the session and the capture state. Each input line is
//! parsed into a [`ReplCommand`], applied to the session, and followed by a
//! rebuild through the [`Backend`] when the command calls for one. Messages
//! go to the writer given at construction; the program's own output goes
//! wherever the backend sends it.

use std::io::{self, Write};

use crepl_core::{Capture, CaptureKind, CompilerCommand, Feed, PrintKind, Route, Session};
use tracing::debug;

use crate::colors::{bold, cyan, gray, red, yellow};
use crate::error_chain::format_error_chain;
use crate::toolchain::{Backend, BuildReport, StepStatus};

/// Keywords recognised on a fresh prompt, for help and completion.
pub const KEYWORDS: &[&str] = &[
    "exit",
    "help",
    "restart",
    "undo",
    "file",
    "state",
    "compiler",
    "pprint",
    "func",
    "function",
    "multi",
    "multiline",
];

const FILE_RULE_WIDTH: usize = 20;

// =============================================================================
// Parsing
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Exit,
    Help,
    Restart,
    Undo,
    File,
    State,
    /// A blank line: rebuild and rerun the current program.
    Rerun,
    ShowCompiler,
    SetCompiler(Vec<String>),
    PrettyPrint { kind: &'a str, var: &'a str },
    Capture(CaptureKind),
    Code(&'a str),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParsedCommand<'a> {
    Command(ReplCommand<'a>),
    InvalidUsage(String),
}

/// Interpret one line typed at a fresh prompt.
///
/// Keywords are matched exactly; anything else is a code fragment and is
/// passed through untrimmed.
pub fn parse_repl_command(line: &str) -> ParsedCommand<'_> {
    let command = match line {
        "exit" => ReplCommand::Exit,
        "help" | "h" => ReplCommand::Help,
        "restart" => ReplCommand::Restart,
        "undo" => ReplCommand::Undo,
        "file" => ReplCommand::File,
        "state" => ReplCommand::State,
        "" => ReplCommand::Rerun,
        _ => {
            if let Some(kind) = CaptureKind::from_opener(line) {
                ReplCommand::Capture(kind)
            } else if let Some(rest) = keyword_args(line, "compiler") {
                return parse_compiler_args(rest);
            } else if let Some(rest) = keyword_args(line, "pprint") {
                return parse_pprint_args(rest);
            } else {
                ReplCommand::Code(line)
            }
        }
    };
    ParsedCommand::Command(command)
}

/// `Some(args)` when `line` is `keyword` alone or followed by whitespace.
fn keyword_args<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn parse_compiler_args(rest: &str) -> ParsedCommand<'_> {
    if rest.is_empty() {
        return ParsedCommand::Command(ReplCommand::ShowCompiler);
    }
    match shell_words::split(rest) {
        Ok(args) => ParsedCommand::Command(ReplCommand::SetCompiler(args)),
        Err(err) => ParsedCommand::InvalidUsage(format!(
            "cannot parse compiler command: {}. Usage: compiler <program> [flags...]",
            err
        )),
    }
}

fn parse_pprint_args(rest: &str) -> ParsedCommand<'_> {
    let mut words = rest.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some(kind), Some(var), None) => {
            ParsedCommand::Command(ReplCommand::PrettyPrint { kind, var })
        }
        _ => ParsedCommand::InvalidUsage(format!(
            "Usage: pprint <kind> <variable>  (kinds: {})",
            PrintKind::names().join(", ")
        )),
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// How a fresh session is built on start and on `restart`.
#[derive(Debug, Clone)]
pub struct SessionSeed {
    pub compiler: CompilerCommand,
    pub default_include: String,
}

impl SessionSeed {
    fn session(&self) -> Session {
        Session::new(self.compiler.clone(), &self.default_include)
    }
}

pub struct Driver<B: Backend, W: Write> {
    session: Session,
    capture: Capture,
    seed: SessionSeed,
    backend: B,
    out: W,
}

impl<B: Backend, W: Write> Driver<B, W> {
    pub fn new(seed: SessionSeed, backend: B, out: W) -> Self {
        Self {
            session: seed.session(),
            capture: Capture::new(),
            seed,
            backend,
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn prompt(&self) -> &'static str {
        if self.capture.is_capturing() {
            "> "
        } else {
            ">>> "
        }
    }

    /// Build and run the initial program.
    pub fn start(&mut self) -> io::Result<()> {
        self.rebuild()
    }

    /// Process one input line.
    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match self.capture.feed(line) {
            Some(Feed::Continue) => return Ok(Flow::Continue),
            Some(Feed::Finished { kind, fragment }) => {
                let route = self.session.add_code(fragment, kind.in_main());
                debug!(capture = kind.name(), ?route, "capture finished");
                self.rebuild()?;
                return Ok(Flow::Continue);
            }
            None => {}
        }

        let command = match parse_repl_command(line) {
            ParsedCommand::Command(command) => command,
            ParsedCommand::InvalidUsage(usage) => {
                writeln!(self.out, "{} {}", red("Error:"), usage)?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            ReplCommand::Exit => return Ok(Flow::Exit),
            ReplCommand::Help => {
                self.print_help()?;
                return Ok(Flow::Continue);
            }
            ReplCommand::File => {
                self.print_file()?;
                return Ok(Flow::Continue);
            }
            ReplCommand::State => {
                writeln!(self.out, "{}", self.session)?;
                return Ok(Flow::Continue);
            }
            ReplCommand::Capture(kind) => {
                self.capture.begin(kind);
                let ends = kind.terminators().join(" or ");
                writeln!(self.out, "{}", gray(&format!("{} mode, end using {}", kind.name(), ends)))?;
                return Ok(Flow::Continue);
            }
            ReplCommand::PrettyPrint { kind, var } => {
                if let Err(err) = self.session.pretty_print_named(kind, var) {
                    writeln!(self.out, "{} {}", red("Error:"), err)?;
                    return Ok(Flow::Continue);
                }
            }
            ReplCommand::Restart => {
                self.session = self.seed.session();
                self.capture = Capture::new();
                writeln!(self.out, "{}", gray("Session restarted."))?;
            }
            ReplCommand::Undo => {
                let outcome = self.session.undo();
                if outcome.history_was_empty {
                    writeln!(self.out, "{}", yellow("Nothing to undo"))?;
                }
            }
            ReplCommand::ShowCompiler => {
                writeln!(self.out, "compiler: {}", cyan(&self.session.compiler().to_string()))?;
            }
            ReplCommand::SetCompiler(args) => match self.session.set_compiler(args) {
                Ok(old) => {
                    writeln!(self.out, "old compiler: {}", old)?;
                    writeln!(
                        self.out,
                        "new compiler: {}",
                        cyan(&self.session.compiler().to_string())
                    )?;
                }
                Err(err) => {
                    writeln!(self.out, "{} {}", red("Error:"), err)?;
                    return Ok(Flow::Continue);
                }
            },
            ReplCommand::Code(fragment) => {
                let route = self.session.add_code(fragment, true);
                if let Route::Section(kind) = route {
                    debug!(section = %kind, "fragment stored");
                }
            }
            ReplCommand::Rerun => {}
        }

        self.rebuild()?;
        Ok(Flow::Continue)
    }

    /// Abandon an open capture (Ctrl-C). Returns whether one was open.
    pub fn interrupt(&mut self) -> io::Result<bool> {
        match self.capture.cancel() {
            Some(discarded) => {
                debug!(bytes = discarded.len(), "capture cancelled");
                writeln!(self.out, "{}", gray("(capture discarded)"))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn rebuild(&mut self) -> io::Result<()> {
        self.out.flush()?;
        match self.backend.build_and_run(&self.session) {
            Ok(report) => self.report(&report),
            Err(err) => writeln!(self.out, "{}", red(&format_error_chain(&err))),
        }
    }

    fn report(&mut self, report: &BuildReport) -> io::Result<()> {
        if let StepStatus::Failed { code } = report.compile {
            let status = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
            writeln!(
                self.out,
                "{}",
                red(&format!("compilation failed (exit status {}); `undo` to revert", status))
            )?;
        }
        if let StepStatus::Unavailable(ref reason) = report.run {
            writeln!(self.out, "{}", yellow(&format!("program not run: {}", reason)))?;
        }
        Ok(())
    }

    fn print_file(&mut self) -> io::Result<()> {
        let label = match self.backend.source_path() {
            Some(path) => path.display().to_string(),
            None => "generated source".to_string(),
        };
        let rule = "-".repeat(FILE_RULE_WIDTH);
        writeln!(self.out, "Contents of {}", label)?;
        writeln!(self.out, "{}", rule)?;
        write!(self.out, "{}", self.session.assemble())?;
        writeln!(self.out, "{}", rule)
    }

    fn print_help(&mut self) -> io::Result<()> {
        let rows: &[(&str, &str)] = &[
            ("exit", "End the program"),
            ("help, h", "Show this help"),
            ("restart", "Start over with a fresh session"),
            ("undo", "Revert the most recent addition"),
            ("file", "Show the generated source file"),
            ("state", "Show the session sections and history"),
            ("func[tion]", "Begin entering a multi-line function"),
            ("endfunc[tion]", "Finish the function"),
            ("multi[line]", "Begin entering multi-line code for main"),
            ("endmulti[line]", "Finish the multi-line code"),
            ("<enter>", "Rebuild and rerun the current program"),
            ("compiler", "Show the current compiler"),
            ("compiler <cmd>", "Change the compiler; flags may follow"),
            ("pprint <kind> <var>", "Print a variable"),
        ];
        writeln!(self.out, "{}", bold("Commands:"))?;
        for (keys, text) in rows {
            writeln!(self.out, "  {}{}", cyan(&format!("{:<22}", keys)), gray(text))?;
        }
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}",
            gray(&format!("pprint kinds: {}", PrintKind::names().join(", ")))
        )?;
        writeln!(
            self.out,
            "{}",
            gray("Anything else is code: #include and using lines go to the top, cout/print lines replace the output statement, the rest goes into main.")
        )
    }
}
