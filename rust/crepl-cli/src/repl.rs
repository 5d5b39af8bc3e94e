//! Interactive loop: a rustyline editor feeding the [`Driver`].

use std::fs;
use std::io;
use std::path::Path;

use crepl_core::PrintKind;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use thiserror::Error;
use tracing::{debug, warn};

use crate::colors::{bold, cyan, gray, red};
use crate::config::CreplConfig;
use crate::driver::{Driver, Flow, SessionSeed, KEYWORDS};
use crate::toolchain::Backend;

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("line editor failed")]
    Editor(#[from] ReadlineError),
    #[error("cannot write to the terminal")]
    Output(#[from] io::Error),
}

/// Completer for REPL keywords and `pprint` kinds.
struct CreplHelper {
    kinds: Vec<String>,
}

impl CreplHelper {
    fn new() -> Self {
        Self {
            kinds: PrintKind::names(),
        }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let before = &line[..pos];
        let pair = |word: &str| Pair {
            display: word.to_string(),
            replacement: word.to_string(),
        };

        // `pprint <kind>`: complete the kind
        if let Some(rest) = before.strip_prefix("pprint ") {
            if !rest.contains(char::is_whitespace) {
                let start = pos - rest.len();
                let matches = self
                    .kinds
                    .iter()
                    .filter(|kind| kind.starts_with(rest))
                    .map(|kind| pair(kind))
                    .collect();
                return (start, matches);
            }
            return (pos, Vec::new());
        }

        // keywords only at the very start of the line
        if before.is_empty() || before.contains(char::is_whitespace) {
            return (pos, Vec::new());
        }
        let matches = KEYWORDS
            .iter()
            .filter(|kw| kw.starts_with(before))
            .map(|kw| pair(kw))
            .collect();
        (0, matches)
    }
}

impl Completer for CreplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for CreplHelper {
    type Hint = String;
}

impl Highlighter for CreplHelper {}

impl Validator for CreplHelper {}

impl Helper for CreplHelper {}

/// Run the interactive loop until `exit` or end of input.
pub fn run_repl(config: &CreplConfig) -> Result<(), ReplError> {
    if config.repl.banner {
        println!("{}", bold(&cyan(&format!("crepl v{}", env!("CARGO_PKG_VERSION")))));
        println!("{}", gray("C/C++ one line at a time. To get help, type h[elp]"));
    }

    let editor_config = rustyline::Config::builder().auto_add_history(true).build();
    let mut rl: Editor<CreplHelper, DefaultHistory> = Editor::with_config(editor_config)?;
    rl.set_helper(Some(CreplHelper::new()));

    let history_path = config.history_path();
    if let Some(ref path) = history_path {
        if path.exists() {
            if let Err(err) = rl.load_history(path) {
                warn!(path = %path.display(), error = %err, "failed to load history");
            }
        }
    }

    let toolchain = config.toolchain();
    debug!(source = ?toolchain.source_path(), "starting session");
    let mut driver = Driver::new(seed_from(config), toolchain, io::stdout());
    driver.start()?;

    loop {
        match rl.readline(driver.prompt()) {
            Ok(line) => {
                if driver.handle_line(&line)? == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if !driver.interrupt()? {
                    println!("{}", gray("(type exit or press Ctrl-D to quit)"));
                }
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{} {}", red("Error:"), err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        save_history(&mut rl, path);
    }
    Ok(())
}

fn save_history(rl: &mut Editor<CreplHelper, DefaultHistory>, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(dir = %parent.display(), error = %err, "failed to create history directory");
        }
    }
    if let Err(err) = rl.save_history(path) {
        warn!(path = %path.display(), error = %err, "failed to save history");
    }
}

pub fn seed_from(config: &CreplConfig) -> SessionSeed {
    SessionSeed {
        compiler: config.compiler.clone(),
        default_include: config.session.default_include.clone(),
    }
}

/// Feed every line of `script` through a driver, as if typed at the prompt.
///
/// Stops early on `exit`. A capture still open at the end is discarded with
/// a warning. Returns the driver so callers can inspect the final session.
pub fn run_script<B: Backend, W: io::Write>(
    script: &str,
    seed: SessionSeed,
    backend: B,
    out: W,
) -> io::Result<Driver<B, W>> {
    let mut driver = Driver::new(seed, backend, out);
    driver.start()?;
    for (number, line) in script.lines().enumerate() {
        debug!(line = number + 1, input = line, "script");
        if driver.handle_line(line)? == Flow::Exit {
            break;
        }
    }
    if let Some(kind) = driver.capture().kind() {
        warn!(capture = kind.name(), "script ended inside an unterminated capture");
        driver.interrupt()?;
    }
    Ok(driver)
}

/// Convenience for the `run` command: a script against the real toolchain.
pub fn run_script_with_toolchain(script: &str, config: &CreplConfig) -> io::Result<()> {
    run_script(script, seed_from(config), config.toolchain(), io::stdout()).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacements(helper: &CreplHelper, line: &str) -> (usize, Vec<String>) {
        let (start, pairs) = helper.candidates(line, line.len());
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn test_complete_keywords() {
        let helper = CreplHelper::new();
        assert_eq!(
            replacements(&helper, "fu"),
            (0, vec!["func".to_string(), "function".to_string()])
        );
        assert_eq!(replacements(&helper, "un"), (0, vec!["undo".to_string()]));
        assert_eq!(replacements(&helper, "").1.len(), 0);
        assert_eq!(replacements(&helper, "int fu").1.len(), 0);
    }

    #[test]
    fn test_complete_pprint_kinds() {
        let helper = CreplHelper::new();
        assert_eq!(
            replacements(&helper, "pprint s"),
            (7, vec!["stack".to_string(), "string".to_string()])
        );
        assert_eq!(replacements(&helper, "pprint stack s").1.len(), 0);
    }
}
