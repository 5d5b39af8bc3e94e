//! Configuration file parsing for `crepl.toml`.
//!
//! Searches the current directory then its ancestors, falling back to
//! `<config dir>/crepl/crepl.toml` if no project-level file is found.
//! Command-line flags are layered on top with [`CreplConfig::apply`].

use std::path::{Path, PathBuf};

use crepl_core::session::DEFAULT_INCLUDE;
use crepl_core::{CompilerCommand, Session, SessionError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::toolchain::{is_source_file, Toolchain};

/// File name looked up in each directory.
pub const CONFIG_FILE: &str = "crepl.toml";

/// Environment variable used to override the line-history location.
pub const HISTORY_PATH_ENV: &str = "CREPL_HISTORY_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml in '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot split compiler command '{value}'")]
    CompilerSyntax {
        value: String,
        #[source]
        source: shell_words::ParseError,
    },
    #[error("invalid compiler command")]
    Compiler(#[from] SessionError),
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct CreplConfig {
    #[serde(default)]
    pub compiler: CompilerCommand,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub repl: ReplSection,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionSection {
    /// Directory the compiler and the program run in.
    pub work_dir: PathBuf,
    pub source_file: PathBuf,
    /// Where the compiler leaves the program.
    pub binary: PathBuf,
    /// Seeded into every new session; empty for none.
    pub default_include: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            source_file: PathBuf::from("crepl_session.cpp"),
            binary: PathBuf::from("./a.out"),
            default_include: DEFAULT_INCLUDE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReplSection {
    pub history_path: Option<String>,
    pub banner: bool,
}

impl Default for ReplSection {
    fn default() -> Self {
        Self {
            history_path: None,
            banner: true,
        }
    }
}

/// Values given on the command line; `None` keeps the file's value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Whole compiler command line, e.g. `"clang++ -std=c++20"`.
    pub compiler: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub source_file: Option<PathBuf>,
    pub binary: Option<PathBuf>,
}

impl CreplConfig {
    /// Load the nearest `crepl.toml`, or defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let global = dirs::config_dir().map(|dir| dir.join("crepl").join(CONFIG_FILE));
        Ok(Self::discover(&cwd, global.as_deref())?
            .map(|(_path, cfg)| cfg)
            .unwrap_or_default())
    }

    /// Find a config in `start` or its ancestors, then at `global`.
    pub fn discover(
        start: &Path,
        global: Option<&Path>,
    ) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Self::load_from(&candidate).map(|cfg| Some((candidate, cfg)));
            }
        }
        match global {
            Some(path) if path.is_file() => {
                Self::load_from(path).map(|cfg| Some((path.to_path_buf(), cfg)))
            }
            _ => Ok(None),
        }
    }

    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer command-line values over the file's.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        if let Some(ref line) = overrides.compiler {
            self.compiler = parse_compiler_line(line)?;
        }
        if let Some(ref dir) = overrides.work_dir {
            self.session.work_dir = dir.clone();
        }
        if let Some(ref file) = overrides.source_file {
            self.session.source_file = file.clone();
        }
        if let Some(ref binary) = overrides.binary {
            self.session.binary = binary.clone();
        }
        if !is_source_file(&self.session.source_file) {
            warn!(
                source_file = %self.session.source_file.display(),
                "source file has no C/C++ extension; the compiler may not recognise it"
            );
        }
        Ok(())
    }

    /// A fresh session as configured.
    pub fn new_session(&self) -> Session {
        Session::new(self.compiler.clone(), &self.session.default_include)
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain::new(
            &self.session.work_dir,
            &self.session.source_file,
            &self.session.binary,
        )
    }

    /// Resolve the line-history file, honouring `CREPL_HISTORY_PATH`.
    pub fn history_path(&self) -> Option<PathBuf> {
        let env = std::env::var(HISTORY_PATH_ENV).ok();
        let configured = env.as_deref().or(self.repl.history_path.as_deref());
        resolve_history_path(dirs::home_dir().as_deref(), configured)
    }

    /// Commented template written by `crepl init`.
    pub fn default_template() -> &'static str {
        r##"# crepl configuration

# Compiler used on the generated source. The source path is appended as the
# last argument. Change it at runtime with `compiler <program> [flags...]`.
[compiler]
program = "g++"
flags = []
# flags = ["-std=c++17", "-Wall"]

[session]
# Directory the compiler and the program run in
work_dir = "."
source_file = "crepl_session.cpp"
# Where the compiler leaves the program
binary = "./a.out"
# Seeded into every new session (set to "" for none)
default_include = "#include <stdio.h>"

[repl]
# history_path = "~/.crepl/history"
banner = true
"##
    }
}

/// Split a shell-style compiler command line into a [`CompilerCommand`].
pub fn parse_compiler_line(line: &str) -> Result<CompilerCommand, ConfigError> {
    let words = shell_words::split(line).map_err(|source| ConfigError::CompilerSyntax {
        value: line.to_string(),
        source,
    })?;
    Ok(CompilerCommand::from_args(words)?)
}

/// Resolve the path to the history file.
///
/// Rules:
/// - configured absolute path: use as-is.
/// - configured `~` or `~/...`: resolve under home.
/// - configured relative path: resolve under home.
/// - otherwise: `<home>/.crepl/history`.
pub fn resolve_history_path(home: Option<&Path>, configured: Option<&str>) -> Option<PathBuf> {
    let home_path = || home.map(Path::to_path_buf);

    if let Some(raw) = configured.map(str::trim).filter(|value| !value.is_empty()) {
        if raw == "~" {
            return home_path();
        }
        if let Some(rest) = raw.strip_prefix("~/") {
            return home_path().map(|home| home.join(rest));
        }
        let path = PathBuf::from(raw);
        if path.is_relative() {
            return home_path().map(|home| home.join(path));
        }
        return Some(path);
    }

    home_path().map(|home| home.join(".crepl").join("history"))
}
