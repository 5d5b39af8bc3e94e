//! Writing, compiling and running the generated program.
//!
//! The REPL talks to a [`Backend`]. [`Toolchain`] is the real one: it
//! writes the assembled source, runs the configured compiler on it and then
//! runs the produced binary, all with inherited stdio. [`Offline`] does
//! nothing and is used when only the assembled text is wanted.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crepl_core::{CompilerCommand, Session};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("cannot write generated source '{path}'")]
    WriteSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot start compiler '{program}'")]
    SpawnCompiler {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one step of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    /// The process ran and exited unsuccessfully. `code` is `None` when it
    /// was killed by a signal.
    Failed { code: Option<i32> },
    /// The step could not be started; carries the reason.
    Unavailable(String),
    NotRun,
}

impl StepStatus {
    fn from_exit(status: ExitStatus) -> Self {
        if status.success() {
            Self::Succeeded
        } else {
            Self::Failed {
                code: status.code(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// What happened during [`Backend::build_and_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub compile: StepStatus,
    pub run: StepStatus,
}

impl BuildReport {
    pub fn skipped() -> Self {
        Self {
            compile: StepStatus::NotRun,
            run: StepStatus::NotRun,
        }
    }
}

/// Something that can turn a session into observable program output.
pub trait Backend {
    fn build_and_run(&mut self, session: &Session) -> Result<BuildReport, ToolchainError>;

    /// Where the generated source lives, if anywhere.
    fn source_path(&self) -> Option<PathBuf> {
        None
    }
}

// =============================================================================
// Toolchain
// =============================================================================

/// Filesystem layout of one build.
#[derive(Debug, Clone)]
pub struct Toolchain {
    work_dir: PathBuf,
    source_file: PathBuf,
    binary: PathBuf,
}

impl Toolchain {
    /// `source_file` and `binary` are relative to `work_dir` unless absolute.
    pub fn new(
        work_dir: impl Into<PathBuf>,
        source_file: impl Into<PathBuf>,
        binary: impl Into<PathBuf>,
    ) -> Self {
        Self {
            work_dir: work_dir.into(),
            source_file: source_file.into(),
            binary: binary.into(),
        }
    }

    pub fn source(&self) -> PathBuf {
        self.work_dir.join(&self.source_file)
    }

    pub fn binary(&self) -> PathBuf {
        self.work_dir.join(&self.binary)
    }

    /// Overwrite the source file with `text`.
    pub fn write_source(&self, text: &str) -> Result<PathBuf, ToolchainError> {
        let path = self.source();
        debug!(path = %path.display(), bytes = text.len(), "writing source");
        std::fs::write(&path, text).map_err(|source| ToolchainError::WriteSource {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Compiler argv: program, flags, then the source file.
    pub fn compile_args(&self, compiler: &CompilerCommand) -> Vec<String> {
        let mut args: Vec<String> = compiler.args().into_iter().map(str::to_string).collect();
        args.push(self.source_file.display().to_string());
        args
    }

    fn compile(&self, compiler: &CompilerCommand) -> Result<StepStatus, ToolchainError> {
        let args = self.compile_args(compiler);
        info!(command = %args.join(" "), "compiling");
        let status = Command::new(&args[0])
            .args(&args[1..])
            .current_dir(&self.work_dir)
            .status()
            .map_err(|source| ToolchainError::SpawnCompiler {
                program: compiler.program.clone(),
                source,
            })?;
        let step = StepStatus::from_exit(status);
        if !step.is_success() {
            warn!(?status, "compiler exited unsuccessfully");
        }
        Ok(step)
    }

    fn run(&self) -> StepStatus {
        let binary = self.binary();
        debug!(binary = %binary.display(), "running");
        // the child resolves a relative path after entering `work_dir`
        let step = match Command::new(&self.binary).current_dir(&self.work_dir).status() {
            Ok(status) => StepStatus::from_exit(status),
            Err(err) => {
                warn!(binary = %binary.display(), error = %err, "cannot run program");
                StepStatus::Unavailable(err.to_string())
            }
        };

        // keep the prompt on its own line
        let mut stdout = std::io::stdout();
        let _ = writeln!(stdout);
        let _ = stdout.flush();
        step
    }
}

impl Backend for Toolchain {
    /// Write, compile, then run. A failed compile still runs whatever binary
    /// is already on disk.
    fn build_and_run(&mut self, session: &Session) -> Result<BuildReport, ToolchainError> {
        self.write_source(&session.assemble())?;
        let compile = self.compile(session.compiler())?;
        let run = self.run();
        Ok(BuildReport { compile, run })
    }

    fn source_path(&self) -> Option<PathBuf> {
        Some(self.source())
    }
}

/// Backend that never touches the filesystem or spawns anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Backend for Offline {
    fn build_and_run(&mut self, _session: &Session) -> Result<BuildReport, ToolchainError> {
        Ok(BuildReport::skipped())
    }
}

/// True when `path` names something that looks like a generated source file.
pub fn is_source_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("c" | "cc" | "cpp" | "cxx")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_args_end_with_source() {
        let toolchain = Toolchain::new("/work", "snippet.cpp", "./a.out");
        let compiler = CompilerCommand::from_args(["clang++", "-std=c++20", "-Wall"]).unwrap();
        assert_eq!(
            toolchain.compile_args(&compiler),
            ["clang++", "-std=c++20", "-Wall", "snippet.cpp"]
        );
    }

    #[test]
    fn test_paths_are_relative_to_work_dir() {
        let toolchain = Toolchain::new("/work", "snippet.cpp", "./a.out");
        assert_eq!(toolchain.source(), PathBuf::from("/work/snippet.cpp"));
        assert_eq!(toolchain.binary(), PathBuf::from("/work/./a.out"));

        let absolute = Toolchain::new("/work", "/tmp/s.cpp", "/tmp/prog");
        assert_eq!(absolute.source(), PathBuf::from("/tmp/s.cpp"));
        assert_eq!(absolute.binary(), PathBuf::from("/tmp/prog"));
    }

    #[test]
    fn test_write_source() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain::new(dir.path(), "session.cpp", "./a.out");
        let session = Session::default();

        let path = toolchain.write_source(&session.assemble()).unwrap();
        assert_eq!(path, dir.path().join("session.cpp"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), session.assemble());
    }

    #[test]
    fn test_write_source_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain::new(dir.path().join("nope"), "session.cpp", "./a.out");
        let err = toolchain.write_source("int main() {}\n").unwrap_err();
        assert!(matches!(err, ToolchainError::WriteSource { .. }));
    }

    #[test]
    fn test_missing_compiler_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut toolchain = Toolchain::new(dir.path(), "session.cpp", "./a.out");
        let mut session = Session::default();
        session
            .set_compiler(["crepl-test-no-such-compiler"])
            .unwrap();

        let err = toolchain.build_and_run(&session).unwrap_err();
        assert!(matches!(err, ToolchainError::SpawnCompiler { ref program, .. }
            if program == "crepl-test-no-such-compiler"));
        // the source is written before the compiler is started
        assert!(dir.path().join("session.cpp").exists());
    }

    #[test]
    fn test_offline_skips_everything() {
        let mut backend = Offline;
        let report = backend.build_and_run(&Session::default()).unwrap();
        assert_eq!(report, BuildReport::skipped());
        assert_eq!(backend.source_path(), None);
    }

    #[cfg(unix)]
    fn install_program(dir: &Path) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("a.out");
        std::fs::write(&path, "#!/bin/sh\ntouch ran\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    fn session_with_compiler(program: &str) -> Session {
        let mut session = Session::default();
        session.set_compiler([program]).unwrap();
        session
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_binary_after_compile() {
        let dir = tempfile::tempdir().unwrap();
        install_program(dir.path());
        let mut toolchain = Toolchain::new(dir.path(), "session.cpp", "./a.out");

        let report = toolchain
            .build_and_run(&session_with_compiler("true"))
            .unwrap();
        assert_eq!(report.compile, StepStatus::Succeeded);
        assert_eq!(report.run, StepStatus::Succeeded);
        // the program runs inside the work dir
        assert!(dir.path().join("ran").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_work_dir_runs_binary() {
        let dir = tempfile::Builder::new()
            .prefix("crepl-work")
            .tempdir_in(".")
            .unwrap();
        let relative = dir.path().strip_prefix(".").unwrap_or(dir.path());
        assert!(relative.is_relative());
        install_program(relative);
        let mut toolchain = Toolchain::new(relative, "session.cpp", "./a.out");

        let report = toolchain
            .build_and_run(&session_with_compiler("true"))
            .unwrap();
        assert_eq!(report.run, StepStatus::Succeeded);
        assert!(relative.join("ran").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_compile_still_runs_previous_binary() {
        let dir = tempfile::tempdir().unwrap();
        install_program(dir.path());
        let mut toolchain = Toolchain::new(dir.path(), "session.cpp", "./a.out");

        let report = toolchain
            .build_and_run(&session_with_compiler("false"))
            .unwrap();
        assert_eq!(report.compile, StepStatus::Failed { code: Some(1) });
        assert_eq!(report.run, StepStatus::Succeeded);
        assert!(dir.path().join("ran").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_binary_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut toolchain = Toolchain::new(dir.path(), "session.cpp", "./a.out");

        let report = toolchain
            .build_and_run(&session_with_compiler("true"))
            .unwrap();
        assert_eq!(report.compile, StepStatus::Succeeded);
        assert!(matches!(report.run, StepStatus::Unavailable(_)));
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("a.cpp")));
        assert!(is_source_file(Path::new("dir/a.c")));
        assert!(!is_source_file(Path::new("a.out")));
        assert!(!is_source_file(Path::new("Makefile")));
    }
}
