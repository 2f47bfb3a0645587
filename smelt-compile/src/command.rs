//! A compilation bridge that shells out to a host compiler command.
//!
//! Sources are written into a scratch directory and the configured command
//! runs against them, synchronously and without cancellation. A nonzero exit
//! becomes a failed outcome carrying every non-empty output line as a
//! diagnostic. This bridge verifies that emitted text compiles; it cannot
//! load the result into the process, so a successful outcome carries an
//! empty unit.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use smelt_decl::{Compile, CompileOutcome, CompiledUnit, SourceText};
use tracing::debug;

static RESOLVED_PROGRAMS: Lazy<DashMap<String, Option<PathBuf>>> = Lazy::new(DashMap::new);

/// Locate `program` on the search path, memoizing the answer process-wide.
fn resolve_program(program: &str) -> Option<PathBuf> {
    if program.contains(std::path::MAIN_SEPARATOR) {
        let path = PathBuf::from(program);
        return path.exists().then_some(path);
    }
    if let Some(cached) = RESOLVED_PROGRAMS.get(program) {
        return cached.clone();
    }
    let found = std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|candidate| candidate.is_file())
    });
    RESOLVED_PROGRAMS
        .entry(program.to_string())
        .or_insert(found)
        .clone()
}

/// A bridge around an external compiler command.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
    reference_flag: String,
}

impl CommandCompiler {
    /// Bridge to `program`, resolved against the search path at compile time.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            reference_flag: "-r:".to_string(),
        }
    }

    /// Append a fixed argument passed before the source files.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the flag prefix used to pass binary references.
    pub fn reference_flag(mut self, flag: impl Into<String>) -> Self {
        self.reference_flag = flag.into();
        self
    }

    /// Whether the configured program resolves on the search path.
    pub fn is_available(&self) -> bool {
        resolve_program(&self.program).is_some()
    }
}

impl Compile for CommandCompiler {
    fn compile(&self, sources: &[SourceText], references: &[String]) -> CompileOutcome {
        let Some(program) = resolve_program(&self.program) else {
            return CompileOutcome::failure(vec![format!(
                "compiler '{}' was not found on the search path",
                self.program
            )]);
        };

        let scratch = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => {
                return CompileOutcome::failure(vec![format!(
                    "could not create scratch directory: {err}"
                )]);
            }
        };
        let mut file_names = Vec::with_capacity(sources.len());
        for source in sources {
            let path = scratch.path().join(&source.name);
            if let Err(err) = fs::write(&path, &source.text) {
                return CompileOutcome::failure(vec![format!(
                    "could not write '{}': {err}",
                    source.name
                )]);
            }
            file_names.push(source.name.clone());
        }

        let mut command = Command::new(&program);
        command.current_dir(scratch.path()).args(&self.args);
        for name in &file_names {
            command.arg(name);
        }
        for reference in references {
            command.arg(format!("{}{reference}", self.reference_flag));
        }

        debug!(program = %program.display(), files = file_names.len(), "invoking host compiler");
        let output = match command.output() {
            Ok(output) => output,
            Err(err) => {
                return CompileOutcome::failure(vec![format!(
                    "could not run '{}': {err}",
                    self.program
                )]);
            }
        };
        if output.status.success() {
            return CompileOutcome::success(CompiledUnit::new_empty());
        }
        let mut diagnostics: Vec<String> = Vec::new();
        for stream in [&output.stdout, &output.stderr] {
            diagnostics.extend(
                String::from_utf8_lossy(stream)
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string),
            );
        }
        if diagnostics.is_empty() {
            diagnostics.push(format!("compiler exited with {}", output.status));
        }
        CompileOutcome::failure(diagnostics)
    }
}
