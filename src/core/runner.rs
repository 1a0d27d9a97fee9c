//! External command execution with success/failure/not-found classification.
//!
//! One child process per call, awaited to completion. No timeout and no
//! retry; retry policy (there is none) belongs to the pipeline.

use std::path::PathBuf;
use std::process::Command;

use crate::utils::command::CapturedOutput;
use crate::utils::shell;

/// A fully resolved command: program, arguments, and the directory to run in.
///
/// The working directory is passed to the spawn call rather than set
/// process-wide, so generated artifacts land beside the source document
/// without mutating global state.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
}

impl Invocation {
    /// Shell-quoted rendering of the command line, for echoing and
    /// diagnostics.
    pub fn render(&self) -> String {
        shell::render_command_line(&self.program, &self.args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Ran and exited zero.
    Success,
    /// Ran and exited non-zero, or spawn failed for a reason other than a
    /// missing executable.
    Failed { exit_code: Option<i32> },
    /// The executable could not be located on PATH. Distinct from `Failed`
    /// so callers can advise installing the tool.
    NotFound,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub output: CapturedOutput,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

/// Executes a single external command.
pub trait CommandRunner {
    /// Run the command to completion.
    ///
    /// With `verbose` the child inherits stdout/stderr (live streaming);
    /// otherwise both streams are captured and, on failure, dumped to stderr
    /// after the fact so failures stay diagnosable without polluting normal
    /// output.
    fn run(&self, invocation: &Invocation, verbose: bool) -> RunOutcome;
}

/// Production `CommandRunner` backed by `std::process::Command`.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation, verbose: bool) -> RunOutcome {
        if verbose {
            crate::log_status!("run", "Running: {}", invocation.render());
            return self.run_streamed(invocation);
        }
        self.run_captured(invocation)
    }
}

impl ProcessRunner {
    fn run_streamed(&self, invocation: &Invocation) -> RunOutcome {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.dir)
            .status();

        match status {
            Ok(status) if status.success() => RunOutcome {
                status: RunStatus::Success,
                output: CapturedOutput::default(),
            },
            Ok(status) => RunOutcome {
                status: RunStatus::Failed {
                    exit_code: status.code(),
                },
                output: CapturedOutput::default(),
            },
            Err(e) => Self::spawn_error_outcome(invocation, e),
        }
    }

    fn run_captured(&self, invocation: &Invocation) -> RunOutcome {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.dir)
            .output();

        match output {
            Ok(output) => {
                let captured = CapturedOutput::from_output(&output);
                if output.status.success() {
                    RunOutcome {
                        status: RunStatus::Success,
                        output: captured,
                    }
                } else {
                    // Dump what the child said, after the fact, so the
                    // failure is diagnosable even though output was captured.
                    if captured.is_empty() {
                        eprintln!(
                            "Error running command: {} (no output)",
                            invocation.render()
                        );
                    } else {
                        eprintln!("Error running command: {}", invocation.render());
                        if !captured.stdout.is_empty() {
                            eprintln!("{}", captured.stdout.trim_end());
                        }
                        if !captured.stderr.is_empty() {
                            eprintln!("{}", captured.stderr.trim_end());
                        }
                    }
                    RunOutcome {
                        status: RunStatus::Failed {
                            exit_code: output.status.code(),
                        },
                        output: captured,
                    }
                }
            }
            Err(e) => Self::spawn_error_outcome(invocation, e),
        }
    }

    fn spawn_error_outcome(invocation: &Invocation, e: std::io::Error) -> RunOutcome {
        if e.kind() == std::io::ErrorKind::NotFound {
            return RunOutcome {
                status: RunStatus::NotFound,
                output: CapturedOutput::default(),
            };
        }
        RunOutcome {
            status: RunStatus::Failed { exit_code: None },
            output: CapturedOutput::new(
                String::new(),
                format!("Failed to spawn {}: {}", invocation.program, e),
            ),
        }
    }
}
