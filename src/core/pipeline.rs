//! Stage sequencing over a `CommandRunner`.
//!
//! Stages are declarative records (command template, fatal flag, optional
//! artifact check) declared up front and executed in order. Failure policy
//! is per stage: a fatal stage stops the run immediately; a non-fatal stage
//! (the bibliography step) logs a warning and the run continues. A stage may
//! also declare a required artifact, because a zero exit code alone is not a
//! reliable success signal for typesetting tools.
//!
//! Concurrent runs sharing a base name are unsupported: a later run's
//! intermediate files silently alias an earlier run's. Callers driving
//! multiple documents run pipelines one after another.

use std::path::PathBuf;

use serde::Serialize;

use crate::document::Document;
use crate::error::Error;
use crate::runner::{CommandRunner, Invocation, RunStatus};
use crate::utils::command::CapturedOutput;

/// One external-tool invocation within the pipeline.
///
/// `args` and `required_artifact` may carry `{{file}}` and `{{base}}`
/// placeholders, substituted from the document at execution time.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Short identifier, e.g. `latex.pass1`.
    pub name: String,
    /// Human-readable progress label, e.g. `First pass (pdflatex)`.
    pub label: String,
    pub program: String,
    pub args: Vec<String>,
    /// Whether failure halts the pipeline. Fixed at declaration.
    pub fatal: bool,
    /// Artifact that must exist after a nominally successful run,
    /// e.g. `{{base}}.aux`. Absence is treated as a fatal stage failure.
    pub required_artifact: Option<String>,
}

impl Stage {
    fn invocation(&self, document: &Document) -> Invocation {
        Invocation {
            program: self.program.clone(),
            args: self
                .args
                .iter()
                .map(|a| substitute(a, document))
                .collect(),
            dir: document.dir.clone(),
        }
    }
}

fn substitute(template: &str, document: &Document) -> String {
    template
        .replace("{{file}}", &document.file_name())
        .replace("{{base}}", &document.base)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageFailure {
    CommandFailed,
    ExecutableNotFound,
    MissingArtifact,
}

/// Result of one stage execution.
#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    pub stage: String,
    pub success: bool,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StageFailure>,
    /// Set when `failure` is `MissingArtifact`: the artifact that was
    /// expected but absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_artifact: Option<String>,
    #[serde(flatten)]
    pub output: CapturedOutput,
    #[serde(skip)]
    program: String,
}

/// Ordered outcomes of one pipeline run. Stages never attempted (those after
/// a fatal failure) are absent from the list.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub stages: Vec<StageOutcome>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
}

impl PipelineResult {
    /// Map an unsuccessful run to the error that should terminate the CLI.
    /// Returns `None` for successful runs.
    pub fn failure_error(&self) -> Option<Error> {
        if self.success {
            return None;
        }
        let outcome = self.stages.last()?;
        match outcome.failure? {
            StageFailure::ExecutableNotFound => {
                Some(Error::executable_not_found(outcome.program.clone()))
            }
            StageFailure::MissingArtifact => Some(Error::missing_artifact(
                outcome.stage.clone(),
                outcome.missing_artifact.clone().unwrap_or_default(),
            )),
            StageFailure::CommandFailed => Some(Error::command_failed(
                outcome.stage.clone(),
                outcome.command.clone(),
                outcome.output.stdout.clone(),
                outcome.output.stderr.clone(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Stream child output live instead of capturing it.
    pub verbose: bool,
    /// Print `[k/N]` progress lines to stdout. Off in JSON output mode.
    pub announce: bool,
}

/// Run `stages` in declared order against `document`.
///
/// The returned result records one outcome per attempted stage. Overall
/// success requires every fatal stage (and every declared artifact check) to
/// have passed; non-fatal stage failures do not affect it.
pub fn run(
    document: &Document,
    stages: &[Stage],
    runner: &dyn CommandRunner,
    options: PipelineOptions,
) -> PipelineResult {
    let total = stages.len();
    let mut outcomes: Vec<StageOutcome> = Vec::with_capacity(total);

    for (idx, stage) in stages.iter().enumerate() {
        let invocation = stage.invocation(document);
        if options.announce {
            println!("[{}/{}] {}...", idx + 1, total, stage.label);
        }

        let run = runner.run(&invocation, options.verbose);
        let command = invocation.render();

        let failure = match run.status {
            RunStatus::Success => None,
            RunStatus::NotFound => Some(StageFailure::ExecutableNotFound),
            RunStatus::Failed { .. } => Some(StageFailure::CommandFailed),
        };

        if let Some(failure) = failure {
            let fatal = stage.fatal;
            if !fatal {
                let reason = run.output.error_text();
                match reason.lines().next() {
                    Some(line) if !line.is_empty() => {
                        crate::log_status!(
                            "pipeline",
                            "Stage '{}' failed; continuing without it: {}",
                            stage.name,
                            line
                        );
                    }
                    _ => {
                        crate::log_status!(
                            "pipeline",
                            "Stage '{}' failed; continuing without it",
                            stage.name
                        );
                    }
                }
            }
            outcomes.push(StageOutcome {
                stage: stage.name.clone(),
                success: false,
                command,
                failure: Some(failure),
                missing_artifact: None,
                output: run.output,
                program: invocation.program.clone(),
            });

            if fatal {
                return PipelineResult {
                    stages: outcomes,
                    success: false,
                    artifact: None,
                };
            }
            continue;
        }

        // Exit code zero is not proof of success for TeX tools; gate on the
        // artifact the next stage needs.
        if let Some(template) = &stage.required_artifact {
            let artifact = substitute(template, document);
            if !document.dir.join(&artifact).exists() {
                outcomes.push(StageOutcome {
                    stage: stage.name.clone(),
                    success: false,
                    command,
                    failure: Some(StageFailure::MissingArtifact),
                    missing_artifact: Some(artifact),
                    output: run.output.clone(),
                    program: invocation.program.clone(),
                });
                return PipelineResult {
                    stages: outcomes,
                    success: false,
                    artifact: None,
                };
            }
        }

        outcomes.push(StageOutcome {
            stage: stage.name.clone(),
            success: true,
            command,
            failure: None,
            missing_artifact: None,
            output: run.output,
            program: invocation.program.clone(),
        });
    }

    PipelineResult {
        stages: outcomes,
        success: true,
        artifact: Some(document.artifact("pdf")),
    }
}
