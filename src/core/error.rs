use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputNotFound,

    ExecutableNotFound,
    CommandFailed,
    MissingExpectedArtifact,

    CleanupIoError,

    ValidationInvalidArgument,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InputNotFound => "input.not_found",

            ErrorCode::ExecutableNotFound => "command.executable_not_found",
            ErrorCode::CommandFailed => "command.failed",
            ErrorCode::MissingExpectedArtifact => "pipeline.missing_artifact",

            ErrorCode::CleanupIoError => "cleanup.io_error",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputNotFoundDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableNotFoundDetails {
    pub program: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    pub stage: String,
    pub command: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArtifactDetails {
    pub stage: String,
    pub artifact: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: hint.into(),
        });
        self
    }

    pub fn input_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        let details = serde_json::to_value(InputNotFoundDetails { path: path.clone() })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::InputNotFound,
            format!("File '{}' not found", path),
            details,
        )
    }

    pub fn executable_not_found(program: impl Into<String>) -> Self {
        let program = program.into();
        let details = serde_json::to_value(ExecutableNotFoundDetails {
            program: program.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::ExecutableNotFound,
            format!("Command not found: {}", program),
            details,
        )
        .with_hint(format!(
            "Install a TeX distribution providing '{}' (e.g. TeX Live or MiKTeX) and ensure it is on PATH",
            program
        ))
    }

    pub fn command_failed(
        stage: impl Into<String>,
        command: impl Into<String>,
        stdout: String,
        stderr: String,
    ) -> Self {
        let stage = stage.into();
        let command = command.into();
        let details = serde_json::to_value(CommandFailedDetails {
            stage: stage.clone(),
            command: command.clone(),
            stdout,
            stderr,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::CommandFailed,
            format!("Stage '{}' failed: {}", stage, command),
            details,
        )
    }

    pub fn missing_artifact(stage: impl Into<String>, artifact: impl Into<String>) -> Self {
        let stage = stage.into();
        let artifact = artifact.into();
        let details = serde_json::to_value(MissingArtifactDetails {
            stage: stage.clone(),
            artifact: artifact.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::MissingExpectedArtifact,
            format!("Stage '{}' did not produce expected file '{}'", stage, artifact),
            details,
        )
    }

    pub fn cleanup_io(file: impl Into<String>, error: impl Into<String>) -> Self {
        let file = file.into();
        let error = error.into();
        let details = serde_json::json!({
            "file": file,
            "error": error,
        });
        Self::new(
            ErrorCode::CleanupIoError,
            format!("Error removing {}: {}", file, error),
            details,
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = serde_json::to_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(ErrorCode::ValidationInvalidArgument, problem, details)
    }
}
