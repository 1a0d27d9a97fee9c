// Public modules
pub mod cleanup;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod stages;

// Re-export common types for convenience
pub use cleanup::{CleanupResult, CleanupSpec};
pub use document::Document;
pub use error::{Error, ErrorCode, Result};
pub use pipeline::{PipelineResult, Stage, StageOutcome};
pub use runner::{CommandRunner, Invocation, ProcessRunner, RunOutcome, RunStatus};
pub use stages::Compiler;
