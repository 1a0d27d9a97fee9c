use clap::Args;
use serde::Serialize;

use texbuild::cleanup::{self, CleanupResult, CleanupSpec};
use texbuild::document::Document;
use texbuild::pipeline::{self, PipelineOptions, PipelineResult};
use texbuild::runner::ProcessRunner;
use texbuild::stages::{self, Compiler};
use texbuild::{log_status, Result};

#[derive(Args)]
pub struct CompileArgs {
    /// The .tex file to compile
    pub texfile: String,

    /// Run the full BibTeX workflow (pass, bibtex, two more passes)
    #[arg(short = 'b', long)]
    pub bibtex: bool,

    /// Clean auxiliary files after a successful compile
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Stream tool output live instead of capturing it
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Typesetting engine to invoke
    #[arg(long, value_enum, default_value_t = Compiler::Pdflatex)]
    pub compiler: Compiler,
}

#[derive(Debug, Serialize)]
pub struct CompileResult {
    pub document: String,
    pub compiler: Compiler,
    pub pipeline: PipelineResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned: Option<CleanupResult>,
}

pub fn run(args: CompileArgs, announce: bool) -> Result<CompileResult> {
    // Resolution happens before any runner exists: a missing input spawns
    // nothing.
    let document = Document::resolve(&args.texfile)?;

    let stage_list = if args.bibtex {
        stages::bibtex_workflow(args.compiler)
    } else {
        stages::single_pass(args.compiler)
    };

    let result = pipeline::run(
        &document,
        &stage_list,
        &ProcessRunner,
        PipelineOptions {
            verbose: args.verbose,
            announce,
        },
    );

    if let Some(err) = result.failure_error() {
        return Err(err);
    }

    if announce {
        println!();
        println!("Success! Output: {}.pdf", document.base);
    }

    let cleaned = if args.clean {
        if announce {
            println!("Cleaning auxiliary files...");
        }
        let cleanup_result = cleanup::clean(&CleanupSpec {
            dir: document.dir.clone(),
            base: Some(document.base.clone()),
            deep: false,
        });
        for failure in &cleanup_result.failed {
            eprintln!(
                "Error: {}",
                texbuild::Error::cleanup_io(failure.file.as_str(), failure.error.as_str())
            );
        }
        for name in &cleanup_result.removed {
            log_status!("clean", "Removed {}", name);
        }
        Some(cleanup_result)
    } else {
        None
    };

    Ok(CompileResult {
        document: document.path.display().to_string(),
        compiler: args.compiler,
        pipeline: result,
        cleaned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(texfile: &str) -> CompileArgs {
        CompileArgs {
            texfile: texfile.to_string(),
            bibtex: false,
            clean: false,
            verbose: false,
            compiler: Compiler::Pdflatex,
        }
    }

    #[test]
    fn missing_input_fails_before_any_spawn() {
        let err = run(args("/no/such/paper.tex"), false).unwrap_err();
        assert_eq!(err.code, texbuild::ErrorCode::InputNotFound);
    }
}
