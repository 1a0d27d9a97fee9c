//! Stage-list builders for the two supported workflows.
//!
//! Both workflows run through the same pipeline machinery; the simple
//! compile is just a pipeline of length one. The bibliography workflow is a
//! fixed four-pass approximation of a fixed-point iteration: pass 1 writes
//! the cross-reference data, bibtex consumes it, pass 2 incorporates the
//! bibliography, and pass 3 settles page numbers shifted by the inserted
//! bibliography. No convergence check is performed; exactly the declared
//! stages run.

use clap::ValueEnum;
use serde::Serialize;

use crate::pipeline::Stage;

/// Which typesetting executable the pipeline's LaTeX passes invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    #[default]
    Pdflatex,
    Xelatex,
    Lualatex,
}

impl Compiler {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Pdflatex => "pdflatex",
            Compiler::Xelatex => "xelatex",
            Compiler::Lualatex => "lualatex",
        }
    }
}

impl std::fmt::Display for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn latex_pass(name: &str, label: String, compiler: Compiler) -> Stage {
    Stage {
        name: name.to_string(),
        label,
        program: compiler.as_str().to_string(),
        args: vec!["-interaction=nonstopmode".to_string(), "{{file}}".to_string()],
        fatal: true,
        required_artifact: None,
    }
}

/// Single compilation pass, no bibliography dependency.
pub fn single_pass(compiler: Compiler) -> Vec<Stage> {
    vec![latex_pass(
        "latex.pass1",
        format!("Compiling with {}", compiler),
        compiler,
    )]
}

/// The full bibliography workflow: pass₁ → bibtex → pass₂ → pass₃.
///
/// Pass 1 must leave a `.aux` file behind or the run is treated as failed
/// regardless of exit code. The bibtex stage is the only non-fatal one: a
/// document with no citations makes bibtex exit non-zero, and that is fine.
pub fn bibtex_workflow(compiler: Compiler) -> Vec<Stage> {
    let mut stages = vec![latex_pass(
        "latex.pass1",
        format!("First pass ({})", compiler),
        compiler,
    )];
    stages[0].required_artifact = Some("{{base}}.aux".to_string());

    stages.push(Stage {
        name: "bibtex".to_string(),
        label: "BibTeX".to_string(),
        program: "bibtex".to_string(),
        args: vec!["{{base}}".to_string()],
        fatal: false,
        required_artifact: None,
    });
    stages.push(latex_pass(
        "latex.pass2",
        format!("Second pass ({})", compiler),
        compiler,
    ));
    stages.push(latex_pass(
        "latex.pass3",
        format!("Final pass ({})", compiler),
        compiler,
    ));
    stages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pass_is_a_pipeline_of_length_one() {
        let stages = single_pass(Compiler::Pdflatex);
        assert_eq!(stages.len(), 1);
        assert!(stages[0].fatal);
        assert_eq!(stages[0].program, "pdflatex");
    }

    #[test]
    fn bibtex_workflow_has_fixed_order_and_policy() {
        let stages = bibtex_workflow(Compiler::Xelatex);
        let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["latex.pass1", "bibtex", "latex.pass2", "latex.pass3"]);

        // bibtex is the only tolerated failure
        let fatals: Vec<bool> = stages.iter().map(|s| s.fatal).collect();
        assert_eq!(fatals, [true, false, true, true]);

        assert_eq!(
            stages[0].required_artifact.as_deref(),
            Some("{{base}}.aux")
        );
        assert_eq!(stages[1].args, vec!["{{base}}".to_string()]);
        assert_eq!(stages[2].program, "xelatex");
    }

    #[test]
    fn first_stages_match_between_workflows() {
        let single = single_pass(Compiler::Lualatex);
        let full = bibtex_workflow(Compiler::Lualatex);
        assert_eq!(single[0].program, full[0].program);
        assert_eq!(single[0].args, full[0].args);
    }
}
