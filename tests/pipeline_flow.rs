//! End-to-end pipeline runs against real child processes.
//!
//! Stages here are `sh -c` stand-ins for the typesetting tools: they create
//! the same artifact files the real tools would, without needing a TeX
//! installation on the test machine.

use std::fs;
use std::path::Path;

use texbuild::document::Document;
use texbuild::pipeline::{self, PipelineOptions, Stage};
use texbuild::runner::ProcessRunner;

fn fixture(name: &str) -> (tempfile::TempDir, Document) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, "\\documentclass{article}\n\\begin{document}x\\end{document}\n").unwrap();
    let doc = Document::resolve(path.to_str().unwrap()).unwrap();
    (dir, doc)
}

fn sh_stage(name: &str, fatal: bool, script: &str) -> Stage {
    Stage {
        name: name.to_string(),
        label: name.to_string(),
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        fatal,
        required_artifact: None,
    }
}

fn quiet() -> PipelineOptions {
    PipelineOptions {
        verbose: false,
        announce: false,
    }
}

#[test]
fn single_pass_and_first_full_stage_produce_identical_artifacts() {
    // A compiler stand-in that derives the PDF deterministically from the
    // source. A document with no bibliography compiles identically whether
    // it runs as the 1-stage pipeline or as pass 1 of the full workflow.
    let script = "cp '{{file}}' '{{base}}.pdf'";

    let (_tmp_a, doc_a) = fixture("paper.tex");
    let single = vec![sh_stage("latex.pass1", true, script)];
    let result = pipeline::run(&doc_a, &single, &ProcessRunner, quiet());
    assert!(result.success);

    let (_tmp_b, doc_b) = fixture("paper.tex");
    let mut pass1 = sh_stage("latex.pass1", true, &format!("{} && touch '{{{{base}}}}.aux'", script));
    pass1.required_artifact = Some("{{base}}.aux".to_string());
    let full = vec![
        pass1,
        sh_stage("bibtex", false, "true"),
        sh_stage("latex.pass2", true, "true"),
        sh_stage("latex.pass3", true, "true"),
    ];
    let result = pipeline::run(&doc_b, &full, &ProcessRunner, quiet());
    assert!(result.success);

    let pdf_a = fs::read(doc_a.artifact("pdf")).unwrap();
    let pdf_b = fs::read(doc_b.artifact("pdf")).unwrap();
    assert_eq!(pdf_a, pdf_b);
}

#[test]
fn failed_bibliography_stage_does_not_sink_the_run() {
    let (_tmp, doc) = fixture("cited.tex");
    let stages = vec![
        sh_stage("latex.pass1", true, "touch '{{base}}.aux' '{{base}}.pdf'"),
        sh_stage("bibtex", false, "false"),
        sh_stage("latex.pass2", true, "true"),
        sh_stage("latex.pass3", true, "true"),
    ];

    let result = pipeline::run(&doc, &stages, &ProcessRunner, quiet());

    assert!(result.success);
    assert_eq!(result.stages.len(), 4);
    assert!(!result.stages[1].success);
    assert!(result.artifact.as_deref().map(Path::exists).unwrap_or(false));
}

#[test]
fn fatal_failure_stops_the_run_at_the_failing_stage() {
    let (_tmp, doc) = fixture("broken.tex");
    let stages = vec![
        sh_stage("latex.pass1", true, "exit 1"),
        sh_stage("bibtex", false, "true"),
        sh_stage("latex.pass2", true, "true"),
    ];

    let result = pipeline::run(&doc, &stages, &ProcessRunner, quiet());

    assert!(!result.success);
    assert_eq!(result.stages.len(), 1);
    assert!(result.failure_error().is_some());
}

#[test]
fn zero_exit_without_required_artifact_is_a_failure() {
    let (_tmp, doc) = fixture("paper.tex");
    let mut pass1 = sh_stage("latex.pass1", true, "true");
    pass1.required_artifact = Some("{{base}}.aux".to_string());
    let stages = vec![pass1, sh_stage("bibtex", false, "true")];

    let result = pipeline::run(&doc, &stages, &ProcessRunner, quiet());

    assert!(!result.success);
    assert_eq!(result.stages.len(), 1);
    let err = result.failure_error().unwrap();
    assert_eq!(err.code, texbuild::ErrorCode::MissingExpectedArtifact);
}

#[test]
fn artifacts_land_beside_the_source_not_in_the_callers_cwd() {
    // The working directory travels with the document; nothing is written
    // where the test process happens to be running.
    let (_tmp, doc) = fixture("paper.tex");
    let stages = vec![sh_stage("latex.pass1", true, "touch '{{base}}.pdf'")];

    let result = pipeline::run(&doc, &stages, &ProcessRunner, quiet());

    assert!(result.success);
    assert!(doc.artifact("pdf").exists());
    assert!(!std::env::current_dir().unwrap().join("paper.pdf").exists());
}
