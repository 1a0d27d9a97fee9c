use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use texbuild::cleanup::{self, CleanupResult, CleanupSpec};
use texbuild::error::{Error, Result};

#[derive(Args)]
pub struct CleanArgs {
    /// A .tex file (or bare base name) whose artifacts should be removed
    pub target: Option<String>,

    /// Also remove the output PDF (destructive)
    #[arg(short = 'd', long)]
    pub deep: bool,

    /// Remove matching artifacts for every document in the directory,
    /// regardless of base name
    #[arg(long, conflicts_with = "target")]
    pub all: bool,
}

#[derive(Debug, Serialize)]
pub struct CleanOutput {
    pub dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    pub deep: bool,
    #[serde(flatten)]
    pub result: CleanupResult,
}

fn spec_for(args: &CleanArgs) -> Result<CleanupSpec> {
    if let Some(target) = &args.target {
        let expanded = shellexpand::tilde(target);
        let path = Path::new(expanded.as_ref());
        let base = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "target",
                    format!("'{}' has no base name", target),
                )
            })?;
        let dir = match path.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        return Ok(CleanupSpec {
            dir,
            base: Some(base),
            deep: args.deep,
        });
    }

    if args.all {
        return Ok(CleanupSpec {
            dir: PathBuf::from("."),
            base: None,
            deep: args.deep,
        });
    }

    // Directory-wide removal can delete artifacts belonging to unrelated
    // documents, so it is never the default.
    Err(
        Error::validation_invalid_argument("target", "Nothing to clean")
            .with_hint("Clean one document: texbuild clean paper.tex")
            .with_hint("Clean every document in this directory: texbuild clean --all"),
    )
}

pub fn run(args: CleanArgs, announce: bool) -> Result<CleanOutput> {
    let spec = spec_for(&args)?;

    if announce && spec.base.is_none() {
        println!(
            "Cleaning all LaTeX auxiliary files in {}...",
            std::fs::canonicalize(&spec.dir)
                .unwrap_or_else(|_| spec.dir.clone())
                .display()
        );
    }

    let result = cleanup::clean(&spec);

    if announce {
        for name in &result.removed {
            println!("Removed: {}", name);
        }
    }
    for failure in &result.failed {
        eprintln!(
            "Error: {}",
            Error::cleanup_io(failure.file.as_str(), failure.error.as_str())
        );
    }
    if announce {
        println!();
        println!("Done. Removed {} files.", result.removed_count());
    }

    Ok(CleanOutput {
        dir: spec.dir.display().to_string(),
        base: spec.base,
        deep: spec.deep,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neither_target_nor_all_is_a_usage_error() {
        let args = CleanArgs {
            target: None,
            deep: false,
            all: false,
        };
        let err = run(args, false).unwrap_err();
        assert_eq!(err.code, texbuild::ErrorCode::ValidationInvalidArgument);
        assert!(!err.hints.is_empty());
    }

    #[test]
    fn target_path_selects_its_own_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("paper.aux"), "x").unwrap();
        std::fs::write(tmp.path().join("paper.tex"), "x").unwrap();

        let args = CleanArgs {
            target: Some(format!("{}/paper.tex", tmp.path().display())),
            deep: false,
            all: false,
        };
        let output = run(args, false).unwrap();
        assert_eq!(output.result.removed, vec!["paper.aux".to_string()]);
        assert!(tmp.path().join("paper.tex").exists());
    }

    #[test]
    fn bare_base_name_cleans_relative_to_cwd() {
        let args = CleanArgs {
            target: Some("paper".to_string()),
            deep: false,
            all: false,
        };
        let spec = spec_for(&args).unwrap();
        assert_eq!(spec.dir, PathBuf::from("."));
        assert_eq!(spec.base.as_deref(), Some("paper"));
    }
}
