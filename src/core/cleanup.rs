//! Removal of generated LaTeX artifacts.
//!
//! Two modes share one extension set. Targeted mode probes `{base}.{ext}`
//! for a single document; directory-wide mode removes every matching file in
//! the directory regardless of base name, and is only ever entered by
//! explicit request because it can delete artifacts belonging to unrelated
//! documents. Deletion is best-effort: a file that cannot be removed is
//! reported and the pass continues. Absence is never an error, so running
//! cleanup twice removes nothing the second time.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Auxiliary-file extensions recognized by cleanup: cross-reference data,
/// logs, compiled bibliography and its log, hyperref output, table of
/// contents, beamer navigation/slide files, and incremental-build data.
pub const AUX_EXTENSIONS: &[&str] = &[
    "aux",
    "log",
    "bbl",
    "blg",
    "out",
    "toc",
    "synctex.gz",
    "fls",
    "fdb_latexmk",
    "nav",
    "snm",
];

/// What to clean.
#[derive(Debug, Clone)]
pub struct CleanupSpec {
    /// Directory the artifacts live in.
    pub dir: PathBuf,
    /// Base name of one document, or `None` for the directory-wide mode.
    pub base: Option<String>,
    /// Also remove the final PDF deliverable. Destructive; opt-in only.
    pub deep: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupFailure {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupResult {
    /// File names removed, in removal order.
    pub removed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<CleanupFailure>,
}

impl CleanupResult {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

fn extensions(deep: bool) -> Vec<&'static str> {
    let mut exts: Vec<&'static str> = AUX_EXTENSIONS.to_vec();
    if deep {
        exts.push("pdf");
    }
    exts
}

fn remove(path: &Path, result: &mut CleanupResult) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    match fs::remove_file(path) {
        Ok(()) => result.removed.push(name),
        Err(e) => result.failed.push(CleanupFailure {
            file: name,
            error: e.to_string(),
        }),
    }
}

/// Remove generated artifacts per `spec`. Returns what was removed and what
/// could not be.
pub fn clean(spec: &CleanupSpec) -> CleanupResult {
    let mut result = CleanupResult {
        removed: Vec::new(),
        failed: Vec::new(),
    };

    let exts = extensions(spec.deep);

    match &spec.base {
        Some(base) => {
            for ext in &exts {
                let candidate = spec.dir.join(format!("{}.{}", base, ext));
                if candidate.exists() {
                    remove(&candidate, &mut result);
                }
            }
        }
        None => {
            let entries = match fs::read_dir(&spec.dir) {
                Ok(entries) => entries,
                Err(e) => {
                    result.failed.push(CleanupFailure {
                        file: spec.dir.display().to_string(),
                        error: e.to_string(),
                    });
                    return result;
                }
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().to_string();
                if exts.iter().any(|ext| name.ends_with(&format!(".{}", ext))) {
                    remove(&path, &mut result);
                }
            }
        }
    }

    result
}
