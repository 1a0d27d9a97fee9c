//! Workspace resolution for a single source document.
//!
//! A `Document` pins down everything the pipeline and cleanup need to name
//! generated artifacts: the canonical path, the directory the tools run in,
//! and the base name (`paper.tex` -> `paper`) that every artifact derives
//! from. The process working directory is never changed; `dir` travels with
//! the document and is passed to each spawn instead.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A resolved source document. Immutable for the lifetime of one run.
#[derive(Debug, Clone)]
pub struct Document {
    /// Canonical absolute path to the source file.
    pub path: PathBuf,
    /// Directory the file lives in. All tools run here so artifacts land
    /// beside the source.
    pub dir: PathBuf,
    /// File name without the final extension. Names every generated artifact
    /// as `{base}.{ext}` (case-sensitive).
    pub base: String,
}

impl Document {
    /// Resolve a user-supplied path into a `Document`.
    ///
    /// Tilde-expands, canonicalizes, and derives the parent directory and
    /// base name. Fails with `InputNotFound` if the path does not exist.
    pub fn resolve(raw: &str) -> Result<Document> {
        let expanded = shellexpand::tilde(raw);
        let path = std::fs::canonicalize(expanded.as_ref())
            .map_err(|_| Error::input_not_found(expanded.as_ref()))?;

        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::input_not_found(raw))?;

        let base = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| Error::input_not_found(raw))?;

        Ok(Document { path, dir, base })
    }

    /// File name component of the source path (e.g. `paper.tex`), as handed
    /// to the typesetting tool.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.base.clone())
    }

    /// Path of a sibling artifact named from this document's base name.
    pub fn artifact(&self, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.base, ext))
    }
}
