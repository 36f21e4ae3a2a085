//! Writing rendered documents and the report under the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::core::format::OutputFormat;

/// Report file name inside the output directory.
pub const REPORT_FILE_NAME: &str = "report.json";
/// Index page name inside the output directory (html format only).
pub const INDEX_FILE_NAME: &str = "index.html";

/// Whether a write changed the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Output directory handle.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Create (if needed) and open the output directory.
    pub fn create(root: &Path) -> Result<Self> {
        if root.exists() && !root.is_dir() {
            bail!("output path {} is not a directory", root.display());
        }
        fs::create_dir_all(root)
            .with_context(|| format!("create output directory {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Link to a rendered document, relative to the output directory.
    ///
    /// The source file name is kept and the format extension appended, so
    /// `intro.md` and `intro.js` never collide.
    pub fn href(relative: &str, format: OutputFormat) -> String {
        format!("{relative}.{}", format.extension())
    }

    pub fn document_path(&self, relative: &str, format: OutputFormat) -> PathBuf {
        self.root.join(Self::href(relative, format))
    }

    /// Write `contents` to `relative`, skipping the write if the bytes match.
    pub fn write(&self, relative: &str, contents: &str) -> Result<WriteOutcome> {
        let path = self.root.join(relative);
        if fs::read(&path).is_ok_and(|existing| existing == contents.as_bytes()) {
            debug!(path = %path.display(), "output unchanged");
            return Ok(WriteOutcome::Unchanged);
        }
        write_atomic(&path, contents)?;
        debug!(path = %path.display(), "wrote output");
        Ok(WriteOutcome::Written)
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("output path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let mut tmp_name = path
        .file_name()
        .with_context(|| format!("output path missing file name {}", path.display()))?
        .to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = parent.join(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp output {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace output {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_documents_keep_their_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = OutputDir::create(&temp.path().join("site")).expect("create");
        let href = OutputDir::href("basics/arrays.js", OutputFormat::Html);
        assert_eq!(href, "basics/arrays.js.html");

        let outcome = out.write(&href, "<p>arrays</p>").expect("write");
        assert_eq!(outcome, WriteOutcome::Written);
        let written = fs::read_to_string(out.document_path("basics/arrays.js", OutputFormat::Html))
            .expect("read back");
        assert_eq!(written, "<p>arrays</p>");
    }

    #[test]
    fn identical_contents_are_not_rewritten() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = OutputDir::create(temp.path()).expect("create");
        assert_eq!(out.write("a.json", "{}\n").expect("first"), WriteOutcome::Written);
        assert_eq!(out.write("a.json", "{}\n").expect("second"), WriteOutcome::Unchanged);
        assert_eq!(out.write("a.json", "[]\n").expect("third"), WriteOutcome::Written);
        assert!(!temp.path().join("a.json.tmp").exists());
    }

    #[test]
    fn file_as_output_root_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("taken");
        fs::write(&file, "x").expect("write");
        assert!(OutputDir::create(&file).is_err());
    }
}
