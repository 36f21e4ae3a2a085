//! `docfence render`: validate, then write one document per tutorial plus
//! the index and report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::core::format::{IndexEntry, OutputFormat, format_document, index_html};
use crate::core::report::ValidationReport;
use crate::io::output::{INDEX_FILE_NAME, OutputDir, REPORT_FILE_NAME, WriteOutcome};
use crate::validate::{RunRequest, run_pipeline};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub report: ValidationReport,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Files whose bytes changed on disk.
    pub written: usize,
    /// Files left alone because the output already matched.
    pub unchanged: usize,
    pub exit_code: i32,
}

pub fn render_tutorials(request: &RunRequest, output_dir: &Path) -> Result<RenderOutcome> {
    let config = request.config()?;
    let input = request.input_dir.canonicalize().with_context(|| {
        format!("input directory {} does not exist", request.input_dir.display())
    })?;
    let out = OutputDir::create(output_dir)?;
    let exclude = out
        .root()
        .canonicalize()
        .with_context(|| format!("resolve {}", out.root().display()))?;
    let batch = run_pipeline(&input, &config, Some(&exclude))?;

    let mut written = 0;
    let mut unchanged = 0;
    let mut tally = |outcome: WriteOutcome| match outcome {
        WriteOutcome::Written => written += 1,
        WriteOutcome::Unchanged => unchanged += 1,
    };

    let mut index = Vec::with_capacity(batch.units.len());
    for unit in &batch.units {
        let href = OutputDir::href(&unit.relative, config.format);
        let contents = format_document(&unit.document, config.format)?;
        tally(out.write(&href, &contents)?);
        index.push(IndexEntry {
            title: unit.document.title.clone(),
            href,
            invalid: unit.report.invalid_count(),
        });
    }
    if config.format == OutputFormat::Html {
        tally(out.write(INDEX_FILE_NAME, &index_html(&index)?)?);
    }
    tally(out.write(REPORT_FILE_NAME, &batch.report.to_json()?)?);

    info!(
        output = %out.root().display(),
        written,
        unchanged,
        "render complete"
    );
    let exit_code = batch.report.exit_code(config.strict);
    Ok(RenderOutcome {
        report: batch.report,
        output_dir: out.root().to_path_buf(),
        format: config.format,
        written,
        unchanged,
        exit_code,
    })
}
