//! Per-unit pipeline (extract → validate → render) and the batch driver.
//!
//! Units are independent: each worker owns one unit from load to render, and
//! nothing is shared between workers except the read-only [`Pipeline`].

use anyhow::{Context, Result};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::core::extractor::{Extraction, extract};
use crate::core::grammar::LanguageTable;
use crate::core::renderer::render;
use crate::core::report::{FileReport, ValidationReport, content_hash};
use crate::core::types::{LoadFailure, RenderedDocument};
use crate::core::validator::validate_unit;
use crate::io::config::DocfenceConfig;
use crate::io::loader::{Loader, RawDocument};

/// Stack for each worker thread. Parsers recurse per nesting level, and a
/// stack overflow aborts the process instead of unwinding.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Read-only context passed to every unit.
#[derive(Clone, Default)]
pub struct Pipeline {
    table: LanguageTable,
}

/// A unit that went through every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedUnit {
    /// Source path relative to the input directory.
    pub relative: String,
    pub document: RenderedDocument,
    pub report: FileReport,
}

/// Everything a batch produced, in discovery order.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub units: Vec<ProcessedUnit>,
    pub report: ValidationReport,
}

impl Pipeline {
    pub fn new(table: LanguageTable) -> Self {
        Self { table }
    }

    pub fn from_config(config: &DocfenceConfig) -> Result<Self> {
        Ok(Self::new(config.language_table()?))
    }

    pub fn table(&self) -> &LanguageTable {
        &self.table
    }

    /// Run one loaded document through extraction, validation and rendering.
    pub fn process(&self, doc: RawDocument) -> ProcessedUnit {
        let Extraction {
            mut unit,
            warnings,
        } = extract(&doc.stem(), &doc.text);
        for warning in &warnings {
            warn!(path = %doc.relative, line = warning.line, "{}", warning.message);
        }
        validate_unit(&self.table, &mut unit);
        let document = render(&unit, &doc.relative);
        let report = FileReport::from_unit(&doc.relative, content_hash(&doc.text), &unit, &warnings);
        debug!(
            path = %doc.relative,
            snippets = unit.snippets.len(),
            invalid = report.invalid_count(),
            "processed tutorial"
        );
        ProcessedUnit {
            relative: doc.relative,
            document,
            report,
        }
    }
}

/// Process every discovered file on a rayon pool.
///
/// `jobs == 0` uses rayon's default thread count. Unreadable files become
/// report failures; they never abort the batch.
#[instrument(skip_all, fields(files = loader.files().len(), jobs = jobs))]
pub fn run_batch(loader: &Loader, pipeline: &Pipeline, jobs: usize) -> Result<BatchOutcome> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs)
        .stack_size(WORKER_STACK_SIZE)
        .build()
        .context("build worker pool")?;
    let results: Vec<std::result::Result<ProcessedUnit, LoadFailure>> = pool.install(|| {
        loader
            .files()
            .par_iter()
            .map(|path| loader.load(path).map(|doc| pipeline.process(doc)))
            .collect()
    });

    let mut units = Vec::new();
    let mut failures = loader.failures().to_vec();
    for result in results {
        match result {
            Ok(unit) => units.push(unit),
            Err(failure) => failures.push(failure),
        }
    }
    let report = ValidationReport::new(
        units.iter().map(|unit| unit.report.clone()).collect(),
        failures,
    );
    info!(
        files = report.summary.files,
        failed = report.summary.failed,
        invalid = report.summary.invalid,
        "batch complete"
    );
    Ok(BatchOutcome { units, report })
}
