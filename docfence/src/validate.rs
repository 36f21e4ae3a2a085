//! `docfence validate`: check snippets and report, writing nothing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::core::report::ValidationReport;
use crate::io::config::{CliOverrides, DocfenceConfig, resolve_config};
use crate::io::loader::Loader;
use crate::pipeline::{BatchOutcome, Pipeline, run_batch};

/// Inputs shared by `validate` and `render`.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub overrides: CliOverrides,
}

impl RunRequest {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            config_path: None,
            overrides: CliOverrides::default(),
        }
    }

    /// Resolve the effective config: file (explicit or in the input
    /// directory), then CLI overrides.
    pub fn config(&self) -> Result<DocfenceConfig> {
        let (config, source) = resolve_config(self.config_path.as_deref(), &self.input_dir)?;
        if let Some(source) = &source {
            info!(config = %source.display(), "loaded config");
        }
        self.overrides.apply(config).context("apply command-line options")
    }
}

/// Report plus the exit code it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    pub report: ValidationReport,
    pub exit_code: i32,
}

/// Discover, load and validate every tutorial under `input_dir`.
pub(crate) fn run_pipeline(
    input_dir: &Path,
    config: &DocfenceConfig,
    exclude: Option<&Path>,
) -> Result<BatchOutcome> {
    let mut loader = Loader::discover(input_dir, config)?;
    if let Some(dir) = exclude {
        loader = loader.without_dir(dir);
    }
    let pipeline = Pipeline::from_config(config)?;
    run_batch(&loader, &pipeline, config.jobs)
}

pub fn validate_tutorials(request: &RunRequest) -> Result<ValidateOutcome> {
    let config = request.config()?;
    let batch = run_pipeline(&request.input_dir, &config, None)?;
    let exit_code = batch.report.exit_code(config.strict);
    Ok(ValidateOutcome {
        report: batch.report,
        exit_code,
    })
}
