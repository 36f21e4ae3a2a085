//! Pipeline configuration stored in `docfence.toml`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::format::OutputFormat;
use crate::core::grammar::LanguageTable;

/// File looked up in the input directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "docfence.toml";

/// Pipeline configuration (TOML).
///
/// Missing fields default to values that suit the tutorial corpus. CLI flags
/// override whatever is loaded here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DocfenceConfig {
    /// File extensions (without the dot) treated as tutorials.
    pub extensions: Vec<String>,

    /// Exit with a distinct code when any snippet is invalid.
    pub strict: bool,

    /// Encoding of rendered documents.
    pub format: OutputFormat,

    /// Worker threads for the batch; 0 lets rayon decide.
    pub jobs: usize,

    /// Follow symlinks while walking the input directory.
    pub follow_links: bool,

    pub languages: LanguageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LanguageConfig {
    /// Extra fence tags mapped to a built-in grammar (e.g. `es6 = "javascript"`).
    pub aliases: BTreeMap<String, String>,

    /// Tags that are never checked, even when a grammar exists.
    pub unchecked: BTreeSet<String>,
}

impl Default for DocfenceConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "markdown".to_string(), "js".to_string()],
            strict: false,
            format: OutputFormat::Html,
            jobs: 0,
            follow_links: false,
            languages: LanguageConfig::default(),
        }
    }
}

impl DocfenceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(anyhow!("extensions must be a non-empty array"));
        }
        for ext in &self.extensions {
            if ext.trim().is_empty() || ext.contains('.') || ext.contains('/') {
                return Err(anyhow!(
                    "extension '{ext}' must be a bare suffix like \"md\""
                ));
            }
        }
        self.language_table().context("languages")?;
        Ok(())
    }

    /// Language table with configured aliases applied.
    pub fn language_table(&self) -> Result<LanguageTable> {
        LanguageTable::with_overrides(&self.languages.aliases, &self.languages.unchecked)
    }

    /// True if `path` has one of the configured extensions (case-insensitive).
    pub fn matches_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|wanted| wanted.eq_ignore_ascii_case(ext))
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--strict` only switches strict mode on.
    pub strict: bool,
    pub format: Option<OutputFormat>,
    pub jobs: Option<usize>,
}

impl CliOverrides {
    /// Apply overrides to a loaded config and re-validate it.
    pub fn apply(&self, mut base: DocfenceConfig) -> Result<DocfenceConfig> {
        if self.strict {
            base.strict = true;
        }
        if let Some(format) = self.format {
            base.format = format;
        }
        if let Some(jobs) = self.jobs {
            base.jobs = jobs;
        }
        base.validate()?;
        Ok(base)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `DocfenceConfig::default()`.
pub fn load_config(path: &Path) -> Result<DocfenceConfig> {
    if !path.exists() {
        let cfg = DocfenceConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: DocfenceConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Pick the config for a run.
///
/// An explicit path must exist; otherwise `<input_dir>/docfence.toml` is used
/// when present.
pub fn resolve_config(
    explicit: Option<&Path>,
    input_dir: &Path,
) -> Result<(DocfenceConfig, Option<PathBuf>)> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(anyhow!("config file {} not found", path.display()));
        }
        return Ok((load_config(path)?, Some(path.to_path_buf())));
    }
    let candidate = input_dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        return Ok((load_config(&candidate)?, Some(candidate)));
    }
    Ok((DocfenceConfig::default(), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, DocfenceConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "strict = true\nformat = \"json\"\n\n[languages.aliases]\nes6 = \"javascript\"\n",
        )
        .expect("write");
        let cfg = load_config(&path).expect("load");
        assert!(cfg.strict);
        assert_eq!(cfg.format, OutputFormat::Json);
        assert_eq!(cfg.extensions, DocfenceConfig::default().extensions);
        let table = cfg.language_table().expect("table");
        assert!(table.lookup("es6").is_some());
    }

    #[test]
    fn rejects_unknown_alias_target() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[languages.aliases]\nsh = \"bash\"\n").expect("write");
        let err = load_config(&path).expect_err("invalid alias");
        assert!(format!("{err:#}").contains("unknown grammar 'bash'"));
    }

    #[test]
    fn rejects_dotted_extensions() {
        let cfg = DocfenceConfig {
            extensions: vec![".md".to_string()],
            ..DocfenceConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn resolve_prefers_input_dir_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(CONFIG_FILE_NAME), "jobs = 2\n").expect("write");
        let (cfg, source) = resolve_config(None, temp.path()).expect("resolve");
        assert_eq!(cfg.jobs, 2);
        assert_eq!(source, Some(temp.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn resolve_errors_on_missing_explicit_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("nope.toml");
        assert!(resolve_config(Some(&missing), temp.path()).is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let base = DocfenceConfig {
            jobs: 8,
            ..DocfenceConfig::default()
        };
        let overrides = CliOverrides {
            strict: true,
            format: Some(OutputFormat::Json),
            jobs: None,
        };
        let merged = overrides.apply(base).expect("merge");
        assert!(merged.strict);
        assert_eq!(merged.format, OutputFormat::Json);
        assert_eq!(merged.jobs, 8);
    }

    #[test]
    fn absent_strict_flag_keeps_file_setting() {
        let base = DocfenceConfig {
            strict: true,
            ..DocfenceConfig::default()
        };
        let merged = CliOverrides::default().apply(base).expect("merge");
        assert!(merged.strict);
    }

    #[test]
    fn extension_match_ignores_case() {
        let cfg = DocfenceConfig::default();
        assert!(cfg.matches_extension(Path::new("intro/Arrays.JS")));
        assert!(!cfg.matches_extension(Path::new("notes.txt")));
        assert!(!cfg.matches_extension(Path::new("README")));
    }
}
