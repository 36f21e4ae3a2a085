//! Validation report assembled from per-file pipeline results.
//!
//! Entries are kept in path order so the serialized report is stable across
//! runs regardless of worker scheduling.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::types::{LoadFailure, SnippetStatus, TutorialUnit, WellFormednessWarning};
use crate::exit_codes;

/// Short hash of tutorial text so consumers can spot changed sources.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..8]) // First 8 bytes = 16 hex chars
}

/// One snippet line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetReport {
    pub index: usize,
    pub language: String,
    pub line: usize,
    pub validity: SnippetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Report entry for a file that loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub title: String,
    pub source_hash: String,
    pub warnings: Vec<WellFormednessWarning>,
    pub snippets: Vec<SnippetReport>,
}

impl FileReport {
    pub fn from_unit(
        path: &str,
        source_hash: String,
        unit: &TutorialUnit,
        warnings: &[WellFormednessWarning],
    ) -> Self {
        let snippets = unit
            .snippets
            .iter()
            .enumerate()
            .map(|(index, snippet)| SnippetReport {
                index,
                language: snippet.declared_language.clone(),
                line: snippet.line,
                validity: snippet.validity().status(),
                message: snippet.validity().message().map(str::to_string),
            })
            .collect();
        Self {
            path: path.to_string(),
            title: unit.title.clone(),
            source_hash,
            warnings: warnings.to_vec(),
            snippets,
        }
    }

    pub fn count(&self, status: SnippetStatus) -> usize {
        self.snippets
            .iter()
            .filter(|snippet| snippet.validity == status)
            .count()
    }

    pub fn invalid_count(&self) -> usize {
        self.count(SnippetStatus::Invalid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub files: usize,
    pub failed: usize,
    pub snippets: usize,
    pub valid: usize,
    pub invalid: usize,
    pub unchecked: usize,
    pub warnings: usize,
}

/// Per-file snippet outcomes, load failures and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub files: Vec<FileReport>,
    pub failures: Vec<LoadFailure>,
    pub summary: Summary,
}

impl ValidationReport {
    pub fn new(mut files: Vec<FileReport>, mut failures: Vec<LoadFailure>) -> Self {
        files.sort_by(|left, right| left.path.cmp(&right.path));
        failures.sort_by(|left, right| left.path.cmp(&right.path));
        let mut summary = Summary {
            files: files.len() + failures.len(),
            failed: failures.len(),
            ..Summary::default()
        };
        for file in &files {
            summary.snippets += file.snippets.len();
            summary.valid += file.count(SnippetStatus::Valid);
            summary.invalid += file.count(SnippetStatus::Invalid);
            summary.unchecked += file.count(SnippetStatus::Unchecked);
            summary.warnings += file.warnings.len();
        }
        Self {
            files,
            failures,
            summary,
        }
    }

    /// Exit code for this report. Load failures take precedence over
    /// invalid snippets, which only count in strict mode.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.summary.failed > 0 {
            exit_codes::LOAD_FAILED
        } else if strict && self.summary.invalid > 0 {
            exit_codes::INVALID_SNIPPETS
        } else {
            exit_codes::OK
        }
    }

    /// Human-readable report, one problem per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            let _ = writeln!(
                out,
                "{}: {} snippets (valid={} invalid={} unchecked={})",
                file.path,
                file.snippets.len(),
                file.count(SnippetStatus::Valid),
                file.count(SnippetStatus::Invalid),
                file.count(SnippetStatus::Unchecked),
            );
            for snippet in file.snippets.iter().filter(|s| s.validity == SnippetStatus::Invalid) {
                let _ = writeln!(
                    out,
                    "  invalid #{} {} (line {}): {}",
                    snippet.index,
                    snippet.language,
                    snippet.line,
                    snippet.message.as_deref().unwrap_or("")
                );
            }
            for warning in &file.warnings {
                let _ = writeln!(out, "  warning (line {}): {}", warning.line, warning.message);
            }
        }
        for failure in &self.failures {
            let _ = writeln!(out, "failed: {}: {}", failure.path, failure.message);
        }
        let summary = &self.summary;
        let _ = writeln!(
            out,
            "summary: files={} failed={} snippets={} valid={} invalid={} unchecked={} warnings={}",
            summary.files,
            summary.failed,
            summary.snippets,
            summary.valid,
            summary.invalid,
            summary.unchecked,
            summary.warnings,
        );
        out
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        let mut payload = serde_json::to_string_pretty(self)?;
        payload.push('\n');
        Ok(payload)
    }
}
