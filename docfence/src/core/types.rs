//! Shared deterministic types for the tutorial pipeline.
//!
//! These types define stable contracts between pipeline stages. They do not
//! depend on external state or I/O, and their serialized form is part of the
//! validation report, so field names must remain stable.

use serde::{Deserialize, Serialize};

/// Language hint used when an opening fence carries no info string.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Outcome of checking a snippet against its declared language.
///
/// Transitions are monotonic: `Unchecked` may become `Valid` or `Invalid`,
/// and a checked snippet never changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Validity {
    /// No grammar is available for the tag, or the snippet was not checked yet.
    Unchecked,
    /// The snippet parsed successfully.
    Valid,
    /// The snippet failed to parse.
    Invalid { message: String },
}

/// Status of a [`Validity`] without its payload; the report counts these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetStatus {
    Unchecked,
    Valid,
    Invalid,
}

impl SnippetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SnippetStatus::Unchecked => "unchecked",
            SnippetStatus::Valid => "valid",
            SnippetStatus::Invalid => "invalid",
        }
    }
}

impl Validity {
    pub fn is_checked(&self) -> bool {
        !matches!(self, Validity::Unchecked)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Validity::Invalid { .. })
    }

    pub fn status(&self) -> SnippetStatus {
        match self {
            Validity::Unchecked => SnippetStatus::Unchecked,
            Validity::Valid => SnippetStatus::Valid,
            Validity::Invalid { .. } => SnippetStatus::Invalid,
        }
    }

    pub fn label(&self) -> &'static str {
        self.status().as_str()
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Validity::Invalid { message } => Some(message),
            _ => None,
        }
    }
}

/// One fenced code example extracted from a tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    /// First word of the fence info string, as written.
    pub declared_language: String,
    /// Fence body with the fence indentation removed.
    pub source: String,
    /// 1-based line of the opening fence.
    pub line: usize,
    validity: Validity,
}

impl Snippet {
    pub fn new(declared_language: impl Into<String>, source: impl Into<String>, line: usize) -> Self {
        Self {
            declared_language: declared_language.into(),
            source: source.into(),
            line,
            validity: Validity::Unchecked,
        }
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// Record a check result.
    ///
    /// Returns `false` (leaving the snippet untouched) when the snippet was
    /// already checked or when `outcome` is `Unchecked`.
    pub fn record(&mut self, outcome: Validity) -> bool {
        if self.validity.is_checked() || !outcome.is_checked() {
            return false;
        }
        self.validity = outcome;
        true
    }
}

/// Structural piece of a tutorial, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Segment {
    /// Text outside any fence.
    Prose(String),
    /// Index into [`TutorialUnit::snippets`].
    Code(usize),
}

/// One source file's worth of prose and embedded examples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TutorialUnit {
    pub title: String,
    pub body_text: String,
    pub snippets: Vec<Snippet>,
    pub segments: Vec<Segment>,
}

/// Malformed fencing recovered by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellFormednessWarning {
    /// 1-based line where the problem starts.
    pub line: usize,
    pub message: String,
}

/// A tutorial file that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    /// Path relative to the input directory, `/`-separated.
    pub path: String,
    pub message: String,
}

/// Display-ready block of a rendered tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Prose {
        text: String,
    },
    Code {
        language: String,
        source: String,
        validity: Validity,
    },
}

/// Read-only rendering of a tutorial unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub title: String,
    pub source_path: String,
    pub blocks: Vec<Block>,
}
