//! Output formats for rendered documents.
//!
//! HTML goes through embedded minijinja templates (auto-escaped, since the
//! template names end in `.html`); JSON is the serde form of
//! [`RenderedDocument`].

use anyhow::{Context, Result};
use clap::ValueEnum;
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};

use crate::core::markup::prose_to_html;
use crate::core::types::{Block, RenderedDocument};

const DOCUMENT_TEMPLATE: &str = include_str!("../../templates/document.html");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Rendered document encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

/// Template view of one block.
#[derive(Debug, Serialize)]
struct BlockView<'a> {
    kind: &'static str,
    html: Option<String>,
    language: Option<&'a str>,
    source: Option<&'a str>,
    status: Option<&'static str>,
    message: Option<&'a str>,
}

impl<'a> BlockView<'a> {
    fn new(block: &'a Block) -> Self {
        match block {
            Block::Prose { text } => Self {
                kind: "prose",
                html: Some(prose_to_html(text)),
                language: None,
                source: None,
                status: None,
                message: None,
            },
            Block::Code {
                language,
                source,
                validity,
            } => Self {
                kind: "code",
                html: None,
                language: Some(language),
                source: Some(source),
                status: Some(validity.label()),
                message: validity.message(),
            },
        }
    }
}

/// Row of the HTML index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub title: String,
    /// Link relative to the output directory.
    pub href: String,
    pub invalid: usize,
}

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("document.html", DOCUMENT_TEMPLATE)
        .context("parse document template")?;
    env.add_template("index.html", INDEX_TEMPLATE)
        .context("parse index template")?;
    Ok(env)
}

/// Encode a document in the requested format.
pub fn format_document(doc: &RenderedDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => to_html(doc),
        OutputFormat::Json => to_json(doc),
    }
}

/// True when a prose block already renders the title as its `# ` heading.
fn title_in_prose(doc: &RenderedDocument) -> bool {
    doc.blocks
        .iter()
        .filter_map(|block| match block {
            Block::Prose { text } => Some(text),
            Block::Code { .. } => None,
        })
        .flat_map(|text| text.lines())
        .find_map(|line| line.trim_start().strip_prefix("# "))
        .is_some_and(|heading| heading.trim().trim_end_matches('#').trim() == doc.title)
}

pub fn to_html(doc: &RenderedDocument) -> Result<String> {
    let env = environment()?;
    let template = env.get_template("document.html")?;
    let blocks: Vec<BlockView<'_>> = doc.blocks.iter().map(BlockView::new).collect();
    let rendered = template
        .render(context! {
            title => &doc.title,
            show_title => !title_in_prose(doc),
            source_path => &doc.source_path,
            blocks => blocks,
        })
        .with_context(|| format!("render html for {}", doc.source_path))?;
    Ok(rendered)
}

pub fn to_json(doc: &RenderedDocument) -> Result<String> {
    let mut payload = serde_json::to_string_pretty(doc).context("serialize document json")?;
    payload.push('\n');
    Ok(payload)
}

/// HTML page linking every rendered document.
pub fn index_html(entries: &[IndexEntry]) -> Result<String> {
    let env = environment()?;
    let template = env.get_template("index.html")?;
    let rendered = template
        .render(context! { entries => entries })
        .context("render index html")?;
    Ok(rendered)
}
