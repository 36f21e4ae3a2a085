//! Prose to HTML conversion for the subset of Markdown the tutorials use.
//!
//! Supported: ATX headings, paragraphs, bullet and numbered lists, inline
//! code, bold and links. Everything else is emitted as escaped text.

use std::sync::LazyLock;

use minijinja::HtmlEscape;
use regex::Regex;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*#*\s*$").expect("heading regex"));
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.*)$").expect("bullet regex"));
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s+(.*)$").expect("numbered regex"));
static CODE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`").expect("code span regex"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold regex"));
// Link targets may hold one level of balanced parentheses (`Foo_(bar)`).
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(((?:[^()\s]|\([^()\s]*\))+)\)").expect("link regex")
});

/// URL schemes allowed in rendered links. Scheme-less targets are relative.
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Numbered => "ol",
        }
    }
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    HtmlEscape(text).to_string()
}

/// True for relative targets, `#` anchors and [`SAFE_SCHEMES`].
fn is_safe_href(url: &str) -> bool {
    match url.find([':', '/', '?', '#']) {
        Some(end) if url[end..].starts_with(':') => SAFE_SCHEMES
            .iter()
            .any(|scheme| scheme.eq_ignore_ascii_case(&url[..end])),
        _ => true,
    }
}

/// Convert a prose segment to an HTML fragment.
pub fn prose_to_html(text: &str) -> String {
    let mut out = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list: Option<(ListKind, Vec<String>)> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut out);
            flush_list(&mut list, &mut out);
            continue;
        }
        if let Some(caps) = HEADING_RE.captures(line.trim_start()) {
            flush_paragraph(&mut paragraph, &mut out);
            flush_list(&mut list, &mut out);
            let level = caps[1].len();
            out.push(format!("<h{level}>{}</h{level}>", inline(&caps[2])));
            continue;
        }
        let item = BULLET_RE
            .captures(line)
            .map(|caps| (ListKind::Bullet, caps))
            .or_else(|| NUMBERED_RE.captures(line).map(|caps| (ListKind::Numbered, caps)));
        if let Some((kind, caps)) = item {
            flush_paragraph(&mut paragraph, &mut out);
            if list.as_ref().is_some_and(|(open, _)| *open != kind) {
                flush_list(&mut list, &mut out);
            }
            list.get_or_insert_with(|| (kind, Vec::new()))
                .1
                .push(inline(&caps[1]));
            continue;
        }
        // Indented continuation of the previous list item.
        if line.starts_with(char::is_whitespace)
            && let Some(last) = list.as_mut().and_then(|(_, items)| items.last_mut())
        {
            last.push(' ');
            last.push_str(&inline(line.trim()));
            continue;
        }
        flush_list(&mut list, &mut out);
        paragraph.push(line.trim());
    }
    flush_paragraph(&mut paragraph, &mut out);
    flush_list(&mut list, &mut out);
    out.join("\n")
}

fn flush_paragraph(paragraph: &mut Vec<&str>, out: &mut Vec<String>) {
    if paragraph.is_empty() {
        return;
    }
    out.push(format!("<p>{}</p>", inline(&paragraph.join(" "))));
    paragraph.clear();
}

fn flush_list(list: &mut Option<(ListKind, Vec<String>)>, out: &mut Vec<String>) {
    let Some((kind, items)) = list.take() else {
        return;
    };
    let tag = kind.tag();
    let body: String = items
        .iter()
        .map(|item| format!("<li>{item}</li>"))
        .collect();
    out.push(format!("<{tag}>{body}</{tag}>"));
}

/// Inline markup: code spans are escaped verbatim, other text also gets
/// link and bold handling.
fn inline(text: &str) -> String {
    let mut out = String::new();
    let mut last = 0;
    for span in CODE_SPAN_RE.find_iter(text) {
        let code = &span.as_str()[1..span.as_str().len() - 1];
        out.push_str(&emphasis(&text[last..span.start()]));
        out.push_str("<code>");
        out.push_str(&escape_html(code));
        out.push_str("</code>");
        last = span.end();
    }
    out.push_str(&emphasis(&text[last..]));
    out
}

/// Links are matched on raw text; unsafe targets stay as escaped text.
fn emphasis(text: &str) -> String {
    let mut out = String::new();
    let mut last = 0;
    for caps in LINK_RE.captures_iter(text) {
        let (Some(whole), Some(label), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        out.push_str(&bold(&text[last..whole.start()]));
        if is_safe_href(url.as_str()) {
            out.push_str(&format!(
                r#"<a href="{}">{}</a>"#,
                escape_html(url.as_str()),
                bold(label.as_str())
            ));
        } else {
            out.push_str(&bold(whole.as_str()));
        }
        last = whole.end();
    }
    out.push_str(&bold(&text[last..]));
    out
}

fn bold(text: &str) -> String {
    BOLD_RE
        .replace_all(&escape_html(text), "<strong>$1</strong>")
        .into_owned()
}
