//! Split tutorial text into prose and fenced snippets.

use crate::core::types::{DEFAULT_LANGUAGE, Segment, Snippet, TutorialUnit, WellFormednessWarning};

/// Extracted unit plus the fencing problems recovered along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub unit: TutorialUnit,
    pub warnings: Vec<WellFormednessWarning>,
}

/// Opening fence parsed from a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenFence {
    marker: char,
    run: usize,
    indent: usize,
    language: String,
}

impl OpenFence {
    fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let indent = line.chars().take_while(|ch| ch.is_whitespace()).count();
        let marker = trimmed.chars().next().filter(|ch| matches!(ch, '`' | '~'))?;
        let run = trimmed.chars().take_while(|ch| *ch == marker).count();
        if run < 3 {
            return None;
        }
        // Fence characters are ASCII, so `run` is also a byte offset.
        let info = &trimmed[run..];
        if marker == '`' && info.contains('`') {
            return None;
        }
        let language = info
            .split_whitespace()
            .next()
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string();
        Some(Self {
            marker,
            run,
            indent,
            language,
        })
    }

    fn closes(&self, line: &str) -> bool {
        let trimmed = line.trim();
        !trimmed.is_empty()
            && trimmed.chars().all(|ch| ch == self.marker)
            && trimmed.len() >= self.run
    }

    fn delimiter(&self) -> String {
        self.marker.to_string().repeat(self.run)
    }
}

/// Extract a [`TutorialUnit`] from raw document text.
///
/// `fallback_title` is used when the prose has no level-1 heading.
pub fn extract(fallback_title: &str, text: &str) -> Extraction {
    let lines: Vec<&str> = text.lines().collect();
    let mut snippets = Vec::new();
    let mut segments = Vec::new();
    let mut warnings = Vec::new();
    let mut prose: Vec<&str> = Vec::new();

    let mut index = 0;
    while index < lines.len() {
        let Some(open) = OpenFence::parse(lines[index]) else {
            prose.push(lines[index]);
            index += 1;
            continue;
        };

        let close = (index + 1..lines.len()).find(|&candidate| open.closes(lines[candidate]));
        let Some(close) = close else {
            warnings.push(WellFormednessWarning {
                line: index + 1,
                message: format!(
                    "unterminated {} fence (language '{}'); remaining text kept as prose",
                    open.delimiter(),
                    open.language
                ),
            });
            prose.extend_from_slice(&lines[index..]);
            break;
        };

        flush_prose(&mut prose, &mut segments);
        let source = lines[index + 1..close]
            .iter()
            .map(|line| strip_indent(line, open.indent))
            .collect::<Vec<_>>()
            .join("\n");
        segments.push(Segment::Code(snippets.len()));
        snippets.push(Snippet::new(open.language, source, index + 1));
        index = close + 1;
    }
    flush_prose(&mut prose, &mut segments);

    let title = find_title(&segments).unwrap_or_else(|| fallback_title.to_string());
    Extraction {
        unit: TutorialUnit {
            title,
            body_text: text.to_string(),
            snippets,
            segments,
        },
        warnings,
    }
}

/// Push buffered prose lines as one segment, dropping blank edges.
fn flush_prose(prose: &mut Vec<&str>, segments: &mut Vec<Segment>) {
    let start = prose.iter().position(|line| !line.trim().is_empty());
    let end = prose.iter().rposition(|line| !line.trim().is_empty());
    if let (Some(start), Some(end)) = (start, end) {
        segments.push(Segment::Prose(prose[start..=end].join("\n")));
    }
    prose.clear();
}

/// Remove up to `indent` leading whitespace characters.
fn strip_indent(line: &str, indent: usize) -> &str {
    let mut rest = line;
    for _ in 0..indent {
        match rest.chars().next() {
            Some(ch) if ch.is_whitespace() => rest = &rest[ch.len_utf8()..],
            _ => break,
        }
    }
    rest
}

fn find_title(segments: &[Segment]) -> Option<String> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Prose(text) => Some(text),
            Segment::Code(_) => None,
        })
        .flat_map(|text| text.lines())
        .find_map(|line| {
            let heading = line.trim_start().strip_prefix("# ")?;
            let heading = heading.trim().trim_end_matches('#').trim();
            (!heading.is_empty()).then(|| heading.to_string())
        })
}
