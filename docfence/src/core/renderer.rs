//! Order-preserving transform from a validated unit to display blocks.

use crate::core::types::{Block, RenderedDocument, Segment, TutorialUnit};

/// Render a validated unit.
///
/// One block is produced per segment, in segment order. Invalid snippets are
/// kept; the formatter is responsible for marking them.
pub fn render(unit: &TutorialUnit, source_path: &str) -> RenderedDocument {
    let blocks = unit
        .segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Prose(text) => Some(Block::Prose { text: text.clone() }),
            Segment::Code(index) => unit.snippets.get(*index).map(|snippet| Block::Code {
                language: snippet.declared_language.clone(),
                source: snippet.source.clone(),
                validity: snippet.validity().clone(),
            }),
        })
        .collect();
    RenderedDocument {
        title: unit.title.clone(),
        source_path: source_path.to_string(),
        blocks,
    }
}
