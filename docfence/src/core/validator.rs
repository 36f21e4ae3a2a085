//! Snippet syntax validation.

use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::core::grammar::{Grammar, LanguageTable};
use crate::core::types::{Snippet, TutorialUnit, Validity};

/// Check one snippet against the grammar registered for its tag.
///
/// Unsupported tags return `Unchecked`. A panicking parser is reported as
/// `Invalid` so one pathological snippet cannot take down the batch.
pub fn check_snippet(table: &LanguageTable, snippet: &Snippet) -> Validity {
    let Some(grammar) = table.lookup(&snippet.declared_language) else {
        return Validity::Unchecked;
    };
    match run_grammar(grammar, &snippet.source) {
        Ok(()) => Validity::Valid,
        Err(message) => Validity::Invalid { message },
    }
}

fn run_grammar(grammar: &dyn Grammar, source: &str) -> Result<(), String> {
    match panic::catch_unwind(AssertUnwindSafe(|| grammar.check(source))) {
        Ok(result) => result,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|msg| (*msg).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(format!("{} parser panicked: {detail}", grammar.name()))
        }
    }
}

/// Validate every snippet of a unit in place.
pub fn validate_unit(table: &LanguageTable, unit: &mut TutorialUnit) {
    for (index, snippet) in unit.snippets.iter_mut().enumerate() {
        let outcome = check_snippet(table, snippet);
        debug!(
            index,
            language = %snippet.declared_language,
            validity = outcome.label(),
            "checked snippet"
        );
        snippet.record(outcome);
    }
}
