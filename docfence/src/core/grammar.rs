//! Language grammars and the tag lookup table.
//!
//! A [`Grammar`] answers one question: does this text parse? The
//! [`LanguageTable`] maps fence tags to grammars; tags without an entry are
//! out of scope and stay unchecked.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use anyhow::{Result, bail};

/// Parser capability for one language.
pub trait Grammar: Send + Sync {
    /// Canonical grammar name (e.g. `javascript`).
    fn name(&self) -> &'static str;

    /// Parse `source`, returning the parser's message on failure.
    fn check(&self, source: &str) -> std::result::Result<(), String>;
}

/// Deepest bracket nesting handed to the recursive-descent JavaScript parser.
pub const MAX_NESTING: usize = 128;

/// ECMAScript (including JSX) via `parse-js`.
pub struct JavaScript;

/// Deepest `(`, `[` or `{` nesting in `source`.
///
/// Counts raw characters without lexing, so brackets inside strings and
/// comments count too. Stray closers never go below zero.
fn bracket_depth(source: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    for byte in source.bytes() {
        match byte {
            b'(' | b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

impl Grammar for JavaScript {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn check(&self, source: &str) -> std::result::Result<(), String> {
        if bracket_depth(source) > MAX_NESTING {
            return Err(format!("nesting exceeds {MAX_NESTING} levels"));
        }
        parse_js::parse(source.as_ref())
            .map(|_| ())
            .map_err(|err| format!("{err:?}"))
    }
}

/// JSON documents via `serde_json`.
pub struct Json;

impl Grammar for Json {
    fn name(&self) -> &'static str {
        "json"
    }

    fn check(&self, source: &str) -> std::result::Result<(), String> {
        serde_json::from_str::<serde_json::Value>(source)
            .map(|_| ())
            .map_err(|err| err.to_string())
    }
}

/// TOML documents via `toml`.
pub struct Toml;

impl Grammar for Toml {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn check(&self, source: &str) -> std::result::Result<(), String> {
        toml::from_str::<toml::Table>(source)
            .map(|_| ())
            .map_err(|err| err.message().to_string())
    }
}

/// Built-in grammars with the tags that select them.
fn builtin_grammars() -> Vec<(Arc<dyn Grammar>, &'static [&'static str])> {
    const JAVASCRIPT_TAGS: &[&str] = &["javascript", "js", "jsx", "mjs", "cjs", "ecmascript"];
    const JSON_TAGS: &[&str] = &["json"];
    const TOML_TAGS: &[&str] = &["toml"];

    let javascript: Arc<dyn Grammar> = Arc::new(JavaScript);
    let json: Arc<dyn Grammar> = Arc::new(Json);
    let toml_grammar: Arc<dyn Grammar> = Arc::new(Toml);
    vec![
        (javascript, JAVASCRIPT_TAGS),
        (json, JSON_TAGS),
        (toml_grammar, TOML_TAGS),
    ]
}

/// Tag → grammar lookup. Tags are matched case-insensitively.
#[derive(Clone)]
pub struct LanguageTable {
    entries: BTreeMap<String, Arc<dyn Grammar>>,
}

impl LanguageTable {
    /// Table with only the built-in grammars and their default tags.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        for (grammar, tags) in builtin_grammars() {
            for tag in tags {
                entries.insert((*tag).to_string(), Arc::clone(&grammar));
            }
        }
        Self { entries }
    }

    /// Built-in table adjusted by configured aliases and unchecked tags.
    ///
    /// `aliases` maps an extra tag to a built-in grammar name. Tags listed in
    /// `unchecked` are removed, even when an alias names them.
    pub fn with_overrides(
        aliases: &BTreeMap<String, String>,
        unchecked: &BTreeSet<String>,
    ) -> Result<Self> {
        let mut table = Self::builtin();
        let grammars: BTreeMap<&'static str, Arc<dyn Grammar>> = builtin_grammars()
            .into_iter()
            .map(|(grammar, _)| (grammar.name(), grammar))
            .collect();
        for (tag, target) in aliases {
            let Some(grammar) = grammars.get(target.to_ascii_lowercase().as_str()) else {
                bail!(
                    "language alias '{tag}' targets unknown grammar '{target}' (known: {})",
                    grammars.keys().copied().collect::<Vec<_>>().join(", ")
                );
            };
            table
                .entries
                .insert(tag.to_ascii_lowercase(), Arc::clone(grammar));
        }
        for tag in unchecked {
            table.entries.remove(&tag.to_ascii_lowercase());
        }
        Ok(table)
    }

    /// Grammar for a declared fence tag, if the tag is supported.
    pub fn lookup(&self, tag: &str) -> Option<&dyn Grammar> {
        self.entries
            .get(&tag.to_ascii_lowercase())
            .map(|grammar| grammar.as_ref())
    }

    /// `(tag, grammar name)` pairs in tag order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.entries
            .iter()
            .map(|(tag, grammar)| (tag.as_str(), grammar.name()))
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let table = LanguageTable::builtin();
        assert_eq!(table.lookup("JavaScript").map(|g| g.name()), Some("javascript"));
        assert_eq!(table.lookup("jsx").map(|g| g.name()), Some("javascript"));
        assert!(table.lookup("bash").is_none());
        assert!(table.lookup("http").is_none());
    }

    #[test]
    fn javascript_accepts_declarations() {
        assert!(JavaScript.check("let x = 10;\nconsole.log(x); // 10").is_ok());
        assert!(JavaScript.check("const add = (a, b) => a + b;").is_ok());
    }

    #[test]
    fn javascript_rejects_broken_syntax() {
        assert!(JavaScript.check("const = 5;").is_err());
        assert!(JavaScript.check("function greet( {").is_err());
    }

    #[test]
    fn javascript_rejects_deep_nesting_before_parsing() {
        let deep = format!("let x = {}1{};", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(
            JavaScript.check(&deep),
            Err(format!("nesting exceeds {MAX_NESTING} levels"))
        );

        let shallow = format!("let x = {}1{};", "[".repeat(40), "]".repeat(40));
        assert!(JavaScript.check(&shallow).is_ok());
    }

    #[test]
    fn bracket_depth_tracks_deepest_point() {
        assert_eq!(bracket_depth("f(a[0], { b: (1) })"), 3);
        assert_eq!(bracket_depth(")))((("), 3);
        assert_eq!(bracket_depth("no brackets"), 0);
    }

    #[test]
    fn json_reports_parser_message() {
        assert!(Json.check(r#"{"name": "John", "age": 30}"#).is_ok());
        let err = Json.check("{ name: 'John' }").expect_err("unquoted key");
        assert!(err.contains("line 1"));
    }

    #[test]
    fn toml_checks_tables() {
        assert!(Toml.check("[package]\nname = \"demo\"").is_ok());
        assert!(Toml.check("[package\nname = ").is_err());
    }

    #[test]
    fn overrides_add_aliases_and_remove_tags() {
        let aliases = BTreeMap::from([("es6".to_string(), "JavaScript".to_string())]);
        let unchecked = BTreeSet::from(["json".to_string()]);
        let table = LanguageTable::with_overrides(&aliases, &unchecked).expect("table");
        assert_eq!(table.lookup("es6").map(|g| g.name()), Some("javascript"));
        assert!(table.lookup("json").is_none());
    }

    #[test]
    fn overrides_reject_unknown_grammar() {
        let aliases = BTreeMap::from([("sh".to_string(), "bash".to_string())]);
        let err = LanguageTable::with_overrides(&aliases, &BTreeSet::new())
            .err()
            .expect("unknown grammar");
        assert!(err.to_string().contains("unknown grammar 'bash'"));
    }
}
