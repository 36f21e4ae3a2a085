//! Tutorial snippet checker and renderer.
//!
//! Tutorials (Markdown, or Markdown stored as `.js`) flow through a fixed
//! pipeline: load, extract fenced snippets, validate each snippet against
//! its language's grammar, and render. The architecture keeps a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (extraction, grammars,
//!   validation, rendering, report). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config files, directory walks,
//!   output writes).
//!
//! Orchestration modules ([`pipeline`], [`validate`], [`render`]) coordinate
//! core logic with I/O to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod render;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
