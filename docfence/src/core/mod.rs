//! Deterministic, pure logic shared by the docfence pipeline.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! text and structures and return deterministic outputs suitable for tests.

pub mod extractor;
pub mod format;
pub mod grammar;
pub mod markup;
pub mod renderer;
pub mod report;
pub mod types;
pub mod validator;
