//! I/O helpers for docfence commands.

pub mod config;
pub mod loader;
pub mod output;
