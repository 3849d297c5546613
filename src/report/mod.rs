//! Report renderers for classification and risk results.
//!
//! - [`terminal`] — colored output with risk meter, highlighted text and summary tables;
//!   respects `--verbose` / `--quiet`.
//! - JSON output is plain `serde_json` over the result types and lives in `main`.

pub mod terminal;
