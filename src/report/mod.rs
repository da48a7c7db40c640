//! Report generation.

pub mod generator;

pub use generator::{format_thousands, generate_json_report, generate_markdown_report};
