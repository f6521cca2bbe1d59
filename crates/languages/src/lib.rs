#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use std::path::Path;
use tsdocbot_core::{error::Result, SyntaxTree};

mod typescript;

pub mod analyzer;

pub use analyzer::{DocAnalyzer, FileAnalysis};
pub use typescript::TypeScriptParser;

/// Trait for turning source text into the parser-independent syntax tree
pub trait SourceParser: Send + Sync {
    /// Parse one file. A file that does not parse cleanly is an error.
    fn parse(&self, source: &str, file_path: &Path) -> Result<SyntaxTree>;
}

/// Extensions handled by the TypeScript parser
pub const TYPESCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// Whether a path is a TypeScript source file worth documenting
///
/// Declaration files (`.d.ts`) are excluded.
pub fn is_typescript_file(file_path: &Path) -> bool {
    let Some(extension) = file_path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if !TYPESCRIPT_EXTENSIONS.contains(&extension.to_lowercase().as_str()) {
        return false;
    }

    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_lowercase();
    !file_name.ends_with(".d.ts")
}
