//! Parse-and-analyze step for a single file

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use tsdocbot_languages::{DocAnalyzer, FileAnalysis, SourceParser, TypeScriptParser};

/// Runs the parser and the analyzer over one file's content
#[derive(Clone)]
pub struct Scanner {
    parser: Arc<dyn SourceParser>,
    analyzer: DocAnalyzer,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(Arc::new(TypeScriptParser::new()))
    }
}

impl Scanner {
    pub fn new(parser: Arc<dyn SourceParser>) -> Self {
        Self {
            parser,
            analyzer: DocAnalyzer::new(),
        }
    }

    /// Analyze one file
    ///
    /// Returns `None` when the file does not parse or has no body; such
    /// files are skipped as a whole.
    pub fn scan(&self, source: &str, file_path: &Path) -> Option<FileAnalysis> {
        let tree = match self.parser.parse(source, file_path) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Skipping {}: {e}", file_path.display());
                return None;
            }
        };

        if tree.is_empty() {
            debug!("Skipping {}: no declarations", file_path.display());
            return None;
        }

        Some(self.analyzer.analyze(&tree, source, file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_reports_missing_docs() {
        let scanner = Scanner::default();
        let analysis = scanner
            .scan("function f() {}\n", Path::new("src/f.ts"))
            .expect("Expected analysis");
        assert_eq!(analysis.missing.len(), 1);
    }

    #[test]
    fn test_unparseable_file_is_skipped() {
        let scanner = Scanner::default();
        assert!(scanner
            .scan("function (((", Path::new("src/broken.ts"))
            .is_none());
    }

    #[test]
    fn test_empty_file_is_skipped() {
        let scanner = Scanner::default();
        assert!(scanner.scan("", Path::new("src/empty.ts")).is_none());
        assert!(scanner.scan("// nothing\n", Path::new("src/empty.ts")).is_none());
    }
}
