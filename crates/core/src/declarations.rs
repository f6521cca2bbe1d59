//! Documentation work items and the index of already-present comments

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use strum_macros::{Display, EnumString};

/// Kind of a documentable declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeclarationKind {
    Function,
    Class,
    Method,
}

/// One declaration that is missing a documentation comment
///
/// Line numbers are the ones observed at parse time. The running offset of
/// the owning file translates them into current lines at insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocWorkItem {
    /// Repository-relative path of the file containing the declaration
    pub file_path: PathBuf,
    pub kind: DeclarationKind,
    pub start_line: usize,
    pub end_line: usize,
    /// Leading whitespace of the declaration's first line
    pub indent: String,
    /// Enclosing class, for methods
    pub class_name: Option<String>,
    /// Declared name (function, class or method name)
    pub member_name: Option<String>,
    pub params: Vec<String>,
    pub return_type: Option<String>,
    /// Public method names, for class items
    pub method_names: Vec<String>,
    /// Exact source text of the declaration
    pub source_text: String,
    /// Formatted comment, once synthesized
    pub generated: Option<String>,
}

impl DocWorkItem {
    /// Human readable identifier for logs, e.g. `Wallet.connect`
    pub fn display_name(&self) -> String {
        let member = self.member_name.as_deref().unwrap_or("<anonymous>");
        match &self.class_name {
            Some(class) if self.kind == DeclarationKind::Method => format!("{class}.{member}"),
            _ => member.to_string(),
        }
    }
}

/// A declaration that already has an attached documentation comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingDoc {
    pub file_path: PathBuf,
    pub kind: DeclarationKind,
    pub start_line: usize,
    pub class_name: Option<String>,
    pub member_name: Option<String>,
    /// Raw comment text, delimiters included
    pub comment: String,
}

/// Key of the existing-documentation index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocKey {
    /// `None` for top-level declarations
    pub class_name: Option<String>,
    pub member_name: String,
}

/// Maps `(class, member)` to the comment that directly precedes that member
#[derive(Debug, Clone, Default)]
pub struct ExistingDocIndex {
    entries: HashMap<DocKey, String>,
}

impl ExistingDocIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an existing comment. Anonymous declarations are not indexed.
    pub fn record(&mut self, doc: &ExistingDoc) {
        if let Some(member) = &doc.member_name {
            self.entries.insert(
                DocKey {
                    class_name: doc.class_name.clone(),
                    member_name: member.clone(),
                },
                doc.comment.clone(),
            );
        }
    }

    pub fn get(&self, class_name: Option<&str>, member_name: &str) -> Option<&str> {
        self.entries
            .get(&DocKey {
                class_name: class_name.map(str::to_string),
                member_name: member_name.to_string(),
            })
            .map(String::as_str)
    }

    pub fn contains(&self, class_name: Option<&str>, member_name: &str) -> bool {
        self.get(class_name, member_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(class: Option<&str>, member: &str, comment: &str) -> ExistingDoc {
        ExistingDoc {
            file_path: PathBuf::from("src/wallet.ts"),
            kind: if class.is_some() {
                DeclarationKind::Method
            } else {
                DeclarationKind::Function
            },
            start_line: 4,
            class_name: class.map(str::to_string),
            member_name: Some(member.to_string()),
            comment: comment.to_string(),
        }
    }

    #[test]
    fn test_index_separates_classes() {
        let mut index = ExistingDocIndex::new();
        index.record(&existing(Some("Wallet"), "connect", "/** Connects. */"));
        index.record(&existing(Some("Provider"), "connect", "/** Opens. */"));
        index.record(&existing(None, "connect", "/** Top level. */"));

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(Some("Wallet"), "connect"), Some("/** Connects. */"));
        assert_eq!(index.get(Some("Provider"), "connect"), Some("/** Opens. */"));
        assert_eq!(index.get(None, "connect"), Some("/** Top level. */"));
        assert!(!index.contains(Some("Wallet"), "disconnect"));
    }

    #[test]
    fn test_index_skips_anonymous() {
        let mut index = ExistingDocIndex::new();
        let mut doc = existing(None, "ignored", "/** Anonymous. */");
        doc.member_name = None;
        index.record(&doc);
        assert!(index.is_empty());
    }

    #[test]
    fn test_display_name() {
        let item = DocWorkItem {
            file_path: PathBuf::from("src/wallet.ts"),
            kind: DeclarationKind::Method,
            start_line: 4,
            end_line: 6,
            indent: "    ".to_string(),
            class_name: Some("Wallet".to_string()),
            member_name: Some("connect".to_string()),
            params: vec![],
            return_type: None,
            method_names: vec![],
            source_text: "connect() {}".to_string(),
            generated: None,
        };
        assert_eq!(item.display_name(), "Wallet.connect");
    }
}
