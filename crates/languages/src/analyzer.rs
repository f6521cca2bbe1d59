//! Missing-documentation detection
//!
//! The analyzer works purely on a [`SyntaxTree`]. It never fails: nodes
//! without location info read as line 0 and simply never have an attached
//! comment.

use std::path::Path;
use tracing::debug;
use tsdocbot_core::{
    CommentToken, DeclarationKind, DocWorkItem, ExistingDoc, NodeKind, SyntaxNode, SyntaxTree,
    Visibility,
};

/// Documentation status of every documentable declaration in one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAnalysis {
    /// Declarations without an attached doc comment, in source order
    pub missing: Vec<DocWorkItem>,
    /// Declarations that already have one
    pub existing: Vec<ExistingDoc>,
}

impl FileAnalysis {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Classifies nodes and pairs them with their doc comments
#[derive(Debug, Default, Clone, Copy)]
pub struct DocAnalyzer;

impl DocAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Functions, classes, methods, and export wrappers around a class or function
    pub fn should_document(&self, node: &SyntaxNode) -> bool {
        declaration_kind(node).is_some()
    }

    /// The doc block ending on the line right above the node, if any
    ///
    /// When several blocks end on that line the last one in source order is
    /// the one nearest to the node.
    pub fn find_attached_comment<'c>(
        &self,
        node: &SyntaxNode,
        comments: &'c [CommentToken],
    ) -> Option<&'c CommentToken> {
        let start_line = node.start_line();
        if start_line <= 1 {
            return None;
        }
        comments
            .iter()
            .rev()
            .find(|c| c.is_doc_block() && c.span.end_line == start_line - 1)
    }

    pub fn is_class_kind(&self, node: &SyntaxNode) -> bool {
        matches!(node.declaration().kind, NodeKind::Class { .. })
    }

    /// Method definitions of a class in source order; constructors excluded
    pub fn list_methods<'n>(&self, class_node: &'n SyntaxNode) -> Vec<&'n SyntaxNode> {
        class_node
            .declaration()
            .children
            .iter()
            .filter(|child| matches!(child.kind, NodeKind::Method { .. }))
            .collect()
    }

    /// Partition every documentable declaration of one file into missing
    /// and existing documentation
    pub fn analyze(&self, tree: &SyntaxTree, source: &str, file_path: &Path) -> FileAnalysis {
        let mut analysis = FileAnalysis::default();
        let lines: Vec<&str> = source.lines().collect();
        let mut scan = Scan {
            analyzer: self,
            comments: &tree.comments,
            lines: &lines,
            file_path,
            analysis: &mut analysis,
        };
        scan.visit(&tree.body);

        debug!(
            "Analyzed {}: {} missing, {} documented",
            file_path.display(),
            analysis.missing.len(),
            analysis.existing.len()
        );
        analysis
    }
}

fn declaration_kind(node: &SyntaxNode) -> Option<DeclarationKind> {
    match &node.kind {
        NodeKind::Function { .. } => Some(DeclarationKind::Function),
        NodeKind::Class { .. } => Some(DeclarationKind::Class),
        NodeKind::Method { .. } => Some(DeclarationKind::Method),
        NodeKind::Export => match node.children.first().map(|inner| &inner.kind) {
            Some(NodeKind::Function { .. }) => Some(DeclarationKind::Function),
            Some(NodeKind::Class { .. }) => Some(DeclarationKind::Class),
            _ => None,
        },
        _ => None,
    }
}

struct Scan<'a> {
    analyzer: &'a DocAnalyzer,
    comments: &'a [CommentToken],
    lines: &'a [&'a str],
    file_path: &'a Path,
    analysis: &'a mut FileAnalysis,
}

impl Scan<'_> {
    fn visit(&mut self, nodes: &[SyntaxNode]) {
        for node in nodes {
            let Some(kind) = declaration_kind(node) else {
                self.visit(&node.children);
                continue;
            };

            self.record(node, kind, None);

            if self.analyzer.is_class_kind(node) {
                let class_name = node.name().map(str::to_string);
                for method in self.analyzer.list_methods(node) {
                    // A splice is line-granular: it cannot land between the
                    // class header and a member on the same line.
                    if method.start_line() == node.start_line() {
                        continue;
                    }
                    self.record(method, DeclarationKind::Method, class_name.clone());
                }
            }
        }
    }

    fn record(&mut self, node: &SyntaxNode, kind: DeclarationKind, class_name: Option<String>) {
        let member_name = node.name().map(str::to_string);

        if let Some(comment) = self.analyzer.find_attached_comment(node, self.comments) {
            self.analysis.existing.push(ExistingDoc {
                file_path: self.file_path.to_path_buf(),
                kind,
                start_line: node.start_line(),
                class_name,
                member_name,
                comment: comment.text.clone(),
            });
            return;
        }

        let (params, return_type) = match &node.declaration().kind {
            NodeKind::Function {
                params,
                return_type,
                ..
            }
            | NodeKind::Method {
                params,
                return_type,
                ..
            } => (params.clone(), return_type.clone()),
            _ => (Vec::new(), None),
        };

        let method_names = if kind == DeclarationKind::Class {
            public_method_names(self.analyzer.list_methods(node))
        } else {
            Vec::new()
        };

        self.analysis.missing.push(DocWorkItem {
            file_path: self.file_path.to_path_buf(),
            kind,
            start_line: node.start_line(),
            end_line: node.end_line(),
            indent: self.indent(node),
            class_name,
            member_name,
            params,
            return_type,
            method_names,
            source_text: node.text.clone(),
            generated: None,
        });
    }

    /// Leading whitespace of the node's first line
    fn indent(&self, node: &SyntaxNode) -> String {
        node.start_line()
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(|line| {
                line.chars()
                    .take_while(|c| *c == ' ' || *c == '\t')
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn public_method_names(methods: Vec<&SyntaxNode>) -> Vec<String> {
    methods
        .into_iter()
        .filter_map(|method| match &method.kind {
            NodeKind::Method {
                name, visibility, ..
            } if *visibility == Visibility::Public => Some(name.clone()),
            _ => None,
        })
        .collect()
}
