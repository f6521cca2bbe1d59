//! Parser-independent syntax tree model
//!
//! The documentation engine never looks at a concrete parser's node types.
//! Parsers convert their output into a [`SyntaxTree`]: a body of tagged
//! [`SyntaxNode`]s plus a flat, source-ordered list of [`CommentToken`]s.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Inclusive 1-based line range of a node or comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSpan {
    pub start_line: usize,
    pub end_line: usize,
}

impl LineSpan {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Create a LineSpan from tree-sitter node positions
    pub fn from_tree_sitter_node(node: tree_sitter::Node) -> Self {
        Self {
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
        }
    }
}

/// Member visibility for class methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// Node kind with per-kind payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// `function name(params): ret { ... }`
    Function {
        name: Option<String>,
        params: Vec<String>,
        return_type: Option<String>,
    },
    /// `class Name { ... }` (abstract classes included)
    Class { name: Option<String> },
    /// Method definition inside a class body
    Method {
        name: String,
        params: Vec<String>,
        return_type: Option<String>,
        is_static: bool,
        visibility: Visibility,
    },
    /// `constructor(...)` inside a class body
    Constructor { params: Vec<String> },
    /// `interface Name { ... }`
    Interface { name: Option<String> },
    /// `export <declaration>`; the wrapped declaration is the first child
    Export,
    /// Namespace or ambient module
    Module { name: Option<String> },
    /// Anything else, tagged with the parser's own kind name
    Other { kind: String },
}

/// A node of the converted syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Location; `None` when the parser could not provide one
    pub span: Option<LineSpan>,
    /// Exact source text of the node
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, span: Option<LineSpan>) -> Self {
        Self {
            kind,
            span,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    /// Start line, or 0 when location info is missing
    pub fn start_line(&self) -> usize {
        self.span.map_or(0, |s| s.start_line)
    }

    /// End line, or 0 when location info is missing
    pub fn end_line(&self) -> usize {
        self.span.map_or(0, |s| s.end_line)
    }

    /// Declared name for named kinds
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Function { name, .. }
            | NodeKind::Class { name }
            | NodeKind::Interface { name }
            | NodeKind::Module { name } => name.as_deref(),
            NodeKind::Method { name, .. } => Some(name),
            NodeKind::Constructor { .. } => Some("constructor"),
            NodeKind::Export => self.children.first().and_then(SyntaxNode::name),
            NodeKind::Other { .. } => None,
        }
    }

    /// The declaration wrapped by an export node, or the node itself
    pub fn declaration(&self) -> &SyntaxNode {
        match (&self.kind, self.children.first()) {
            (NodeKind::Export, Some(inner)) => inner,
            _ => self,
        }
    }
}

/// Comment token style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    /// `/* ... */`
    Block,
    /// `// ...`
    Line,
}

/// A comment as it appears in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentToken {
    pub kind: CommentKind,
    /// Raw text including delimiters
    pub text: String,
    pub span: LineSpan,
}

impl CommentToken {
    /// Whether this is a `/** ... */` documentation block
    pub fn is_doc_block(&self) -> bool {
        self.kind == CommentKind::Block && self.text.starts_with("/**") && self.text != "/**/"
    }
}

/// Parsed representation of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub body: Vec<SyntaxNode>,
    pub comments: Vec<CommentToken>,
}

impl SyntaxTree {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
