//! TypeScript support built on tree-sitter
//!
//! The parser converts the concrete tree-sitter tree into the
//! parser-independent [`SyntaxTree`]. Only the shapes the documentation
//! engine cares about get a dedicated [`NodeKind`]; everything else is kept
//! as [`NodeKind::Other`] so nested declarations stay reachable.

mod signature;

use crate::SourceParser;
use std::path::Path;
use tracing::trace;
use tree_sitter::{Language, Node, Parser, Tree};
use tsdocbot_core::error::{Error, Result};
use tsdocbot_core::{CommentKind, CommentToken, LineSpan, NodeKind, SyntaxNode, SyntaxTree};

/// Statement kinds whose named children may hold nested declarations
const CONTAINER_KINDS: &[&str] = &[
    "expression_statement",
    "ambient_declaration",
    "statement_block",
];

/// Parser for `.ts` and `.tsx` files
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptParser;

impl TypeScriptParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_tree(&self, source: &str, file_path: &Path) -> Result<Tree> {
        let file = file_path.display().to_string();
        let language: Language = if is_tsx(file_path) {
            tree_sitter_typescript::LANGUAGE_TSX.into()
        } else {
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
        };

        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| Error::parse(&file, format!("Failed to set TypeScript language: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::parse(&file, "Failed to parse source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(root).unwrap_or(root.start_position().row + 1);
            return Err(Error::parse(file, format!("Syntax error at line {line}")));
        }

        Ok(tree)
    }
}

impl SourceParser for TypeScriptParser {
    fn parse(&self, source: &str, file_path: &Path) -> Result<SyntaxTree> {
        let tree = self.parse_tree(source, file_path)?;
        let converter = Converter { source };
        let root = tree.root_node();

        let syntax_tree = SyntaxTree {
            body: converter.convert_children(root),
            comments: converter.collect_comments(root),
        };
        trace!(
            "Parsed {}: {} top-level nodes, {} comments",
            file_path.display(),
            syntax_tree.body.len(),
            syntax_tree.comments.len()
        );
        Ok(syntax_tree)
    }
}

fn is_tsx(file_path: &Path) -> bool {
    file_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsx"))
}

/// Line of the first ERROR or MISSING node, following only erroneous subtrees
fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error_line)
}

struct Converter<'a> {
    source: &'a str,
}

impl<'a> Converter<'a> {
    fn text(&self, node: Node) -> String {
        node.utf8_text(self.source.as_bytes())
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn field_text(&self, node: Node, field: &str) -> Option<String> {
        node.child_by_field_name(field).map(|n| self.text(n))
    }

    fn leaf(&self, node: Node, kind: NodeKind) -> SyntaxNode {
        SyntaxNode::new(kind, Some(LineSpan::from_tree_sitter_node(node)))
            .with_text(self.text(node))
    }

    /// Convert a statement list
    ///
    /// Overload signatures directly before a function implementation of the
    /// same name are folded into the implementation's span.
    fn convert_children(&self, node: Node) -> Vec<SyntaxNode> {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();

        let mut converted = Vec::new();
        let mut overloads: Option<(String, Node)> = None;
        for child in children {
            if child.kind() == "comment" {
                continue;
            }
            if let Some(name) = self.function_name(child, "function_signature") {
                if !overloads.as_ref().is_some_and(|(run, _)| *run == name) {
                    overloads = Some((name, child));
                }
                converted.extend(self.convert(child));
                continue;
            }

            let implementation = self.function_name(child, "function_declaration");
            let first = match (overloads.take(), implementation) {
                (Some((run, first)), Some(name)) if run == name => Some(first),
                _ => None,
            };
            if let Some(declaration) = self.convert(child) {
                converted.push(match first {
                    Some(first) => self.extend_start(declaration, first, child),
                    None => declaration,
                });
            }
        }
        converted
    }

    /// Name of a `kind` node, bare or wrapped in an export statement
    fn function_name(&self, node: Node, kind: &str) -> Option<String> {
        let declaration = if node.kind() == "export_statement" {
            node.child_by_field_name("declaration")?
        } else {
            node
        };
        if declaration.kind() != kind {
            return None;
        }
        self.field_text(declaration, "name")
    }

    /// Move the start of a converted node back to `first`
    fn extend_start(&self, mut converted: SyntaxNode, first: Node, last: Node) -> SyntaxNode {
        converted.span = Some(LineSpan::new(
            first.start_position().row + 1,
            last.end_position().row + 1,
        ));
        converted.text = self
            .source
            .get(first.start_byte()..last.end_byte())
            .unwrap_or_default()
            .to_string();
        converted
    }

    fn convert(&self, node: Node) -> Option<SyntaxNode> {
        let converted = match node.kind() {
            "comment" => return None,
            "function_declaration" | "generator_function_declaration" => self.leaf(
                node,
                NodeKind::Function {
                    name: self.field_text(node, "name"),
                    params: signature::parameters(node, self.source),
                    return_type: signature::return_type(node, self.source),
                },
            ),
            "class_declaration" | "abstract_class_declaration" => self.class(node),
            "interface_declaration" => self.leaf(
                node,
                NodeKind::Interface {
                    name: self.field_text(node, "name"),
                },
            ),
            "internal_module" | "module" => {
                let body = node
                    .child_by_field_name("body")
                    .map(|b| self.convert_children(b))
                    .unwrap_or_default();
                self.leaf(
                    node,
                    NodeKind::Module {
                        name: self.field_text(node, "name"),
                    },
                )
                .with_children(body)
            }
            "export_statement" => match node
                .child_by_field_name("declaration")
                .and_then(|d| self.convert(d))
            {
                Some(inner) => self.leaf(node, NodeKind::Export).with_children(vec![inner]),
                None => self.other(node),
            },
            kind if CONTAINER_KINDS.contains(&kind) => {
                let children = self.convert_children(node);
                self.other(node).with_children(children)
            }
            _ => self.other(node),
        };
        Some(converted)
    }

    fn other(&self, node: Node) -> SyntaxNode {
        SyntaxNode::new(
            NodeKind::Other {
                kind: node.kind().to_string(),
            },
            Some(LineSpan::from_tree_sitter_node(node)),
        )
    }

    fn class(&self, node: Node) -> SyntaxNode {
        let mut members = Vec::new();

        if let Some(body) = node.child_by_field_name("body") {
            // Decorators and overload signatures precede their method as
            // siblings in the class body
            let mut decorator: Option<Node> = None;
            let mut overloads: Option<(String, Node)> = None;
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                match child.kind() {
                    "decorator" => {
                        decorator.get_or_insert(child);
                    }
                    "comment" => {}
                    "method_signature" => {
                        let first = decorator.take().unwrap_or(child);
                        let name = self.field_text(child, "name");
                        let continues_run = overloads
                            .as_ref()
                            .is_some_and(|(run, _)| name.as_ref() == Some(run));
                        if !continues_run {
                            overloads = name.map(|name| (name, first));
                        }
                    }
                    "method_definition" => {
                        let name = self.field_text(child, "name");
                        let first = match overloads.take() {
                            Some((run, first)) if name.as_ref() == Some(&run) => Some(first),
                            _ => decorator,
                        };
                        decorator = None;
                        members.push(self.method(child, first));
                    }
                    _ => {
                        decorator = None;
                        overloads = None;
                    }
                }
            }
        }

        self.leaf(
            node,
            NodeKind::Class {
                name: self.field_text(node, "name"),
            },
        )
        .with_children(members)
    }

    /// `leading` is the first decorator or overload signature of the method
    fn method(&self, node: Node, leading: Option<Node>) -> SyntaxNode {
        let name = self.field_text(node, "name").unwrap_or_default();
        let params = signature::parameters(node, self.source);

        let kind = if name == "constructor" {
            NodeKind::Constructor { params }
        } else {
            NodeKind::Method {
                params,
                return_type: signature::return_type(node, self.source),
                is_static: signature::is_static(node),
                visibility: signature::visibility(node, self.source),
                name,
            }
        };

        let first = leading.unwrap_or(node);
        let span = LineSpan::new(first.start_position().row + 1, node.end_position().row + 1);
        let text = self
            .source
            .get(first.start_byte()..node.end_byte())
            .unwrap_or_default();

        SyntaxNode::new(kind, Some(span)).with_text(text)
    }

    /// Every comment in the file, in source order
    fn collect_comments(&self, root: Node) -> Vec<CommentToken> {
        let mut comments = Vec::new();
        let mut cursor = root.walk();

        loop {
            let node = cursor.node();
            if node.kind() == "comment" {
                let text = self.text(node);
                let kind = if text.starts_with("/*") {
                    CommentKind::Block
                } else {
                    CommentKind::Line
                };
                comments.push(CommentToken {
                    kind,
                    text,
                    span: LineSpan::from_tree_sitter_node(node),
                });
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return comments;
                }
            }
        }
    }
}
