//! Signature details of functions and methods: parameters, return type,
//! modifiers.

use tree_sitter::Node;
use tsdocbot_core::Visibility;

fn text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// Collapse runs of whitespace so multi-line types read on one line
fn compact(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parameters as written, e.g. `amount: bigint` or `memo?: string`
pub(super) fn parameters(node: Node, source: &str) -> Vec<String> {
    let Some(params) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter_map(|param| {
            let optional = match param.kind() {
                "required_parameter" => false,
                "optional_parameter" => true,
                _ => return None,
            };
            let pattern = param.child_by_field_name("pattern")?;
            let mut rendered = compact(text(pattern, source));
            if optional {
                rendered.push('?');
            }
            if let Some(annotation) = param.child_by_field_name("type") {
                rendered.push_str(": ");
                rendered.push_str(&type_text(annotation, source));
            }
            Some(rendered)
        })
        .collect()
}

/// Declared return type without the leading colon
pub(super) fn return_type(node: Node, source: &str) -> Option<String> {
    node.child_by_field_name("return_type")
        .map(|annotation| type_text(annotation, source))
        .filter(|t| !t.is_empty())
}

fn type_text(annotation: Node, source: &str) -> String {
    let raw = text(annotation, source).trim_start();
    compact(raw.strip_prefix(':').unwrap_or(raw))
}

/// Check if a class member is static
pub(super) fn is_static(node: Node) -> bool {
    let mut cursor = node.walk();
    let is_static = node.children(&mut cursor).any(|child| child.kind() == "static");
    is_static
}

/// Member visibility
///
/// `#name` members are private; otherwise a TypeScript accessibility
/// modifier decides, defaulting to public.
pub(super) fn visibility(node: Node, source: &str) -> Visibility {
    if node
        .child_by_field_name("name")
        .is_some_and(|name| name.kind() == "private_property_identifier")
    {
        return Visibility::Private;
    }

    let mut cursor = node.walk();
    let modifier = node
        .children(&mut cursor)
        .find(|child| child.kind() == "accessibility_modifier");

    match modifier.map(|m| text(m, source).trim()) {
        Some("private") => Visibility::Private,
        Some("protected") => Visibility::Protected,
        _ => Visibility::Public,
    }
}
