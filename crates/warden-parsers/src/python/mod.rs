//! Python extraction rules (tree-sitter-python).

use tree_sitter::Node;

use crate::extract::{LanguageRules, UNRESOLVED_CALLEE};
use crate::source::SourceLanguage;
use crate::treesitter::node_text;

pub struct PythonRules;

impl LanguageRules for PythonRules {
    fn language(&self) -> SourceLanguage {
        SourceLanguage::Python
    }

    fn function_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        if node.kind() != "function_definition" {
            return None;
        }
        let name = node.child_by_field_name("name")?;
        Some(node_text(name, source).to_string())
    }

    fn class_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        if node.kind() != "class_definition" {
            return None;
        }
        let name = node.child_by_field_name("name")?;
        Some(node_text(name, source).to_string())
    }

    fn class_markers(&self, node: Node<'_>, source: &[u8]) -> Vec<String> {
        let Some(parent) = node.parent().filter(|p| p.kind() == "decorated_definition") else {
            return Vec::new();
        };
        let mut markers = Vec::new();
        for i in 0..parent.named_child_count() {
            let Some(decorator) = parent.named_child(i) else { continue };
            if decorator.kind() != "decorator" {
                continue;
            }
            if let Some(expr) = decorator.named_child(0) {
                if let Some(name) = decorator_name(expr, source) {
                    markers.push(name);
                }
            }
        }
        markers
    }

    fn call_target(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        if node.kind() != "call" {
            return None;
        }
        let function = node.child_by_field_name("function")?;
        Some(base_name(function, source))
    }

    fn imports(&self, node: Node<'_>, source: &[u8]) -> Vec<String> {
        match node.kind() {
            "import_statement" => {
                let mut cursor = node.walk();
                let names: Vec<String> = node
                    .children_by_field_name("name", &mut cursor)
                    .filter_map(|n| match n.kind() {
                        "aliased_import" => n.child_by_field_name("name"),
                        _ => Some(n),
                    })
                    .map(|n| node_text(n, source).to_string())
                    .collect();
                names
            }
            "import_from_statement" => node
                .child_by_field_name("module_name")
                .map(|m| vec![node_text(m, source).to_string()])
                .unwrap_or_default(),
            "future_import_statement" => vec!["__future__".to_string()],
            _ => Vec::new(),
        }
    }

    fn function_extent<'t>(&self, node: Node<'t>) -> Node<'t> {
        match node.parent() {
            Some(parent) if parent.kind() == "decorated_definition" => parent,
            _ => node,
        }
    }
}

/// Resolve a callee expression to the name of its base object.
fn base_name(node: Node<'_>, source: &[u8]) -> String {
    let mut current = node;
    loop {
        let next = match current.kind() {
            "identifier" => return node_text(current, source).to_string(),
            "attribute" => current.child_by_field_name("object"),
            "call" => current.child_by_field_name("function"),
            "subscript" => current.child_by_field_name("value"),
            _ => None,
        };
        match next {
            Some(n) => current = n,
            None => return UNRESOLVED_CALLEE.to_string(),
        }
    }
}

/// Name a decorator by its last dotted segment: `@pkg.enforce_contract(c)` is
/// `enforce_contract`.
fn decorator_name(expr: Node<'_>, source: &[u8]) -> Option<String> {
    match expr.kind() {
        "identifier" => Some(node_text(expr, source).to_string()),
        "attribute" => expr
            .child_by_field_name("attribute")
            .map(|a| node_text(a, source).to_string()),
        "call" => decorator_name(expr.child_by_field_name("function")?, source),
        _ => None,
    }
}
