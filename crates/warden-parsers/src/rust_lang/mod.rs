//! Rust extraction rules (tree-sitter-rust).
//!
//! Rust has no classes; `struct` and `enum` items play that role for marker checks.
//! Macro invocations count as calls named `name!`. Their token trees are not parsed as
//! expressions, so calls written inside macro arguments are not seen.

use tree_sitter::Node;

use crate::extract::{LanguageRules, UNRESOLVED_CALLEE};
use crate::source::SourceLanguage;
use crate::treesitter::node_text;

pub struct RustRules;

impl LanguageRules for RustRules {
    fn language(&self) -> SourceLanguage {
        SourceLanguage::Rust
    }

    fn function_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        if node.kind() != "function_item" {
            return None;
        }
        let name = node.child_by_field_name("name")?;
        Some(node_text(name, source).to_string())
    }

    fn class_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        if !matches!(node.kind(), "struct_item" | "enum_item") {
            return None;
        }
        let name = node.child_by_field_name("name")?;
        Some(node_text(name, source).to_string())
    }

    fn class_markers(&self, node: Node<'_>, source: &[u8]) -> Vec<String> {
        let mut markers = Vec::new();
        let mut prev = node.prev_named_sibling();
        while let Some(sibling) = prev {
            match sibling.kind() {
                "attribute_item" => {
                    let path = sibling
                        .named_child(0)
                        .filter(|a| a.kind() == "attribute")
                        .and_then(|a| a.named_child(0));
                    if let Some(path) = path {
                        markers.push(last_segment(path, source));
                    }
                }
                "line_comment" | "block_comment" => {}
                _ => break,
            }
            prev = sibling.prev_named_sibling();
        }
        // Collected bottom-up; report in source order.
        markers.reverse();
        markers
    }

    fn call_target(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        match node.kind() {
            "call_expression" => {
                let function = node.child_by_field_name("function")?;
                Some(base_name(function, source))
            }
            "macro_invocation" => {
                let mac = node.child_by_field_name("macro")?;
                Some(format!("{}!", last_segment(mac, source)))
            }
            _ => None,
        }
    }

    fn imports(&self, node: Node<'_>, source: &[u8]) -> Vec<String> {
        match node.kind() {
            "use_declaration" => {
                let mut names = Vec::new();
                if let Some(arg) = node.child_by_field_name("argument") {
                    use_names(arg, source, &mut names);
                }
                names
            }
            "extern_crate_declaration" => node
                .child_by_field_name("name")
                .map(|n| vec![node_text(n, source).to_string()])
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// Resolve a callee expression to the name of its base: `a::b::c` is `a`, `x.y()` is
/// `x`, `f::<T>` is `f`.
fn base_name(node: Node<'_>, source: &[u8]) -> String {
    let mut current = node;
    loop {
        let next = match current.kind() {
            "identifier" | "type_identifier" | "self" | "crate" | "super" => {
                return node_text(current, source).to_string()
            }
            "scoped_identifier" => current
                .child_by_field_name("path")
                .or_else(|| current.child_by_field_name("name")),
            "field_expression" => current.child_by_field_name("value"),
            "generic_function" | "call_expression" => current.child_by_field_name("function"),
            "generic_type" => current.child_by_field_name("type"),
            "index_expression" => current.named_child(0),
            _ => None,
        };
        match next {
            Some(n) => current = n,
            None => return UNRESOLVED_CALLEE.to_string(),
        }
    }
}

fn last_segment(path: Node<'_>, source: &[u8]) -> String {
    match path.kind() {
        "scoped_identifier" => path
            .child_by_field_name("name")
            .map(|n| node_text(n, source).to_string())
            .unwrap_or_else(|| node_text(path, source).to_string()),
        _ => node_text(path, source).to_string(),
    }
}

/// Module paths named by a use tree, recorded as written up to a group, wildcard, or
/// alias.
fn use_names(node: Node<'_>, source: &[u8], out: &mut Vec<String>) {
    match node.kind() {
        "use_as_clause" => {
            if let Some(path) = node.child_by_field_name("path") {
                out.push(node_text(path, source).to_string());
            }
        }
        "scoped_use_list" => match node.child_by_field_name("path") {
            Some(path) => out.push(node_text(path, source).to_string()),
            None => {
                if let Some(list) = node.child_by_field_name("list") {
                    use_names(list, source, out);
                }
            }
        },
        "use_list" => {
            for i in 0..node.named_child_count() {
                if let Some(child) = node.named_child(i) {
                    use_names(child, source, out);
                }
            }
        }
        "use_wildcard" => match node.named_child(0) {
            Some(path) => out.push(node_text(path, source).to_string()),
            None => out.push("*".to_string()),
        },
        _ => out.push(node_text(node, source).to_string()),
    }
}
