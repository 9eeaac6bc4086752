use tree_sitter::{Language, Node, Parser, Tree};

use crate::source::SourceLanguage;

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Parse `source`, rejecting trees that contain syntax errors.
    pub fn parse(&mut self, lang: SourceLanguage, source: &[u8]) -> Result<Tree, ParseError> {
        self.parser
            .set_language(&language_for(lang))
            .map_err(|e| ParseError::Language(format!("{e}")))?;
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)?;
        if let Some(line) = first_error_line(tree.root_node()) {
            return Err(ParseError::Syntax {
                language: lang.name(),
                line,
            });
        }
        Ok(tree)
    }
}

impl Default for TreeSitterParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("language error: {0}")]
    Language(String),
    #[error("parse failed")]
    ParseFailed,
    #[error("{language} syntax error near line {line}")]
    Syntax { language: &'static str, line: u32 },
}

fn language_for(lang: SourceLanguage) -> Language {
    match lang {
        SourceLanguage::Python => tree_sitter_python::LANGUAGE.into(),
        SourceLanguage::Rust => tree_sitter_rust::LANGUAGE.into(),
    }
}

fn first_error_line(root: Node<'_>) -> Option<u32> {
    if !root.has_error() {
        return None;
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(line_of(node));
        }
        // Only descend into subtrees that actually carry the error.
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                if child.has_error() {
                    stack.push(child);
                }
            }
        }
    }
    Some(line_of(root))
}

pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-based line of the node's first byte.
pub(crate) fn line_of(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}
