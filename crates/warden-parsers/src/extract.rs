//! Call-graph extraction.
//!
//! Extraction is a pure function of source text: the same unit always yields the same
//! calls and imports, in source order. Calls routed through member access resolve to the
//! base object's name (`time.sleep()` records `time`), which is an approximation rather
//! than symbol resolution.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::python::PythonRules;
use crate::rust_lang::RustRules;
use crate::source::{SourceLanguage, SourceUnit};
use crate::treesitter::{line_of, ParseError, TreeSitterParser};

/// Recorded name for callees that do not resolve to any identifier.
pub const UNRESOLVED_CALLEE: &str = "<expression>";

/// One call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub name: String,
    pub line: u32,
}

/// One imported module reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSite {
    pub module: String,
    pub line: u32,
}

/// Calls and imports found within a unit of source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraph {
    pub calls: Vec<CallSite>,
    pub imports: Vec<ImportSite>,
}

impl CallGraph {
    pub fn call_names(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().map(|c| c.name.as_str())
    }

    pub fn import_names(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|i| i.module.as_str())
    }
}

/// A function definition and everything it calls or imports, nested scopes included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionOutline {
    pub name: String,
    pub line: u32,
    pub graph: CallGraph,
}

/// A class definition (Python `class`, Rust `struct`/`enum`) and its markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassOutline {
    pub name: String,
    pub line: u32,
    /// Last path segment of every decorator or attribute on the definition.
    pub markers: Vec<String>,
}

/// The structure of a whole module, as the static validator sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOutline {
    pub functions: Vec<FunctionOutline>,
    pub classes: Vec<ClassOutline>,
    /// Imports that do not sit inside any function body.
    pub imports: Vec<ImportSite>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("no definition of `{name}` found in {language} source")]
    FunctionNotFound { name: String, language: &'static str },
}

/// Per-language knowledge of which syntax nodes define, call, and import.
///
/// Implementors must be `Send + Sync` so extraction can run on rayon workers.
pub trait LanguageRules: Send + Sync {
    fn language(&self) -> SourceLanguage;

    /// Name of the function defined by `node`, if it is a function definition.
    fn function_name(&self, node: Node<'_>, source: &[u8]) -> Option<String>;

    /// Name of the class defined by `node`, if it is a class definition.
    fn class_name(&self, node: Node<'_>, source: &[u8]) -> Option<String>;

    /// Decorator/attribute names carried by a class definition.
    fn class_markers(&self, node: Node<'_>, source: &[u8]) -> Vec<String>;

    /// Resolved callee name, if `node` is a call.
    fn call_target(&self, node: Node<'_>, source: &[u8]) -> Option<String>;

    /// Imported module names, if `node` is an import statement.
    fn imports(&self, node: Node<'_>, source: &[u8]) -> Vec<String>;

    /// The node whose subtree belongs to a function definition. Python decorators sit on
    /// a wrapping node and are part of the function.
    fn function_extent<'t>(&self, node: Node<'t>) -> Node<'t> {
        node
    }
}

pub fn rules_for(language: SourceLanguage) -> &'static dyn LanguageRules {
    match language {
        SourceLanguage::Python => &PythonRules,
        SourceLanguage::Rust => &RustRules,
    }
}

/// Extract every call and import in the whole unit.
pub fn extract(unit: &SourceUnit) -> Result<CallGraph, ExtractError> {
    let rules = rules_for(unit.language);
    let bytes = unit.text.as_bytes();
    let tree = TreeSitterParser::new().parse(unit.language, bytes)?;
    let mut graph = CallGraph::default();
    collect(rules, tree.root_node(), bytes, &mut graph);
    Ok(graph)
}

/// Extract the calls and imports of the first function named `name` in the unit.
pub fn extract_function(unit: &SourceUnit, name: &str) -> Result<CallGraph, ExtractError> {
    let rules = rules_for(unit.language);
    let bytes = unit.text.as_bytes();
    let tree = TreeSitterParser::new().parse(unit.language, bytes)?;

    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        if rules.function_name(node, bytes).as_deref() == Some(name) {
            let mut graph = CallGraph::default();
            collect(rules, rules.function_extent(node), bytes, &mut graph);
            tracing::debug!(
                function = name,
                calls = graph.calls.len(),
                imports = graph.imports.len(),
                "extracted function call graph"
            );
            return Ok(graph);
        }
        push_children(node, &mut stack);
    }
    Err(ExtractError::FunctionNotFound {
        name: name.to_string(),
        language: unit.language.name(),
    })
}

/// Outline a module: its functions (each with its own call graph), classes, and the
/// imports outside function bodies.
///
/// Functions nested inside another function belong to the enclosing function's body and
/// are not listed on their own. Methods of classes and impl blocks are listed.
pub fn outline(unit: &SourceUnit) -> Result<ModuleOutline, ExtractError> {
    let rules = rules_for(unit.language);
    let bytes = unit.text.as_bytes();
    let tree = TreeSitterParser::new().parse(unit.language, bytes)?;
    let mut out = ModuleOutline::default();

    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        if let Some(name) = rules.function_name(node, bytes) {
            let mut graph = CallGraph::default();
            collect(rules, rules.function_extent(node), bytes, &mut graph);
            tracing::debug!(function = %name, line = line_of(node), "outlined function");
            out.functions.push(FunctionOutline {
                name,
                line: line_of(node),
                graph,
            });
            continue;
        }
        if let Some(name) = rules.class_name(node, bytes) {
            out.classes.push(ClassOutline {
                name,
                line: line_of(node),
                markers: rules.class_markers(node, bytes),
            });
        }
        let line = line_of(node);
        out.imports.extend(
            rules
                .imports(node, bytes)
                .into_iter()
                .map(|module| ImportSite { module, line }),
        );
        push_children(node, &mut stack);
    }
    Ok(out)
}

/// Preorder walk of `root`, recording calls and imports in source order.
fn collect(rules: &dyn LanguageRules, root: Node<'_>, source: &[u8], graph: &mut CallGraph) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(name) = rules.call_target(node, source) {
            graph.calls.push(CallSite {
                name,
                line: line_of(node),
            });
        }
        let line = line_of(node);
        graph.imports.extend(
            rules
                .imports(node, source)
                .into_iter()
                .map(|module| ImportSite { module, line }),
        );
        push_children(node, &mut stack);
    }
}

/// Push children in reverse so the stack pops them in source order.
fn push_children<'t>(node: Node<'t>, stack: &mut Vec<Node<'t>>) {
    for i in (0..node.named_child_count()).rev() {
        if let Some(child) = node.named_child(i) {
            stack.push(child);
        }
    }
}
