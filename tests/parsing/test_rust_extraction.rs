// Tests for Rust call-graph extraction.

use warden_parsers::extract::{extract_function, outline};
use warden_parsers::source::SourceUnit;

#[test]
/// Path calls resolve to their first segment, method calls to their receiver.
fn test_rs_call_resolution() {
    let source = r#"
fn settle(ledger: &mut Ledger, amount: u64) -> u64 {
    let fee = fees::compute(amount);
    ledger.post(amount - fee);
    audit(amount);
    fee
}
"#;
    let graph = extract_function(&SourceUnit::rust(source), "settle").unwrap();
    let names: Vec<_> = graph.call_names().collect();
    assert_eq!(names, ["fees", "ledger", "audit"]);
}

#[test]
/// Macros are recorded with a trailing `!`.
fn test_rs_macros() {
    let source = "fn log_it(x: u32) {\n    tracing::info!(x);\n    println!(\"{x}\");\n}\n";
    let graph = extract_function(&SourceUnit::rust(source), "log_it").unwrap();
    let names: Vec<_> = graph.call_names().collect();
    assert_eq!(names, ["info!", "println!"]);
}

#[test]
/// Methods inside impl blocks are outlined; `use` items at any depth are imports.
fn test_rs_outline() {
    let source = r#"
use std::collections::HashMap;

#[enforce_contract]
pub struct Registry {
    items: HashMap<String, u32>,
}

impl Registry {
    pub fn get(&self, key: &str) -> Option<u32> {
        use std::borrow::Borrow;
        self.items.get(key.borrow()).copied()
    }
}
"#;
    let out = outline(&SourceUnit::rust(source)).unwrap();
    assert_eq!(out.functions.len(), 1);
    assert_eq!(out.functions[0].name, "get");
    assert_eq!(out.functions[0].line, 10);
    assert_eq!(
        out.functions[0].graph.import_names().collect::<Vec<_>>(),
        ["std::borrow::Borrow"]
    );
    let imports: Vec<_> = out.imports.iter().map(|i| i.module.as_str()).collect();
    assert_eq!(imports, ["std::collections::HashMap"]);
    assert_eq!(out.classes[0].markers, ["enforce_contract"]);
}
