use warden_enforce::report::{RecordKind, ViolationRecord, ViolationReport};

/// Section titles, in report order.
const SECTIONS: [(RecordKind, &str); 5] = [
    (RecordKind::Call, "Call violations"),
    (RecordKind::Import, "Import violations"),
    (RecordKind::UndeclaredFunction, "Undeclared function"),
    (RecordKind::UndefinedFunction, "Undefined function"),
    (RecordKind::UndecoratedClass, "Undecorated class"),
];

pub(crate) fn format_record_human(r: &ViolationRecord) -> String {
    let line = r.line.map(|l| format!(" (Line: {l})")).unwrap_or_default();
    match r.kind {
        RecordKind::Call => format!(
            "error{line}: function `{}` called in `{}` but not allowed in contract\n",
            r.subject,
            r.context.as_deref().unwrap_or("<module>"),
        ),
        RecordKind::Import => {
            format!("error{line}: `{}` imported but not allowed in contract\n", r.subject)
        }
        RecordKind::UndeclaredFunction => format!(
            "error{line}: function `{}` defined but not declared in contract\n",
            r.subject
        ),
        RecordKind::UndefinedFunction => format!(
            "error{line}: function `{}` declared in contract `functions`, but undefined\n",
            r.subject
        ),
        RecordKind::UndecoratedClass => {
            format!("error{line}: class `{}` defined but undecorated\n", r.subject)
        }
    }
}

fn bucket(report: &ViolationReport, kind: RecordKind) -> &[ViolationRecord] {
    match kind {
        RecordKind::Call => &report.call_violations,
        RecordKind::Import => &report.import_violations,
        RecordKind::UndeclaredFunction => &report.undeclared_functions,
        RecordKind::UndefinedFunction => &report.undefined_functions,
        RecordKind::UndecoratedClass => &report.undecorated_classes,
    }
}

/// Non-empty sections of one report, each titled and underlined.
pub(crate) fn format_sections(report: &ViolationReport) -> String {
    let mut out = String::new();
    for (kind, title) in SECTIONS {
        let records = bucket(report, kind);
        if records.is_empty() {
            continue;
        }
        out.push_str(&format!("{title}\n{}\n", "-".repeat(title.len())));
        for r in records {
            out.push_str(&format_record_human(r));
        }
        out.push('\n');
    }
    out
}
