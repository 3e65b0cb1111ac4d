use crate::util;
use blake3::Hasher;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn sarif_level(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "note",
        }
    }
}

/// A registered rule: stable id, human-readable title, severity and the
/// default-enabled flag. The table below is the whole rule surface; ids are
/// never reused.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Descriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub severity: Severity,
    pub enabled_by_default: bool,
}

pub const ASP001: Descriptor = Descriptor {
    id: "ASP001",
    title: "Parameter name does not match the route parameter name",
    severity: Severity::Warning,
    enabled_by_default: true,
};
pub const ASP002: Descriptor = Descriptor {
    id: "ASP002",
    title: "Parameter type does not match the route constraint",
    severity: Severity::Warning,
    enabled_by_default: true,
};
pub const ASP003: Descriptor = Descriptor {
    id: "ASP003",
    title: "Route parameter has no matching method parameter",
    severity: Severity::Warning,
    enabled_by_default: true,
};
pub const ASP004: Descriptor = Descriptor {
    id: "ASP004",
    title: "Route parameter name appears more than once",
    severity: Severity::Warning,
    enabled_by_default: true,
};
pub const ASP005: Descriptor = Descriptor {
    id: "ASP005",
    title: "Route template syntax error",
    severity: Severity::Error,
    enabled_by_default: true,
};
pub const ASP006: Descriptor = Descriptor {
    id: "ASP006",
    title: "Escape the character inside the regex constraint",
    severity: Severity::Warning,
    enabled_by_default: true,
};
pub const ASP007: Descriptor = Descriptor {
    id: "ASP007",
    title: "Use lowercase urls",
    severity: Severity::Warning,
    enabled_by_default: true,
};
pub const ASP008: Descriptor = Descriptor {
    id: "ASP008",
    title: "Use kebab-cased urls",
    severity: Severity::Info,
    enabled_by_default: false,
};
pub const ASP009: Descriptor = Descriptor {
    id: "ASP009",
    title: "Controller name does not match the route",
    severity: Severity::Warning,
    enabled_by_default: true,
};
pub const ASP010: Descriptor = Descriptor {
    id: "ASP010",
    title: "Avoid the [controller] placeholder",
    severity: Severity::Info,
    enabled_by_default: false,
};
pub const ASP011: Descriptor = Descriptor {
    id: "ASP011",
    title: "Route parameter has conflicting type constraints",
    severity: Severity::Warning,
    enabled_by_default: true,
};

pub const DESCRIPTORS: &[Descriptor] = &[
    ASP001, ASP002, ASP003, ASP004, ASP005, ASP006, ASP007, ASP008, ASP009, ASP010, ASP011,
];

pub fn descriptor(id: &str) -> Option<&'static Descriptor> {
    DESCRIPTORS.iter().find(|d| d.id == id)
}

/// A mechanical correction carried on a diagnostic. Text fixes replace an
/// exact byte span; symbol renames rewrite every identifier occurrence of
/// `name` inside the scope byte range, which keeps call sites and body
/// references consistent.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fix {
    ReplaceText {
        start_byte: usize,
        end_byte: usize,
        replacement: String,
    },
    RenameSymbol {
        name: String,
        new_name: String,
        scope_start: usize,
        scope_end: usize,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub path: String,
    pub start_byte: usize,
    pub end_byte: usize,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub snippet: Option<String>,
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(
        descriptor: &Descriptor,
        path: &str,
        source: &str,
        range: (usize, usize),
        message: String,
    ) -> Diagnostic {
        let (start_byte, end_byte) = range;
        let (line, column) = util::line_col(source, start_byte);
        let (end_line, end_column) = util::line_col(source, end_byte);
        let snippet = util::diagnostic_snippet(source, start_byte, end_byte);
        Diagnostic {
            rule_id: descriptor.id.to_string(),
            severity: descriptor.severity,
            message,
            path: path.to_string(),
            start_byte,
            end_byte,
            line,
            column,
            end_line,
            end_column,
            snippet,
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Fix) -> Diagnostic {
        self.fix = Some(fix);
        self
    }

    pub fn fingerprint(&self) -> String {
        let mut hasher = Hasher::new();
        push_str(&mut hasher, &self.path);
        push_str(&mut hasher, &self.rule_id);
        push_str(&mut hasher, &self.line.to_string());
        push_str(&mut hasher, &self.column.to_string());
        push_str(&mut hasher, &self.message);
        match &self.snippet {
            Some(snippet) => push_str(&mut hasher, snippet),
            None => push_str(&mut hasher, "-"),
        }
        hasher.finalize().to_hex().to_string()
    }
}

fn push_str(hasher: &mut Hasher, value: &str) {
    hasher.update(value.as_bytes());
    hasher.update(b"\n");
}

#[cfg(test)]
mod tests {
    use super::{ASP001, ASP005, Diagnostic, Severity, descriptor};

    #[test]
    fn descriptor_lookup() {
        assert_eq!(descriptor("ASP001").unwrap().id, "ASP001");
        assert!(descriptor("ASP099").is_none());
    }

    #[test]
    fn syntax_errors_outrank_warnings() {
        assert_eq!(ASP005.severity, Severity::Error);
        assert_eq!(ASP005.severity.sarif_level(), "error");
        assert_eq!(ASP001.severity, Severity::Warning);
    }

    #[test]
    fn fingerprint_is_stable() {
        let source = "line one\nline two\n";
        let a = Diagnostic::new(&ASP001, "a.cs", source, (9, 13), "msg".to_string());
        let b = Diagnostic::new(&ASP001, "a.cs", source, (9, 13), "msg".to_string());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.line, 2);
        assert_eq!(a.column, 1);
    }
}
