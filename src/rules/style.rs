//! URL naming conventions: lowercase segments (ASP007), kebab-cased
//! segments (ASP008, opt-in), controller-name/route agreement (ASP009) and
//! the opt-in `[controller]` placeholder rule (ASP010).

use crate::analyzer::{ControllerInfo, ParsedTemplate};
use crate::diagnostics::{ASP007, ASP008, ASP009, ASP010, Diagnostic, Fix};
use crate::rules::{FileContext, RuleSet};
use crate::util;

const PLACEHOLDER: &str = "[controller]";

pub fn check_template(
    file: &FileContext<'_>,
    controller: &ControllerInfo,
    template: &ParsedTemplate<'_>,
    rules: &RuleSet,
    out: &mut Vec<Diagnostic>,
) {
    if let Some(parsed) = template.parsed.as_ref() {
        for segment in &parsed.segments {
            if segment.parameter.is_some() || segment.span.starts_with("{") {
                continue;
            }
            let text = segment.text();
            // Placeholder tokens resolve at runtime; casing rules do not
            // apply to them.
            if text.is_empty() || text.contains('[') {
                continue;
            }
            if rules.is_enabled(ASP007.id) && text.chars().any(|c| c.is_ascii_uppercase()) {
                let (start, end) = segment.span.source_range();
                let message = format!("use lowercase urls: '{text}'");
                out.push(
                    Diagnostic::new(&ASP007, file.path, file.source, (start, end), message)
                        .with_fix(Fix::ReplaceText {
                            start_byte: start,
                            end_byte: end,
                            replacement: segment.span.raw_text().to_ascii_lowercase(),
                        }),
                );
            }
            // The kebab rule covers word boundaries only; pure casing is
            // the lowercase rule's job.
            if rules.is_enabled(ASP008.id) {
                let kebab = util::kebab_case(text);
                if kebab != text.to_ascii_lowercase() {
                    let (start, end) = segment.span.source_range();
                    let message = format!("use kebab-cased urls: '{text}' should be '{kebab}'");
                    out.push(
                        Diagnostic::new(&ASP008, file.path, file.source, (start, end), message)
                            .with_fix(Fix::ReplaceText {
                                start_byte: start,
                                end_byte: end,
                                replacement: kebab,
                            }),
                    );
                }
            }
        }
    }

    if rules.is_enabled(ASP010.id) {
        check_placeholder(file, controller, template, out);
    }
}

fn check_placeholder(
    file: &FileContext<'_>,
    controller: &ControllerInfo,
    template: &ParsedTemplate<'_>,
    out: &mut Vec<Diagnostic>,
) {
    let value = template.literal.value();
    let mut from = 0;
    while let Some(idx) = value[from..].find(PLACEHOLDER) {
        let start = from + idx;
        let end = start + PLACEHOLDER.len();
        let range = template.literal.source_range(start, end);
        let literal_name = util::kebab_case(controller.short_name());
        let message = format!("replace '{PLACEHOLDER}' with the literal route '{literal_name}'");
        let mut diag = Diagnostic::new(&ASP010, file.path, file.source, range, message);
        if !literal_name.is_empty() {
            diag = diag.with_fix(Fix::ReplaceText {
                start_byte: range.0,
                end_byte: range.1,
                replacement: literal_name,
            });
        }
        out.push(diag);
        from = end;
    }
}

/// Controller-name/route agreement. With a `[controller]` placeholder the
/// route tracks the type name, so only the conventional suffix is checked;
/// otherwise the tail literal segment of the class template names the
/// expected type. Tail rather than head: class routes nest general to
/// specific, and a shared `api/` prefix never names the controller.
pub fn check_controller(
    file: &FileContext<'_>,
    controller: &ControllerInfo,
    class_templates: &[ParsedTemplate<'_>],
    rules: &RuleSet,
    out: &mut Vec<Diagnostic>,
) {
    if !rules.is_enabled(ASP009.id) || class_templates.is_empty() {
        return;
    }
    let uses_placeholder = class_templates
        .iter()
        .any(|t| t.literal.value().contains(PLACEHOLDER));
    if uses_placeholder {
        if controller.name.ends_with("Controller") && controller.name != "Controller" {
            return;
        }
        let expected = format!("{}Controller", controller.name);
        let message = format!(
            "'{}' uses the '{PLACEHOLDER}' placeholder but is not named '{expected}'",
            controller.name
        );
        emit_rename(file, controller, expected, message, out);
        return;
    }

    let Some(segment) = route_tail_segment(class_templates) else {
        return;
    };
    let expected = format!("{}Controller", util::pascal_case(&util::kebab_case(segment)));
    if !util::is_identifier(&expected) || controller.name == expected {
        return;
    }
    let message = format!(
        "controller '{}' does not match its route '{segment}'; expected '{expected}'",
        controller.name
    );
    emit_rename(file, controller, expected, message, out);
}

// The resource a route names is its tail literal segment. A route ending in
// a parameter ("api/{tenant}") names nothing checkable, so the rule stays
// quiet rather than comparing against a prefix like "api".
fn route_tail_segment<'a>(class_templates: &'a [ParsedTemplate<'a>]) -> Option<&'a str> {
    for template in class_templates {
        let Some(parsed) = template.parsed.as_ref() else {
            continue;
        };
        let tail = parsed.segments.iter().rev().find(|s| !s.text().is_empty())?;
        if tail.parameter.is_some() || tail.span.starts_with("{") || tail.text().contains('[') {
            return None;
        }
        return Some(tail.text());
    }
    None
}

fn emit_rename(
    file: &FileContext<'_>,
    controller: &ControllerInfo,
    expected: String,
    message: String,
    out: &mut Vec<Diagnostic>,
) {
    let mut diag = Diagnostic::new(
        &ASP009,
        file.path,
        file.source,
        controller.name_range,
        message,
    );
    if util::is_identifier(&expected) {
        diag = diag.with_fix(Fix::RenameSymbol {
            name: controller.name.clone(),
            new_name: expected,
            scope_start: 0,
            scope_end: file.source.len(),
        });
    }
    out.push(diag);
}
