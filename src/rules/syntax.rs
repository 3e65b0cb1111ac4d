//! Template well-formedness: segments that fail to parse or carry stray
//! braces (ASP005) and regex constraints whose raw text needs escaping
//! (ASP006).

use crate::analyzer::ParsedTemplate;
use crate::diagnostics::{ASP005, ASP006, Diagnostic, Fix};
use crate::rules::{FileContext, RuleSet};
use crate::template::{LiteralKind, TemplateSpan};

pub fn check_template(
    file: &FileContext<'_>,
    template: &ParsedTemplate<'_>,
    rules: &RuleSet,
    out: &mut Vec<Diagnostic>,
) {
    let Some(parsed) = template.parsed.as_ref() else {
        if rules.is_enabled(ASP005.id) {
            let message = format!(
                "route template '{}' could not be parsed",
                template.literal.value()
            );
            out.push(Diagnostic::new(
                &ASP005,
                file.path,
                file.source,
                template.literal.token_range(),
                message,
            ));
        }
        return;
    };

    for segment in &parsed.segments {
        if rules.is_enabled(ASP005.id) {
            check_segment(file, segment.span, segment.parameter.is_some(), out);
            if let Some(param) = &segment.parameter {
                if param.route_name().is_empty() {
                    let message = format!(
                        "route segment '{}' declares a parameter with no name",
                        segment.span.as_str()
                    );
                    out.push(Diagnostic::new(
                        &ASP005,
                        file.path,
                        file.source,
                        segment.span.source_range(),
                        message,
                    ));
                }
            }
        }
        if rules.is_enabled(ASP006.id) {
            if let Some(param) = &segment.parameter {
                check_regex_constraints(file, template, param, out);
            }
        }
    }
}

fn check_segment(
    file: &FileContext<'_>,
    span: TemplateSpan<'_>,
    parsed_as_parameter: bool,
    out: &mut Vec<Diagnostic>,
) {
    let text = span.as_str();
    if span.starts_with("{") {
        if parsed_as_parameter || text.starts_with("{{") {
            return;
        }
        let message = format!("route segment '{text}' is not valid parameter syntax");
        let mut diag = Diagnostic::new(&ASP005, file.path, file.source, span.source_range(), message);
        if let Some(fix) = completion_fix(span) {
            diag = diag.with_fix(fix);
        }
        out.push(diag);
        return;
    }
    // A literal segment may carry braces only in doubled, escaped form.
    if has_unescaped_brace(text) {
        let message = format!("route segment '{text}' contains an unescaped brace");
        let (start, end) = span.source_range();
        let diag = Diagnostic::new(&ASP005, file.path, file.source, (start, end), message)
            .with_fix(Fix::ReplaceText {
                start_byte: start,
                end_byte: end,
                replacement: double_braces(span.raw_text()),
            });
        out.push(diag);
    }
}

/// Best-effort correction for a parameter segment that failed to parse:
/// when exactly one closing paren or brace is missing, insert it. Anything
/// else has no safe single edit and the diagnostic carries no fix.
fn completion_fix(span: TemplateSpan<'_>) -> Option<Fix> {
    let raw = span.raw_text();
    let (start, end) = span.source_range();
    let opens = raw.matches('(').count();
    let closes = raw.matches(')').count();
    if opens == closes + 1 {
        let mut fixed = raw.to_string();
        match raw.rfind('}') {
            Some(i) => fixed.insert(i, ')'),
            None => fixed.push(')'),
        }
        return Some(Fix::ReplaceText {
            start_byte: start,
            end_byte: end,
            replacement: fixed,
        });
    }
    let open_braces = raw.matches('{').count();
    let close_braces = raw.matches('}').count();
    if opens == closes && open_braces == close_braces + 1 {
        return Some(Fix::ReplaceText {
            start_byte: start,
            end_byte: end,
            replacement: format!("{raw}}}"),
        });
    }
    None
}

fn check_regex_constraints(
    file: &FileContext<'_>,
    template: &ParsedTemplate<'_>,
    param: &crate::template::TemplateParameter<'_>,
    out: &mut Vec<Diagnostic>,
) {
    let regular = template.literal.kind() == LiteralKind::Regular;
    for constraint in &param.constraints {
        if !constraint.keyword().eq_ignore_ascii_case("regex") {
            continue;
        }
        let Some(arg) = constraint.argument() else {
            continue;
        };
        let raw = arg.raw_text();
        let (escaped, backslash, brace) = escape_regex(raw, regular);
        let offender = match (backslash, brace) {
            (true, true) => "'\\' and braces",
            (true, false) => "'\\'",
            (false, true) => "braces",
            (false, false) => continue,
        };
        let message = format!(
            "escape {} inside the regex constraint of route parameter '{}'",
            offender,
            param.route_name()
        );
        let (start, end) = arg.source_range();
        let diag = Diagnostic::new(&ASP006, file.path, file.source, (start, end), message)
            .with_fix(Fix::ReplaceText {
                start_byte: start,
                end_byte: end,
                replacement: escaped,
            });
        out.push(diag);
    }
}

fn has_unescaped_brace(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '{' || chars[i] == '}' {
            if i + 1 < chars.len() && chars[i + 1] == chars[i] {
                i += 2;
                continue;
            }
            return true;
        }
        i += 1;
    }
    false
}

fn double_braces(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '{' || c == '}' {
            out.push(c);
            out.push(c);
            if i + 1 < chars.len() && chars[i + 1] == c {
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Rewrites the raw text of a regex argument with template-safe escaping:
/// braces doubled, and in regular (backslash-escaping) literals, odd runs
/// of backslashes doubled. Returns the rewritten text plus which class of
/// character needed escaping.
fn escape_regex(raw: &str, regular: bool) -> (String, bool, bool) {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 4);
    let mut backslash = false;
    let mut brace = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let mut run = 1;
                while i + run < chars.len() && chars[i + run] == '\\' {
                    run += 1;
                }
                let emit = if regular && run % 2 == 1 {
                    backslash = true;
                    run + 1
                } else {
                    run
                };
                for _ in 0..emit {
                    out.push('\\');
                }
                i += run;
            }
            c @ ('{' | '}') => {
                out.push(c);
                out.push(c);
                if i + 1 < chars.len() && chars[i + 1] == c {
                    i += 2;
                } else {
                    brace = true;
                    i += 1;
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    (out, backslash, brace)
}

#[cfg(test)]
mod tests {
    use super::{double_braces, escape_regex, has_unescaped_brace};

    #[test]
    fn regex_backslash_doubling() {
        let (escaped, backslash, brace) = escape_regex("^\\d+$", true);
        assert_eq!(escaped, "^\\\\d+$");
        assert!(backslash);
        assert!(!brace);
        // Already doubled runs are left alone.
        let (escaped, backslash, _) = escape_regex("^\\\\d+$", true);
        assert_eq!(escaped, "^\\\\d+$");
        assert!(!backslash);
        // Verbatim literals never need backslash doubling.
        let (escaped, backslash, _) = escape_regex("^\\d+$", false);
        assert_eq!(escaped, "^\\d+$");
        assert!(!backslash);
    }

    #[test]
    fn regex_brace_doubling() {
        let (escaped, _, brace) = escape_regex("a{3}", false);
        assert_eq!(escaped, "a{{3}}");
        assert!(brace);
        let (escaped, _, brace) = escape_regex("a{{3}}", false);
        assert_eq!(escaped, "a{{3}}");
        assert!(!brace);
    }

    #[test]
    fn stray_brace_detection() {
        assert!(has_unescaped_brace("a{b"));
        assert!(!has_unescaped_brace("a{{b}}"));
        assert!(!has_unescaped_brace("plain"));
        assert_eq!(double_braces("a{b}"), "a{{b}}");
        assert_eq!(double_braces("a{{b}"), "a{{b}}");
    }
}
