//! Constraint/type agreement: the declared parameter type against what the
//! route constraints imply (ASP002), plus conflicting type-determining
//! constraints inside one parameter (ASP011).

use crate::diagnostics::{ASP002, ASP011, Diagnostic, Fix};
use crate::rules::{ActionContext, RuleSet, collect_route_params};
use crate::template::types::{self, ConstraintCategory, Inference};

pub fn check(ctx: &ActionContext<'_, '_>, rules: &RuleSet, out: &mut Vec<Diagnostic>) {
    let route_params = collect_route_params(ctx.templates);
    let bindable = ctx.bindable_params();

    for rp in &route_params {
        let keywords = rp.param.constraint_keywords();
        let inference = types::infer(&keywords);

        // A conflict is a template defect regardless of the method
        // signature, and no expected type can be chosen from it.
        if let Inference::Conflict(tokens) = &inference {
            if rules.is_enabled(ASP011.id) {
                let message = format!(
                    "route parameter '{}' has conflicting type constraints: {}",
                    rp.name,
                    tokens.join(", ")
                );
                out.push(Diagnostic::new(
                    &ASP011,
                    ctx.file.path,
                    ctx.file.source,
                    rp.range,
                    message,
                ));
            }
            continue;
        }

        if !rules.is_enabled(ASP002.id) {
            continue;
        }
        let Some(param) = bindable.iter().find(|p| p.name == rp.name) else {
            continue;
        };
        let declared = types::parse_declared(&param.type_text);
        let optional = rp.param.is_optional();
        let string_like_constraint = keywords
            .iter()
            .any(|k| matches!(types::categorize(k), ConstraintCategory::StringLike));

        let expected: Option<&str> = match &inference {
            Inference::Expected(ty) => {
                if declared.core != *ty {
                    Some(ty)
                } else {
                    None
                }
            }
            Inference::Integer => {
                if !types::is_integer(&declared.core) && !types::is_string_like(&declared.core) {
                    Some("long")
                } else {
                    None
                }
            }
            Inference::None => {
                if string_like_constraint && !types::is_string_like(&declared.core) {
                    Some("string")
                } else {
                    None
                }
            }
            Inference::Conflict(_) => None,
        };

        if let Some(expected) = expected {
            let replacement = if optional && expected != "string" {
                format!("{expected}?")
            } else {
                expected.to_string()
            };
            let message = format!(
                "parameter '{}' is declared as '{}' but the route constrains it to '{}'",
                rp.name, param.type_text, expected
            );
            let diag = Diagnostic::new(
                &ASP002,
                ctx.file.path,
                ctx.file.source,
                param.type_range,
                message,
            )
            .with_fix(Fix::ReplaceText {
                start_byte: param.type_range.0,
                end_byte: param.type_range.1,
                replacement,
            });
            out.push(diag);
            continue;
        }

        // The type agrees; an optional route parameter still needs the
        // nullable spelling for value types.
        if optional && !declared.nullable && !types::is_string_like(&declared.core) {
            let message = format!(
                "route parameter '{}' is optional but '{}' is not nullable",
                rp.name, param.type_text
            );
            let diag = Diagnostic::new(
                &ASP002,
                ctx.file.path,
                ctx.file.source,
                param.type_range,
                message,
            )
            .with_fix(Fix::ReplaceText {
                start_byte: param.type_range.0,
                end_byte: param.type_range.1,
                replacement: format!("{}?", param.type_text.trim()),
            });
            out.push(diag);
        }
    }
}
