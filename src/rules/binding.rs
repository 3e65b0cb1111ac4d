//! Name matching between route parameters and method parameters: the
//! rename rule (ASP001), missing parameters (ASP003) and duplicate route
//! parameter names (ASP004).

use crate::diagnostics::{ASP001, ASP003, ASP004, Diagnostic, Fix};
use crate::rules::{ActionContext, RuleSet, collect_route_params};
use crate::util;

pub fn check(ctx: &ActionContext<'_, '_>, rules: &RuleSet, out: &mut Vec<Diagnostic>) {
    let route_params = collect_route_params(ctx.templates);

    if rules.is_enabled(ASP004.id) {
        check_duplicates(ctx, &route_params, out);
    }

    let bindable = ctx.bindable_params();
    // Without any route-bindable method parameter there is nothing to match
    // against; templates used purely for URL shape stay silent.
    if bindable.is_empty() {
        return;
    }

    let unmatched_route: Vec<_> = route_params
        .iter()
        .filter(|rp| !bindable.iter().any(|p| p.name == rp.name))
        .collect();
    let unmatched_params: Vec<_> = bindable
        .iter()
        .filter(|p| !route_params.iter().any(|rp| rp.name == p.name))
        .collect();

    // A single unmatched pair on each side is an unambiguous misnaming; the
    // fix renames the method parameter so body references follow along.
    // Anything more ambiguous degrades to missing-parameter reports.
    if unmatched_route.len() == 1 && unmatched_params.len() == 1 && rules.is_enabled(ASP001.id) {
        let route = unmatched_route[0];
        let param = unmatched_params[0];
        let message = format!(
            "parameter '{}' does not match route parameter '{}'",
            param.name, route.name
        );
        let mut diag = Diagnostic::new(&ASP001, ctx.file.path, ctx.file.source, param.name_range, message);
        if util::is_identifier(route.name) {
            diag = diag.with_fix(Fix::RenameSymbol {
                name: param.name.clone(),
                new_name: route.name.to_string(),
                scope_start: ctx.method_range.0,
                scope_end: ctx.method_range.1,
            });
        }
        out.push(diag);
        return;
    }

    if rules.is_enabled(ASP003.id) {
        for route in unmatched_route {
            let message = format!(
                "route parameter '{}' has no matching parameter on '{}'",
                route.name, ctx.method_name
            );
            out.push(Diagnostic::new(
                &ASP003,
                ctx.file.path,
                ctx.file.source,
                route.range,
                message,
            ));
        }
    }
}

// Route parameter names are case-insensitive, so `{id}` and `{Id}` collide.
// Every occurrence is flagged, including the one in the class template.
fn check_duplicates(
    ctx: &ActionContext<'_, '_>,
    route_params: &[crate::rules::RouteParam<'_>],
    out: &mut Vec<Diagnostic>,
) {
    for rp in route_params {
        let occurrences = route_params
            .iter()
            .filter(|other| other.name.eq_ignore_ascii_case(rp.name))
            .count();
        if occurrences < 2 {
            continue;
        }
        let message = format!(
            "route parameter '{}' appears {} times in the combined route template",
            rp.name, occurrences
        );
        out.push(Diagnostic::new(
            &ASP004,
            ctx.file.path,
            ctx.file.source,
            rp.range,
            message,
        ));
    }
}
