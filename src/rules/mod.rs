use crate::analyzer::{ControllerInfo, MethodParam, ParsedTemplate};
use crate::diagnostics::{self, Diagnostic};
use crate::template::TemplateParameter;
use std::collections::HashSet;

pub mod binding;
pub mod style;
pub mod syntax;
pub mod typing;

/// Which rules are active for a run. Defaults to every descriptor whose
/// `enabled_by_default` flag is set; the CLI can replace the set with an
/// explicit id list or switch individual rules on.
#[derive(Debug, Clone)]
pub struct RuleSet {
    enabled: HashSet<String>,
}

impl Default for RuleSet {
    fn default() -> RuleSet {
        let enabled = diagnostics::DESCRIPTORS
            .iter()
            .filter(|d| d.enabled_by_default)
            .map(|d| d.id.to_string())
            .collect();
        RuleSet { enabled }
    }
}

impl RuleSet {
    /// Builds a set from explicit rule ids, rejecting unknown ids.
    pub fn from_ids<I, S>(ids: I) -> anyhow::Result<RuleSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut enabled = HashSet::new();
        for id in ids {
            let id = id.as_ref();
            if diagnostics::descriptor(id).is_none() {
                anyhow::bail!("unknown rule id: {id}");
            }
            enabled.insert(id.to_string());
        }
        Ok(RuleSet { enabled })
    }

    pub fn enable(&mut self, id: &str) {
        self.enabled.insert(id.to_string());
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.contains(id)
    }
}

/// The file being analyzed; rules read source text only to compute
/// diagnostic locations and snippets.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'s> {
    pub path: &'s str,
    pub source: &'s str,
}

/// Everything the per-action rules see: the combined template list
/// (class-level first, then method-level) and the method's parameters.
pub struct ActionContext<'a, 's> {
    pub file: &'a FileContext<'s>,
    pub controller: &'a ControllerInfo,
    pub method_name: &'a str,
    pub method_range: (usize, usize),
    pub templates: &'a [&'a ParsedTemplate<'a>],
    pub params: &'a [MethodParam],
}

impl ActionContext<'_, '_> {
    /// Method parameters that participate in route binding: everything not
    /// marked with a non-route binding source like `[FromBody]`.
    pub fn bindable_params(&self) -> Vec<&MethodParam> {
        self.params.iter().filter(|p| p.is_route_bindable()).collect()
    }
}

/// Rules that look at one template in isolation: syntax validity, regex
/// escaping, casing conventions and the controller placeholder.
pub fn run_template_rules(
    file: &FileContext<'_>,
    controller: &ControllerInfo,
    template: &ParsedTemplate<'_>,
    rules: &RuleSet,
    out: &mut Vec<Diagnostic>,
) {
    syntax::check_template(file, template, rules, out);
    style::check_template(file, controller, template, rules, out);
}

/// Rules over the controller declaration itself.
pub fn run_controller_rules(
    file: &FileContext<'_>,
    controller: &ControllerInfo,
    class_templates: &[ParsedTemplate<'_>],
    rules: &RuleSet,
    out: &mut Vec<Diagnostic>,
) {
    style::check_controller(file, controller, class_templates, rules, out);
}

/// Rules that need the action's parameter list: name matching, missing and
/// duplicate route parameters, and constraint/type agreement.
pub fn run_action_rules(ctx: &ActionContext<'_, '_>, rules: &RuleSet, out: &mut Vec<Diagnostic>) {
    binding::check(ctx, rules, out);
    typing::check(ctx, rules, out);
}

/// One route parameter of the combined template, with its name narrowed to
/// what the matching rules compare (catch-all markers and constraint tails
/// stripped) and its source location.
pub(crate) struct RouteParam<'a> {
    pub name: &'a str,
    pub param: &'a TemplateParameter<'a>,
    pub range: (usize, usize),
}

pub(crate) fn collect_route_params<'a>(
    templates: &'a [&'a ParsedTemplate<'a>],
) -> Vec<RouteParam<'a>> {
    let mut out = Vec::new();
    for template in templates {
        let Some(parsed) = template.parsed.as_ref() else {
            continue;
        };
        for param in parsed.parameters() {
            // Doubled braces are the template's escape for literal braces;
            // a "parameter" whose name carries one is escaped text, not a
            // route parameter.
            let name = param.route_name();
            if name.is_empty() || name.contains('{') || name.contains('}') {
                continue;
            }
            out.push(RouteParam {
                name: param.route_name(),
                param,
                range: param_name_range(param),
            });
        }
    }
    out
}

/// Source range of a parameter's effective name. The raw name span may
/// still carry catch-all markers or a constraint tail (`{id:int?}`), so the
/// range covers only the `route_name` part.
pub(crate) fn param_name_range(param: &TemplateParameter<'_>) -> (usize, usize) {
    let raw = param.name.as_str();
    let stars = raw.len() - raw.trim_start_matches('*').len();
    let start = param.name.start() + stars;
    param
        .name
        .literal()
        .source_range(start, start + param.route_name().len())
}
