use crate::diagnostics::Diagnostic;
use crate::rules::{self, FileContext, RuleSet};
use crate::template::{Literal, UrlTemplate};
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tree_sitter::{Node, Parser};

pub mod attributes;

use attributes::{BindingSource, RouteAttr};

/// Cooperative cancellation, checked at class and method boundaries. A
/// cancelled analysis returns whatever it has accumulated; callers discard
/// the partial result wholesale.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> CancelFlag {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct ControllerInfo {
    pub name: String,
    pub name_range: (usize, usize),
    pub range: (usize, usize),
}

impl ControllerInfo {
    /// The controller name without the conventional suffix.
    pub fn short_name(&self) -> &str {
        self.name.strip_suffix("Controller").unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct MethodParam {
    pub name: String,
    pub name_range: (usize, usize),
    pub type_text: String,
    pub type_range: (usize, usize),
    pub bindings: Vec<BindingSource>,
}

impl MethodParam {
    pub fn is_route_bindable(&self) -> bool {
        !self.bindings.iter().any(|b| b.exempts_route_binding())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateLevel {
    Controller,
    Action,
}

/// One route-template attribute occurrence: the literal plus its parse
/// result. `parsed` is `None` when the template text could not be parsed;
/// the syntax rule reports that and every other rule abstains.
#[derive(Debug, Clone)]
pub struct ParsedTemplate<'a> {
    pub level: TemplateLevel,
    pub attr: RouteAttr,
    pub literal: &'a Literal,
    pub parsed: Option<UrlTemplate<'a>>,
}

pub struct RouteAnalyzer {
    parser: Parser,
}

impl RouteAnalyzer {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_c_sharp::LANGUAGE;
        parser.set_language(&language.into())?;
        Ok(Self { parser })
    }

    /// Analyzes one C# file and returns the diagnostics for every
    /// controller/action route template in it. Malformed templates produce
    /// syntax diagnostics, never errors; `Err` is reserved for the
    /// environment (the grammar failing to load).
    pub fn analyze(
        &mut self,
        path: &str,
        source: &str,
        rules: &RuleSet,
        cancel: &CancelFlag,
    ) -> Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        let Some(tree) = self.parser.parse(source, None) else {
            return Ok(out);
        };
        let mut classes = Vec::new();
        collect_classes(tree.root_node(), &mut classes);
        let file = FileContext { path, source };
        for class in classes {
            if cancel.is_cancelled() {
                break;
            }
            analyze_class(class, &file, rules, cancel, &mut out);
        }
        dedupe(&mut out);
        Ok(out)
    }
}

// Class-level template diagnostics are emitted while walking the class and
// again never re-emitted per action; this keeps one diagnostic per source
// location when several actions share the class template.
fn dedupe(diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    diagnostics.retain(|d| {
        seen.insert((
            d.rule_id.clone(),
            d.start_byte,
            d.end_byte,
            d.message.clone(),
        ))
    });
}

fn collect_classes<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.kind() == "class_declaration" {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "method_declaration" | "local_function_statement" => continue,
            _ => collect_classes(child, out),
        }
    }
}

struct TemplateAttr<'t> {
    kind: RouteAttr,
    token_start: usize,
    raw: String,
    _node: Node<'t>,
}

fn route_attrs<'t>(node: Node<'t>, source: &str) -> (Vec<TemplateAttr<'t>>, bool, bool) {
    let mut templates = Vec::new();
    let mut any_route_attr = false;
    let mut api_marker = false;
    for attr in attributes::attributes_for_node(node, source) {
        let name = attributes::normalize_attribute_name(&attr.name);
        if name == "ApiController" || name == "Controller" {
            api_marker = true;
        }
        let Some(kind) = RouteAttr::from_name(&name) else {
            continue;
        };
        any_route_attr = true;
        if let Some((token, raw)) = attributes::template_token(&attr, source) {
            templates.push(TemplateAttr {
                kind,
                token_start: token.start_byte(),
                raw,
                _node: attr.node,
            });
        }
    }
    (templates, any_route_attr, api_marker)
}

fn parse_templates<'t>(attrs: &[TemplateAttr<'t>]) -> Vec<(RouteAttr, Literal)> {
    attrs
        .iter()
        .filter_map(|attr| {
            Literal::from_token(&attr.raw, attr.token_start).map(|literal| (attr.kind, literal))
        })
        .collect()
}

fn analyze_class(
    node: Node<'_>,
    file: &FileContext<'_>,
    rules_set: &RuleSet,
    cancel: &CancelFlag,
    out: &mut Vec<Diagnostic>,
) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = attributes::node_text(name_node, file.source);
    if name.is_empty() {
        return;
    }
    let (class_attrs, any_route_attr, api_marker) = route_attrs(node, file.source);
    let is_controller = name.ends_with("Controller") || api_marker || any_route_attr;
    if !is_controller {
        return;
    }

    let controller = ControllerInfo {
        name,
        name_range: attributes::byte_range(name_node),
        range: attributes::byte_range(node),
    };

    let class_literals = parse_templates(&class_attrs);
    let class_templates: Vec<ParsedTemplate<'_>> = class_literals
        .iter()
        .map(|(kind, literal)| ParsedTemplate {
            level: TemplateLevel::Controller,
            attr: *kind,
            literal,
            parsed: UrlTemplate::try_parse(literal),
        })
        .collect();

    for template in &class_templates {
        rules::run_template_rules(file, &controller, template, rules_set, out);
    }
    rules::run_controller_rules(file, &controller, &class_templates, rules_set, out);

    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if cancel.is_cancelled() {
            return;
        }
        if member.kind() != "method_declaration" {
            continue;
        }
        analyze_method(member, file, &controller, &class_templates, rules_set, out);
    }
}

fn analyze_method(
    node: Node<'_>,
    file: &FileContext<'_>,
    controller: &ControllerInfo,
    class_templates: &[ParsedTemplate<'_>],
    rules_set: &RuleSet,
    out: &mut Vec<Diagnostic>,
) {
    let (method_attrs, any_route_attr, _) = route_attrs(node, file.source);
    // A method without routing attributes is still an action when the class
    // carries a template, but only if it is public.
    if !any_route_attr && (class_templates.is_empty() || !is_public(node, file.source)) {
        return;
    }

    let method_literals = parse_templates(&method_attrs);
    let method_templates: Vec<ParsedTemplate<'_>> = method_literals
        .iter()
        .map(|(kind, literal)| ParsedTemplate {
            level: TemplateLevel::Action,
            attr: *kind,
            literal,
            parsed: UrlTemplate::try_parse(literal),
        })
        .collect();

    for template in &method_templates {
        rules::run_template_rules(file, controller, template, rules_set, out);
    }

    let method_name = node
        .child_by_field_name("name")
        .map(|n| attributes::node_text(n, file.source))
        .unwrap_or_default();
    let params = collect_params(node, file.source);
    let combined: Vec<&ParsedTemplate<'_>> = class_templates
        .iter()
        .chain(method_templates.iter())
        .collect();
    let ctx = rules::ActionContext {
        file,
        controller,
        method_name: &method_name,
        method_range: attributes::byte_range(node),
        templates: &combined,
        params: &params,
    };
    rules::run_action_rules(&ctx, rules_set, out);
}

fn is_public(node: Node<'_>, source: &str) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "modifier" && attributes::node_text(child, source) == "public" {
            return true;
        }
    }
    false
}

fn collect_params(node: Node<'_>, source: &str) -> Vec<MethodParam> {
    let mut out = Vec::new();
    let Some(list) = node.child_by_field_name("parameters") else {
        return out;
    };
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        if param.kind() != "parameter" {
            continue;
        }
        let Some(name_node) = param.child_by_field_name("name") else {
            continue;
        };
        let Some(type_node) = param.child_by_field_name("type") else {
            continue;
        };
        let name = attributes::node_text(name_node, source);
        let type_text = attributes::node_text(type_node, source);
        if name.is_empty() || type_text.is_empty() {
            continue;
        }
        let bindings = attributes::attributes_for_node(param, source)
            .iter()
            .filter_map(|attr| {
                BindingSource::from_name(&attributes::normalize_attribute_name(&attr.name))
            })
            .collect();
        out.push(MethodParam {
            name,
            name_range: attributes::byte_range(name_node),
            type_text,
            type_range: attributes::byte_range(type_node),
            bindings,
        });
    }
    out
}
