use tree_sitter::Node;

/// The route-bearing attributes, modeled as a closed variant instead of the
/// host framework's attribute-type hierarchy. `Route` covers both `[Route]`
/// and the legacy `[RoutePrefix]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAttr {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Route,
}

impl RouteAttr {
    pub fn from_name(name: &str) -> Option<RouteAttr> {
        match name {
            "Route" | "RoutePrefix" => Some(RouteAttr::Route),
            "HttpGet" => Some(RouteAttr::Get),
            "HttpPost" => Some(RouteAttr::Post),
            "HttpPut" => Some(RouteAttr::Put),
            "HttpDelete" => Some(RouteAttr::Delete),
            "HttpHead" => Some(RouteAttr::Head),
            "HttpOptions" => Some(RouteAttr::Options),
            "HttpPatch" => Some(RouteAttr::Patch),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RouteAttr::Get => "HttpGet",
            RouteAttr::Post => "HttpPost",
            RouteAttr::Put => "HttpPut",
            RouteAttr::Delete => "HttpDelete",
            RouteAttr::Head => "HttpHead",
            RouteAttr::Options => "HttpOptions",
            RouteAttr::Patch => "HttpPatch",
            RouteAttr::Route => "Route",
        }
    }
}

/// Binding-source attributes on method parameters. A parameter carrying any
/// source other than `Route` is exempt from route-parameter matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSource {
    Route,
    Body,
    Query,
    Header,
    Form,
    Services,
}

impl BindingSource {
    pub fn from_name(name: &str) -> Option<BindingSource> {
        match name {
            "FromRoute" => Some(BindingSource::Route),
            "FromBody" => Some(BindingSource::Body),
            "FromQuery" => Some(BindingSource::Query),
            "FromHeader" => Some(BindingSource::Header),
            "FromForm" => Some(BindingSource::Form),
            "FromServices" | "FromKeyedServices" => Some(BindingSource::Services),
            _ => None,
        }
    }

    pub fn exempts_route_binding(&self) -> bool {
        !matches!(self, BindingSource::Route)
    }
}

#[derive(Clone)]
pub struct AttributeInfo<'t> {
    pub name: String,
    pub node: Node<'t>,
    pub args: Vec<Node<'t>>,
}

pub fn attributes_for_node<'t>(node: Node<'t>, source: &str) -> Vec<AttributeInfo<'t>> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "attribute_list" {
            continue;
        }
        let mut list_cursor = child.walk();
        for attr in child.named_children(&mut list_cursor) {
            if attr.kind() != "attribute" {
                continue;
            }
            let Some(name_node) = attr.child_by_field_name("name") else {
                continue;
            };
            let raw_name = node_text(name_node, source);
            if raw_name.is_empty() {
                continue;
            }
            let args = attribute_argument_exprs(attr);
            out.push(AttributeInfo {
                name: raw_name,
                args,
                node: attr,
            });
        }
    }
    out
}

fn attribute_argument_exprs(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "attribute_argument_list" {
            continue;
        }
        let mut arg_cursor = child.walk();
        for arg in child.named_children(&mut arg_cursor) {
            if arg.kind() != "attribute_argument" {
                continue;
            }
            if let Some(expr) = attribute_argument_expr(arg) {
                out.push(expr);
            }
        }
    }
    out
}

fn attribute_argument_expr(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let mut expr = None;
    for child in node.named_children(&mut cursor) {
        expr = Some(child);
    }
    expr
}

/// Strips namespace qualification and the `Attribute` suffix.
pub fn normalize_attribute_name(raw: &str) -> String {
    let name = raw.rsplit('.').next().unwrap_or(raw).to_string();
    name.strip_suffix("Attribute").unwrap_or(&name).to_string()
}

/// The first string-literal argument of an attribute, returned as the exact
/// token node plus its untrimmed raw text. The raw text (quotes included)
/// is what the template literal model needs to map value offsets back to
/// source bytes.
pub fn template_token<'t>(attr: &AttributeInfo<'t>, source: &str) -> Option<(Node<'t>, String)> {
    for arg in &attr.args {
        match arg.kind() {
            "string_literal" | "verbatim_string_literal" | "raw_string_literal" => {
                let raw = exact_text(*arg, source);
                if !raw.is_empty() {
                    return Some((*arg, raw));
                }
            }
            _ => {}
        }
    }
    None
}

pub fn node_text(node: Node<'_>, source: &str) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    source.get(start..end).unwrap_or("").trim().to_string()
}

pub fn exact_text(node: Node<'_>, source: &str) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    source.get(start..end).unwrap_or("").to_string()
}

pub fn byte_range(node: Node<'_>) -> (usize, usize) {
    (node.start_byte(), node.end_byte())
}
