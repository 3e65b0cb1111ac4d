pub mod constraint;
pub mod literal;
pub mod parameter;
pub mod segment;
pub mod span;
pub mod types;

pub use constraint::RouteConstraint;
pub use literal::{Literal, LiteralKind};
pub use parameter::TemplateParameter;
pub use segment::PathSegment;
pub use span::TemplateSpan;

/// The parse result for one route-template string literal: the ordered
/// segment list over the literal's value text. Never mutated after
/// construction; every analysis pass reparses from the literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate<'a> {
    pub literal: &'a Literal,
    pub segments: Vec<PathSegment<'a>>,
}

impl<'a> UrlTemplate<'a> {
    /// Drives the segment reader over the whole value text. Success requires
    /// the accumulated end position to equal the literal's full logical
    /// length; unconsumed trailing text is a parse failure.
    pub fn try_parse(literal: &'a Literal) -> Option<UrlTemplate<'a>> {
        let mut segments = Vec::new();
        let mut pos = 0;
        while let Some((seg, next)) = segment::try_read(literal, pos) {
            segments.push(seg);
            pos = next;
        }
        if pos != literal.value().len() {
            return None;
        }
        Some(UrlTemplate { literal, segments })
    }

    pub fn parameters(&self) -> impl Iterator<Item = &TemplateParameter<'a>> {
        self.segments.iter().filter_map(|s| s.parameter.as_ref())
    }

    /// The leading text stripped by the first segment read (`~/`, `~` or
    /// `/`), needed to reconstruct the original value text from segments.
    pub fn stripped_prefix(&self) -> &'a str {
        let value = self.literal.value();
        if value.starts_with("~/") {
            "~/"
        } else if value.starts_with('~') {
            "~"
        } else if value.starts_with('/') {
            "/"
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Literal, UrlTemplate};

    fn parse_value(template: &str) -> Option<String> {
        let token = format!("\"{template}\"");
        let literal = Literal::from_token(&token, 0).unwrap();
        let parsed = UrlTemplate::try_parse(&literal)?;
        let joined = parsed
            .segments
            .iter()
            .map(|s| s.text())
            .collect::<Vec<_>>()
            .join("/");
        Some(format!("{}{}", parsed.stripped_prefix(), joined))
    }

    #[test]
    fn round_trips_value_text() {
        for template in [
            "api/orders/{id}",
            "~/api/orders",
            "/healthz",
            "api/{id:int:min(1)}/items",
            "api/{id:regex(a/b)}/x",
            "{controller}/{action}",
            "api/orders/",
            "",
        ] {
            assert_eq!(parse_value(template).as_deref(), Some(template));
        }
    }

    #[test]
    fn reparse_is_structurally_equal() {
        let literal = Literal::from_token("\"api/{id:int}/items\"", 0).unwrap();
        let first = UrlTemplate::try_parse(&literal).unwrap();
        let second = UrlTemplate::try_parse(&literal).unwrap();
        assert_eq!(first, second);
    }
}
