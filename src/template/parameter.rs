use crate::template::constraint::{self, RouteConstraint};
use crate::template::span::TemplateSpan;

/// A parsed `{...}` route parameter: the name span plus its ordered
/// constraint list. Optionality is modeled as a trailing synthetic `?`
/// constraint so the rule layer treats it like any other constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParameter<'a> {
    pub name: TemplateSpan<'a>,
    pub constraints: Vec<RouteConstraint<'a>>,
}

impl<'a> TemplateParameter<'a> {
    pub fn is_optional(&self) -> bool {
        self.constraints.iter().any(|c| c.text() == "?")
    }

    /// The parameter name as the matching rules see it: catch-all markers
    /// stripped, and truncated at the first depth-zero `:` to cover the
    /// `{id:int?}` spelling where the optionality check wins the parse and
    /// the raw name span still carries the constraint tail.
    pub fn route_name(&self) -> &'a str {
        let raw = self.name.as_str().trim_start_matches('*');
        let mut depth = 0usize;
        for (i, byte) in raw.bytes().enumerate() {
            match byte {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b':' if depth == 0 => return &raw[..i],
                _ => {}
            }
        }
        raw
    }

    /// Constraint keywords for type inference, including tokens hiding in
    /// the name tail of the optional spelling. The `?` marker is excluded;
    /// callers ask `is_optional` separately.
    pub fn constraint_keywords(&self) -> Vec<String> {
        let mut out = Vec::new();
        let raw = self.name.as_str().trim_start_matches('*');
        if let Some(colon) = raw.find(':') {
            for token in split_depth_zero(&raw[colon + 1..]) {
                let keyword = token.split('(').next().unwrap_or(token);
                if !keyword.is_empty() {
                    out.push(keyword.to_string());
                }
            }
        }
        for constraint in &self.constraints {
            let keyword = constraint.keyword();
            if keyword != "?" {
                out.push(keyword.to_string());
            }
        }
        out
    }
}

fn split_depth_zero(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b':' if depth == 0 => {
                out.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&text[start..]);
    out
}

/// Parses one `{...}` segment into name plus constraints.
///
/// The interior runs from just past the first `{` to the last `}`. The
/// checks below are evaluated in priority order; the order is load-bearing
/// because a malformed name could syntactically satisfy more than one case:
/// 1. trailing `?` marks the parameter optional,
/// 2. a `:` starts the constraint list,
/// 3. a `=` starts a default value (the value itself is not modeled),
/// 4. leading `*`/`**` marks a catch-all; the name starts after the stars,
/// 5. otherwise the whole interior is the name.
pub fn try_parse<'a>(span: &TemplateSpan<'a>) -> Option<TemplateParameter<'a>> {
    let open = span.index_of('{', 0)?;
    let close = span.last_index_of('}')?;
    if close <= open {
        return None;
    }
    let start = open + 1;
    let end = close;

    if end > start && span.byte_at(end - 1) == Some(b'?') {
        let name = span.slice(start, end - 1);
        let marker = RouteConstraint {
            span: span.substring(end - 1, 1),
        };
        return Some(TemplateParameter {
            name,
            constraints: vec![marker],
        });
    }

    if let Some(colon) = span.index_of(':', start) {
        if colon < end {
            let name = span.slice(start, colon);
            let mut constraints = Vec::new();
            let mut pos = colon;
            loop {
                let (constraint, next) = constraint::try_read(span, pos)?;
                constraints.push(constraint);
                if span.byte_at(next) == Some(b':') {
                    pos = next;
                } else {
                    break;
                }
            }
            return Some(TemplateParameter { name, constraints });
        }
    }

    if let Some(eq) = span.index_of('=', start) {
        if eq < end {
            return Some(TemplateParameter {
                name: span.slice(start, eq),
                constraints: Vec::new(),
            });
        }
    }

    let mut name_start = start;
    while name_start < end && span.byte_at(name_start) == Some(b'*') {
        name_start += 1;
    }
    Some(TemplateParameter {
        name: span.slice(name_start, end),
        constraints: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::try_parse;
    use crate::template::literal::Literal;
    use crate::template::span::TemplateSpan;

    fn parse(segment: &str) -> Option<(String, Vec<String>)> {
        let token = format!("\"{segment}\"");
        let literal = Literal::from_token(&token, 0).unwrap();
        let span = TemplateSpan::whole(&literal);
        let parameter = try_parse(&span)?;
        let constraints = parameter
            .constraints
            .iter()
            .map(|c| c.text().to_string())
            .collect();
        Some((parameter.name.as_str().to_string(), constraints))
    }

    #[test]
    fn bare_name() {
        let (name, constraints) = parse("{id}").unwrap();
        assert_eq!(name, "id");
        assert!(constraints.is_empty());
    }

    #[test]
    fn constraint_chain_preserves_order() {
        let (name, constraints) = parse("{id:int:min(1):max(10)}").unwrap();
        assert_eq!(name, "id");
        assert_eq!(constraints, vec!["int", "min(1)", "max(10)"]);
    }

    #[test]
    fn optional_wins_over_constraints() {
        let (name, constraints) = parse("{id:int?}").unwrap();
        assert_eq!(name, "id:int");
        assert_eq!(constraints, vec!["?"]);

        let token = Literal::from_token("\"{id:int?}\"", 0).unwrap();
        let span = TemplateSpan::whole(&token);
        let parameter = try_parse(&span).unwrap();
        assert!(parameter.is_optional());
        assert_eq!(parameter.route_name(), "id");
        assert_eq!(parameter.constraint_keywords(), vec!["int"]);
    }

    #[test]
    fn default_value_keeps_name_only() {
        let (name, constraints) = parse("{id=1}").unwrap();
        assert_eq!(name, "id");
        assert!(constraints.is_empty());
    }

    #[test]
    fn catch_all_strips_markers() {
        let (name, _) = parse("{*path}").unwrap();
        assert_eq!(name, "path");
        let (name, _) = parse("{**path}").unwrap();
        assert_eq!(name, "path");
    }

    #[test]
    fn unterminated_constraint_fails() {
        assert!(parse("{id:min(1}").is_none());
        assert!(parse("{id").is_none());
    }
}
