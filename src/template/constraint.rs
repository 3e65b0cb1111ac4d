use crate::template::span::TemplateSpan;

/// One constraint token of a route parameter, e.g. `int`, `min(1)` or
/// `regex(^\d+$)`. Parenthesized arguments are captured opaquely; regex
/// bodies may contain `/`, `{` and `}` without affecting segment parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConstraint<'a> {
    pub span: TemplateSpan<'a>,
}

impl<'a> RouteConstraint<'a> {
    pub fn text(&self) -> &'a str {
        self.span.as_str()
    }

    /// The constraint keyword: the token text up to the opening paren. The
    /// synthetic optionality marker reports `?`.
    pub fn keyword(&self) -> &'a str {
        let text = self.text();
        match text.find('(') {
            Some(i) => &text[..i],
            None => text,
        }
    }

    /// The span of the argument text inside the parens, when present.
    pub fn argument(&self) -> Option<TemplateSpan<'a>> {
        let text = self.text();
        let open = text.find('(')?;
        if !text.ends_with(')') || text.len() <= open + 1 {
            return None;
        }
        Some(self.span.slice(open + 1, text.len() - 1))
    }
}

/// Reads one `:`-prefixed constraint starting at `pos` (span-relative).
///
/// Returns the constraint and the position of the terminator that stopped
/// it: the `:` of the next constraint or the closing `}` of the parameter.
/// An argument list is captured through its closing paren by searching for
/// whichever of `"):"` or `")}"` comes first; no terminator means the
/// template is malformed and the read fails.
pub fn try_read<'a>(
    span: &TemplateSpan<'a>,
    pos: usize,
) -> Option<(RouteConstraint<'a>, usize)> {
    if span.byte_at(pos) != Some(b':') {
        return None;
    }
    let start = pos + 1;
    let text = span.as_str().get(start..)?;
    let mut open = None;
    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'(' => {
                open = Some(i);
                break;
            }
            b':' | b'}' => {
                let constraint = RouteConstraint {
                    span: span.slice(start, start + i),
                };
                return Some((constraint, start + i));
            }
            _ => {}
        }
    }
    let open = open?;
    let rest = &text[open..];
    let close = match (rest.find("):"), rest.find(")}")) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    let end = start + open + close + 1;
    let constraint = RouteConstraint {
        span: span.slice(start, end),
    };
    Some((constraint, end))
}

#[cfg(test)]
mod tests {
    use super::try_read;
    use crate::template::literal::Literal;
    use crate::template::span::TemplateSpan;

    fn read_all(template: &str) -> Option<Vec<String>> {
        let token = format!("\"{template}\"");
        let literal = Literal::from_token(&token, 0).unwrap();
        let span = TemplateSpan::whole(&literal);
        let mut pos = span.index_of(':', 0)?;
        let mut out = Vec::new();
        loop {
            let (constraint, next) = try_read(&span, pos)?;
            out.push(constraint.text().to_string());
            if span.byte_at(next) == Some(b':') {
                pos = next;
            } else {
                break;
            }
        }
        Some(out)
    }

    #[test]
    fn reads_bare_and_parenthesized() {
        assert_eq!(read_all("{id:int}").unwrap(), vec!["int"]);
        assert_eq!(read_all("{id:min(1)}").unwrap(), vec!["min(1)"]);
        assert_eq!(
            read_all("{id:int:min(1):max(10)}").unwrap(),
            vec!["int", "min(1)", "max(10)"]
        );
    }

    #[test]
    fn regex_argument_is_opaque() {
        assert_eq!(
            read_all("{id:regex(^[a-z/{}]+$)}").unwrap(),
            vec!["regex(^[a-z/{}]+$)"]
        );
        assert_eq!(
            read_all("{id:regex(a,b):int}").unwrap(),
            vec!["regex(a,b)", "int"]
        );
    }

    #[test]
    fn runaway_paren_fails() {
        assert!(read_all("{id:min(1}").is_none());
    }

    #[test]
    fn requires_colon_at_position() {
        let literal = Literal::from_token("\"{id:int}\"", 0).unwrap();
        let span = TemplateSpan::whole(&literal);
        assert!(try_read(&span, 0).is_none());
    }
}
