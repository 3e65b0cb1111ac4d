use crate::template::literal::Literal;
use crate::template::parameter::{self, TemplateParameter};
use crate::template::span::TemplateSpan;

/// One `/`-delimited unit of a route template. A segment that opens with
/// `{` carries the parsed parameter when its interior parses; parameter
/// syntax that fails to parse keeps the span and reports `None`, which the
/// syntax rule picks up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment<'a> {
    pub span: TemplateSpan<'a>,
    pub parameter: Option<TemplateParameter<'a>>,
}

impl<'a> PathSegment<'a> {
    pub fn is_parameter_syntax(&self) -> bool {
        self.span.starts_with("{")
    }

    pub fn text(&self) -> &'a str {
        self.span.as_str()
    }
}

/// Reads the next segment starting at `pos` (an absolute offset into the
/// literal's value text) and returns it with the offset where the next read
/// should start.
///
/// At position zero a leading `~/`, `~` or `/` is skipped; afterwards a
/// single `/` separator is consumed per call. A `{`-opened segment ends at
/// the first `"}/"` (a closing brace immediately followed by a separator),
/// which lets constraint arguments contain `/` freely; without that
/// terminator the segment runs to end of string. Returns `None` only when
/// called at or past the end with nothing left to skip.
pub fn try_read<'a>(literal: &'a Literal, pos: usize) -> Option<(PathSegment<'a>, usize)> {
    let span = TemplateSpan::whole(literal);
    let len = span.len();
    let mut p = pos;
    if p == 0 {
        if span.starts_with("~/") {
            p = 2;
        } else if span.starts_with("~") || span.starts_with("/") {
            p = 1;
        }
    } else if span.byte_at(p) == Some(b'/') {
        p += 1;
    }
    if p > len {
        return None;
    }
    if p == len {
        if p > pos {
            // A trailing separator was consumed; the last segment is empty.
            let segment = PathSegment {
                span: span.slice(p, p),
                parameter: None,
            };
            return Some((segment, p));
        }
        return None;
    }

    let seg_span = if span.byte_at(p) == Some(b'{') {
        match span.index_of_str("}/", p) {
            Some(i) => span.slice(p, i + 1),
            None => span.slice(p, len),
        }
    } else {
        match span.index_of('/', p) {
            Some(i) => span.slice(p, i),
            None => span.slice(p, len),
        }
    };
    let next = seg_span.end();
    let parameter = if seg_span.starts_with("{") {
        parameter::try_parse(&seg_span)
    } else {
        None
    };
    Some((
        PathSegment {
            span: seg_span,
            parameter,
        },
        next,
    ))
}

#[cfg(test)]
mod tests {
    use super::try_read;
    use crate::template::literal::Literal;

    fn segments(template: &str) -> Vec<String> {
        let token = format!("\"{template}\"");
        let literal = Literal::from_token(&token, 0).unwrap();
        let mut out = Vec::new();
        let mut pos = 0;
        while let Some((segment, next)) = try_read(&literal, pos) {
            out.push(segment.text().to_string());
            pos = next;
        }
        out
    }

    #[test]
    fn splits_on_separators() {
        assert_eq!(segments("api/orders/{id}"), vec!["api", "orders", "{id}"]);
    }

    #[test]
    fn strips_leading_tilde_and_slash() {
        assert_eq!(segments("~/api/orders"), vec!["api", "orders"]);
        assert_eq!(segments("/api"), vec!["api"]);
        assert_eq!(segments("~x"), vec!["x"]);
    }

    #[test]
    fn parameter_segment_may_contain_slash() {
        assert_eq!(
            segments("api/{id:regex(a/b)}/rest"),
            vec!["api", "{id:regex(a/b)}", "rest"]
        );
    }

    #[test]
    fn unterminated_parameter_runs_to_end() {
        let literal = Literal::from_token("\"api/{id\"", 0).unwrap();
        let (first, next) = try_read(&literal, 0).unwrap();
        assert_eq!(first.text(), "api");
        let (second, _) = try_read(&literal, next).unwrap();
        assert_eq!(second.text(), "{id");
        assert!(second.is_parameter_syntax());
        assert!(second.parameter.is_none());
    }

    #[test]
    fn trailing_slash_yields_empty_segment() {
        assert_eq!(segments("api/"), vec!["api", ""]);
    }
}
