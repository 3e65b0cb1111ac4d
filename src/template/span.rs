use crate::template::literal::Literal;

/// A window over a literal's value text.
///
/// `start` and `end` are absolute byte offsets into the value text; every
/// index taken or returned by the string operations below is relative to the
/// span. Spans are plain values: many spans may reference one literal, and
/// two spans over equal literals with equal offsets compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSpan<'a> {
    literal: &'a Literal,
    start: usize,
    end: usize,
}

impl<'a> TemplateSpan<'a> {
    pub fn whole(literal: &'a Literal) -> TemplateSpan<'a> {
        TemplateSpan {
            literal,
            start: 0,
            end: literal.value().len(),
        }
    }

    pub fn literal(&self) -> &'a Literal {
        self.literal
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_str(&self) -> &'a str {
        &self.literal.value()[self.start..self.end]
    }

    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.as_str().as_bytes().get(index).copied()
    }

    pub fn index_of(&self, needle: char, from: usize) -> Option<usize> {
        self.as_str().get(from..)?.find(needle).map(|i| i + from)
    }

    pub fn index_of_str(&self, needle: &str, from: usize) -> Option<usize> {
        self.as_str().get(from..)?.find(needle).map(|i| i + from)
    }

    pub fn last_index_of(&self, needle: char) -> Option<usize> {
        self.as_str().rfind(needle)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.as_str().ends_with(suffix)
    }

    pub fn equals(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// Narrows the span to `[start, end)` in span-relative coordinates.
    /// Out-of-contract indices are a programming error, not malformed input,
    /// so this panics rather than recovering.
    pub fn slice(&self, start: usize, end: usize) -> TemplateSpan<'a> {
        assert!(start <= end && end <= self.len());
        TemplateSpan {
            literal: self.literal,
            start: self.start + start,
            end: self.start + end,
        }
    }

    pub fn substring(&self, index: usize, len: usize) -> TemplateSpan<'a> {
        self.slice(index, index + len)
    }

    /// File byte offsets of the span, accounting for the literal's escaping
    /// dialect.
    pub fn source_range(&self) -> (usize, usize) {
        self.literal.source_range(self.start, self.end)
    }

    /// The raw source text behind the span.
    pub fn raw_text(&self) -> &'a str {
        self.literal.raw_slice(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::TemplateSpan;
    use crate::template::literal::Literal;

    fn literal(text: &str) -> Literal {
        Literal::from_token(&format!("\"{text}\""), 0).unwrap()
    }

    #[test]
    fn relative_search_and_slice() {
        let lit = literal("api/orders/{id}");
        let span = TemplateSpan::whole(&lit);
        assert_eq!(span.index_of('/', 0), Some(3));
        assert_eq!(span.index_of('/', 4), Some(10));
        assert_eq!(span.last_index_of('{'), Some(11));

        let tail = span.slice(4, span.len());
        assert_eq!(tail.as_str(), "orders/{id}");
        assert_eq!(tail.index_of('/', 0), Some(6));
        assert_eq!(tail.substring(0, 6).as_str(), "orders");
    }

    #[test]
    fn spans_compare_structurally() {
        let lit = literal("api/orders");
        let a = TemplateSpan::whole(&lit).slice(0, 3);
        let b = TemplateSpan::whole(&lit).slice(0, 3);
        assert_eq!(a, b);
        assert_ne!(a, TemplateSpan::whole(&lit).slice(0, 4));
    }

    #[test]
    #[should_panic]
    fn slice_past_end_panics() {
        let lit = literal("abc");
        let span = TemplateSpan::whole(&lit);
        let _ = span.slice(1, 4);
    }

    #[test]
    fn source_range_offsets_by_quote() {
        let lit = literal("api/orders");
        let span = TemplateSpan::whole(&lit).slice(4, 10);
        assert_eq!(span.source_range(), (5, 11));
        assert_eq!(span.raw_text(), "orders");
    }
}
