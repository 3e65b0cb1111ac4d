#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Regular,
    Verbatim,
    Raw,
}

/// One route-template string token lifted out of the syntax tree.
///
/// Keeps the raw source text and the unescaped value text side by side so
/// that offsets into the value text can be mapped back to file byte offsets.
/// The mapping differs per escaping dialect: a regular literal spends two or
/// more raw bytes per escaped character, a verbatim literal spends two raw
/// bytes per doubled quote, a raw literal maps one to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    kind: LiteralKind,
    raw: String,
    value: String,
    token_start: usize,
    content_offset: usize,
    // byte_map[i] is the offset into the raw content of the raw character
    // that produced value byte i; byte_map[value.len()] is the raw content
    // length, so half-open value ranges translate to half-open raw ranges.
    byte_map: Vec<usize>,
}

impl Literal {
    /// Builds a literal from the exact token text (quotes included) and the
    /// token's byte offset in the file. Returns `None` for token text that
    /// is not a string literal shape we understand.
    pub fn from_token(raw: &str, token_start: usize) -> Option<Literal> {
        if let Some(rest) = raw.strip_prefix("@\"") {
            let inner = rest.strip_suffix('"')?;
            let (value, byte_map) = unescape_verbatim(inner);
            return Some(Literal {
                kind: LiteralKind::Verbatim,
                raw: raw.to_string(),
                value,
                token_start,
                content_offset: 2,
                byte_map,
            });
        }
        let quote_count = raw.chars().take_while(|ch| *ch == '"').count();
        if quote_count >= 3 {
            if raw.len() < quote_count * 2 || !raw.ends_with(&"\"".repeat(quote_count)) {
                return None;
            }
            let inner = &raw[quote_count..raw.len() - quote_count];
            let byte_map = (0..=inner.len()).collect();
            return Some(Literal {
                kind: LiteralKind::Raw,
                raw: raw.to_string(),
                value: inner.to_string(),
                token_start,
                content_offset: quote_count,
                byte_map,
            });
        }
        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            let inner = &raw[1..raw.len() - 1];
            let (value, byte_map) = unescape_regular(inner);
            return Some(Literal {
                kind: LiteralKind::Regular,
                raw: raw.to_string(),
                value,
                token_start,
                content_offset: 1,
                byte_map,
            });
        }
        None
    }

    pub fn kind(&self) -> LiteralKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn token_start(&self) -> usize {
        self.token_start
    }

    pub fn token_range(&self) -> (usize, usize) {
        (self.token_start, self.token_start + self.raw.len())
    }

    /// Maps a half-open range over the value text to file byte offsets.
    pub fn source_range(&self, start: usize, end: usize) -> (usize, usize) {
        assert!(start <= end && end <= self.value.len());
        let base = self.token_start + self.content_offset;
        (base + self.byte_map[start], base + self.byte_map[end])
    }

    /// The raw source text behind a value-text range.
    pub fn raw_slice(&self, start: usize, end: usize) -> &str {
        assert!(start <= end && end <= self.value.len());
        let from = self.content_offset + self.byte_map[start];
        let to = self.content_offset + self.byte_map[end];
        &self.raw[from..to]
    }
}

fn unescape_verbatim(inner: &str) -> (String, Vec<usize>) {
    let mut value = String::new();
    let mut map = Vec::new();
    let bytes = inner.as_bytes();
    let mut i = 0;
    while i < inner.len() {
        if bytes[i] == b'"' && i + 1 < inner.len() && bytes[i + 1] == b'"' {
            map.push(i);
            value.push('"');
            i += 2;
            continue;
        }
        let ch = inner[i..].chars().next().unwrap_or('\u{fffd}');
        for _ in 0..ch.len_utf8() {
            map.push(i);
        }
        value.push(ch);
        i += ch.len_utf8();
    }
    map.push(inner.len());
    (value, map)
}

fn unescape_regular(inner: &str) -> (String, Vec<usize>) {
    let mut value = String::new();
    let mut map = Vec::new();
    let bytes = inner.as_bytes();
    let mut i = 0;
    while i < inner.len() {
        let raw_start = i;
        let ch = if bytes[i] == b'\\' && i + 1 < inner.len() {
            let (decoded, width) = decode_escape(&inner[i..]);
            i += width;
            decoded
        } else {
            let ch = inner[i..].chars().next().unwrap_or('\u{fffd}');
            i += ch.len_utf8();
            ch
        };
        for _ in 0..ch.len_utf8() {
            map.push(raw_start);
        }
        value.push(ch);
    }
    map.push(inner.len());
    (value, map)
}

// Unrecognized escapes keep the backslash as a literal character so that
// malformed input still produces a value text the rules can inspect; the
// compiler-level error is not ours to report.
fn decode_escape(rest: &str) -> (char, usize) {
    let bytes = rest.as_bytes();
    match bytes[1] {
        b'\\' => ('\\', 2),
        b'"' => ('"', 2),
        b'\'' => ('\'', 2),
        b'0' => ('\0', 2),
        b'a' => ('\u{7}', 2),
        b'b' => ('\u{8}', 2),
        b'f' => ('\u{c}', 2),
        b'n' => ('\n', 2),
        b'r' => ('\r', 2),
        b't' => ('\t', 2),
        b'v' => ('\u{b}', 2),
        b'u' => decode_hex(rest, 2, 4).unwrap_or(('\\', 1)),
        b'U' => decode_hex(rest, 2, 8).unwrap_or(('\\', 1)),
        b'x' => decode_hex_variable(rest).unwrap_or(('\\', 1)),
        _ => ('\\', 1),
    }
}

fn decode_hex(rest: &str, offset: usize, digits: usize) -> Option<(char, usize)> {
    let hex = rest.get(offset..offset + digits)?;
    let code = u32::from_str_radix(hex, 16).ok()?;
    Some((char::from_u32(code)?, offset + digits))
}

fn decode_hex_variable(rest: &str) -> Option<(char, usize)> {
    let bytes = rest.as_bytes();
    let mut end = 2;
    while end < rest.len() && end < 6 && bytes[end].is_ascii_hexdigit() {
        end += 1;
    }
    if end == 2 {
        return None;
    }
    let code = u32::from_str_radix(&rest[2..end], 16).ok()?;
    Some((char::from_u32(code)?, end))
}
