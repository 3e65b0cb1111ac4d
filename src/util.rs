use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path};

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

pub fn normalize_rel_path(repo_root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(repo_root).with_context(|| {
        format!(
            "strip prefix {} from {}",
            repo_root.display(),
            path.display()
        )
    })?;
    Ok(normalize_path(rel))
}

pub fn normalize_path(path: &Path) -> String {
    let mut parts = Vec::new();
    for comp in path.components() {
        match comp {
            Component::Normal(os) => parts.push(os.to_string_lossy().to_string()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir => {}
            _ => {}
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// One-based line and column for a byte offset.
pub fn line_col(source: &str, byte: usize) -> (usize, usize) {
    let byte = byte.min(source.len());
    let before = &source[..byte];
    let line = before.bytes().filter(|b| *b == b'\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(i) => byte - i,
        None => byte + 1,
    };
    (line, column)
}

pub fn truncate_str_bytes(value: &str, max_bytes: usize) -> String {
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes.min(value.len());
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

pub fn diagnostic_snippet(source: &str, start_byte: usize, end_byte: usize) -> Option<String> {
    if start_byte > end_byte || end_byte > source.len() {
        return None;
    }
    let raw = source.get(start_byte..end_byte)?;
    let mut out = String::new();
    let mut last_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    let trimmed = out.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(truncate_str_bytes(trimmed, 200))
    }
}

/// Splits on underscores and lower-to-upper case transitions, joins with
/// hyphens, lowercases. `MyOrders`, `my_orders` and `myOrders` all become
/// `my-orders`; an already kebab-cased segment is returned unchanged.
pub fn kebab_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 2);
    let mut prev_lower_or_digit = false;
    for ch in segment.chars() {
        if ch == '_' || ch == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            prev_lower_or_digit = false;
            continue;
        }
        if ch.is_ascii_uppercase() {
            if prev_lower_or_digit && !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(ch.to_ascii_lowercase());
            prev_lower_or_digit = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

/// Inverse of `kebab_case` as far as identifiers go: `my-orders` becomes
/// `MyOrders`.
pub fn pascal_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = true;
    for ch in segment.chars() {
        if ch == '-' || ch == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// True when `name` is usable as a plain C# identifier, which gates the
/// rename fixes: a suggested name that is not an identifier gets a
/// diagnostic without a fix payload.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::{is_identifier, kebab_case, line_col, pascal_case};

    #[test]
    fn line_col_basics() {
        let source = "ab\ncd\n";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 3), (2, 1));
        assert_eq!(line_col(source, 4), (2, 2));
    }

    #[test]
    fn kebab_and_pascal() {
        assert_eq!(kebab_case("MyOrders"), "my-orders");
        assert_eq!(kebab_case("my_orders"), "my-orders");
        assert_eq!(kebab_case("myOrders"), "my-orders");
        assert_eq!(kebab_case("orders"), "orders");
        assert_eq!(kebab_case("orders2Go"), "orders2-go");
        assert_eq!(pascal_case("my-orders"), "MyOrders");
        assert_eq!(pascal_case("orders"), "Orders");
    }

    #[test]
    fn identifier_check() {
        assert!(is_identifier("orderId"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("my-orders"));
        assert!(!is_identifier(""));
    }
}
