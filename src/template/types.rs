//! The constraint-to-type inference table: maps well-known constraint
//! keywords to the parameter type they imply, and normalizes declared C#
//! type text for comparison.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintCategory {
    /// Determines the parameter type outright.
    Type(&'static str),
    /// Confirms a string-compatible parameter without constraining the type.
    StringLike,
    /// Numeric bound without an explicit width; defaults to `long` because
    /// the constraint alone cannot express the width.
    NumericRange,
    Required,
    Optional,
    Unknown,
}

const TYPE_CONSTRAINTS: &[(&str, &str)] = &[
    ("int", "int"),
    ("bool", "bool"),
    ("datetime", "DateTime"),
    ("decimal", "decimal"),
    ("double", "double"),
    ("float", "float"),
    ("guid", "Guid"),
    ("long", "long"),
];

const STRING_CONSTRAINTS: &[&str] = &["minlength", "maxlength", "length", "alpha", "regex"];
const RANGE_CONSTRAINTS: &[&str] = &["min", "max", "range"];

pub fn categorize(keyword: &str) -> ConstraintCategory {
    if keyword == "?" {
        return ConstraintCategory::Optional;
    }
    let lower = keyword.to_ascii_lowercase();
    for (name, ty) in TYPE_CONSTRAINTS {
        if *name == lower {
            return ConstraintCategory::Type(ty);
        }
    }
    if STRING_CONSTRAINTS.contains(&lower.as_str()) {
        return ConstraintCategory::StringLike;
    }
    if RANGE_CONSTRAINTS.contains(&lower.as_str()) {
        return ConstraintCategory::NumericRange;
    }
    if lower == "required" {
        return ConstraintCategory::Required;
    }
    ConstraintCategory::Unknown
}

/// What the constraint list says about the parameter's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inference {
    /// No type-determining constraint; any string-compatible type passes.
    None,
    /// A single type-determining constraint names the type.
    Expected(&'static str),
    /// Only width-less numeric bounds; any integer type passes, `long` is
    /// the suggested correction.
    Integer,
    /// More than one type-determining constraint; the conflicting keywords
    /// are reported and no type is chosen.
    Conflict(Vec<String>),
}

pub fn infer(keywords: &[String]) -> Inference {
    let mut types: Vec<&'static str> = Vec::new();
    let mut conflict_tokens: Vec<String> = Vec::new();
    let mut has_range = false;
    for keyword in keywords {
        match categorize(keyword) {
            ConstraintCategory::Type(ty) => {
                if !types.contains(&ty) {
                    types.push(ty);
                    conflict_tokens.push(keyword.to_ascii_lowercase());
                }
            }
            ConstraintCategory::NumericRange => has_range = true,
            _ => {}
        }
    }
    match types.len() {
        0 if has_range => Inference::Integer,
        0 => Inference::None,
        1 => Inference::Expected(types[0]),
        _ => Inference::Conflict(conflict_tokens),
    }
}

/// A declared parameter type reduced to its canonical C# alias with
/// nullability split off. `Int32`, `System.Int32`, `int?` and
/// `Nullable<int>` all reduce to core `int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub core: String,
    pub nullable: bool,
}

pub fn parse_declared(text: &str) -> DeclaredType {
    let mut t = text.trim();
    let mut nullable = false;
    if let Some(stripped) = t.strip_suffix('?') {
        nullable = true;
        t = stripped.trim_end();
    }
    if let Some(inner) = strip_nullable_wrapper(t) {
        nullable = true;
        t = inner;
    }
    let t = t.strip_prefix("System.").unwrap_or(t);
    let core = match t {
        "Int32" => "int",
        "Int64" => "long",
        "Int16" => "short",
        "Byte" => "byte",
        "Boolean" => "bool",
        "Single" => "float",
        "Double" => "double",
        "Decimal" => "decimal",
        "String" => "string",
        "Object" => "object",
        other => other,
    };
    DeclaredType {
        core: core.to_string(),
        nullable,
    }
}

fn strip_nullable_wrapper(text: &str) -> Option<&str> {
    let inner = text
        .strip_prefix("System.Nullable<")
        .or_else(|| text.strip_prefix("Nullable<"))?;
    inner.strip_suffix('>').map(str::trim)
}

pub fn is_string_like(core: &str) -> bool {
    core == "string" || core == "object"
}

const INTEGER_TYPES: &[&str] = &[
    "sbyte", "byte", "short", "ushort", "int", "uint", "long", "ulong",
];

pub fn is_integer(core: &str) -> bool {
    INTEGER_TYPES.contains(&core)
}

#[cfg(test)]
mod tests {
    use super::{DeclaredType, Inference, infer, is_string_like, parse_declared};

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn type_constraints_win() {
        assert_eq!(infer(&keywords(&["int"])), Inference::Expected("int"));
        assert_eq!(infer(&keywords(&["guid"])), Inference::Expected("Guid"));
        assert_eq!(
            infer(&keywords(&["int", "min", "max"])),
            Inference::Expected("int")
        );
    }

    #[test]
    fn range_without_width_defaults_to_integer() {
        assert_eq!(infer(&keywords(&["min", "range"])), Inference::Integer);
    }

    #[test]
    fn string_constraints_imply_nothing() {
        assert_eq!(infer(&keywords(&["alpha", "minlength"])), Inference::None);
        assert_eq!(infer(&keywords(&[])), Inference::None);
    }

    #[test]
    fn conflicting_types_are_reported() {
        match infer(&keywords(&["int", "guid"])) {
            Inference::Conflict(tokens) => assert_eq!(tokens, vec!["int", "guid"]),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn declared_type_normalization() {
        assert_eq!(
            parse_declared("System.Int32"),
            DeclaredType {
                core: "int".to_string(),
                nullable: false
            }
        );
        assert_eq!(
            parse_declared("int?"),
            DeclaredType {
                core: "int".to_string(),
                nullable: true
            }
        );
        assert_eq!(
            parse_declared("Nullable<long>"),
            DeclaredType {
                core: "long".to_string(),
                nullable: true
            }
        );
        assert!(is_string_like(&parse_declared("String").core));
    }
}
