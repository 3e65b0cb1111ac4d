//! Applies the fixes carried by diagnostics to a file's source text.
//!
//! Text replacements are applied back-to-front so earlier offsets stay
//! valid; overlapping edits on the same region are skipped rather than
//! guessed at. Symbol renames are lowered to text edits first by walking
//! the syntax tree for identifier occurrences inside the fix's scope, so a
//! parameter rename updates body references in the same pass.

use crate::diagnostics::{Diagnostic, Fix};
use anyhow::Result;
use tree_sitter::{Node, Parser};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextEdit {
    start: usize,
    end: usize,
    replacement: String,
}

#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub source: String,
    pub applied: usize,
    pub skipped: usize,
}

pub struct FixEngine {
    parser: Parser,
}

impl FixEngine {
    pub fn new() -> Result<FixEngine> {
        let mut parser = Parser::new();
        let language = tree_sitter_c_sharp::LANGUAGE;
        parser.set_language(&language.into())?;
        Ok(FixEngine { parser })
    }

    /// Applies every fix from `diagnostics` to `source`. All edits are
    /// computed against the original text; the count of diagnostics whose
    /// edits were dropped for overlapping an already-accepted edit comes
    /// back in `skipped`.
    pub fn apply(&mut self, source: &str, diagnostics: &[Diagnostic]) -> Result<FixOutcome> {
        let mut groups: Vec<Vec<TextEdit>> = Vec::new();
        for diag in diagnostics {
            match &diag.fix {
                Some(Fix::ReplaceText {
                    start_byte,
                    end_byte,
                    replacement,
                }) => {
                    groups.push(vec![TextEdit {
                        start: *start_byte,
                        end: *end_byte,
                        replacement: replacement.clone(),
                    }]);
                }
                Some(Fix::RenameSymbol {
                    name,
                    new_name,
                    scope_start,
                    scope_end,
                }) => {
                    let edits =
                        self.rename_edits(source, name, new_name, (*scope_start, *scope_end));
                    if !edits.is_empty() {
                        groups.push(edits);
                    }
                }
                None => {}
            }
        }
        Ok(apply_groups(source, groups))
    }

    // One rename produces one edit per identifier occurrence; they never
    // overlap each other because identifier nodes are disjoint.
    fn rename_edits(
        &mut self,
        source: &str,
        name: &str,
        new_name: &str,
        scope: (usize, usize),
    ) -> Vec<TextEdit> {
        let Some(tree) = self.parser.parse(source, None) else {
            return Vec::new();
        };
        let mut edits = Vec::new();
        collect_identifiers(tree.root_node(), source, name, scope, &mut edits, new_name);
        edits
    }
}

fn collect_identifiers(
    node: Node<'_>,
    source: &str,
    name: &str,
    scope: (usize, usize),
    edits: &mut Vec<TextEdit>,
    new_name: &str,
) {
    if node.end_byte() <= scope.0 || node.start_byte() >= scope.1 {
        return;
    }
    if node.kind() == "identifier" && &source[node.byte_range()] == name {
        edits.push(TextEdit {
            start: node.start_byte(),
            end: node.end_byte(),
            replacement: new_name.to_string(),
        });
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_identifiers(child, source, name, scope, edits, new_name);
    }
}

// Edits are grouped per diagnostic: a group is accepted or dropped as a
// whole, so a half-applied rename can never happen.
fn apply_groups(source: &str, mut groups: Vec<Vec<TextEdit>>) -> FixOutcome {
    groups.retain(|g| !g.is_empty());
    groups.sort_by_key(|g| g.iter().map(|e| e.start).min().unwrap_or(0));

    let mut accepted: Vec<TextEdit> = Vec::new();
    let mut applied = 0;
    let mut skipped = 0;
    for group in groups {
        let in_bounds = group
            .iter()
            .all(|e| e.start <= e.end && e.end <= source.len());
        let overlaps = group.iter().any(|e| {
            accepted
                .iter()
                .any(|a| e.start < a.end && a.start < e.end)
        });
        if !in_bounds || overlaps {
            skipped += 1;
            continue;
        }
        accepted.extend(group);
        applied += 1;
    }

    accepted.sort_by(|a, b| b.start.cmp(&a.start));
    let mut out = source.to_string();
    for edit in &accepted {
        out.replace_range(edit.start..edit.end, &edit.replacement);
    }
    FixOutcome {
        source: out,
        applied,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::{TextEdit, apply_groups};

    #[test]
    fn edits_apply_back_to_front() {
        let outcome = apply_groups(
            "api/Orders/{id}",
            vec![
                vec![TextEdit {
                    start: 4,
                    end: 10,
                    replacement: "orders".to_string(),
                }],
                vec![TextEdit {
                    start: 12,
                    end: 14,
                    replacement: "orderId".to_string(),
                }],
            ],
        );
        assert_eq!(outcome.source, "api/orders/{orderId}");
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn overlapping_group_is_skipped_whole() {
        let outcome = apply_groups(
            "abcdef",
            vec![
                vec![TextEdit {
                    start: 0,
                    end: 4,
                    replacement: "x".to_string(),
                }],
                vec![
                    TextEdit {
                        start: 2,
                        end: 3,
                        replacement: "y".to_string(),
                    },
                    TextEdit {
                        start: 5,
                        end: 6,
                        replacement: "z".to_string(),
                    },
                ],
            ],
        );
        assert_eq!(outcome.source, "xef");
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn out_of_bounds_edit_is_skipped() {
        let outcome = apply_groups(
            "short",
            vec![vec![TextEdit {
                start: 2,
                end: 99,
                replacement: "x".to_string(),
            }]],
        );
        assert_eq!(outcome.source, "short");
        assert_eq!(outcome.skipped, 1);
    }
}
