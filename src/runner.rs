//! Repository-level driver: walks the repo, analyzes each C# file and, for
//! the fix command, writes the corrected text back.

use crate::analyzer::{CancelFlag, RouteAnalyzer};
use crate::diagnostics::Diagnostic;
use crate::fixes::FixEngine;
use crate::rules::RuleSet;
use crate::scan::{self, ScanOptions};
use crate::util;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn check_repo(
    repo_root: &Path,
    options: ScanOptions,
    rules: &RuleSet,
    cancel: &CancelFlag,
) -> Result<Vec<Diagnostic>> {
    let mut analyzer = RouteAnalyzer::new()?;
    let mut diagnostics = Vec::new();
    for file in scan::scan_repo(repo_root, options)? {
        if cancel.is_cancelled() {
            break;
        }
        let source = match util::read_to_string(&file.abs_path) {
            Ok(value) => value,
            Err(err) => {
                eprintln!("skip {}: {err}", file.rel_path);
                continue;
            }
        };
        if !scan::looks_routed(&source) {
            continue;
        }
        diagnostics.extend(analyzer.analyze(&file.rel_path, &source, rules, cancel)?);
    }
    Ok(diagnostics)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FixSummary {
    pub files_changed: usize,
    pub fixes_applied: usize,
    pub fixes_skipped: usize,
}

pub fn fix_repo(
    repo_root: &Path,
    options: ScanOptions,
    rules: &RuleSet,
    dry_run: bool,
    cancel: &CancelFlag,
) -> Result<FixSummary> {
    let mut analyzer = RouteAnalyzer::new()?;
    let mut engine = FixEngine::new()?;
    let mut summary = FixSummary::default();
    for file in scan::scan_repo(repo_root, options)? {
        if cancel.is_cancelled() {
            break;
        }
        let source = match util::read_to_string(&file.abs_path) {
            Ok(value) => value,
            Err(err) => {
                eprintln!("skip {}: {err}", file.rel_path);
                continue;
            }
        };
        if !scan::looks_routed(&source) {
            continue;
        }
        let diagnostics = analyzer.analyze(&file.rel_path, &source, rules, cancel)?;
        if diagnostics.iter().all(|d| d.fix.is_none()) {
            continue;
        }
        let outcome = engine.apply(&source, &diagnostics)?;
        summary.fixes_applied += outcome.applied;
        summary.fixes_skipped += outcome.skipped;
        if outcome.source == source {
            continue;
        }
        summary.files_changed += 1;
        if dry_run {
            println!("would fix {} ({} edits)", file.rel_path, outcome.applied);
        } else {
            fs::write(&file.abs_path, outcome.source)
                .with_context(|| format!("write {}", file.rel_path))?;
            println!("fixed {} ({} edits)", file.rel_path, outcome.applied);
        }
    }
    Ok(summary)
}
