use anyhow::Result;
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub no_ignore: bool,
}

impl ScanOptions {
    pub fn new(no_ignore: bool) -> Self {
        Self { no_ignore }
    }
}

const CSHARP_EXTENSIONS: &[&str] = &["cs", "csx"];

fn is_csharp(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| {
            CSHARP_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Cheap pre-filter before parsing: a file without any routing attribute
/// text has nothing for the analyzer to look at.
pub fn looks_routed(source: &str) -> bool {
    source.contains("[Route") || source.contains("[Http") || source.contains("Controller")
}

pub fn scan_repo(repo_root: &Path, options: ScanOptions) -> Result<Vec<ScannedFile>> {
    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(repo_root);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let walker = builder
        .hidden(false)
        .filter_entry(|entry| !is_ignored_entry(entry))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                eprintln!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if !is_csharp(path) {
            continue;
        }
        let rel_path = crate::util::normalize_rel_path(repo_root, path)?;
        files.push(ScannedFile {
            rel_path,
            abs_path: path.to_path_buf(),
        });
    }
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

fn is_ignored_entry(entry: &ignore::DirEntry) -> bool {
    match entry.file_name() {
        name if name == OsStr::new(".git") => true,
        name if name == OsStr::new("bin") => true,
        name if name == OsStr::new("obj") => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_csharp, looks_routed};
    use std::path::Path;

    #[test]
    fn extension_filter() {
        assert!(is_csharp(Path::new("Controllers/OrdersController.cs")));
        assert!(is_csharp(Path::new("script.CSX")));
        assert!(!is_csharp(Path::new("Program.fs")));
        assert!(!is_csharp(Path::new("README")));
    }

    #[test]
    fn routed_prefilter() {
        assert!(looks_routed("[Route(\"api\")] class C {}"));
        assert!(looks_routed("[HttpGet] void M() {}"));
        assert!(looks_routed("class OrdersController {}"));
        assert!(!looks_routed("class Repository {}"));
    }
}
