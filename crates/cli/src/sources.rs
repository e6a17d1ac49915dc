use anyhow::{bail, Result};
use canvas_extractor::LanguageId;
use ignore::{DirEntry, WalkBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "dist", "build", "__pycache__"];

/// A file selected for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Location on disk
    pub path: PathBuf,
    /// Key in reports and import matching: relative to the walked directory,
    /// or the path as given for files named explicitly
    pub key: String,
}

/// Expand the command-line paths into a list of sources sorted by key.
///
/// Directories are walked recursively (hidden and `.gitignore`d entries
/// skipped) and only files with a grammar-backed extension are kept; files
/// named explicitly are always kept. A file reached twice is listed once.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_file() {
            sources.push(SourceFile {
                path: path.clone(),
                key: display_path(path),
            });
        } else if path.is_dir() {
            let mut builder = WalkBuilder::new(path);
            builder
                .hidden(true)
                .git_ignore(true)
                .git_global(false)
                .git_exclude(true)
                .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

            for result in builder.build() {
                let entry = match result {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("Failed to read entry: {e}");
                        continue;
                    }
                };
                let is_file = entry.file_type().is_some_and(|file_type| file_type.is_file());
                if !is_file || !has_grammar(entry.path()) {
                    continue;
                }
                let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
                let key = display_path(relative);
                sources.push(SourceFile {
                    path: entry.into_path(),
                    key,
                });
            }
        } else {
            bail!("Path not found: {}", path.display());
        }
    }

    sources.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.path.cmp(&b.path)));
    let mut seen = HashSet::new();
    sources.retain(|source| seen.insert(source.path.clone()));
    log::debug!("Collected {} source files", sources.len());
    Ok(sources)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_some_and(|file_type| file_type.is_dir()) {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)
}

fn has_grammar(path: &Path) -> bool {
    LanguageId::from_path(path).is_some_and(LanguageId::has_grammar)
}

/// Path as shown in reports and matched by the resolver: `/`-separated, no leading `./`
pub fn display_path(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    let mut text = text.as_str();
    while let Some(rest) = text.strip_prefix("./") {
        text = rest;
    }
    text.to_string()
}
