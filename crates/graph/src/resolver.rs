//! Cross-file resolution over analyzed structures.
//!
//! Both resolvers are purely textual: import paths are matched against
//! candidate file paths, and usages are matched by symbol name. Neither
//! ever fails; an empty result is a valid answer.

use crate::types::{
    CallerContext, EdgeKind, GraphEdge, Occurrence, SymbolKey, UsageGroup, UsageResolution,
};
use canvas_extractor::{
    file_name, FileStructure, FileStructureMap, LanguageId, ReferenceKind, Symbol, SymbolKind,
};
use indexmap::IndexMap;
use std::cmp::Reverse;

/// Produce one `imports` edge per import that matches a candidate file.
///
/// Files are visited in map order and imports in source order; the first
/// matching candidate (in candidate order, never the importing file) wins.
pub fn resolve_import_edges(structures: &FileStructureMap, candidates: &[String]) -> Vec<GraphEdge> {
    let matcher = CandidateMatcher::for_selection(structures);
    let mut edges = Vec::new();

    for (source, structure) in structures {
        for (ordinal, import) in structure.imports.iter().enumerate() {
            let stems = import_stems(import, structure.language);
            let target = candidates
                .iter()
                .filter(|candidate| *candidate != source)
                .find(|candidate| matcher.matches(candidate, import, &stems));

            match target {
                Some(target) => edges.push(GraphEdge {
                    id: format!("imports:{source}->{target}#{ordinal}"),
                    source: source.clone(),
                    target: target.clone(),
                    kind: EdgeKind::Imports,
                    label: Some(import.clone()),
                    origin: None,
                }),
                None => log::debug!("{source}: import '{import}' matches no candidate"),
            }
        }
    }

    edges
}

/// Extensions and index stems of every language in the selection
struct CandidateMatcher {
    extensions: Vec<&'static str>,
    index_stems: Vec<&'static str>,
}

impl CandidateMatcher {
    fn for_selection(structures: &FileStructureMap) -> Self {
        let mut languages: Vec<LanguageId> = Vec::new();
        for structure in structures.values() {
            if !languages.contains(&structure.language) {
                languages.push(structure.language);
            }
        }

        let mut extensions = Vec::new();
        let mut index_stems = Vec::new();
        for language in languages {
            for ext in language.extensions() {
                if !extensions.contains(ext) {
                    extensions.push(*ext);
                }
            }
            for stem in language.index_stems() {
                if !index_stems.contains(stem) {
                    index_stems.push(*stem);
                }
            }
        }

        Self {
            extensions,
            index_stems,
        }
    }

    fn matches(&self, candidate: &str, import: &str, stems: &[String]) -> bool {
        // `.` or `..` alone would match nearly every path
        if !import.chars().any(char::is_alphanumeric) {
            return false;
        }
        if candidate.contains(import) {
            return true;
        }

        let path = candidate.replace('\\', "/");
        let name = file_name(&path);
        stems.iter().any(|stem| {
            self.extensions.iter().any(|ext| {
                let file = format!("{stem}.{ext}");
                name == file
                    || ends_with_segment(&path, &file)
                    || self
                        .index_stems
                        .iter()
                        .any(|index| ends_with_segment(&path, &format!("{stem}/{index}.{ext}")))
            })
        })
    }
}

/// `path` ends with `tail` starting at a path-segment boundary
fn ends_with_segment(path: &str, tail: &str) -> bool {
    match path.strip_suffix(tail) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('/'),
        None => false,
    }
}

/// Normalized path stems an import may refer to
fn import_stems(import: &str, language: LanguageId) -> Vec<String> {
    let mut stems = Vec::new();

    match language {
        LanguageId::Python => {
            let stem = import.trim_start_matches('.').replace('.', "/");
            if !stem.is_empty() {
                stems.push(stem);
            }
        }
        LanguageId::Rust => {
            for path in expand_use_tree(import) {
                let mut path = path.as_str();
                while let Some(rest) = ["crate::", "self::", "super::"]
                    .iter()
                    .find_map(|prefix| path.strip_prefix(prefix))
                {
                    path = rest;
                }
                if matches!(path, "" | "crate" | "self" | "super") {
                    continue;
                }
                let stem = path.replace("::", "/");
                // `use a::b::Item` names an item inside module `a/b`
                let parent = stem.rsplit_once('/').map(|(parent, _)| parent.to_string());
                for stem in std::iter::once(stem).chain(parent) {
                    if !stems.contains(&stem) {
                        stems.push(stem);
                    }
                }
            }
        }
        _ => {
            let mut path = import;
            while let Some(rest) = path
                .strip_prefix("./")
                .or_else(|| path.strip_prefix("../"))
            {
                path = rest;
            }
            if !path.is_empty() {
                stems.push(path.to_string());
            }
        }
    }

    stems
}

/// Flatten a Rust use tree (`a::{b, c::{d, e}}`) into plain paths, dropping aliases
fn expand_use_tree(tree: &str) -> Vec<String> {
    let tree = tree.trim();
    let Some((head, rest)) = tree.split_once("::{") else {
        let path = tree.split(" as ").next().unwrap_or(tree).trim();
        return vec![path.to_string()];
    };
    let Some(group) = rest.strip_suffix('}') else {
        return vec![head.to_string()];
    };

    let mut paths = Vec::new();
    for item in split_top_level(group) {
        match item.trim() {
            "" => {}
            "self" => paths.push(head.to_string()),
            item => paths.extend(
                expand_use_tree(item)
                    .into_iter()
                    .map(|tail| format!("{head}::{tail}")),
            ),
        }
    }
    paths
}

/// Split on commas outside nested braces
fn split_top_level(group: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in group.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&group[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&group[start..]);
    items
}

/// Find every use of `symbol` across the candidate files.
///
/// Each match is attributed to the innermost function of its file whose
/// span contains the match line, or to the file itself. Groups keep the
/// order in which their first match was found.
pub fn resolve_symbol_usages(
    symbol: &Symbol,
    owner_file: &str,
    structures: &FileStructureMap,
    candidates: &[String],
) -> UsageResolution {
    let subject = SymbolKey::new(owner_file, symbol);
    let mut groups: IndexMap<(CallerContext, String), Vec<Occurrence>> = IndexMap::new();

    for candidate in candidates {
        let Some(structure) = structures.get(candidate) else {
            continue;
        };

        for occurrence in matching_occurrences(symbol, structure) {
            let context = enclosing_function(structure, occurrence.line)
                .map(|function| CallerContext::Function {
                    name: function.name.clone(),
                    start_line: function.start_line,
                })
                .unwrap_or(CallerContext::File);
            groups
                .entry((context, candidate.clone()))
                .or_default()
                .push(occurrence);
        }
    }

    let groups: Vec<UsageGroup> = groups
        .into_iter()
        .map(|((context, file), occurrences)| UsageGroup {
            context,
            file,
            occurrences,
        })
        .collect();

    log::debug!(
        "Resolved {} usage groups for {}",
        groups.len(),
        subject
    );

    UsageResolution { subject, groups }
}

/// Facts in `structure` that use `symbol`, in source order
fn matching_occurrences(symbol: &Symbol, structure: &FileStructure) -> Vec<Occurrence> {
    let references = |accepts: fn(ReferenceKind) -> bool| -> Vec<Occurrence> {
        structure
            .symbol_references
            .iter()
            .filter(|reference| {
                reference.symbol_name == symbol.name && accepts(reference.reference_kind)
            })
            .map(|reference| Occurrence {
                line: reference.line,
                column: reference.column,
            })
            .collect()
    };

    match symbol.kind {
        SymbolKind::Function => structure
            .call_sites
            .iter()
            .filter(|call| call.callee_name == symbol.name)
            .map(|call| Occurrence {
                line: call.line,
                column: call.column,
            })
            .collect(),
        SymbolKind::Class => references(|kind| {
            matches!(kind, ReferenceKind::Instantiation | ReferenceKind::Inheritance)
        }),
        SymbolKind::Interface | SymbolKind::Type => {
            references(|kind| kind == ReferenceKind::Usage)
        }
        SymbolKind::Variable => Vec::new(),
    }
}

/// Innermost function spanning `line`: latest start, then earliest end
fn enclosing_function(structure: &FileStructure, line: usize) -> Option<&Symbol> {
    structure
        .symbols_of(SymbolKind::Function)
        .filter(|function| function.spans_line(line))
        .max_by_key(|function| {
            (
                function.start_line,
                Reverse(function.end_line.unwrap_or(usize::MAX)),
            )
        })
}
