//! Session-scoped grammar cache.
//!
//! Each grammar-bearing language owns one `OnceCell`. The first `load` for a
//! language initializes it; concurrent first loads block on the same cell, so
//! a grammar is loaded at most once per registry. There is no eviction.

use crate::error::{ExtractorError, Result};
use crate::language::LanguageId;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A loaded tree-sitter grammar for one language
#[derive(Clone)]
pub struct Grammar {
    language: LanguageId,
    inner: tree_sitter::Language,
}

impl Grammar {
    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub(crate) fn tree_sitter(&self) -> &tree_sitter::Language {
        &self.inner
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("language", &self.language)
            .field("abi_version", &self.inner.version())
            .finish()
    }
}

/// Load-or-get cache of grammars
pub struct GrammarRegistry {
    slots: Vec<(LanguageId, OnceCell<Grammar>)>,
    loads: AtomicUsize,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        let slots = LanguageId::ALL
            .into_iter()
            .filter(|language| language.has_grammar())
            .map(|language| (language, OnceCell::new()))
            .collect();

        Self {
            slots,
            loads: AtomicUsize::new(0),
        }
    }

    /// Return the grammar for `language`, loading it on first use
    pub fn load(&self, language: LanguageId) -> Result<Grammar> {
        let cell = self
            .slots
            .iter()
            .find(|(slot_language, _)| *slot_language == language)
            .map(|(_, cell)| cell)
            .ok_or_else(|| ExtractorError::unsupported_language(language.as_str()))?;

        cell.get_or_try_init(|| {
            let inner = language.tree_sitter_language()?;
            self.loads.fetch_add(1, Ordering::SeqCst);
            log::debug!("Loaded {} grammar (ABI {})", language, inner.version());
            Ok(Grammar { language, inner })
        })
        .cloned()
    }

    /// Whether the grammar for `language` is already cached
    pub fn is_loaded(&self, language: LanguageId) -> bool {
        self.slots
            .iter()
            .any(|(slot_language, cell)| *slot_language == language && cell.get().is_some())
    }

    /// Number of grammar loads performed by this registry
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::new()
    }
}
