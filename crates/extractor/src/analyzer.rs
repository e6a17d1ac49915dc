use crate::config::AnalyzerConfig;
use crate::error::{ExtractorError, Result};
use crate::extractor::FactExtractor;
use crate::language::LanguageId;
use crate::registry::GrammarRegistry;
use crate::session::ParserSession;
use crate::types::{FileStructure, FileStructureMap};
use std::sync::Arc;

/// Outcome of analyzing a list of files
#[derive(Debug, Default)]
pub struct BatchAnalysis {
    /// Successfully analyzed files, in input order
    pub structures: FileStructureMap,
    /// Skipped files with the reason, in input order
    pub failures: Vec<(String, ExtractorError)>,
}

/// Per-file pipeline: detect language, parse, extract facts
pub struct Analyzer {
    config: AnalyzerConfig,
    session: ParserSession,
    extractor: FactExtractor,
}

impl Analyzer {
    /// Create an analyzer with its own grammar registry
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Self::with_registry(config, Arc::new(GrammarRegistry::new()))
    }

    /// Create an analyzer sharing an existing grammar registry
    pub fn with_registry(config: AnalyzerConfig, registry: Arc<GrammarRegistry>) -> Result<Self> {
        config.validate()?;
        let extractor = FactExtractor::with_config(&config);
        Ok(Self {
            config,
            session: ParserSession::new(registry),
            extractor,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<GrammarRegistry> {
        self.session.registry()
    }

    /// One-time bootstrap of the parsing engine; idempotent
    pub fn initialize(&mut self) -> Result<()> {
        self.session.initialize()
    }

    /// Language used for `filename`, honoring the configured fallback
    pub fn language_for(&self, filename: &str) -> LanguageId {
        LanguageId::from_path(filename).unwrap_or(self.config.fallback_language)
    }

    /// Analyze one file's content into its structure
    pub fn analyze_file(&mut self, content: &str, filename: &str) -> Result<FileStructure> {
        let language = self.language_for(filename);
        let tree = self.session.parse(content, language)?;
        if tree.has_errors() {
            log::debug!("{filename}: syntax errors recovered");
        }

        let facts = self.extractor.extract(&tree, filename);
        log::debug!(
            "Analyzed {filename} ({language}): {} symbols, {} imports, {} exports, {} calls, {} references",
            facts.symbols.len(),
            facts.imports.len(),
            facts.exports.len(),
            facts.call_sites.len(),
            facts.symbol_references.len()
        );

        Ok(FileStructure {
            path: filename.to_string(),
            language,
            symbols: facts.symbols,
            imports: facts.imports,
            exports: facts.exports,
            call_sites: facts.call_sites,
            symbol_references: facts.symbol_references,
        })
    }

    /// Analyze files sequentially in input order.
    ///
    /// A failing file is skipped and reported; it never aborts the batch.
    pub fn analyze_batch<I, P, C>(&mut self, files: I) -> BatchAnalysis
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: AsRef<str>,
    {
        let mut batch = BatchAnalysis::default();
        for (path, content) in files {
            let path = path.into();
            match self.analyze_file(content.as_ref(), &path) {
                Ok(structure) => {
                    batch.structures.insert(path, structure);
                }
                Err(e) => {
                    log::warn!("Skipping {path}: {e}");
                    batch.failures.push((path, e));
                }
            }
        }
        batch
    }
}
