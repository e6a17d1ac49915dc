use crate::error::{ExtractorError, Result};
use crate::language::LanguageId;
use crate::registry::GrammarRegistry;
use crate::syntax::SyntaxTree;
use std::sync::Arc;
use tree_sitter::Parser;

/// A single reusable parser, reconfigured per language before each parse
pub struct ParserSession {
    registry: Arc<GrammarRegistry>,
    parser: Option<Parser>,
    active: Option<LanguageId>,
}

impl ParserSession {
    pub fn new(registry: Arc<GrammarRegistry>) -> Self {
        Self {
            registry,
            parser: None,
            active: None,
        }
    }

    /// One-time engine bootstrap; calling it again is a no-op
    pub fn initialize(&mut self) -> Result<()> {
        if self.parser.is_none() {
            self.parser = Some(Parser::new());
            log::debug!("Parser session initialized");
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.parser.is_some()
    }

    pub fn registry(&self) -> &Arc<GrammarRegistry> {
        &self.registry
    }

    /// Parse `content` from scratch with the grammar for `language`.
    ///
    /// Syntax errors do not fail the parse: tree-sitter recovers and the
    /// resulting tree carries error nodes. `ParseError` is reserved for the
    /// engine returning no tree at all.
    pub fn parse<'src>(
        &mut self,
        content: &'src str,
        language: LanguageId,
    ) -> Result<SyntaxTree<'src>> {
        let parser = self.parser.as_mut().ok_or(ExtractorError::NotInitialized)?;

        if self.active != Some(language) {
            let grammar = self.registry.load(language)?;
            parser
                .set_language(grammar.tree_sitter())
                .map_err(|e| ExtractorError::IncompatibleGrammar {
                    language: language.as_str().to_string(),
                    reason: e.to_string(),
                })?;
            self.active = Some(language);
        }

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ExtractorError::parse("parser produced no tree"))?;

        Ok(SyntaxTree::from_tree_sitter(&tree, content, language))
    }
}
