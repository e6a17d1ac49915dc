use crate::error::{ExtractorError, Result};
use crate::language::LanguageId;
use serde::{Deserialize, Serialize};

/// Configuration for file analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Language assumed for files whose extension is not recognized
    pub fallback_language: LanguageId,

    /// Extra bare callee names to drop from call sites
    pub ignored_functions: Vec<String>,

    /// Extra member-call property names to drop from call sites
    pub ignored_methods: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fallback_language: LanguageId::DEFAULT,
            ignored_functions: Vec::new(),
            ignored_methods: Vec::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.fallback_language.has_grammar() {
            return Err(ExtractorError::invalid_config(format!(
                "fallback_language ({}) has no bundled grammar",
                self.fallback_language
            )));
        }

        let blank = self
            .ignored_functions
            .iter()
            .chain(&self.ignored_methods)
            .any(|name| name.trim().is_empty());
        if blank {
            return Err(ExtractorError::invalid_config(
                "ignored names must not be blank",
            ));
        }

        Ok(())
    }
}
