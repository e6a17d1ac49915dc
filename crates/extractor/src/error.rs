use thiserror::Error;

/// Result type for extractor operations
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Errors that can occur while analyzing a source file
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// No grammar is bundled for the detected language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The parser session was used before `initialize()`
    #[error("Parser not initialized")]
    NotInitialized,

    /// The parse engine produced no tree at all
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The grammar could not be installed on the parser (ABI mismatch)
    #[error("Incompatible grammar for {language}: {reason}")]
    IncompatibleGrammar { language: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ExtractorError {
    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
