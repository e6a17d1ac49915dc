use anyhow::{Context, Result};
use canvas_extractor::AnalyzerConfig;
use canvas_graph::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings file with `[analyzer]` and `[layout]` tables, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub analyzer: AnalyzerConfig,
    pub layout: LayoutConfig,
}

impl CanvasConfig {
    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                Self::parse(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.analyzer.validate()?;
        config.layout.validate()?;
        Ok(config)
    }
}
