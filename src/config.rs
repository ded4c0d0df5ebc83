//! Engine configuration.
//!
//! Read from TOML, either standalone or as the `[engine]` table of a clause
//! library manifest:
//!
//! ```toml
//! [numbering]
//! styles = ["decimal", "lower-alpha", "lower-roman"]
//! reference_prefix = "Section"
//!
//! [plain_text]
//! emphasis = "ascii"
//! wrap_width = 78
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::emphasis::EmphasisStyle;
use crate::errors::ConfigError;
use crate::numbering::NumberingScheme;
use crate::render::PlainTextOptions;

/// Configuration shared by composition and rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub numbering: NumberingScheme,
    pub plain_text: PlainTextOptions,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_numbering(mut self, numbering: NumberingScheme) -> Self {
        self.numbering = numbering;
        self
    }

    pub fn with_plain_text(mut self, plain_text: PlainTextOptions) -> Self {
        self.plain_text = plain_text;
        self
    }

    pub fn with_emphasis(mut self, emphasis: EmphasisStyle) -> Self {
        self.plain_text.emphasis = emphasis;
        self
    }
}
