//! Structured JSON rendering.
//!
//! Text keeps its raw emphasis markers so that the output reads back into an
//! equal [`ComposedDocument`] via [`ComposedDocument::from_json`].

use super::Renderer;
use crate::document::ComposedDocument;
use crate::errors::{AssemblyError, AssemblyResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Compact single-line output.
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, doc: &ComposedDocument) -> AssemblyResult<String> {
        let result = if self.pretty {
            serde_json::to_string_pretty(doc)
        } else {
            serde_json::to_string(doc)
        };
        result.map_err(|e| AssemblyError::Serialization(e.to_string()))
    }
}
