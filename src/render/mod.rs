//! Output renderers for composed documents.
//!
//! Every renderer is a pure transform of the same [`ComposedDocument`];
//! new output formats plug in through the [`Renderer`] trait.

mod html;
mod json;
mod plain;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use plain::{PlainTextOptions, PlainTextRenderer};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::document::ComposedDocument;
use crate::errors::AssemblyResult;

/// Output representation of a rendered agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderFormat {
    PlainText,
    Html,
    Json,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 3] = [RenderFormat::PlainText, RenderFormat::Html, RenderFormat::Json];
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFormat::PlainText => write!(f, "plain-text"),
            RenderFormat::Html => write!(f, "html"),
            RenderFormat::Json => write!(f, "json"),
        }
    }
}

/// Serializes a composed document into one output representation.
pub trait Renderer {
    fn render(&self, doc: &ComposedDocument) -> AssemblyResult<String>;
}

/// Render `doc` with the default engine configuration.
pub fn render(doc: &ComposedDocument, format: RenderFormat) -> AssemblyResult<String> {
    render_with(doc, format, &EngineConfig::default())
}

/// Render `doc` using the renderer options of `config`.
pub fn render_with(doc: &ComposedDocument, format: RenderFormat, config: &EngineConfig) -> AssemblyResult<String> {
    tracing::debug!(format = %format, sections = doc.sections().len(), "rendering document");
    match format {
        RenderFormat::PlainText => PlainTextRenderer::new(config.plain_text.clone()).render(doc),
        RenderFormat::Html => HtmlRenderer::new().render(doc),
        RenderFormat::Json => JsonRenderer::pretty().render(doc),
    }
}
