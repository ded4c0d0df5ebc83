//! The composed, numbered agreement document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{AssemblyError, AssemblyResult};
use crate::numbering::{NumberPath, NumberingScheme};

/// A numbered node of a composed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedNode {
    number: NumberPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<ComposedNode>,
}

impl ComposedNode {
    pub(crate) fn new(
        number: NumberPath,
        anchor: Option<String>,
        heading: Option<String>,
        content: Option<String>,
        children: Vec<ComposedNode>,
    ) -> Self {
        Self {
            number,
            anchor,
            heading,
            content,
            children,
        }
    }

    pub fn number(&self) -> &NumberPath {
        &self.number
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn children(&self) -> &[ComposedNode] {
        &self.children
    }

    /// Depth below the top level (0 for sections).
    pub fn depth(&self) -> usize {
        self.number.depth()
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a ComposedNode>) {
        out.push(self);
        for child in &self.children {
            child.collect(out);
        }
    }
}

/// What a cross-reference points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "kebab-case")]
pub enum ReferenceTarget {
    /// The agreement as a whole ("this Agreement").
    ThisAgreement,
    /// A node by its stable anchor.
    Anchor(String),
    /// The node defining a term.
    DefinedTerm(String),
}

/// A resolved cross-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    /// Node containing the reference.
    pub source: NumberPath,
    pub target: ReferenceTarget,
    /// Number path of the referenced node; empty for the whole agreement.
    pub resolved: NumberPath,
}

/// A fully substituted, numbered and cross-referenced agreement.
///
/// Created once per render request and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    sections: Vec<ComposedNode>,
    #[serde(default)]
    defined_terms: BTreeMap<String, NumberPath>,
    #[serde(default)]
    references: Vec<CrossReference>,
    /// Scheme the number paths were produced with.
    #[serde(default)]
    numbering: NumberingScheme,
    /// Unnumbered matter before the sections, such as the parties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    preamble: Vec<ComposedNode>,
    /// Unnumbered matter after the sections, such as signatures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    closing: Vec<ComposedNode>,
}

impl ComposedDocument {
    pub(crate) fn new(
        title: Option<String>,
        sections: Vec<ComposedNode>,
        defined_terms: BTreeMap<String, NumberPath>,
        references: Vec<CrossReference>,
        numbering: NumberingScheme,
    ) -> Self {
        Self {
            title,
            sections,
            defined_terms,
            references,
            numbering,
            preamble: Vec::new(),
            closing: Vec::new(),
        }
    }

    pub(crate) fn with_matter(mut self, preamble: Vec<ComposedNode>, closing: Vec<ComposedNode>) -> Self {
        self.preamble = preamble;
        self.closing = closing;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn sections(&self) -> &[ComposedNode] {
        &self.sections
    }

    /// Defined terms and the number path of their defining node.
    pub fn defined_terms(&self) -> &BTreeMap<String, NumberPath> {
        &self.defined_terms
    }

    pub fn references(&self) -> &[CrossReference] {
        &self.references
    }

    pub fn numbering(&self) -> &NumberingScheme {
        &self.numbering
    }

    pub fn preamble(&self) -> &[ComposedNode] {
        &self.preamble
    }

    pub fn closing(&self) -> &[ComposedNode] {
        &self.closing
    }

    /// All numbered nodes in document order.
    pub fn nodes(&self) -> Vec<&ComposedNode> {
        let mut out = Vec::new();
        for section in &self.sections {
            section.collect(&mut out);
        }
        out
    }

    /// Find the node with the given number path.
    pub fn find(&self, path: &NumberPath) -> Option<&ComposedNode> {
        let mut labels = path.labels().iter();
        let first = labels.next()?;
        let mut node = self.sections.iter().find(|s| s.number.last() == Some(first.as_str()))?;
        for label in labels {
            node = node.children.iter().find(|c| c.number.last() == Some(label.as_str()))?;
        }
        Some(node)
    }

    /// Find the node carrying `anchor`.
    pub fn find_anchor(&self, anchor: &str) -> Option<&ComposedNode> {
        self.nodes().into_iter().find(|n| n.anchor() == Some(anchor))
    }

    /// All text of the document (headings and content) in document order,
    /// preamble and closing included.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        let mut nodes = Vec::new();
        for node in self.preamble.iter().chain(&self.sections).chain(&self.closing) {
            node.collect(&mut nodes);
        }
        nodes
            .into_iter()
            .flat_map(|n| n.heading.as_deref().into_iter().chain(n.content.as_deref()))
    }

    /// Read a document back from its JSON rendering.
    pub fn from_json(json: &str) -> AssemblyResult<Self> {
        serde_json::from_str(json).map_err(|e| AssemblyError::Serialization(e.to_string()))
    }
}
