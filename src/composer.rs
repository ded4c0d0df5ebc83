//! Document composition.
//!
//! Merges substituted fragments into one numbered tree. Composition runs in
//! two passes over the fragments:
//!
//! 1. number every node, index anchors and detect defined terms
//! 2. build the [`ComposedDocument`], replacing `<<anchor>>` tokens with
//!    formatted references, unescaping markers that came from bound text
//!    (`\<<` becomes `<<`) and recording which nodes mention "this
//!    Agreement" or a previously defined term
//!
//! Preamble and closing fragments (parties, signatures) are composed
//! alongside the sections without numbers.
//!
//! Defined terms are detected with the usual drafting patterns:
//! - `"Term" means ...` and `"Term" shall mean ...`
//! - `ABC Corp (the "Term")`, optionally with `together` or `collectively`

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::clause::{ClauseNode, NodePath, Placement};
use crate::document::{ComposedDocument, ComposedNode, CrossReference, ReferenceTarget};
use crate::emphasis::strip_emphasis;
use crate::errors::{AssemblyError, AssemblyResult};
use crate::numbering::{NumberPath, NumberingScheme};
use crate::substitution::replace_all;

/// `<<anchor>>`, or a backslash-escaped marker left by substitution.
static ANCHOR_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(<<|>>|\[\[|\]\]|\{\{|\}\})|<<\s*([^<>]+?)\s*>>").expect("Invalid anchor reference regex")
});

static QUOTED_MEANS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["“]([A-Z][^"”]{0,80}?)["”]\s+(?:means|shall\s+mean)\b"#)
        .expect("Invalid quoted definition regex")
});

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\((?:together,?\s+|collectively,?\s+)?(?:the\s+)?["“]([A-Z][^"”]{0,80}?)["”]\)"#)
        .expect("Invalid parenthetical definition regex")
});

const THIS_AGREEMENT: &str = "this Agreement";

/// Composes substituted fragments into a numbered document.
#[derive(Debug, Clone, Default)]
pub struct DocumentComposer {
    scheme: NumberingScheme,
    title: Option<String>,
}

impl DocumentComposer {
    pub fn new(scheme: NumberingScheme) -> Self {
        Self { scheme, title: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn scheme(&self) -> &NumberingScheme {
        &self.scheme
    }

    /// Compose `fragments` into one document, each body fragment becoming a
    /// top-level section in the given order.
    ///
    /// Preamble and closing fragments are kept apart and left unnumbered.
    /// They may refer to sections but cannot be referred to, and do not
    /// define terms.
    pub fn compose(&self, fragments: &[ClauseNode]) -> AssemblyResult<ComposedDocument> {
        for (idx, fragment) in fragments.iter().enumerate() {
            let path = match &fragment.anchor {
                Some(anchor) => NodePath::fragment(anchor.clone()),
                None => NodePath::root().child(idx),
            };
            fragment.validate(&path)?;
        }
        check_duplicate_sections(fragments)?;

        let body: Vec<&ClauseNode> = fragments.iter().filter(|f| f.placement.is_body()).collect();

        let mut index = DocumentIndex::default();
        for (idx, fragment) in body.iter().enumerate() {
            index.visit(&self.scheme, fragment, self.section_number(idx))?;
        }

        let mut builder = DocumentBuilder {
            scheme: &self.scheme,
            index: &index,
            references: Vec::new(),
            position: 0,
        };
        let sections = body
            .iter()
            .enumerate()
            .map(|(idx, fragment)| builder.build(fragment, self.section_number(idx)))
            .collect::<AssemblyResult<Vec<_>>>()?;
        let references = builder.references;

        let matter = |placement: Placement| {
            fragments
                .iter()
                .filter(|f| f.placement == placement)
                .map(|f| compose_matter(&self.scheme, &index, f))
                .collect::<AssemblyResult<Vec<_>>>()
        };
        let preamble = matter(Placement::Preamble)?;
        let closing = matter(Placement::Closing)?;

        let defined_terms: BTreeMap<String, NumberPath> = index
            .definitions
            .into_iter()
            .map(|(term, (_, path))| (term, path))
            .collect();

        tracing::debug!(
            sections = sections.len(),
            preamble = preamble.len(),
            closing = closing.len(),
            anchors = index.anchors.len(),
            defined_terms = defined_terms.len(),
            references = references.len(),
            "composed document"
        );

        Ok(ComposedDocument::new(
            self.title.clone(),
            sections,
            defined_terms,
            references,
            self.scheme.clone(),
        )
        .with_matter(preamble, closing))
    }

    fn section_number(&self, idx: usize) -> NumberPath {
        NumberPath::root().child(self.scheme.label(0, idx + 1))
    }
}

/// Compose `fragments` with the default numbering scheme and no title.
pub fn compose(fragments: &[ClauseNode]) -> AssemblyResult<ComposedDocument> {
    DocumentComposer::default().compose(fragments)
}

/// Reject top-level sections whose headings match once emphasis, case and
/// spacing are ignored.
fn check_duplicate_sections(fragments: &[ClauseNode]) -> AssemblyResult<()> {
    let mut seen = HashSet::new();
    for heading in fragments.iter().filter_map(|f| f.heading.as_deref()) {
        let plain = strip_emphasis(heading);
        let key = plain.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if key.is_empty() {
            continue;
        }
        if !seen.insert(key) {
            return Err(AssemblyError::DuplicateSection(plain.trim().to_string()));
        }
    }
    Ok(())
}

/// Anchors and definitions collected in the numbering pass.
#[derive(Debug, Default)]
struct DocumentIndex {
    anchors: HashMap<String, NumberPath>,
    /// Term -> (document-order position, number path) of its first definition.
    definitions: BTreeMap<String, (usize, NumberPath)>,
    position: usize,
}

impl DocumentIndex {
    fn visit(&mut self, scheme: &NumberingScheme, node: &ClauseNode, number: NumberPath) -> AssemblyResult<()> {
        let position = self.position;
        self.position += 1;

        if let Some(anchor) = &node.anchor {
            if self.anchors.insert(anchor.clone(), number.clone()).is_some() {
                return Err(AssemblyError::DuplicateAnchor(anchor.clone()));
            }
        }

        if let Some(content) = node.body() {
            let plain = strip_emphasis(content);
            for pattern in [&*QUOTED_MEANS, &*PARENTHETICAL] {
                for caps in pattern.captures_iter(&plain) {
                    let term = caps[1].trim().to_string();
                    if let Some((_, first)) = self.definitions.get(&term) {
                        tracing::debug!(term = %term, first = %first, again = %number, "term defined twice, keeping first");
                        continue;
                    }
                    self.definitions.insert(term, (position, number.clone()));
                }
            }
        }

        let depth = number.labels().len();
        for (idx, child) in node.children.iter().enumerate() {
            self.visit(scheme, child, number.child(scheme.label(depth, idx + 1)))?;
        }
        Ok(())
    }
}

struct DocumentBuilder<'a> {
    scheme: &'a NumberingScheme,
    index: &'a DocumentIndex,
    references: Vec<CrossReference>,
    position: usize,
}

impl DocumentBuilder<'_> {
    fn build(&mut self, node: &ClauseNode, number: NumberPath) -> AssemblyResult<ComposedNode> {
        let position = self.position;
        self.position += 1;

        let mut anchors = Vec::new();
        let heading = match &node.heading {
            Some(h) => Some(self.resolve_anchors(h, &mut anchors)?),
            None => None,
        };
        let content = match &node.content {
            Some(c) => Some(self.resolve_anchors(c, &mut anchors)?),
            None => None,
        };

        for (anchor, resolved) in anchors {
            self.references.push(CrossReference {
                source: number.clone(),
                target: ReferenceTarget::Anchor(anchor),
                resolved,
            });
        }

        let text = heading
            .iter()
            .chain(content.iter())
            .map(|t| strip_emphasis(t))
            .collect::<Vec<_>>()
            .join("\n");

        if contains_word(&text, THIS_AGREEMENT) {
            self.references.push(CrossReference {
                source: number.clone(),
                target: ReferenceTarget::ThisAgreement,
                resolved: NumberPath::root(),
            });
        }

        for (term, (defined_at, defining)) in &self.index.definitions {
            if *defined_at < position && contains_word(&text, term) {
                self.references.push(CrossReference {
                    source: number.clone(),
                    target: ReferenceTarget::DefinedTerm(term.clone()),
                    resolved: defining.clone(),
                });
            }
        }

        let depth = number.labels().len();
        let children = node
            .children
            .iter()
            .enumerate()
            .map(|(idx, child)| self.build(child, number.child(self.scheme.label(depth, idx + 1))))
            .collect::<AssemblyResult<Vec<_>>>()?;

        Ok(ComposedNode::new(
            number,
            node.anchor.clone(),
            heading,
            content,
            children,
        ))
    }

    fn build_matter(&self, node: &ClauseNode) -> AssemblyResult<ComposedNode> {
        let mut hits = Vec::new();
        let heading = match &node.heading {
            Some(h) => Some(self.resolve_anchors(h, &mut hits)?),
            None => None,
        };
        let content = match &node.content {
            Some(c) => Some(self.resolve_anchors(c, &mut hits)?),
            None => None,
        };
        let children = node
            .children
            .iter()
            .map(|child| self.build_matter(child))
            .collect::<AssemblyResult<Vec<_>>>()?;
        Ok(ComposedNode::new(
            NumberPath::root(),
            node.anchor.clone(),
            heading,
            content,
            children,
        ))
    }

    /// Replace every `<<anchor>>` in `text`, noting each distinct anchor once.
    /// Escaped markers become literal text.
    fn resolve_anchors(&self, text: &str, hits: &mut Vec<(String, NumberPath)>) -> AssemblyResult<String> {
        if !text.contains("<<") && !text.contains('\\') {
            return Ok(text.to_string());
        }
        replace_all(&ANCHOR_REFERENCE, text, |caps| {
            if let Some(escaped) = caps.get(1) {
                return Ok(escaped.as_str().to_string());
            }
            let anchor = caps[2].to_string();
            let resolved = self
                .index
                .anchors
                .get(&anchor)
                .ok_or_else(|| AssemblyError::DanglingReference(anchor.clone()))?;
            let formatted = self.scheme.reference_text(resolved);
            if !hits.iter().any(|(seen, _)| *seen == anchor) {
                hits.push((anchor, resolved.clone()));
            }
            Ok(formatted)
        })
    }
}

/// Build unnumbered matter, resolving its references to numbered sections.
fn compose_matter(scheme: &NumberingScheme, index: &DocumentIndex, node: &ClauseNode) -> AssemblyResult<ComposedNode> {
    let builder = DocumentBuilder {
        scheme,
        index,
        references: Vec::new(),
        position: 0,
    };
    builder.build_matter(node)
}

/// Check whether `needle` occurs in `haystack` delimited by non-alphanumeric
/// characters (or the ends of the text).
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
    })
}
