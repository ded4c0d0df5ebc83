//! Clause trees and the at-rest clause-definition schema.
//!
//! A [`ClauseNode`] is a single recursive type: every node may carry an
//! anchor, a heading, a content body and ordered children. A node must have
//! content or children (or both).
//!
//! Clause-definition files are JSON documents with a `title` and ordered
//! `paragraphs`, each paragraph optionally carrying a `heading`, an `id` and
//! nested `subparagraphs`. [`parse_fragment`] turns one such document into a
//! `ClauseNode` rooted at the fragment.
//!
//! A document may set `"placement": "preamble"` or `"closing"` to become
//! unnumbered front or back matter, and a paragraph may set
//! `"per_party": true` to be repeated once for every party.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AssemblyError, AssemblyResult};

/// A node in a clause tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClauseNode {
    /// Stable identifier usable as a cross-reference target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    /// Optional formatted label, may carry emphasis markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    /// Optional text body with placeholder tokens and references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Ordered subparagraphs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ClauseNode>,
    /// Where a fragment root lands in the composed document.
    #[serde(default, skip_serializing_if = "Placement::is_body")]
    pub placement: Placement,
    /// Repeat this node once per party, with that party's bindings.
    #[serde(default, skip_serializing_if = "is_false")]
    pub per_party: bool,
}

/// Where a fragment is placed in the composed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// A numbered section.
    #[default]
    Body,
    /// Unnumbered matter before the first section.
    Preamble,
    /// Unnumbered matter after the last section.
    Closing,
}

impl Placement {
    pub fn is_body(&self) -> bool {
        *self == Placement::Body
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ClauseNode {
    /// Create a leaf node with content only.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Create a branch node with children only.
    pub fn branch(children: Vec<ClauseNode>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_child(mut self, child: ClauseNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Mark this node to be repeated once per party.
    pub fn per_party(mut self) -> Self {
        self.per_party = true;
        self
    }

    /// Content that is present and not blank.
    pub fn body(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this tree, including the root.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ClauseNode::node_count).sum::<usize>()
    }

    /// Check the content/children invariant and anchor syntax for the whole
    /// tree, treating `self` as a fragment root.
    ///
    /// Anchors are ASCII letters, digits, `-` and `_`, starting with a letter
    /// or digit. Only the root may carry a placement, and the root cannot
    /// repeat per party. Reports the first offending node in document order.
    pub fn validate(&self, path: &NodePath) -> AssemblyResult<()> {
        if self.per_party {
            return Err(AssemblyError::MalformedClauseTree {
                path: path.clone(),
                reason: "a fragment root cannot repeat per party".to_string(),
            });
        }
        self.validate_node(path)
    }

    fn validate_node(&self, path: &NodePath) -> AssemblyResult<()> {
        if let Some(anchor) = &self.anchor {
            if !is_valid_anchor(anchor) {
                return Err(AssemblyError::MalformedClauseTree {
                    path: path.clone(),
                    reason: format!("anchor {:?} is not a valid identifier", anchor),
                });
            }
        }
        if self.body().is_none() && self.children.is_empty() {
            return Err(AssemblyError::MalformedClauseTree {
                path: path.clone(),
                reason: "node has neither content nor children".to_string(),
            });
        }
        for (idx, child) in self.children.iter().enumerate() {
            let path = path.child(idx);
            if !child.placement.is_body() {
                return Err(AssemblyError::MalformedClauseTree {
                    path,
                    reason: "only a fragment root can set a placement".to_string(),
                });
            }
            child.validate_node(&path)?;
        }
        Ok(())
    }

    /// Visit every node in document order together with its path.
    pub fn walk<'a>(&'a self, path: NodePath, visit: &mut impl FnMut(&NodePath, &'a ClauseNode)) {
        visit(&path, self);
        for (idx, child) in self.children.iter().enumerate() {
            child.walk(path.child(idx), visit);
        }
    }
}

fn is_valid_anchor(anchor: &str) -> bool {
    let mut chars = anchor.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}

/// Location of a node inside a fragment, used for diagnostics.
///
/// Displayed as the fragment id followed by child indices, e.g.
/// `definitions/0/2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodePath {
    pub fragment: Option<String>,
    pub indices: Vec<usize>,
}

impl NodePath {
    /// Path of the root node of a fragment.
    pub fn fragment(id: impl Into<String>) -> Self {
        Self {
            fragment: Some(id.into()),
            indices: Vec::new(),
        }
    }

    /// Path of a root node that is not tied to a fragment.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the child at `idx` below this node.
    pub fn child(&self, idx: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(idx);
        Self {
            fragment: self.fragment.clone(),
            indices,
        }
    }

    pub fn depth(&self) -> usize {
        self.indices.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fragment {
            Some(fragment) => write!(f, "{}", fragment)?,
            None => write!(f, "<root>")?,
        }
        for idx in &self.indices {
            write!(f, "/{}", idx)?;
        }
        Ok(())
    }
}

// ============================================================================
// At-rest schema
// ============================================================================

/// A clause-definition document as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentDocument {
    pub title: String,
    #[serde(default, skip_serializing_if = "Placement::is_body")]
    pub placement: Placement,
    pub paragraphs: Vec<ParagraphDocument>,
}

/// A paragraph of a clause-definition document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParagraphDocument {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subparagraphs: Option<Vec<ParagraphDocument>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub per_party: bool,
}

impl ParagraphDocument {
    fn into_node(self) -> ClauseNode {
        ClauseNode {
            anchor: self.id,
            heading: self.heading,
            content: Some(self.content),
            children: self
                .subparagraphs
                .unwrap_or_default()
                .into_iter()
                .map(ParagraphDocument::into_node)
                .collect(),
            placement: Placement::Body,
            per_party: self.per_party,
        }
    }

    fn is_liftable(&self) -> bool {
        self.heading.is_none() && self.id.is_none() && !self.per_party
    }
}

impl FragmentDocument {
    /// Convert into a clause tree anchored at `fragment_id`.
    ///
    /// A single paragraph without heading or id is lifted into the root so
    /// that one-paragraph clauses are not sub-numbered.
    pub fn into_clause_node(self, fragment_id: &str) -> ClauseNode {
        let mut paragraphs = self.paragraphs;
        let root = ClauseNode::default()
            .with_anchor(fragment_id)
            .with_heading(self.title)
            .with_placement(self.placement);

        if paragraphs.len() == 1 && paragraphs[0].is_liftable() {
            let lifted = paragraphs.remove(0).into_node();
            return ClauseNode {
                content: lifted.content,
                children: lifted.children,
                ..root
            };
        }

        ClauseNode {
            children: paragraphs
                .into_iter()
                .map(ParagraphDocument::into_node)
                .collect(),
            ..root
        }
    }
}

/// Parse a clause-definition JSON document into a validated clause tree.
pub fn parse_fragment(fragment_id: &str, json: &str) -> AssemblyResult<ClauseNode> {
    let document: FragmentDocument =
        serde_json::from_str(json).map_err(|e| AssemblyError::InvalidFragment {
            fragment: fragment_id.to_string(),
            message: e.to_string(),
        })?;
    let node = document.into_clause_node(fragment_id);
    node.validate(&NodePath::fragment(fragment_id))?;
    Ok(node)
}
