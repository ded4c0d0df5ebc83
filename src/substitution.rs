//! Placeholder substitution over clause trees.
//!
//! Placeholders use a reserved token grammar so that role names written in
//! ordinary prose are never touched:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `{{Name}}` | bound text |
//! | `{{Name's}}` | possessive of the bound text |
//! | `[[Name: one \| many]]` | branch picked by the binding's number |
//! | `[[Name:key]]` | inflection-table phrasing picked by the binding's number |
//! | `<<anchor>>` | cross-reference, left for the composer |
//!
//! Bound text is inserted literally and never read as template syntax.
//! Token markers inside bound text are escaped with a backslash (`\<<`,
//! `\{{`, ...); escaped markers are left alone by later substitutions and
//! unescaped by the composer.
//!
//! Paragraphs marked `per_party` are repeated once per party of the role map,
//! with that party's bindings (`{{PartyName}}`, `{{Signatory}}`, ...) on top
//! of the shared ones.
//!
//! A branch alternative may itself contain `{{...}}` tokens. Nested branches
//! are not supported and surface as malformed syntax.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::clause::{ClauseNode, NodePath};
use crate::errors::{AssemblyError, AssemblyResult};
use crate::inflection::InflectionTable;
use crate::roles::{placeholder_key, PartyRoleMap, RoleBinding};

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?P<escaped>\\(?:<<|>>|\[\[|\]\]|\{\{|\}\}))",
        r"|\[\[\s*(?P<branch>[A-Za-z][A-Za-z0-9 ]*?)\s*:(?P<body>[^\[\]]*)\]\]",
        r"|\{\{\s*(?P<role>[A-Za-z][A-Za-z0-9 ]*?)\s*(?P<possessive>'s|’s)?\s*\}\}",
    ))
    .expect("Invalid placeholder token regex")
});

/// Template markers; `<<` and `>>` belong to the composer.
const MARKERS: [&str; 4] = ["{{", "}}", "[[", "]]"];

const ESCAPABLE: [&str; 6] = ["<<", ">>", "[[", "]]", "{{", "}}"];

/// Substitutes placeholder tokens using a role map and an inflection table.
#[derive(Debug, Clone, Copy)]
pub struct TermSubstitution<'a> {
    roles: &'a PartyRoleMap,
    inflections: &'a InflectionTable,
}

impl<'a> TermSubstitution<'a> {
    pub fn new(roles: &'a PartyRoleMap, inflections: &'a InflectionTable) -> Self {
        Self { roles, inflections }
    }

    /// Substitute every token in `tree`, returning a new tree.
    ///
    /// The input is never modified. The first failure in document order
    /// (heading, content, then children) is reported. A child marked
    /// `per_party` is replaced by one copy per party in the role map, each
    /// substituted with that party's bindings; without parties it is dropped.
    pub fn substitute(&self, tree: &ClauseNode, path: &NodePath) -> AssemblyResult<ClauseNode> {
        let heading = match &tree.heading {
            Some(h) => Some(self.substitute_text(h, path)?),
            None => None,
        };
        let content = match &tree.content {
            Some(c) => Some(self.substitute_text(c, path)?),
            None => None,
        };
        let mut children = Vec::with_capacity(tree.children.len());
        for (idx, child) in tree.children.iter().enumerate() {
            let path = path.child(idx);
            if !child.per_party {
                children.push(self.substitute(child, &path)?);
                continue;
            }
            for party in self.roles.parties() {
                let roles = self.roles.for_party(party);
                let repeated = TermSubstitution::new(&roles, self.inflections).substitute(child, &path)?;
                children.push(ClauseNode {
                    per_party: false,
                    ..repeated
                });
            }
        }

        Ok(ClauseNode {
            anchor: tree.anchor.clone(),
            heading,
            content,
            children,
            placement: tree.placement,
            per_party: tree.per_party,
        })
    }

    /// Substitute the tokens of a single text.
    pub fn substitute_text(&self, text: &str, path: &NodePath) -> AssemblyResult<String> {
        if !MARKERS.iter().any(|m| text.contains(m)) {
            return Ok(text.to_string());
        }
        self.expand(text, path)
    }

    /// Expand tokens in template text. Text between tokens must not contain
    /// stray markers.
    fn expand(&self, text: &str, path: &NodePath) -> AssemblyResult<String> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in TOKEN.captures_iter(text) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            check_literal(&text[last..whole.start()], path)?;
            out.push_str(&text[last..whole.start()]);
            out.push_str(&self.resolve(&caps, path)?);
            last = whole.end();
        }
        check_literal(&text[last..], path)?;
        out.push_str(&text[last..]);
        Ok(out)
    }

    fn resolve(&self, caps: &Captures<'_>, path: &NodePath) -> AssemblyResult<String> {
        if let Some(escaped) = caps.name("escaped") {
            return Ok(escaped.as_str().to_string());
        }
        if let Some(name) = caps.name("branch") {
            let body = caps.name("body").map_or("", |b| b.as_str());
            return self.resolve_branch(name.as_str(), body, path);
        }
        match caps.name("role") {
            Some(name) => self.resolve_role(name.as_str(), caps.name("possessive").is_some(), path),
            None => Ok(String::new()),
        }
    }

    fn binding(&self, name: &str, token: &str, path: &NodePath) -> AssemblyResult<&'a RoleBinding> {
        self.roles.get(name).ok_or_else(|| AssemblyError::UnresolvedPlaceholder {
            token: token.to_string(),
            path: path.clone(),
        })
    }

    fn resolve_branch(&self, raw_name: &str, body: &str, path: &NodePath) -> AssemblyResult<String> {
        let name = placeholder_key(raw_name);
        let body = body.trim();
        let binding = self.binding(&name, &name, path)?;

        let alternatives: Vec<&str> = body.split('|').collect();
        match alternatives.as_slice() {
            [singular, plural] => {
                let chosen = if binding.is_plural() { plural } else { singular };
                self.expand(chosen.trim(), path)
            }
            [key] => {
                let token = format!("{}:{}", name, key);
                let phrasing = self.inflections.get(key).ok_or_else(|| {
                    AssemblyError::UnresolvedPlaceholder {
                        token,
                        path: path.clone(),
                    }
                })?;
                Ok(escape_bound(phrasing.pick(binding.number)))
            }
            _ => Err(AssemblyError::MalformedClauseTree {
                path: path.clone(),
                reason: format!(
                    "branch `{}` has {} alternatives, expected singular and plural",
                    name,
                    alternatives.len()
                ),
            }),
        }
    }

    fn resolve_role(&self, raw_name: &str, possessive: bool, path: &NodePath) -> AssemblyResult<String> {
        let name = placeholder_key(raw_name);
        let binding = self.binding(&name, &name, path)?;
        if possessive {
            Ok(escape_bound(&binding.possessive()))
        } else {
            Ok(escape_bound(&binding.text))
        }
    }
}

fn check_literal(literal: &str, path: &NodePath) -> AssemblyResult<()> {
    match MARKERS.iter().find(|m| literal.contains(**m)) {
        Some(marker) => Err(AssemblyError::MalformedClauseTree {
            path: path.clone(),
            reason: format!("unrecognised token syntax `{}` in {:?}", marker, excerpt(literal, marker)),
        }),
        None => Ok(()),
    }
}

/// Escape token markers in bound text so it is never read as a token.
pub(crate) fn escape_bound(text: &str) -> String {
    if !ESCAPABLE.iter().any(|m| text.contains(m)) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 4);
    let mut rest = text;
    while !rest.is_empty() {
        match ESCAPABLE.iter().find(|m| rest.starts_with(**m)) {
            Some(marker) => {
                out.push('\\');
                out.push_str(marker);
                rest = &rest[marker.len()..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                rest = chars.as_str();
            }
        }
    }
    out
}

/// Substitute `tree` with the default inflection table.
///
/// Diagnostics paths start at the tree's anchor when it has one.
pub fn substitute(tree: &ClauseNode, roles: &PartyRoleMap) -> AssemblyResult<ClauseNode> {
    let inflections = InflectionTable::default();
    let path = match &tree.anchor {
        Some(anchor) => NodePath::fragment(anchor.clone()),
        None => NodePath::root(),
    };
    TermSubstitution::new(roles, &inflections).substitute(tree, &path)
}

/// Names of every placeholder a tree needs bound, in sorted order.
///
/// Paragraphs repeated per party are skipped; their placeholders are bound
/// per party.
pub fn required_placeholders(tree: &ClauseNode) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    collect_placeholders(tree, &mut names);
    names
}

fn collect_placeholders(node: &ClauseNode, names: &mut BTreeSet<String>) {
    for text in node.heading.iter().chain(node.content.iter()) {
        for caps in TOKEN.captures_iter(text) {
            if let Some(name) = caps.name("branch").or_else(|| caps.name("role")) {
                names.insert(placeholder_key(name.as_str()));
            }
            if let Some(body) = caps.name("body") {
                for inner in TOKEN.captures_iter(body.as_str()) {
                    if let Some(name) = inner.name("role") {
                        names.insert(placeholder_key(name.as_str()));
                    }
                }
            }
        }
    }
    for child in node.children.iter().filter(|c| !c.per_party) {
        collect_placeholders(child, names);
    }
}

pub(crate) fn replace_all(
    regex: &Regex,
    text: &str,
    mut resolve: impl FnMut(&Captures<'_>) -> AssemblyResult<String>,
) -> AssemblyResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in regex.captures_iter(text) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&resolve(&caps)?);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

fn excerpt<'t>(text: &'t str, marker: &str) -> &'t str {
    let start = text.find(marker).unwrap_or(0);
    let end = text[start..]
        .char_indices()
        .nth(40)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len());
    &text[start..end]
}
