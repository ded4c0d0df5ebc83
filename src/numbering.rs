//! Hierarchical numbering of composed documents.
//!
//! Each depth uses the next style of a configured cycle (by default
//! decimal, lower-alpha, lower-roman) and counters restart at 1 under every
//! parent. A node's [`NumberPath`] is the sequence of labels from the top
//! level down to the node, e.g. `["1", "a", "iii"]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A numbering style for one depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberStyle {
    /// 1, 2, 3
    Decimal,
    /// a, b, ..., z, aa, ab
    LowerAlpha,
    /// A, B, ..., Z, AA, AB
    UpperAlpha,
    /// i, ii, iii, iv
    LowerRoman,
    /// I, II, III, IV
    UpperRoman,
}

impl NumberStyle {
    /// Label of the `ordinal`-th item (1-based).
    pub fn label(self, ordinal: usize) -> String {
        match self {
            NumberStyle::Decimal => ordinal.to_string(),
            NumberStyle::LowerAlpha => index_to_alpha_label(ordinal.saturating_sub(1)).to_lowercase(),
            NumberStyle::UpperAlpha => index_to_alpha_label(ordinal.saturating_sub(1)),
            NumberStyle::LowerRoman => to_roman(ordinal).to_lowercase(),
            NumberStyle::UpperRoman => to_roman(ordinal),
        }
    }
}

/// Convert a zero-based index to a base-26 label: A, B, ..., Z, AA, AB, ...
fn index_to_alpha_label(mut n: usize) -> String {
    let mut result = String::new();
    loop {
        let remainder = n % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Format a number as an uppercase Roman numeral.
///
/// Numbers above 3999 have no standard numeral and fall back to decimal.
pub(crate) fn to_roman(mut n: usize) -> String {
    if n == 0 || n > 3999 {
        return n.to_string();
    }

    const NUMERALS: [(usize, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut out = String::new();
    for &(value, numeral) in NUMERALS.iter() {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// How a number path is written inside a cross-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceFormat {
    /// `1(a)(iii)`
    Parenthesized,
    /// `1.a.iii`
    Dotted,
}

/// Numbering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumberingScheme {
    /// Style cycle; depth `d` uses `styles[d % styles.len()]`.
    pub styles: Vec<NumberStyle>,
    /// Word placed before a formatted cross-reference, e.g. `Clause`.
    pub reference_prefix: String,
    pub reference_format: ReferenceFormat,
}

impl Default for NumberingScheme {
    fn default() -> Self {
        Self {
            styles: vec![NumberStyle::Decimal, NumberStyle::LowerAlpha, NumberStyle::LowerRoman],
            reference_prefix: "Clause".to_string(),
            reference_format: ReferenceFormat::Parenthesized,
        }
    }
}

impl NumberingScheme {
    pub fn new(styles: Vec<NumberStyle>) -> Self {
        Self {
            styles,
            ..Default::default()
        }
    }

    pub fn with_reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reference_prefix = prefix.into();
        self
    }

    pub fn with_reference_format(mut self, format: ReferenceFormat) -> Self {
        self.reference_format = format;
        self
    }

    /// Style used at `depth` (0 = top level).
    pub fn style_for_depth(&self, depth: usize) -> NumberStyle {
        if self.styles.is_empty() {
            return NumberStyle::Decimal;
        }
        self.styles[depth % self.styles.len()]
    }

    /// Label of the `ordinal`-th sibling (1-based) at `depth`.
    pub fn label(&self, depth: usize, ordinal: usize) -> String {
        self.style_for_depth(depth).label(ordinal)
    }

    /// Cross-reference text for `path`, e.g. `Clause 1(a)`.
    pub fn reference_text(&self, path: &NumberPath) -> String {
        let number = path.format(self.reference_format);
        if self.reference_prefix.is_empty() {
            number
        } else {
            format!("{} {}", self.reference_prefix, number)
        }
    }
}

/// Labels locating a node in a composed document.
///
/// The empty path denotes the document itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberPath(Vec<String>);

impl NumberPath {
    /// The path of the document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn child(&self, label: impl Into<String>) -> Self {
        let mut labels = self.0.clone();
        labels.push(label.into());
        Self(labels)
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Depth of the node (0 for top-level sections).
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn format(&self, format: ReferenceFormat) -> String {
        match format {
            ReferenceFormat::Dotted => self.0.join("."),
            ReferenceFormat::Parenthesized => {
                let mut out = String::new();
                for (idx, label) in self.0.iter().enumerate() {
                    if idx == 0 {
                        out.push_str(label);
                    } else {
                        out.push('(');
                        out.push_str(label);
                        out.push(')');
                    }
                }
                out
            }
        }
    }
}

impl fmt::Display for NumberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(ReferenceFormat::Parenthesized))
    }
}
