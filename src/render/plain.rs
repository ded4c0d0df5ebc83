//! Plain-text rendering.
//!
//! Top-level sections are labelled `1.`, deeper nodes `(a)`, `(i)`, ... and
//! indented one step per level. Content below a heading starts on its own
//! line. Wrapping measures display width per grapheme, so wide characters
//! and combining marks never split a column.
//!
//! Preamble and closing matter is written without labels, its nested
//! paragraphs indented below the first level.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::Renderer;
use crate::document::{ComposedDocument, ComposedNode};
use crate::emphasis::{plain_emphasis, EmphasisStyle};
use crate::errors::AssemblyResult;

/// Narrowest text column the wrapper will produce.
const MIN_WRAP: usize = 20;

/// Plain-text layout options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlainTextOptions {
    pub emphasis: EmphasisStyle,
    /// Spaces per nesting level.
    pub indent: usize,
    /// Wrap lines at this display width; `None` leaves lines unwrapped.
    pub wrap_width: Option<usize>,
}

impl Default for PlainTextOptions {
    fn default() -> Self {
        Self {
            emphasis: EmphasisStyle::Strip,
            indent: 4,
            wrap_width: None,
        }
    }
}

impl PlainTextOptions {
    pub fn with_emphasis(mut self, emphasis: EmphasisStyle) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = Some(width);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlainTextRenderer {
    options: PlainTextOptions,
}

impl PlainTextRenderer {
    pub fn new(options: PlainTextOptions) -> Self {
        Self { options }
    }

    fn write_node(&self, out: &mut String, node: &ComposedNode) {
        let depth = node.depth();
        let pad = " ".repeat(self.options.indent * depth);
        let label = match depth {
            0 => format!("{}.", node.number().last().unwrap_or_default()),
            _ => format!("({})", node.number().last().unwrap_or_default()),
        };
        let first = format!("{}{} ", pad, label);
        let hanging = " ".repeat(first.width());

        let heading = node
            .heading()
            .map(|h| plain_emphasis(h, self.options.emphasis))
            .filter(|h| !h.trim().is_empty());
        let content = node
            .content()
            .map(|c| plain_emphasis(c, self.options.emphasis))
            .filter(|c| !c.trim().is_empty());

        match (heading, content) {
            (Some(heading), Some(content)) => {
                self.write_block(out, &first, &hanging, &heading);
                let body = " ".repeat(self.options.indent * (depth + 1));
                self.write_block(out, &body, &body, &content);
            }
            (Some(text), None) | (None, Some(text)) => self.write_block(out, &first, &hanging, &text),
            (None, None) => {
                let _ = writeln!(out, "{}", first.trim_end());
            }
        }

        for child in node.children() {
            self.write_node(out, child);
        }
    }

    fn write_matter(&self, out: &mut String, node: &ComposedNode, level: usize) {
        let pad = " ".repeat(self.options.indent * level.saturating_sub(1));
        let texts = node
            .heading()
            .into_iter()
            .chain(node.content())
            .map(|t| plain_emphasis(t, self.options.emphasis))
            .filter(|t| !t.trim().is_empty());
        for text in texts {
            self.write_block(out, &pad, &pad, &text);
        }
        for child in node.children() {
            self.write_matter(out, child, level + 1);
        }
    }

    fn write_block(&self, out: &mut String, first: &str, rest: &str, text: &str) {
        let mut prefix = first;
        for line in text.lines() {
            let pieces = match self.options.wrap_width {
                Some(width) => wrap(line, width.saturating_sub(prefix.width()).max(MIN_WRAP)),
                None => vec![line.trim_end().to_string()],
            };
            for piece in pieces {
                let _ = writeln!(out, "{}{}", prefix, piece);
                prefix = rest;
            }
        }
    }
}

impl Renderer for PlainTextRenderer {
    fn render(&self, doc: &ComposedDocument) -> AssemblyResult<String> {
        let mut out = String::new();
        if let Some(title) = doc.title() {
            let _ = writeln!(out, "{}", plain_emphasis(title, self.options.emphasis));
            out.push('\n');
        }
        let mut first = true;
        let mut separate = |out: &mut String| {
            if !std::mem::take(&mut first) {
                out.push('\n');
            }
        };
        for node in doc.preamble() {
            separate(&mut out);
            self.write_matter(&mut out, node, 0);
        }
        for section in doc.sections() {
            separate(&mut out);
            self.write_node(&mut out, section);
        }
        for node in doc.closing() {
            separate(&mut out);
            self.write_matter(&mut out, node, 0);
        }
        Ok(out)
    }
}

/// Greedy word wrap to `width` display columns.
///
/// Words wider than a full line are broken at grapheme boundaries.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_width > 0 && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
            continue;
        }
        if current_width > 0 {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }
        for grapheme in word.graphemes(true) {
            let g = grapheme.width();
            if current_width + g > width && current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += g;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap("the quick brown fox jumps over the lazy dog", 20),
            vec!["the quick brown fox", "jumps over the lazy", "dog"]
        );
    }

    #[test]
    fn breaks_overlong_words_by_grapheme() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("e\u{301}e\u{301}e\u{301}", 2), vec!["e\u{301}e\u{301}", "e\u{301}"]);
    }

    #[test]
    fn measures_wide_characters() {
        assert_eq!(wrap("日本語 日本", 6), vec!["日本語", "日本"]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }
}
