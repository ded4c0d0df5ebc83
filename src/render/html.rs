//! HTML rendering.

use std::fmt::Write;

use super::Renderer;
use crate::document::{ComposedDocument, ComposedNode};
use crate::emphasis::parse_emphasis;
use crate::errors::AssemblyResult;
use crate::numbering::{NumberStyle, NumberingScheme, ReferenceFormat};

/// Renders an `<article>` with nested ordered lists.
///
/// List types follow the numbering scheme the document was composed with.
/// Every `<li>` carries its number in `data-number` and an `id`: the node's
/// anchor when it has one, otherwise `clause-` followed by the dotted number.
/// Preamble and closing matter becomes a `<section>` before or after the
/// list, with nested paragraphs as unordered lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_list(&self, out: &mut String, scheme: &NumberingScheme, nodes: &[ComposedNode], depth: usize) {
        let pad = "  ".repeat(depth * 2 + 1);
        let list_type = match scheme.style_for_depth(depth) {
            NumberStyle::Decimal => "1",
            NumberStyle::LowerAlpha => "a",
            NumberStyle::UpperAlpha => "A",
            NumberStyle::LowerRoman => "i",
            NumberStyle::UpperRoman => "I",
        };
        let _ = writeln!(out, "{}<ol type=\"{}\">", pad, list_type);
        for node in nodes {
            self.write_item(out, scheme, node, depth);
        }
        let _ = writeln!(out, "{}</ol>", pad);
    }

    fn write_item(&self, out: &mut String, scheme: &NumberingScheme, node: &ComposedNode, depth: usize) {
        let pad = "  ".repeat(depth * 2 + 2);
        let inner = "  ".repeat(depth * 2 + 3);
        let id = match node.anchor() {
            Some(anchor) => anchor.to_string(),
            None => format!("clause-{}", node.number().format(ReferenceFormat::Dotted)),
        };
        let _ = writeln!(
            out,
            "{}<li id=\"{}\" data-number=\"{}\">",
            pad,
            escape(&id),
            escape(&node.number().to_string())
        );
        if let Some(heading) = node.heading() {
            let level = (depth + 2).min(6);
            let _ = writeln!(out, "{}<h{}>{}</h{}>", inner, level, markup(heading), level);
        }
        if let Some(content) = node.content().filter(|c| !c.trim().is_empty()) {
            let _ = writeln!(out, "{}<p>{}</p>", inner, markup(content));
        }
        if !node.children().is_empty() {
            self.write_list(out, scheme, node.children(), depth + 1);
        }
        let _ = writeln!(out, "{}</li>", pad);
    }
}

impl HtmlRenderer {
    fn write_matter(&self, out: &mut String, class: &str, node: &ComposedNode) {
        match node.anchor() {
            Some(anchor) => {
                let _ = writeln!(out, "  <section class=\"{}\" id=\"{}\">", class, escape(anchor));
            }
            None => {
                let _ = writeln!(out, "  <section class=\"{}\">", class);
            }
        }
        self.write_paragraphs(out, node, 0);
        out.push_str("  </section>\n");
    }

    fn write_paragraphs(&self, out: &mut String, node: &ComposedNode, depth: usize) {
        let pad = "  ".repeat(depth * 2 + 2);
        if let Some(heading) = node.heading() {
            let level = (depth + 2).min(6);
            let _ = writeln!(out, "{}<h{}>{}</h{}>", pad, level, markup(heading), level);
        }
        if let Some(content) = node.content().filter(|c| !c.trim().is_empty()) {
            let _ = writeln!(out, "{}<p>{}</p>", pad, markup(content));
        }
        if node.children().is_empty() {
            return;
        }
        let _ = writeln!(out, "{}<ul>", pad);
        for child in node.children() {
            let _ = writeln!(out, "{}  <li>", pad);
            self.write_paragraphs(out, child, depth + 1);
            let _ = writeln!(out, "{}  </li>", pad);
        }
        let _ = writeln!(out, "{}</ul>", pad);
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, doc: &ComposedDocument) -> AssemblyResult<String> {
        let mut out = String::from("<article>\n");
        if let Some(title) = doc.title() {
            let _ = writeln!(out, "  <h1>{}</h1>", markup(title));
        }
        for node in doc.preamble() {
            self.write_matter(&mut out, "preamble", node);
        }
        if !doc.sections().is_empty() {
            self.write_list(&mut out, doc.numbering(), doc.sections(), 0);
        }
        for node in doc.closing() {
            self.write_matter(&mut out, "closing", node);
        }
        out.push_str("</article>\n");
        Ok(out)
    }
}

/// Escaped text with emphasis mapped to `<strong>` and `<em>`.
fn markup(text: &str) -> String {
    let mut out = String::new();
    for span in parse_emphasis(text) {
        let escaped = escape(&span.text);
        match (span.bold, span.italic) {
            (true, true) => {
                let _ = write!(out, "<strong><em>{}</em></strong>", escaped);
            }
            (true, false) => {
                let _ = write!(out, "<strong>{}</strong>", escaped);
            }
            (false, true) => {
                let _ = write!(out, "<em>{}</em>", escaped);
            }
            (false, false) => out.push_str(&escaped),
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
