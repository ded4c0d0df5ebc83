//! Inline emphasis markers in clause text.
//!
//! Clause text marks bold with `**...**` and italic with `*...*`. Markers are
//! paired in order of appearance; an unpaired marker is ordinary text.

use serde::{Deserialize, Serialize};

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmphasisSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

/// How plain-text output treats emphasis markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmphasisStyle {
    /// Drop the markers.
    Strip,
    /// Bold as `*text*`, italic as `_text_`.
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Strong,
    Em,
}

#[derive(Debug)]
enum Piece<'t> {
    Text(&'t str),
    Marker(Marker, bool),
}

impl Marker {
    fn literal(self) -> &'static str {
        match self {
            Marker::Strong => "**",
            Marker::Em => "*",
        }
    }
}

fn tokenize(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'*' {
            if start < i {
                pieces.push(Piece::Text(&text[start..i]));
            }
            if bytes.get(i + 1) == Some(&b'*') {
                pieces.push(Piece::Marker(Marker::Strong, false));
                i += 2;
            } else {
                pieces.push(Piece::Marker(Marker::Em, false));
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }
    if start < text.len() {
        pieces.push(Piece::Text(&text[start..]));
    }

    // Pair markers of each kind in order; a trailing odd one stays literal.
    for kind in [Marker::Strong, Marker::Em] {
        let positions: Vec<usize> = pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| matches!(p, Piece::Marker(k, _) if *k == kind))
            .map(|(idx, _)| idx)
            .collect();
        let paired = positions.len() - positions.len() % 2;
        for &idx in &positions[..paired] {
            if let Piece::Marker(_, matched) = &mut pieces[idx] {
                *matched = true;
            }
        }
    }
    pieces
}

/// Split `text` into runs of uniform emphasis.
pub fn parse_emphasis(text: &str) -> Vec<EmphasisSpan> {
    let mut spans: Vec<EmphasisSpan> = Vec::new();
    let mut bold = false;
    let mut italic = false;

    for piece in tokenize(text) {
        match piece {
            Piece::Text(s) => push_run(&mut spans, s, bold, italic),
            Piece::Marker(Marker::Strong, true) => bold = !bold,
            Piece::Marker(Marker::Em, true) => italic = !italic,
            Piece::Marker(kind, false) => push_run(&mut spans, kind.literal(), bold, italic),
        }
    }
    spans
}

fn push_run(spans: &mut Vec<EmphasisSpan>, s: &str, bold: bool, italic: bool) {
    if s.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.bold == bold && last.italic == italic => last.text.push_str(s),
        _ => spans.push(EmphasisSpan {
            text: s.to_string(),
            bold,
            italic,
        }),
    }
}

/// Remove emphasis markers, keeping the text.
pub fn strip_emphasis(text: &str) -> String {
    parse_emphasis(text).into_iter().map(|s| s.text).collect()
}

/// Render emphasis for plain-text output.
pub fn plain_emphasis(text: &str, style: EmphasisStyle) -> String {
    match style {
        EmphasisStyle::Strip => strip_emphasis(text),
        EmphasisStyle::Ascii => parse_emphasis(text)
            .into_iter()
            .map(|span| match (span.bold, span.italic) {
                (true, true) => format!("*_{}_*", span.text),
                (true, false) => format!("*{}*", span.text),
                (false, true) => format!("_{}_", span.text),
                (false, false) => span.text,
            })
            .collect(),
    }
}
