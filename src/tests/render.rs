use crate::{
    compose, parse_fragment, render, render_with, ClauseNode, ComposedDocument, DocumentComposer, EmphasisStyle,
    EngineConfig, JsonRenderer, NumberStyle, NumberingScheme, Placement, PlainTextOptions, PlainTextRenderer,
    RenderFormat, Renderer,
};

fn sample() -> ComposedDocument {
    DocumentComposer::default()
        .with_title("Mutual **Non-Disclosure** Agreement")
        .compose(&[
            ClauseNode::text(r#""Purpose" means evaluating a *possible* partnership."#)
                .with_anchor("definitions")
                .with_heading("Definitions"),
            ClauseNode::branch(vec![
                ClauseNode::text("Information is provided **as is**.").with_anchor("as-is"),
                ClauseNode::text("Neither party warrants accuracy:")
                    .with_child(ClauseNode::text("express; or"))
                    .with_child(ClauseNode::text("implied, except under <<as-is>>.")),
            ])
            .with_anchor("no-warranty")
            .with_heading("No Warranty"),
        ])
        .unwrap()
}

// ============ Plain text ============

#[test]
fn plain_text_strips_emphasis() {
    insta::assert_snapshot!(render(&sample(), RenderFormat::PlainText).unwrap(), @r###"
    Mutual Non-Disclosure Agreement

    1. Definitions
        "Purpose" means evaluating a possible partnership.

    2. No Warranty
        (a) Information is provided as is.
        (b) Neither party warrants accuracy:
            (i) express; or
            (ii) implied, except under Clause 2(a).
    "###);
}

#[test]
fn plain_text_ascii_emphasis() {
    let config = EngineConfig::default().with_emphasis(EmphasisStyle::Ascii);
    let text = render_with(&sample(), RenderFormat::PlainText, &config).unwrap();

    assert!(text.starts_with("Mutual *Non-Disclosure* Agreement\n"));
    assert!(text.contains("evaluating a _possible_ partnership."));
    assert!(text.contains("(a) Information is provided *as is*."));
}

#[test]
fn plain_text_wraps_with_hanging_indent() {
    let renderer = PlainTextRenderer::new(PlainTextOptions::default().with_wrap_width(30));
    insta::assert_snapshot!(renderer.render(&sample()).unwrap(), @r###"
    Mutual Non-Disclosure Agreement

    1. Definitions
        "Purpose" means evaluating
        a possible partnership.

    2. No Warranty
        (a) Information is
            provided as is.
        (b) Neither party warrants
            accuracy:
            (i) express; or
            (ii) implied, except
                 under Clause 2(a).
    "###);
}

#[test]
fn plain_text_indent_is_configurable() {
    let doc = compose(&[ClauseNode::text("Parent").with_child(ClauseNode::text("child"))]).unwrap();
    let renderer = PlainTextRenderer::new(PlainTextOptions::default().with_indent(2));
    assert_eq!(renderer.render(&doc).unwrap(), "1. Parent\n  (a) child\n");
}

#[test]
fn plain_text_labels_blank_paragraphs() {
    let fragment = parse_fragment(
        "t",
        r#"{
            "title": "T",
            "paragraphs": [
                { "content": "", "subparagraphs": [ { "content": "x" } ] },
                { "content": "y" }
            ]
        }"#,
    )
    .unwrap();
    let doc = compose(&[fragment]).unwrap();

    insta::assert_snapshot!(render(&doc, RenderFormat::PlainText).unwrap(), @r###"
    1. T
        (a)
            (i) x
        (b) y
    "###);
    assert!(!render(&doc, RenderFormat::Html).unwrap().contains("<p></p>"));
}

// ============ HTML ============

#[test]
fn html_nests_ordered_lists() {
    insta::assert_snapshot!(render(&sample(), RenderFormat::Html).unwrap(), @r###"
    <article>
      <h1>Mutual <strong>Non-Disclosure</strong> Agreement</h1>
      <ol type="1">
        <li id="definitions" data-number="1">
          <h2>Definitions</h2>
          <p>&quot;Purpose&quot; means evaluating a <em>possible</em> partnership.</p>
        </li>
        <li id="no-warranty" data-number="2">
          <h2>No Warranty</h2>
          <ol type="a">
            <li id="as-is" data-number="2(a)">
              <p>Information is provided <strong>as is</strong>.</p>
            </li>
            <li id="clause-2.b" data-number="2(b)">
              <p>Neither party warrants accuracy:</p>
              <ol type="i">
                <li id="clause-2.b.i" data-number="2(b)(i)">
                  <p>express; or</p>
                </li>
                <li id="clause-2.b.ii" data-number="2(b)(ii)">
                  <p>implied, except under Clause 2(a).</p>
                </li>
              </ol>
            </li>
          </ol>
        </li>
      </ol>
    </article>
    "###);
}

#[test]
fn html_lists_follow_the_composed_scheme() {
    let scheme = NumberingScheme::new(vec![NumberStyle::UpperRoman, NumberStyle::UpperAlpha]);
    let doc = DocumentComposer::new(scheme)
        .compose(&[
            ClauseNode::text("A").with_anchor("first"),
            ClauseNode::text("B").with_anchor("second").with_child(ClauseNode::text("x")),
        ])
        .unwrap();

    insta::assert_snapshot!(render(&doc, RenderFormat::Html).unwrap(), @r###"
    <article>
      <ol type="I">
        <li id="first" data-number="I">
          <p>A</p>
        </li>
        <li id="second" data-number="II">
          <p>B</p>
          <ol type="A">
            <li id="clause-II.A" data-number="II(A)">
              <p>x</p>
            </li>
          </ol>
        </li>
      </ol>
    </article>
    "###);

    let text = render(&doc, RenderFormat::PlainText).unwrap();
    assert_eq!(text, "I. A\n\nII. B\n    (A) x\n");

    let round_trip = ComposedDocument::from_json(&render(&doc, RenderFormat::Json).unwrap()).unwrap();
    assert_eq!(round_trip.numbering(), doc.numbering());
}

#[test]
fn html_escapes_substituted_text() {
    let doc = compose(&[ClauseNode::text("Smith & Sons <Ltd>").with_anchor("x")]).unwrap();
    let html = render(&doc, RenderFormat::Html).unwrap();
    assert!(html.contains("<p>Smith &amp; Sons &lt;Ltd&gt;</p>"), "{html}");
}

// ============ JSON ============

#[test]
fn json_compact_shape() {
    let doc = compose(&[ClauseNode::text("Under this Agreement.").with_anchor("a").with_heading("H")]).unwrap();
    insta::assert_snapshot!(JsonRenderer::compact().render(&doc).unwrap(), @r###"{"sections":[{"number":["1"],"anchor":"a","heading":"H","content":"Under this Agreement."}],"defined_terms":{},"references":[{"source":["1"],"target":{"kind":"this-agreement"},"resolved":[]}],"numbering":{"styles":["decimal","lower-alpha","lower-roman"],"reference_prefix":"Clause","reference_format":"parenthesized"}}"###);
}

#[test]
fn json_round_trip() {
    let doc = sample();
    let json = render(&doc, RenderFormat::Json).unwrap();
    let parsed = ComposedDocument::from_json(&json).unwrap();

    assert_eq!(parsed, doc);
    assert!(json.contains("**as is**"), "JSON keeps raw emphasis markers");
}

#[test]
fn every_format_renders() {
    let doc = sample();
    for format in RenderFormat::ALL {
        let out = render(&doc, format).unwrap();
        assert!(out.contains("No Warranty"), "{format}: {out}");
    }
}

// ============ Preamble and closing ============

fn with_matter() -> ComposedDocument {
    compose(&[
        ClauseNode::text("This Agreement is made between:")
            .with_anchor("parties")
            .with_heading("Parties")
            .with_placement(Placement::Preamble)
            .with_child(ClauseNode::text("Acme Corp;"))
            .with_child(ClauseNode::text("Jane Doe.")),
        ClauseNode::text("Keep it secret.").with_anchor("secrecy").with_heading("Secrecy"),
        ClauseNode::text("For Acme Corp: ____")
            .with_anchor("signatures")
            .with_heading("Signatures")
            .with_placement(Placement::Closing),
    ])
    .unwrap()
}

#[test]
fn plain_text_writes_matter_around_sections() {
    insta::assert_snapshot!(render(&with_matter(), RenderFormat::PlainText).unwrap(), @r###"
    Parties
    This Agreement is made between:
    Acme Corp;
    Jane Doe.

    1. Secrecy
        Keep it secret.

    Signatures
    For Acme Corp: ____
    "###);
}

#[test]
fn html_writes_matter_as_sections() {
    insta::assert_snapshot!(render(&with_matter(), RenderFormat::Html).unwrap(), @r###"
    <article>
      <section class="preamble" id="parties">
        <h2>Parties</h2>
        <p>This Agreement is made between:</p>
        <ul>
          <li>
            <p>Acme Corp;</p>
          </li>
          <li>
            <p>Jane Doe.</p>
          </li>
        </ul>
      </section>
      <ol type="1">
        <li id="secrecy" data-number="1">
          <h2>Secrecy</h2>
          <p>Keep it secret.</p>
        </li>
      </ol>
      <section class="closing" id="signatures">
        <h2>Signatures</h2>
        <p>For Acme Corp: ____</p>
      </section>
    </article>
    "###);
}

#[test]
fn json_keeps_matter() {
    let doc = with_matter();
    let json = render(&doc, RenderFormat::Json).unwrap();
    let back = ComposedDocument::from_json(&json).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.preamble()[0].children().len(), 2);
}
