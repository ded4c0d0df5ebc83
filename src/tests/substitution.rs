use std::sync::Arc;

use proptest::prelude::*;

use crate::{
    required_placeholders, substitute, AssemblyError, ClauseNode, InflectionTable, NodePath, PartyRoleMap,
    RoleBinding, TermSubstitution,
};

fn party(name: &str, signatory: &str) -> PartyRoleMap {
    PartyRoleMap::new()
        .with_singular("PartyName", name)
        .with_singular("Signatory", signatory)
}

fn two_party() -> PartyRoleMap {
    PartyRoleMap::new()
        .with_singular("DisclosingParty", "Acme Corp")
        .with_singular("ReceivingParty", "Jane Doe")
}

fn multi_party() -> PartyRoleMap {
    PartyRoleMap::new()
        .with_singular("DisclosingParty", "Acme Corp")
        .with_plural("ReceivingParty", "the Receiving Parties")
}

fn text_of(tree: &ClauseNode) -> &str {
    tree.content.as_deref().unwrap_or_default()
}

// ============ Role tokens ============

#[test]
fn role_and_possessive_tokens() {
    let tree = ClauseNode::text("{{DisclosingParty}} shares {{ DisclosingParty's }} data with {{Receiving Party}}.");
    let out = substitute(&tree, &two_party()).unwrap();
    assert_eq!(text_of(&out), "Acme Corp shares Acme Corp's data with Jane Doe.");
}

#[test]
fn plural_possessive() {
    let tree = ClauseNode::text("{{ReceivingParty's}} obligations");
    let out = substitute(&tree, &multi_party()).unwrap();
    assert_eq!(text_of(&out), "the Receiving Parties' obligations");
}

#[test]
fn prose_role_names_are_untouched() {
    let tree = ClauseNode::text("The Receiving Party and the Disclosing Party agree.");
    let out = substitute(&tree, &PartyRoleMap::new()).unwrap();
    assert_eq!(out, tree);
}

// ============ Number agreement ============

#[test]
fn branch_picks_by_number() {
    let tree = ClauseNode::text(
        "by {{DisclosingParty}} to [[ReceivingParty: {{ReceivingParty}} | any of {{ReceivingParty}}]]",
    );

    let single = substitute(&tree, &two_party()).unwrap();
    assert_eq!(text_of(&single), "by Acme Corp to Jane Doe");

    let multi = substitute(&tree, &multi_party()).unwrap();
    assert_eq!(text_of(&multi), "by Acme Corp to any of the Receiving Parties");
}

#[test]
fn inflection_lookup() {
    let tree = ClauseNode::text("{{ReceivingParty}} [[ReceivingParty:has]] agreed that [[ReceivingParty:it]] [[ReceivingParty:is]] bound");

    assert_eq!(
        text_of(&substitute(&tree, &two_party()).unwrap()),
        "Jane Doe has agreed that it is bound"
    );
    assert_eq!(
        text_of(&substitute(&tree, &multi_party()).unwrap()),
        "the Receiving Parties have agreed that they are bound"
    );
}

#[test]
fn custom_inflections() {
    let roles = multi_party();
    let mut table = InflectionTable::default();
    table.merge(&InflectionTable::empty().with("undertakes", "undertakes", "each undertake"));

    let tree = ClauseNode::text("{{ReceivingParty}} [[ReceivingParty:undertakes]] to comply");
    let out = TermSubstitution::new(&roles, &table)
        .substitute(&tree, &NodePath::fragment("undertaking"))
        .unwrap();
    assert_eq!(text_of(&out), "the Receiving Parties each undertake to comply");
}

// ============ Whole trees ============

#[test]
fn heading_content_and_children() {
    let tree = ClauseNode::text("{{ReceivingParty}} shall:")
        .with_anchor("duties")
        .with_heading("Duties of {{ReceivingParty}}")
        .with_child(ClauseNode::text("protect {{DisclosingParty's}} information;"))
        .with_child(ClauseNode::text("comply with <<definitions>>."));

    let out = substitute(&tree, &two_party()).unwrap();

    assert_eq!(out.anchor.as_deref(), Some("duties"));
    assert_eq!(out.heading.as_deref(), Some("Duties of Jane Doe"));
    assert_eq!(text_of(&out), "Jane Doe shall:");
    assert_eq!(text_of(&out.children[0]), "protect Acme Corp's information;");
    assert_eq!(text_of(&out.children[1]), "comply with <<definitions>>.");
}

#[test]
fn templates_are_not_modified() {
    let template = Arc::new(ClauseNode::text("{{ReceivingParty}}").with_anchor("t"));
    let before = (*template).clone();

    let first = substitute(&template, &two_party()).unwrap();
    let second = substitute(&template, &multi_party()).unwrap();

    assert_eq!(*template, before);
    assert_eq!(text_of(&first), "Jane Doe");
    assert_eq!(text_of(&second), "the Receiving Parties");
}

#[test]
fn required_placeholders_lists_every_name() {
    let tree = ClauseNode::text("[[ReceivingParty: a | b]] {{Purpose}}")
        .with_heading("{{Governing Law}}")
        .with_child(ClauseNode::text("{{DisclosingParty's}}"));

    let names: Vec<String> = required_placeholders(&tree).into_iter().collect();
    assert_eq!(names, vec!["DisclosingParty", "GoverningLaw", "Purpose", "ReceivingParty"]);
}

// ============ Failures ============

#[test]
fn missing_binding_names_token_and_path() {
    let tree = ClauseNode::branch(vec![
        ClauseNode::text("fine"),
        ClauseNode::branch(vec![ClauseNode::text("provided by {{DisclosingParty}}")]),
    ])
    .with_anchor("definitions");
    let roles = PartyRoleMap::new().with_singular("ReceivingParty", "Jane Doe");

    let err = substitute(&tree, &roles).unwrap_err();
    assert_eq!(
        err,
        AssemblyError::UnresolvedPlaceholder {
            token: "DisclosingParty".to_string(),
            path: NodePath::fragment("definitions").child(1).child(0),
        }
    );
    assert_eq!(
        err.to_string(),
        "unresolved placeholder `DisclosingParty` at definitions/1/0"
    );
}

#[test]
fn first_failure_in_document_order() {
    let tree = ClauseNode::text("{{Second}}")
        .with_heading("{{First}}")
        .with_anchor("f");
    let err = substitute(&tree, &PartyRoleMap::new()).unwrap_err();
    assert!(matches!(err, AssemblyError::UnresolvedPlaceholder { ref token, .. } if token == "First"));
}

#[test]
fn missing_inflection_key() {
    let tree = ClauseNode::text("[[ReceivingParty:shalt]]").with_anchor("f");
    let err = substitute(&tree, &two_party()).unwrap_err();
    assert_eq!(
        err,
        AssemblyError::UnresolvedPlaceholder {
            token: "ReceivingParty:shalt".to_string(),
            path: NodePath::fragment("f"),
        }
    );
}

#[test]
fn unterminated_token_is_malformed() {
    let tree = ClauseNode::text("disclosed to {{ReceivingParty").with_anchor("f");
    let err = substitute(&tree, &two_party()).unwrap_err();
    match err {
        AssemblyError::MalformedClauseTree { path, reason } => {
            assert_eq!(path, NodePath::fragment("f"));
            assert!(reason.contains("{{"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn nested_branch_is_malformed() {
    let tree = ClauseNode::text("[[ReceivingParty: [[ReceivingParty: a | b]] | c]]").with_anchor("f");
    let err = substitute(&tree, &two_party()).unwrap_err();
    assert!(matches!(err, AssemblyError::MalformedClauseTree { .. }));
}

#[test]
fn branch_with_three_alternatives_is_malformed() {
    let tree = ClauseNode::text("[[ReceivingParty: one | two | three]]").with_anchor("f");
    let err = substitute(&tree, &two_party()).unwrap_err();
    assert_eq!(
        err,
        AssemblyError::MalformedClauseTree {
            path: NodePath::fragment("f"),
            reason: "branch `ReceivingParty` has 3 alternatives, expected singular and plural".to_string(),
        }
    );
}

// ============ Bound text ============

#[test]
fn bound_markers_are_escaped_not_expanded() {
    let roles = PartyRoleMap::new()
        .with_singular("DisclosingParty", "Acme {{Corp}}")
        .with_singular("ReceivingParty", "Jane <<Doe>> [[Jr]]");
    let tree = ClauseNode::text("{{DisclosingParty}} to [[ReceivingParty: {{ReceivingParty's}} | all]] file").with_anchor("f");

    let out = substitute(&tree, &roles).unwrap();
    assert_eq!(text_of(&out), r"Acme \{{Corp\}} to Jane \<<Doe\>> \[[Jr\]]'s file");
    assert_eq!(substitute(&out, &roles).unwrap(), out);
}

#[test]
fn template_markers_are_still_checked() {
    let roles = PartyRoleMap::new().with_singular("ReceivingParty", "Jane [[Doe]]");
    let tree = ClauseNode::text("{{ReceivingParty}} and [[stray").with_anchor("f");
    let err = substitute(&tree, &roles).unwrap_err();
    match err {
        AssemblyError::MalformedClauseTree { reason, .. } => assert!(reason.contains("[[stray"), "{reason}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============ Idempotence ============

proptest! {
    #[test]
    fn substitution_is_idempotent(
        name in "[A-Z][a-z]{1,10}( [A-Z][a-z]{1,10})?",
        plural in any::<bool>(),
        prose in "[a-z ,.]{0,40}",
    ) {
        let binding = if plural { RoleBinding::plural(name) } else { RoleBinding::singular(name) };
        let roles = PartyRoleMap::new().with("ReceivingParty", binding);
        let tree = ClauseNode::text(format!(
            "{} {{{{ReceivingParty's}}}} [[ReceivingParty:has]] {}",
            prose, prose
        ))
        .with_anchor("p");

        let once = substitute(&tree, &roles).unwrap();
        let twice = substitute(&once, &roles).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn names_with_markers_substitute_once(
        first in "[A-Z][a-z]{1,8}",
        marked in "(<<|>>|\\[\\[|\\]\\]|\\{\\{|\\}\\})[A-Za-z]{0,6}",
    ) {
        let roles = PartyRoleMap::new().with_singular("ReceivingParty", format!("{} {}", first, marked));
        let tree = ClauseNode::text("to {{ReceivingParty}} and [[ReceivingParty:its]] staff").with_anchor("p");

        let once = substitute(&tree, &roles).unwrap();
        let twice = substitute(&once, &roles).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn token_free_text_is_unchanged(prose in "[A-Za-z ,.;()\"']{1,80}") {
        let tree = ClauseNode::text(prose).with_anchor("p");
        let out = substitute(&tree, &PartyRoleMap::new()).unwrap();
        prop_assert_eq!(out, tree);
    }
}

// ============ Per-party paragraphs ============

#[test]
fn per_party_paragraphs_repeat_with_each_party() {
    let roles = two_party()
        .with_party(party("Acme Corp", "John Smith"))
        .with_party(party("Jane Doe", "Jane Doe"));
    let tree = ClauseNode::text("Signed for {{DisclosingParty}} and {{ReceivingParty}}:")
        .with_anchor("signatures")
        .with_child(ClauseNode::text("For {{PartyName}}: {{Signatory}}").per_party())
        .with_child(ClauseNode::text("Done."));

    let out = substitute(&tree, &roles).unwrap();
    let lines: Vec<&str> = out.children.iter().map(text_of).collect();
    assert_eq!(lines, vec!["For Acme Corp: John Smith", "For Jane Doe: Jane Doe", "Done."]);
    assert!(out.children.iter().all(|c| !c.per_party));
    assert_eq!(text_of(&out), "Signed for Acme Corp and Jane Doe:");
}

#[test]
fn per_party_paragraphs_without_parties_are_dropped() {
    let tree = ClauseNode::text("Signed:").with_child(ClauseNode::text("For {{PartyName}}").per_party());
    let out = substitute(&tree, &two_party()).unwrap();
    assert!(out.children.is_empty());
    assert!(required_placeholders(&tree).is_empty());
}

#[test]
fn per_party_errors_report_the_template_path() {
    let roles = two_party().with_party(PartyRoleMap::new().with_singular("PartyName", "Acme Corp"));
    let tree = ClauseNode::text("Signed:")
        .with_anchor("signatures")
        .with_child(ClauseNode::text("{{PartyName}} by {{Signatory}}").per_party());

    assert_eq!(
        substitute(&tree, &roles).unwrap_err(),
        AssemblyError::UnresolvedPlaceholder {
            token: "Signatory".to_string(),
            path: NodePath::fragment("signatures").child(0),
        }
    );
}
