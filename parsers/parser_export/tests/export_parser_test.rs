use parser_export::{
    parse_force_token, parse_selection_token, read_depth_index, strip_multiplier, RosterTokenKind,
    TokenReader,
};
use pretty_assertions::assert_eq;

const EXPORT: &str = r#"++ Battalion Detachment 0CP (Imperium - Adeptus Astartes - Ultramarines) [63 PL, 1,158pts] ++

+ HQ +

Captain in Gravis Armor [6 PL, 129pts]: Boltstorm gauntlet, Master-crafted power sword

+ Troops +

Intercessor Squad [5 PL, 101pts]: Bolt rifle
. 4x Intercessor
. Intercessor Sergeant: Power sword

Intercessor Squad [5 PL, 101pts]: Bolt rifle
. 4x Intercessor
. Intercessor Sergeant: Chainsword

++ Total: [63 PL, 1,158pts] ++

Created with an army builder
"#;

fn classify_all(text: &str) -> Vec<RosterTokenKind> {
    TokenReader::new(text)
        .read_all_tokens()
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_full_export_classification() {
    let kinds = classify_all(EXPORT);
    assert_eq!(
        kinds,
        vec![
            RosterTokenKind::Force,
            RosterTokenKind::Category,
            RosterTokenKind::Selection,
            RosterTokenKind::Category,
            RosterTokenKind::Selection,
            RosterTokenKind::Selection,
            RosterTokenKind::Selection,
            RosterTokenKind::Selection,
            RosterTokenKind::Selection,
            RosterTokenKind::Selection,
            RosterTokenKind::Summary,
            RosterTokenKind::Comment,
        ]
    );
}

#[test]
fn test_force_line_fields() {
    let mut reader = TokenReader::new(EXPORT);
    let force = reader.read_token().unwrap();
    assert_eq!(force.kind, RosterTokenKind::Force);

    let token = parse_force_token(&force.raw);
    assert_eq!(token.name.as_deref(), Some("Battalion Detachment"));
    assert_eq!(token.cost.as_deref(), Some("0CP"));
    assert_eq!(
        token.faction.as_deref(),
        Some("Imperium - Adeptus Astartes - Ultramarines")
    );
    assert_eq!(token.cost_summary, vec!["63 PL", "1,158pts"]);
}

#[test]
fn test_nested_selection_lines() {
    let tokens = TokenReader::new(EXPORT).read_all_tokens();
    let selections: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == RosterTokenKind::Selection)
        .collect();

    let (depth, rest) = read_depth_index(&selections[1].raw);
    assert_eq!(depth, 0);
    let squad = parse_selection_token(rest);
    assert_eq!(squad.name, "Intercessor Squad");
    assert_eq!(squad.cost_summary, vec!["5 PL", "101pts"]);
    assert_eq!(squad.sub_entries, vec!["Bolt rifle"]);

    let (depth, rest) = read_depth_index(&selections[2].raw);
    assert_eq!(depth, 1);
    let models = parse_selection_token(rest);
    let (number, name) = strip_multiplier(&models.name);
    assert_eq!(number, 4);
    assert_eq!(name, "Intercessor");

    let (depth, rest) = read_depth_index(&selections[3].raw);
    assert_eq!(depth, 1);
    let sergeant = parse_selection_token(rest);
    assert_eq!(sergeant.name, "Intercessor Sergeant");
    assert_eq!(sergeant.sub_entries, vec!["Power sword"]);
}

#[test]
fn test_malformed_lines_degrade_to_partial_tokens() {
    // Unterminated faction bracket
    let token = parse_force_token("++ Outrider Detachment 1CP (Chaos - Death");
    assert_eq!(token.name.as_deref(), Some("Outrider Detachment"));
    assert_eq!(token.faction, None);

    // Unterminated cost bracket on a selection keeps the bracket text in
    // the name rather than failing
    let token = parse_selection_token("Overlord [6 PL, 140pts");
    assert_eq!(token.name, "Overlord [6 PL, 140pts");
    assert!(token.cost_summary.is_empty());
}
