//! The roster parse pipeline: token stream in, roster tree out.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use parser_export::{
    parse_force_token, parse_selection_token, read_depth_index, strip_multiplier,
    RosterTokenKind, TokenReader,
};

use crate::registry::SystemRegistry;
use crate::resolver::{resolve_selection, suggest_similar};
use crate::schema::{ForceEntry, GameSystemGroup, NameMatch, NodeRef};
use crate::types::{RosterParseStats, RosterScannerConfig, UnresolvedName};

use super::assembler::SelectionStack;
use super::postprocess::{aggregate_costs, merge_sibling_selections};
use super::{Force, Roster, Selection};

/// The parsed roster plus statistics about how the parse went.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterParseResult {
    pub roster: Roster,
    pub stats: RosterParseStats,
}

/// Parses a roster export against the registry's loaded game systems.
///
/// Unresolvable selection names are logged and skipped; a force line
/// that matches no loaded game system aborts the whole parse.
pub fn parse_roster(
    registry: &SystemRegistry,
    text: &str,
    config: &RosterScannerConfig,
) -> Result<RosterParseResult> {
    let mut reader = TokenReader::new(text);
    let tokens = reader.read_all_tokens();

    let group = registry.detect_game_system(&tokens).ok_or_else(|| {
        anyhow!("no loaded game system matches any force line of this export")
    })?;
    info!(
        "Detected game system {} for this export",
        group.game_system().name.as_deref().unwrap_or("<unnamed>")
    );

    let mut roster = Roster::new(group, "Imported Roster");
    let mut stats = RosterParseStats::default();
    let mut stack = SelectionStack::new();

    for token in &tokens {
        match token.kind {
            RosterTokenKind::Force => {
                let force_token = parse_force_token(&token.raw);
                let name = force_token
                    .name
                    .unwrap_or_else(|| token.raw.trim_matches(['+', ' ']).to_string());

                let force_entry = find_force_entry(group, &name);
                if force_entry.is_none() {
                    debug!("No force entry named {:?}, keeping the force unresolved", name);
                }
                let mut force = Force::from_entry(group, &name, force_entry);

                if let Some(faction) = &force_token.faction {
                    match group.find_catalogue_by_name(faction) {
                        Some(catalogue) => {
                            force.catalogue_id = Some(catalogue.id.clone());
                            force.catalogue_name = catalogue.name.clone();
                        }
                        None => debug!("No catalogue named {:?} in this group", faction),
                    }
                }

                stack.clear();
                roster.forces.push(force);
                stats.forces += 1;
            }
            RosterTokenKind::Selection => {
                if roster.forces.is_empty() {
                    warn!("Selection line before any force, skipping: {}", token.raw);
                    stats.skipped += 1;
                    continue;
                }

                let (depth, rest) = read_depth_index(&token.raw);
                let selection_token = parse_selection_token(rest);
                if selection_token.name.is_empty() {
                    continue;
                }
                let (number, bare_name) = strip_multiplier(&selection_token.name);

                stack.rewind(depth);
                let parent = stack.parent_match();

                let Some(matched) = resolve_selection(
                    group,
                    bare_name,
                    parent.as_ref(),
                    config.allow_partial_matches,
                ) else {
                    record_unresolved(group, bare_name, config, &mut stats);
                    continue;
                };

                let mut selection = Selection::from_match(group, &matched, bare_name, number);

                // Sub-entries named on the same line scope to this
                // selection's own entry, with the usual root fallback
                for sub_entry in &selection_token.sub_entries {
                    let (sub_number, sub_name) = strip_multiplier(sub_entry);
                    match resolve_selection(
                        group,
                        sub_name,
                        Some(&matched),
                        config.allow_partial_matches,
                    ) {
                        Some(sub_match) => {
                            selection.selections.push(Selection::from_match(
                                group, &sub_match, sub_name, sub_number,
                            ));
                            stats.selections += 1;
                        }
                        None => record_unresolved(group, sub_name, config, &mut stats),
                    }
                }

                let force = roster
                    .forces
                    .last_mut()
                    .ok_or_else(|| anyhow!("selection outside any force"))?;
                stack.attach(force, depth, selection, matched);
                stats.selections += 1;
            }
            RosterTokenKind::Category => {
                debug!("Category line (informational): {}", token.raw);
                stats.categories += 1;
            }
            RosterTokenKind::Summary | RosterTokenKind::Comment => {}
        }
    }

    if config.merge_duplicate_selections {
        for force in &mut roster.forces {
            merge_sibling_selections(force, &[]);
        }
    }
    aggregate_costs(&mut roster, group);

    info!(
        "Parsed roster: {} forces, {} selections, {} skipped",
        stats.forces, stats.selections, stats.skipped
    );
    Ok(RosterParseResult { roster, stats })
}

/// Offloads one whole parse to a blocking worker thread. The parse
/// itself stays single-threaded; completion or failure is the task's
/// explicit result.
pub async fn parse_roster_task(
    registry: Arc<SystemRegistry>,
    text: String,
    config: RosterScannerConfig,
) -> Result<RosterParseResult> {
    let handle =
        tokio::task::spawn_blocking(move || parse_roster(&registry, &text, &config));
    handle.await?
}

/// Finds the force entry a force line names, exact match before partial.
fn find_force_entry<'a>(group: &'a GameSystemGroup, name: &str) -> Option<&'a ForceEntry> {
    let system = NodeRef::GameSystem(group.game_system());
    for mode in [NameMatch::Exact, NameMatch::Partial] {
        let found = system
            .get_all::<ForceEntry>(true)
            .into_iter()
            .find(|force| mode.matches(name, force.effective_name()));
        if found.is_some() {
            return found;
        }
    }
    None
}

fn record_unresolved(
    group: &GameSystemGroup,
    name: &str,
    config: &RosterScannerConfig,
    stats: &mut RosterParseStats,
) {
    let suggestions = suggest_similar(group, name, config.suggestion_limit);
    if suggestions.is_empty() {
        warn!("No entry matches {:?}; skipping", name);
    } else {
        warn!(
            "No entry matches {:?}; skipping (similar: {})",
            name,
            suggestions.join(", ")
        );
    }
    stats.skipped += 1;
    stats.unresolved.push(UnresolvedName {
        name: name.to_string(),
        suggestions,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::records::{
        CatalogueRecord, CostRecord, CostTypeRecord, EntryRecord, ForceRecord,
        GameSystemRecord, LinkRecord,
    };
    use crate::schema::{Catalogue, GameSystem};
    use pretty_assertions::assert_eq;

    fn entry_record(id: &str, name: &str, kind: &str, pts: f64) -> EntryRecord {
        EntryRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            entry_type: kind.to_string(),
            costs: vec![CostRecord {
                name: "pts".to_string(),
                type_id: "ct-pts".to_string(),
                value: pts,
            }],
            ..Default::default()
        }
    }

    fn test_registry() -> SystemRegistry {
        let system = GameSystem::from_record(GameSystemRecord {
            id: "sys-1".to_string(),
            name: Some("Test System".to_string()),
            cost_types: vec![CostTypeRecord {
                id: "ct-pts".to_string(),
                name: "pts".to_string(),
                default_cost_limit: -1.0,
            }],
            force_entries: vec![ForceRecord {
                id: "f-patrol".to_string(),
                name: Some("Patrol Detachment".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        });

        // A squad of troopers with a nested sergeant upgrade, plus a
        // shared character entry behind a catalogue link
        let mut squad = entry_record("e-squad", "Line Squad", "unit", 0.0);
        squad
            .selection_entries
            .push(entry_record("e-trooper", "Line Trooper", "model", 10.0));
        let mut sergeant = entry_record("e-sergeant", "Squad Sergeant", "model", 12.0);
        sergeant
            .selection_entries
            .push(entry_record("e-sword", "Power sword", "upgrade", 5.0));
        squad.selection_entries.push(sergeant);

        let catalogue = Catalogue::from_record(CatalogueRecord {
            id: "cat-raiders".to_string(),
            name: Some("Star Raiders".to_string()),
            game_system_id: "sys-1".to_string(),
            selection_entries: vec![squad],
            shared_selection_entries: vec![entry_record("e-captain", "Captain", "unit", 90.0)],
            entry_links: vec![LinkRecord {
                id: "l-captain".to_string(),
                name: Some("Captain".to_string()),
                target_id: "e-captain".to_string(),
                link_type: "selectionEntry".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        });

        let mut group = GameSystemGroup::new(system);
        group.add_catalogue(catalogue);
        let mut registry = SystemRegistry::new();
        registry.register(group);
        registry
    }

    const EXPORT: &str = "\
++ Patrol Detachment 0CP (Star Raiders) [250pts] ++

+ HQ +

Captain [90pts]

+ Troops +

Line Squad [160pts]
. 4x Line Trooper
. Squad Sergeant: Power sword

++ Total: [250pts] ++
";

    #[test]
    fn test_parse_full_export() {
        let registry = test_registry();
        let result =
            parse_roster(&registry, EXPORT, &RosterScannerConfig::default()).unwrap();

        let roster = &result.roster;
        assert_eq!(roster.forces.len(), 1);
        let force = &roster.forces[0];
        assert_eq!(force.name, "Patrol Detachment");
        assert_eq!(force.entry_id.as_deref(), Some("f-patrol"));
        assert_eq!(force.catalogue_name.as_deref(), Some("Star Raiders"));

        assert_eq!(force.selections.len(), 2);
        let captain = &force.selections[0];
        assert_eq!(captain.entry_id, "e-captain");

        let squad = &force.selections[1];
        assert_eq!(squad.entry_id, "e-squad");
        assert_eq!(squad.selections.len(), 2);

        let troopers = &squad.selections[0];
        assert_eq!(troopers.entry_id, "e-trooper");
        assert_eq!(troopers.number, 4);

        let sergeant = &squad.selections[1];
        assert_eq!(sergeant.entry_id, "e-sergeant");
        // The sub-entry on the sergeant's line nests under it
        assert_eq!(sergeant.selections.len(), 1);
        assert_eq!(sergeant.selections[0].entry_id, "e-sword");
    }

    #[test]
    fn test_parse_aggregates_costs() {
        let registry = test_registry();
        let result =
            parse_roster(&registry, EXPORT, &RosterScannerConfig::default()).unwrap();

        // 90 (captain) + 4 * 10 (troopers) + 12 (sergeant) + 5 (sword)
        let pts = result
            .roster
            .costs
            .iter()
            .find(|c| c.name == "pts")
            .unwrap();
        assert_eq!(pts.value, 147.0);
    }

    #[test]
    fn test_undetectable_game_system_aborts() {
        let registry = test_registry();
        let error = parse_roster(
            &registry,
            "++ Onslaught Warband 5CP (Nobody) ++\nCaptain\n",
            &RosterScannerConfig::default(),
        )
        .unwrap_err();
        assert!(error.to_string().contains("no loaded game system"));
    }

    #[test]
    fn test_unresolvable_selection_is_skipped() {
        let registry = test_registry();
        let export = "++ Patrol Detachment 0CP (Star Raiders) ++\nWarp Spider Squad\nCaptain\n";
        let result =
            parse_roster(&registry, export, &RosterScannerConfig::default()).unwrap();

        assert_eq!(result.stats.skipped, 1);
        assert_eq!(result.stats.unresolved[0].name, "Warp Spider Squad");
        // The resolvable line still lands in the tree
        assert_eq!(result.roster.forces[0].selections.len(), 1);
    }

    #[test]
    fn test_duplicate_siblings_merge_when_enabled() {
        let registry = test_registry();
        let export = "++ Patrol Detachment 0CP (Star Raiders) ++\nCaptain\nCaptain\n";

        let merged =
            parse_roster(&registry, export, &RosterScannerConfig::default()).unwrap();
        assert_eq!(merged.roster.forces[0].selections.len(), 1);
        assert_eq!(merged.roster.forces[0].selections[0].number, 2);

        let config = RosterScannerConfig {
            merge_duplicate_selections: false,
            ..Default::default()
        };
        let unmerged = parse_roster(&registry, export, &config).unwrap();
        assert_eq!(unmerged.roster.forces[0].selections.len(), 2);
    }

    #[tokio::test]
    async fn test_background_parse_task() {
        let registry = Arc::new(test_registry());
        let result = parse_roster_task(
            registry,
            EXPORT.to_string(),
            RosterScannerConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(result.roster.forces.len(), 1);
    }
}
