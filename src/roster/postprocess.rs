//! Post-processing passes over a completed roster.

use log::{debug, trace};

use crate::schema::{GameSystemGroup, SelectionKind};

use super::{Force, Roster, RosterCost, Selection};

/// Merges structurally identical sibling selections, bottom-up, summing
/// quantities into the first occurrence. Costs are stored per unit, so
/// merging never touches them.
pub fn merge_sibling_selections(force: &mut Force, ignored_kinds: &[SelectionKind]) {
    merge_siblings(&mut force.selections, ignored_kinds);
}

fn merge_siblings(selections: &mut Vec<Selection>, ignored_kinds: &[SelectionKind]) {
    // Children first, so siblings whose subtrees only become identical
    // after their own duplicates merge still collapse
    for selection in selections.iter_mut() {
        merge_siblings(&mut selection.selections, ignored_kinds);
    }

    let mut i = 0;
    while i < selections.len() {
        let mut j = i + 1;
        while j < selections.len() {
            if can_merge(&selections[i], &selections[j], ignored_kinds) {
                let number = selections[j].number;
                trace!(
                    "Merging duplicate sibling {} ({} + {})",
                    selections[i].name,
                    selections[i].number,
                    number
                );
                selections[i].number += number;
                selections.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

fn can_merge(a: &Selection, b: &Selection, ignored_kinds: &[SelectionKind]) -> bool {
    if ignored_kinds.contains(&a.kind) {
        return false;
    }
    structurally_equal(a, b)
}

/// Two selections are structurally equal when entry, group and every
/// paired child subtree (in order) agree.
fn structurally_equal(a: &Selection, b: &Selection) -> bool {
    a.entry_id == b.entry_id
        && a.entry_group_id == b.entry_group_id
        && a.selections.len() == b.selections.len()
        && a.selections
            .iter()
            .zip(&b.selections)
            .all(|(left, right)| structurally_equal(left, right))
}

/// Sums every cost type defined by the game system across the whole
/// roster: each selection contributes `value * number` per cost, plus
/// any roster-level costs already present. Must run after merging, when
/// selection quantities are final.
pub fn aggregate_costs(roster: &mut Roster, group: &GameSystemGroup) {
    let mut totals: Vec<RosterCost> = group
        .cost_types()
        .iter()
        .map(|cost_type| RosterCost {
            name: cost_type.name.clone(),
            type_id: cost_type.id.clone(),
            value: 0.0,
        })
        .collect();

    for cost in &roster.costs {
        if let Some(total) = totals.iter_mut().find(|t| t.name == cost.name) {
            total.value += cost.value;
        }
    }

    for force in &roster.forces {
        for selection in &force.selections {
            sum_selection(selection, &mut totals);
        }
    }

    debug!("Aggregated roster costs: {:?}", totals);
    roster.costs = totals;
}

fn sum_selection(selection: &Selection, totals: &mut [RosterCost]) {
    for cost in &selection.costs {
        if let Some(total) = totals.iter_mut().find(|t| t.name == cost.name) {
            total.value += cost.value * f64::from(selection.number);
        }
    }
    for child in &selection.selections {
        sum_selection(child, totals);
    }
}
