//! Tree placement of resolved selections by depth index.
//!
//! The stack holds the path from the force root to the most recently
//! placed selection at each depth. Selections are addressed by index
//! paths into the force's tree rather than stored parent pointers, so
//! the tree stays freely mutable for the post-processing passes.

use crate::resolver::EntryMatch;

use super::{Force, Selection};

pub(crate) struct StackEntry<'a> {
    depth: usize,
    /// Index path from `force.selections` to this selection
    path: Vec<usize>,
    /// Resolution context for scoped lookups of deeper lines
    pub matched: EntryMatch<'a>,
}

/// The working stack of one force's parse.
pub(crate) struct SelectionStack<'a> {
    entries: Vec<StackEntry<'a>>,
}

impl<'a> SelectionStack<'a> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Discards every stacked entry that can no longer be a parent of a
    /// selection at `depth`. Depth 0 always starts a fresh branch.
    pub fn rewind(&mut self, depth: usize) {
        if depth == 0 {
            self.entries.clear();
            return;
        }
        while self
            .entries
            .last()
            .is_some_and(|entry| entry.depth >= depth)
        {
            self.entries.pop();
        }
    }

    /// The resolution context of the would-be parent after a rewind.
    pub fn parent_match(&self) -> Option<EntryMatch<'a>> {
        self.entries.last().map(|entry| entry.matched)
    }

    /// Attaches a selection under the current stack top (or directly to
    /// the force when the stack is empty) and pushes it as the new
    /// candidate parent. Returns the placed selection's index path.
    pub fn attach(
        &mut self,
        force: &mut Force,
        depth: usize,
        selection: Selection,
        matched: EntryMatch<'a>,
    ) -> Vec<usize> {
        let path = match self.entries.last() {
            Some(parent) => {
                let parent_selection = selection_at_mut(force, &parent.path);
                let mut path = parent.path.clone();
                path.push(parent_selection.selections.len());
                parent_selection.selections.push(selection);
                path
            }
            None => {
                force.selections.push(selection);
                vec![force.selections.len() - 1]
            }
        };

        self.entries.push(StackEntry {
            depth,
            path: path.clone(),
            matched,
        });
        path
    }
}

/// Walks an index path to a mutable selection. Paths come from the
/// stack, which only ever hands out paths it has placed, so indexing is
/// in bounds.
pub(crate) fn selection_at_mut<'f>(force: &'f mut Force, path: &[usize]) -> &'f mut Selection {
    let (first, rest) = path
        .split_first()
        .expect("selection paths are never empty");
    let mut current = &mut force.selections[*first];
    for index in rest {
        current = &mut current.selections[*index];
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_root_entry;
    use crate::schema::records::{CatalogueRecord, EntryRecord, GameSystemRecord};
    use crate::schema::{Catalogue, GameSystem, GameSystemGroup};

    fn test_group() -> GameSystemGroup {
        let system = GameSystem::from_record(GameSystemRecord {
            id: "sys-1".to_string(),
            name: Some("Test System".to_string()),
            ..Default::default()
        });
        let catalogue = Catalogue::from_record(CatalogueRecord {
            id: "cat-1".to_string(),
            name: Some("Test Catalogue".to_string()),
            game_system_id: "sys-1".to_string(),
            selection_entries: vec![EntryRecord {
                id: "e-unit".to_string(),
                name: Some("Unit".to_string()),
                entry_type: "unit".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        });
        let mut group = GameSystemGroup::new(system);
        group.add_catalogue(catalogue);
        group
    }

    fn empty_force(group: &GameSystemGroup) -> Force {
        Force::from_entry(group, "Force", None)
    }

    #[test]
    fn test_depth_sequence_builds_expected_tree() {
        let group = test_group();
        let matched = resolve_root_entry(&group, "Unit", true).unwrap();
        let mut force = empty_force(&group);
        let mut stack = SelectionStack::new();

        // Depth sequence [0, 1, 1, 0, 1]: selections 2 and 3 nest under
        // 1, selection 5 nests under 4
        for depth in [0usize, 1, 1, 0, 1] {
            stack.rewind(depth);
            let selection = Selection::from_match(&group, &matched, "Unit", 1);
            stack.attach(&mut force, depth, selection, matched);
        }

        assert_eq!(force.selections.len(), 2);
        assert_eq!(force.selections[0].selections.len(), 2);
        assert_eq!(force.selections[1].selections.len(), 1);
    }

    #[test]
    fn test_same_depth_replaces_stack_top() {
        let group = test_group();
        let matched = resolve_root_entry(&group, "Unit", true).unwrap();
        let mut force = empty_force(&group);
        let mut stack = SelectionStack::new();

        stack.rewind(0);
        stack.attach(
            &mut force,
            0,
            Selection::from_match(&group, &matched, "Unit", 1),
            matched,
        );
        stack.rewind(1);
        stack.attach(
            &mut force,
            1,
            Selection::from_match(&group, &matched, "Unit", 1),
            matched,
        );
        // A second depth-1 line displaces the first as stack top but
        // shares the same parent
        stack.rewind(1);
        stack.attach(
            &mut force,
            1,
            Selection::from_match(&group, &matched, "Unit", 1),
            matched,
        );

        assert_eq!(force.selections.len(), 1);
        assert_eq!(force.selections[0].selections.len(), 2);
    }

    #[test]
    fn test_deeper_nesting_follows_the_path() {
        let group = test_group();
        let matched = resolve_root_entry(&group, "Unit", true).unwrap();
        let mut force = empty_force(&group);
        let mut stack = SelectionStack::new();

        for depth in [0usize, 1, 2, 3] {
            stack.rewind(depth);
            let selection = Selection::from_match(&group, &matched, "Unit", 1);
            stack.attach(&mut force, depth, selection, matched);
        }

        let level1 = &force.selections[0];
        let level2 = &level1.selections[0];
        let level3 = &level2.selections[0];
        assert_eq!(level3.selections.len(), 1);
    }

    #[test]
    fn test_depth_gap_attaches_to_nearest_ancestor() {
        let group = test_group();
        let matched = resolve_root_entry(&group, "Unit", true).unwrap();
        let mut force = empty_force(&group);
        let mut stack = SelectionStack::new();

        // Depth jumps from 0 straight to 2, then back to 1: the depth-1
        // line still attaches under the depth-0 root
        for depth in [0usize, 2, 1] {
            stack.rewind(depth);
            let selection = Selection::from_match(&group, &matched, "Unit", 1);
            stack.attach(&mut force, depth, selection, matched);
        }

        assert_eq!(force.selections.len(), 1);
        assert_eq!(force.selections[0].selections.len(), 2);
    }
}
