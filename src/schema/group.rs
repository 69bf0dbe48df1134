//! A game system and the catalogues loaded for it.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use log::{debug, trace, warn};
use uuid::Uuid;

use super::nodes::{Catalogue, CostType, EntryLink, GameSystem};
use super::search::{NameMatch, NodeRef};

/// One `GameSystem` plus the `Catalogue`s relevant to one roster.
///
/// The node tree is immutable once the group is assembled; only the two
/// side-tables below are written afterwards, and both writes are
/// idempotent, so concurrent roster parses can share a group freely.
pub struct GameSystemGroup {
    game_system: GameSystem,
    catalogues: Vec<Catalogue>,
    /// Memoized link resolutions: link id -> target id (None when the
    /// target does not exist). Never invalidated.
    link_targets: RwLock<HashMap<String, Option<String>>>,
    /// Ids handed out for newly created roster nodes, kept so the same
    /// id is never generated twice for one group.
    generated_ids: Mutex<HashSet<String>>,
}

impl GameSystemGroup {
    pub fn new(game_system: GameSystem) -> Self {
        Self {
            game_system,
            catalogues: Vec::new(),
            link_targets: RwLock::new(HashMap::new()),
            generated_ids: Mutex::new(HashSet::new()),
        }
    }

    pub fn add_catalogue(&mut self, catalogue: Catalogue) {
        if catalogue.game_system_id != self.game_system.id {
            warn!(
                "Catalogue {} targets game system {}, group is {}",
                catalogue.id, catalogue.game_system_id, self.game_system.id
            );
        }
        self.catalogues.push(catalogue);
    }

    pub fn game_system(&self) -> &GameSystem {
        &self.game_system
    }

    pub fn catalogues(&self) -> &[Catalogue] {
        &self.catalogues
    }

    pub fn cost_types(&self) -> &[CostType] {
        &self.game_system.cost_types
    }

    /// Member documents in search order: catalogues first, the game
    /// system last.
    pub fn documents(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.catalogues
            .iter()
            .map(NodeRef::Catalogue)
            .chain(std::iter::once(NodeRef::GameSystem(&self.game_system)))
    }

    pub fn find_catalogue_by_name(&self, name: &str) -> Option<&Catalogue> {
        self.catalogues
            .iter()
            .find(|catalogue| catalogue.name.as_deref() == Some(name))
    }

    /// Finds a node by id anywhere in the group.
    pub fn search_by_id(&self, id: &str) -> Option<NodeRef<'_>> {
        self.documents()
            .find_map(|document| document.search_by_id(id, true))
    }

    /// Finds the first node whose effective name matches.
    pub fn search_by_name(&self, name: &str, mode: NameMatch) -> Option<NodeRef<'_>> {
        self.documents()
            .find_map(|document| document.search_by_name(name, mode, true))
    }

    /// Collects every node whose effective name matches, in document
    /// search order.
    pub fn search_all_by_name(&self, name: &str, mode: NameMatch) -> Vec<NodeRef<'_>> {
        let mut found = Vec::new();
        for document in self.documents() {
            found.extend(document.search_all_by_name(name, mode, true));
        }
        found
    }

    /// Resolves an entry link's target, memoizing the outcome.
    ///
    /// Two threads computing the same resolution concurrently both write
    /// the same value, which is why no stronger synchronization than the
    /// table lock is needed.
    pub fn resolve_entry_link(&self, link: &EntryLink) -> Option<NodeRef<'_>> {
        let cached = self
            .link_targets
            .read()
            .ok()
            .and_then(|table| table.get(&link.id).cloned());

        let target_id = match cached {
            Some(resolved) => resolved,
            None => {
                let resolved = self
                    .search_by_id(&link.target_id)
                    .map(|node| node.id().to_string());
                if resolved.is_none() {
                    debug!(
                        "Entry link {} has no target {} in this group",
                        link.id, link.target_id
                    );
                }
                if let Ok(mut table) = self.link_targets.write() {
                    table.insert(link.id.clone(), resolved.clone());
                }
                resolved
            }
        };

        target_id.and_then(|id| self.search_by_id(&id))
    }

    /// Hands out an id that collides with nothing in the group: not a
    /// schema id and not a previously generated id.
    pub fn claim_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.search_by_id(&id).is_some() {
                trace!("Generated id {} collides with a schema node, retrying", id);
                continue;
            }
            let mut generated = match self.generated_ids.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if generated.insert(id.clone()) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::records::{
        CatalogueRecord, EntryRecord, GameSystemRecord, LinkRecord,
    };
    use crate::schema::nodes::SelectionEntry;

    fn test_system() -> GameSystem {
        GameSystem::from_record(GameSystemRecord {
            id: "sys-1".to_string(),
            name: Some("Test System".to_string()),
            shared_selection_entries: vec![EntryRecord {
                id: "e-shared".to_string(),
                name: Some("Shared Entry".to_string()),
                entry_type: "unit".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        })
    }

    fn test_catalogue() -> Catalogue {
        Catalogue::from_record(CatalogueRecord {
            id: "cat-1".to_string(),
            name: Some("Test Catalogue".to_string()),
            game_system_id: "sys-1".to_string(),
            entry_links: vec![LinkRecord {
                id: "l-shared".to_string(),
                name: Some("Shared Entry".to_string()),
                target_id: "e-shared".to_string(),
                link_type: "selectionEntry".to_string(),
                ..Default::default()
            }],
            selection_entries: vec![EntryRecord {
                id: "e-local".to_string(),
                name: Some("Local Entry".to_string()),
                entry_type: "unit".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        })
    }

    fn test_group() -> GameSystemGroup {
        let mut group = GameSystemGroup::new(test_system());
        group.add_catalogue(test_catalogue());
        group
    }

    #[test]
    fn test_search_spans_catalogues_and_system() {
        let group = test_group();
        assert!(group.search_by_id("e-local").is_some());
        assert!(group.search_by_id("e-shared").is_some());
        assert!(group.search_by_id("missing").is_none());
    }

    #[test]
    fn test_catalogues_searched_before_game_system() {
        let group = test_group();
        // Both the catalogue link and the system entry carry this name;
        // the catalogue hit must come back first
        let found = group
            .search_by_name("Shared Entry", NameMatch::Exact)
            .unwrap();
        assert_eq!(found.id(), "l-shared");
    }

    #[test]
    fn test_entry_link_resolution_is_memoized() {
        let group = test_group();
        let link = &group.catalogues()[0].entry_links[0];

        let target = group.resolve_entry_link(link).unwrap();
        assert_eq!(target.id(), "e-shared");

        // Memo table now holds the outcome
        let table = group.link_targets.read().unwrap();
        assert_eq!(
            table.get("l-shared"),
            Some(&Some("e-shared".to_string()))
        );
    }

    #[test]
    fn test_unresolvable_link_memoizes_none() {
        let group = test_group();
        let link = EntryLink::from_record(LinkRecord {
            id: "l-dangling".to_string(),
            target_id: "missing".to_string(),
            link_type: "selectionEntry".to_string(),
            ..Default::default()
        });

        assert!(group.resolve_entry_link(&link).is_none());
        let table = group.link_targets.read().unwrap();
        assert_eq!(table.get("l-dangling"), Some(&None));
    }

    #[test]
    fn test_claimed_ids_are_unique() {
        let group = test_group();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(group.claim_id()));
        }
    }

    #[test]
    fn test_find_catalogue_by_name() {
        let group = test_group();
        assert!(group.find_catalogue_by_name("Test Catalogue").is_some());
        assert!(group.find_catalogue_by_name("Other").is_none());
    }

    #[test]
    fn test_get_all_entries_across_group() {
        let group = test_group();
        let mut entries: Vec<&SelectionEntry> = Vec::new();
        for document in group.documents() {
            entries.extend(document.get_all::<SelectionEntry>(true));
        }
        assert_eq!(entries.len(), 2);
    }
}
