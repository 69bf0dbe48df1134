//! Registry of loaded game system groups.
//!
//! The registry replaces any notion of a global system manager: it is
//! constructed explicitly, owns every loaded group, and is passed by
//! reference to the operations that need schema access.

use log::{debug, info};
use parser_export::{parse_force_token, RosterToken, RosterTokenKind};

use crate::schema::{GameSystemGroup, NameMatch};

#[derive(Default)]
pub struct SystemRegistry {
    groups: Vec<GameSystemGroup>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    pub fn register(&mut self, group: GameSystemGroup) {
        info!(
            "Registered game system {} with {} catalogues",
            group.game_system().name.as_deref().unwrap_or("<unnamed>"),
            group.catalogues().len()
        );
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[GameSystemGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Detects which loaded game system an export belongs to: the first
    /// group holding an entry whose name exactly matches some force
    /// token's name. Returns `None` when no force line matches anything,
    /// which aborts the parse.
    pub fn detect_game_system(&self, tokens: &[RosterToken]) -> Option<&GameSystemGroup> {
        for token in tokens {
            if token.kind != RosterTokenKind::Force {
                continue;
            }
            let force_token = parse_force_token(&token.raw);
            let Some(name) = force_token.name else {
                continue;
            };
            for group in &self.groups {
                if group.search_by_name(&name, NameMatch::Exact).is_some() {
                    debug!(
                        "Force name {:?} matched game system {}",
                        name,
                        group.game_system().id
                    );
                    return Some(group);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::records::{ForceRecord, GameSystemRecord, ModifierRecord};
    use crate::schema::GameSystem;
    use parser_export::TokenReader;

    fn registry_with_force_entry(force_name: &str) -> SystemRegistry {
        let system = GameSystem::from_record(GameSystemRecord {
            id: "sys-1".to_string(),
            name: Some("Test System".to_string()),
            force_entries: vec![ForceRecord {
                id: "f-1".to_string(),
                name: Some(force_name.to_string()),
                ..Default::default()
            }],
            ..Default::default()
        });
        let mut registry = SystemRegistry::new();
        registry.register(GameSystemGroup::new(system));
        registry
    }

    #[test]
    fn test_detection_by_force_token_name() {
        let registry = registry_with_force_entry("Patrol Detachment");
        let tokens =
            TokenReader::new("++ Patrol Detachment 0CP (Some Faction) ++\n").read_all_tokens();
        assert!(registry.detect_game_system(&tokens).is_some());
    }

    #[test]
    fn test_detection_fails_without_matching_entry() {
        let registry = registry_with_force_entry("Patrol Detachment");
        let tokens =
            TokenReader::new("++ Onslaught Detachment 0CP (Some Faction) ++\n").read_all_tokens();
        assert!(registry.detect_game_system(&tokens).is_none());
    }

    #[test]
    fn test_detection_skips_non_force_tokens() {
        let registry = registry_with_force_entry("Patrol Detachment");
        let tokens = TokenReader::new("+ Patrol Detachment +\nPatrol Detachment\n").read_all_tokens();
        // Same name, but never on a force line
        assert!(registry.detect_game_system(&tokens).is_none());
    }

    #[test]
    fn test_detection_honors_force_entry_name_override() {
        let system = GameSystem::from_record(GameSystemRecord {
            id: "sys-1".to_string(),
            name: Some("Test System".to_string()),
            force_entries: vec![ForceRecord {
                id: "f-1".to_string(),
                name: Some("Detachment".to_string()),
                modifiers: vec![ModifierRecord {
                    modifier_type: "set".to_string(),
                    field: "name".to_string(),
                    value: "Renamed Detachment".to_string(),
                }],
                ..Default::default()
            }],
            ..Default::default()
        });
        let mut registry = SystemRegistry::new();
        registry.register(GameSystemGroup::new(system));

        let tokens =
            TokenReader::new("++ Renamed Detachment 0CP (Faction) ++\n").read_all_tokens();
        assert!(registry.detect_game_system(&tokens).is_some());
    }
}
