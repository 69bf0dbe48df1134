//! The roster tree and its construction from resolved entries.

mod assembler;
mod parser;
mod postprocess;

pub use parser::{parse_roster, parse_roster_task, RosterParseResult};
pub use postprocess::{aggregate_costs, merge_sibling_selections};

use std::path::Path;

use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};

use crate::resolver::EntryMatch;
use crate::schema::{Cost, ForceEntry, GameSystemGroup, NodeRef, SelectionKind};

/// A reconstructed army list: the artifact of one parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub id: String,
    pub name: String,
    pub game_system_id: String,
    pub game_system_name: String,
    pub forces: Vec<Force>,
    /// One aggregated cost per game system cost type, filled by
    /// [`aggregate_costs`]
    pub costs: Vec<RosterCost>,
}

impl Roster {
    pub fn new(group: &GameSystemGroup, name: impl Into<String>) -> Self {
        let system = group.game_system();
        Self {
            id: group.claim_id(),
            name: name.into(),
            game_system_id: system.id.clone(),
            game_system_name: system.name.clone().unwrap_or_default(),
            forces: Vec::new(),
            costs: Vec::new(),
        }
    }
}

/// One force (detachment) of a roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Force {
    pub id: String,
    /// The force entry this force was resolved to, when one matched
    pub entry_id: Option<String>,
    pub name: String,
    pub catalogue_id: Option<String>,
    pub catalogue_name: Option<String>,
    pub selections: Vec<Selection>,
    pub categories: Vec<Category>,
}

impl Force {
    /// Builds a force from a force token's fields and, when resolution
    /// succeeded, its force entry.
    pub fn from_entry(
        group: &GameSystemGroup,
        name: impl Into<String>,
        entry: Option<&ForceEntry>,
    ) -> Self {
        let categories = entry
            .map(|entry| {
                entry
                    .category_links
                    .iter()
                    .filter_map(|link| Category::from_link(group, &link.target_id, link.primary))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: group.claim_id(),
            entry_id: entry.map(|entry| entry.id.clone()),
            name: name.into(),
            catalogue_id: None,
            catalogue_name: None,
            selections: Vec::new(),
            categories,
        }
    }
}

/// One selection: a unit, model or upgrade placed in a force.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub id: String,
    /// Always a schema entry id; unresolved candidates never become
    /// selections
    pub entry_id: String,
    /// Set when the entry was found as a direct member of an entry group
    pub entry_group_id: Option<String>,
    pub name: String,
    /// Quantity, at least 1
    pub number: u32,
    pub kind: SelectionKind,
    /// Per-unit costs; totals multiply by `number`
    pub costs: Vec<RosterCost>,
    pub categories: Vec<Category>,
    pub profiles: Vec<RosterProfile>,
    pub rules: Vec<RosterRule>,
    pub selections: Vec<Selection>,
}

impl Selection {
    /// Builds a selection from a resolution outcome. Costs start from
    /// the entry and are overridden per name by costs on the traversed
    /// link.
    pub fn from_match(
        group: &GameSystemGroup,
        matched: &EntryMatch<'_>,
        fallback_name: &str,
        number: u32,
    ) -> Self {
        let entry = matched.entry;

        let mut costs: Vec<RosterCost> = entry.costs.iter().map(RosterCost::from_cost).collect();
        if let Some(link) = matched.link {
            for cost in &link.costs {
                match costs.iter_mut().find(|c| c.name == cost.name) {
                    Some(existing) => existing.value = cost.value,
                    None => costs.push(RosterCost::from_cost(cost)),
                }
            }
        }

        let mut categories: Vec<Category> = entry
            .category_links
            .iter()
            .filter_map(|link| Category::from_link(group, &link.target_id, link.primary))
            .collect();
        if let Some(link) = matched.link {
            categories.extend(
                link.category_links
                    .iter()
                    .filter_map(|l| Category::from_link(group, &l.target_id, l.primary)),
            );
        }

        let mut profiles: Vec<RosterProfile> =
            entry.profiles.iter().map(RosterProfile::from_profile).collect();
        let mut rules: Vec<RosterRule> = entry.rules.iter().map(RosterRule::from_rule).collect();

        for info_group in &entry.info_groups {
            profiles.extend(info_group.profiles.iter().map(RosterProfile::from_profile));
            rules.extend(info_group.rules.iter().map(RosterRule::from_rule));
        }
        for info_link in &entry.info_links {
            match group.search_by_id(&info_link.target_id) {
                Some(NodeRef::Profile(profile)) => {
                    profiles.push(RosterProfile::from_profile(profile))
                }
                Some(NodeRef::Rule(rule)) => rules.push(RosterRule::from_rule(rule)),
                _ => {}
            }
        }

        let display_name = matched
            .link
            .and_then(|link| link.name.as_deref())
            .or(entry.name.as_deref())
            .unwrap_or(fallback_name);

        Self {
            id: group.claim_id(),
            entry_id: entry.id.clone(),
            entry_group_id: matched.group.map(|g| g.id.clone()),
            name: display_name.to_string(),
            number: number.max(1),
            kind: entry.kind,
            costs,
            categories,
            profiles,
            rules,
            selections: Vec::new(),
        }
    }
}

/// A cost value attached to a roster node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterCost {
    pub name: String,
    pub type_id: String,
    pub value: f64,
}

impl RosterCost {
    fn from_cost(cost: &Cost) -> Self {
        Self {
            name: cost.name.clone(),
            type_id: cost.type_id.clone(),
            value: cost.value,
        }
    }
}

/// A category assignment on a force or selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub entry_id: String,
    pub name: String,
    pub primary: bool,
}

impl Category {
    fn from_link(group: &GameSystemGroup, target_id: &str, primary: bool) -> Option<Self> {
        match group.search_by_id(target_id)? {
            NodeRef::CategoryEntry(category) => Some(Self {
                id: group.claim_id(),
                entry_id: category.id.clone(),
                name: category.name.clone().unwrap_or_default(),
                primary,
            }),
            _ => None,
        }
    }
}

/// A profile carried over from the schema for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterProfile {
    pub id: String,
    pub name: String,
    pub type_name: String,
    pub characteristics: Vec<RosterCharacteristic>,
}

impl RosterProfile {
    fn from_profile(profile: &crate::schema::Profile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone().unwrap_or_default(),
            type_name: profile.type_name.clone(),
            characteristics: profile
                .characteristics
                .iter()
                .map(|c| RosterCharacteristic {
                    name: c.name.clone(),
                    value: c.value.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterCharacteristic {
    pub name: String,
    pub value: String,
}

/// A rule carried over from the schema for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRule {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl RosterRule {
    fn from_rule(rule: &crate::schema::Rule) -> Self {
        Self {
            id: rule.id.clone(),
            name: rule.name.clone().unwrap_or_default(),
            description: rule.description.clone(),
        }
    }
}

/// Save a roster to disk as JSON
pub fn save_roster(roster: &Roster, path: &Path) -> Result<()> {
    info!("Saving roster {} to {}", roster.name, path.display());
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, roster)?;
    Ok(())
}

/// Load a previously saved roster from disk
pub fn load_roster(path: &Path) -> Result<Roster> {
    info!("Loading roster from {}", path.display());
    let file = std::fs::File::open(path)?;
    let roster = serde_json::from_reader(file)?;
    Ok(roster)
}
