//! Typed schema nodes.
//!
//! Each node is constructed from its decoded record: scalar fields are
//! parsed into typed values and child collections are built recursively.
//! The resulting tree is immutable for the life of the process; cross
//! references between nodes stay string ids and are resolved on demand
//! through [`super::group::GameSystemGroup`].

use serde::{Deserialize, Serialize};

use super::records::{
    CatalogueRecord, CategoryLinkRecord, CategoryRecord, CharacteristicRecord, ConstraintRecord,
    CostRecord, CostTypeRecord, EntryRecord, ForceRecord, GameSystemRecord, GroupRecord,
    InfoGroupRecord, InfoLinkRecord, LinkRecord, ModifierRecord, ProfileRecord, PublicationRecord,
    RuleRecord,
};

/// What kind of thing a selection entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Unit,
    Model,
    Upgrade,
}

impl SelectionKind {
    fn parse(raw: &str) -> Self {
        match raw {
            "unit" => SelectionKind::Unit,
            "model" => SelectionKind::Model,
            _ => SelectionKind::Upgrade,
        }
    }
}

/// Whether an entry link points at a single entry or at a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Entry,
    Group,
}

impl LinkKind {
    fn parse(raw: &str) -> Self {
        match raw {
            "selectionEntryGroup" => LinkKind::Group,
            _ => LinkKind::Entry,
        }
    }
}

/// How a modifier changes its target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    Set,
    Increment,
    Decrement,
    Append,
    Other,
}

impl ModifierKind {
    fn parse(raw: &str) -> Self {
        match raw {
            "set" => ModifierKind::Set,
            "increment" => ModifierKind::Increment,
            "decrement" => ModifierKind::Decrement,
            "append" => ModifierKind::Append,
            _ => ModifierKind::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSystem {
    pub id: String,
    pub name: Option<String>,
    pub revision: u32,
    pub cost_types: Vec<CostType>,
    pub category_entries: Vec<CategoryEntry>,
    pub force_entries: Vec<ForceEntry>,
    pub selection_entries: Vec<SelectionEntry>,
    pub entry_links: Vec<EntryLink>,
    pub shared_selection_entries: Vec<SelectionEntry>,
    pub shared_selection_entry_groups: Vec<SelectionEntryGroup>,
    pub shared_rules: Vec<Rule>,
    pub shared_profiles: Vec<Profile>,
    pub publications: Vec<Publication>,
}

impl GameSystem {
    pub fn from_record(record: GameSystemRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            revision: record.revision,
            cost_types: build(record.cost_types, CostType::from_record),
            category_entries: build(record.category_entries, CategoryEntry::from_record),
            force_entries: build(record.force_entries, ForceEntry::from_record),
            selection_entries: build(record.selection_entries, SelectionEntry::from_record),
            entry_links: build(record.entry_links, EntryLink::from_record),
            shared_selection_entries: build(
                record.shared_selection_entries,
                SelectionEntry::from_record,
            ),
            shared_selection_entry_groups: build(
                record.shared_selection_entry_groups,
                SelectionEntryGroup::from_record,
            ),
            shared_rules: build(record.shared_rules, Rule::from_record),
            shared_profiles: build(record.shared_profiles, Profile::from_record),
            publications: build(record.publications, Publication::from_record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalogue {
    pub id: String,
    pub name: Option<String>,
    pub revision: u32,
    pub game_system_id: String,
    pub library: bool,
    pub category_entries: Vec<CategoryEntry>,
    pub selection_entries: Vec<SelectionEntry>,
    pub entry_links: Vec<EntryLink>,
    pub shared_selection_entries: Vec<SelectionEntry>,
    pub shared_selection_entry_groups: Vec<SelectionEntryGroup>,
    pub shared_rules: Vec<Rule>,
    pub shared_profiles: Vec<Profile>,
    pub publications: Vec<Publication>,
}

impl Catalogue {
    pub fn from_record(record: CatalogueRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            revision: record.revision,
            game_system_id: record.game_system_id,
            library: record.library,
            category_entries: build(record.category_entries, CategoryEntry::from_record),
            selection_entries: build(record.selection_entries, SelectionEntry::from_record),
            entry_links: build(record.entry_links, EntryLink::from_record),
            shared_selection_entries: build(
                record.shared_selection_entries,
                SelectionEntry::from_record,
            ),
            shared_selection_entry_groups: build(
                record.shared_selection_entry_groups,
                SelectionEntryGroup::from_record,
            ),
            shared_rules: build(record.shared_rules, Rule::from_record),
            shared_profiles: build(record.shared_profiles, Profile::from_record),
            publications: build(record.publications, Publication::from_record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionEntry {
    pub id: String,
    pub name: Option<String>,
    pub kind: SelectionKind,
    pub hidden: bool,
    pub costs: Vec<Cost>,
    pub constraints: Vec<Constraint>,
    pub modifiers: Vec<Modifier>,
    pub category_links: Vec<CategoryLink>,
    pub selection_entries: Vec<SelectionEntry>,
    pub selection_entry_groups: Vec<SelectionEntryGroup>,
    pub entry_links: Vec<EntryLink>,
    pub info_links: Vec<InfoLink>,
    pub info_groups: Vec<InfoGroup>,
    pub rules: Vec<Rule>,
    pub profiles: Vec<Profile>,
}

impl SelectionEntry {
    pub fn from_record(record: EntryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            kind: SelectionKind::parse(&record.entry_type),
            hidden: record.hidden,
            costs: build(record.costs, Cost::from_record),
            constraints: build(record.constraints, Constraint::from_record),
            modifiers: build(record.modifiers, Modifier::from_record),
            category_links: build(record.category_links, CategoryLink::from_record),
            selection_entries: build(record.selection_entries, SelectionEntry::from_record),
            selection_entry_groups: build(
                record.selection_entry_groups,
                SelectionEntryGroup::from_record,
            ),
            entry_links: build(record.entry_links, EntryLink::from_record),
            info_links: build(record.info_links, InfoLink::from_record),
            info_groups: build(record.info_groups, InfoGroup::from_record),
            rules: build(record.rules, Rule::from_record),
            profiles: build(record.profiles, Profile::from_record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionEntryGroup {
    pub id: String,
    pub name: Option<String>,
    pub hidden: bool,
    pub default_selection_entry_id: Option<String>,
    pub constraints: Vec<Constraint>,
    pub modifiers: Vec<Modifier>,
    pub selection_entries: Vec<SelectionEntry>,
    pub selection_entry_groups: Vec<SelectionEntryGroup>,
    pub entry_links: Vec<EntryLink>,
}

impl SelectionEntryGroup {
    pub fn from_record(record: GroupRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            hidden: record.hidden,
            default_selection_entry_id: record.default_selection_entry_id,
            constraints: build(record.constraints, Constraint::from_record),
            modifiers: build(record.modifiers, Modifier::from_record),
            selection_entries: build(record.selection_entries, SelectionEntry::from_record),
            selection_entry_groups: build(
                record.selection_entry_groups,
                SelectionEntryGroup::from_record,
            ),
            entry_links: build(record.entry_links, EntryLink::from_record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntryLink {
    pub id: String,
    pub name: Option<String>,
    pub target_id: String,
    pub kind: LinkKind,
    pub hidden: bool,
    pub costs: Vec<Cost>,
    pub modifiers: Vec<Modifier>,
    pub constraints: Vec<Constraint>,
    pub category_links: Vec<CategoryLink>,
}

impl EntryLink {
    pub fn from_record(record: LinkRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            target_id: record.target_id,
            kind: LinkKind::parse(&record.link_type),
            hidden: record.hidden,
            costs: build(record.costs, Cost::from_record),
            modifiers: build(record.modifiers, Modifier::from_record),
            constraints: build(record.constraints, Constraint::from_record),
            category_links: build(record.category_links, CategoryLink::from_record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForceEntry {
    pub id: String,
    pub name: Option<String>,
    pub hidden: bool,
    pub modifiers: Vec<Modifier>,
    pub constraints: Vec<Constraint>,
    pub category_links: Vec<CategoryLink>,
    pub force_entries: Vec<ForceEntry>,
}

impl ForceEntry {
    pub fn from_record(record: ForceRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            hidden: record.hidden,
            modifiers: build(record.modifiers, Modifier::from_record),
            constraints: build(record.constraints, Constraint::from_record),
            category_links: build(record.category_links, CategoryLink::from_record),
            force_entries: build(record.force_entries, ForceEntry::from_record),
        }
    }

    /// The displayed name of a force entry can come from a `set` modifier
    /// on the `name` field instead of the entry's own attribute.
    pub fn effective_name(&self) -> Option<&str> {
        self.modifiers
            .iter()
            .find(|m| m.kind == ModifierKind::Set && m.field == "name")
            .map(|m| m.value.as_str())
            .or(self.name.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct CategoryEntry {
    pub id: String,
    pub name: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub constraints: Vec<Constraint>,
}

impl CategoryEntry {
    pub fn from_record(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            modifiers: build(record.modifiers, Modifier::from_record),
            constraints: build(record.constraints, Constraint::from_record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub id: String,
    pub name: Option<String>,
    pub target_id: String,
    pub primary: bool,
}

impl CategoryLink {
    pub fn from_record(record: CategoryLinkRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            target_id: record.target_id,
            primary: record.primary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InfoLink {
    pub id: String,
    pub name: Option<String>,
    pub target_id: String,
    pub link_type: String,
}

impl InfoLink {
    pub fn from_record(record: InfoLinkRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            target_id: record.target_id,
            link_type: record.link_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InfoGroup {
    pub id: String,
    pub name: Option<String>,
    pub rules: Vec<Rule>,
    pub profiles: Vec<Profile>,
    pub info_links: Vec<InfoLink>,
}

impl InfoGroup {
    pub fn from_record(record: InfoGroupRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            rules: build(record.rules, Rule::from_record),
            profiles: build(record.profiles, Profile::from_record),
            info_links: build(record.info_links, InfoLink::from_record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub name: Option<String>,
    pub description: String,
    pub publication_id: Option<String>,
}

impl Rule {
    pub fn from_record(record: RuleRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            publication_id: record.publication_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: String,
    pub name: Option<String>,
    pub type_id: String,
    pub type_name: String,
    pub characteristics: Vec<Characteristic>,
}

impl Profile {
    pub fn from_record(record: ProfileRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            type_id: record.type_id,
            type_name: record.type_name,
            characteristics: build(record.characteristics, Characteristic::from_record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Characteristic {
    pub name: String,
    pub type_id: String,
    pub value: String,
}

impl Characteristic {
    pub fn from_record(record: CharacteristicRecord) -> Self {
        Self {
            name: record.name,
            type_id: record.type_id,
            value: record.value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub field: String,
    pub value: String,
}

impl Modifier {
    pub fn from_record(record: ModifierRecord) -> Self {
        Self {
            kind: ModifierKind::parse(&record.modifier_type),
            field: record.field,
            value: record.value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Constraint {
    pub id: String,
    pub constraint_type: String,
    pub field: String,
    pub scope: String,
    pub value: f64,
    pub shared: bool,
}

impl Constraint {
    pub fn from_record(record: ConstraintRecord) -> Self {
        Self {
            id: record.id,
            constraint_type: record.constraint_type,
            field: record.field,
            scope: record.scope,
            value: record.value,
            shared: record.shared,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cost {
    pub name: String,
    pub type_id: String,
    pub value: f64,
}

impl Cost {
    pub fn from_record(record: CostRecord) -> Self {
        Self {
            name: record.name,
            type_id: record.type_id,
            value: record.value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CostType {
    pub id: String,
    pub name: String,
    pub default_cost_limit: f64,
}

impl CostType {
    pub fn from_record(record: CostTypeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            default_cost_limit: record.default_cost_limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Publication {
    pub id: String,
    pub name: Option<String>,
    pub short_name: Option<String>,
}

impl Publication {
    pub fn from_record(record: PublicationRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            short_name: record.short_name,
        }
    }
}

fn build<R, N>(records: Vec<R>, f: impl Fn(R) -> N) -> Vec<N> {
    records.into_iter().map(f).collect()
}
