//! Generic search over the schema tree.
//!
//! [`NodeRef`] is a closed sum of borrowed node variants; every search
//! works on it. Child collections are exposed as typed [`Field`] slices,
//! so the capability of a field is fixed by its type rather than checked
//! per element.

use super::nodes::{
    Catalogue, CategoryEntry, CategoryLink, CostType, EntryLink, ForceEntry, GameSystem,
    InfoGroup, InfoLink, Profile, Publication, Rule, SelectionEntry, SelectionEntryGroup,
};

/// How a name query is compared against candidate names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Exact,
    /// Candidate contains the query as a substring
    Partial,
}

impl NameMatch {
    pub fn matches(self, wanted: &str, candidate: Option<&str>) -> bool {
        match candidate {
            Some(name) => match self {
                NameMatch::Exact => name == wanted,
                NameMatch::Partial => name.contains(wanted),
            },
            None => false,
        }
    }
}

/// A borrowed reference to any searchable schema node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    GameSystem(&'a GameSystem),
    Catalogue(&'a Catalogue),
    SelectionEntry(&'a SelectionEntry),
    SelectionEntryGroup(&'a SelectionEntryGroup),
    EntryLink(&'a EntryLink),
    CategoryEntry(&'a CategoryEntry),
    CategoryLink(&'a CategoryLink),
    ForceEntry(&'a ForceEntry),
    InfoLink(&'a InfoLink),
    InfoGroup(&'a InfoGroup),
    Rule(&'a Rule),
    Profile(&'a Profile),
    CostType(&'a CostType),
    Publication(&'a Publication),
}

/// One homogeneous child collection of a node.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    Entries(&'a [SelectionEntry]),
    Groups(&'a [SelectionEntryGroup]),
    EntryLinks(&'a [EntryLink]),
    Categories(&'a [CategoryEntry]),
    CategoryLinks(&'a [CategoryLink]),
    Forces(&'a [ForceEntry]),
    InfoLinks(&'a [InfoLink]),
    InfoGroups(&'a [InfoGroup]),
    Rules(&'a [Rule]),
    Profiles(&'a [Profile]),
    CostTypes(&'a [CostType]),
    Publications(&'a [Publication]),
}

impl<'a> Field<'a> {
    fn nodes(self) -> Vec<NodeRef<'a>> {
        match self {
            Field::Entries(items) => items.iter().map(NodeRef::SelectionEntry).collect(),
            Field::Groups(items) => items.iter().map(NodeRef::SelectionEntryGroup).collect(),
            Field::EntryLinks(items) => items.iter().map(NodeRef::EntryLink).collect(),
            Field::Categories(items) => items.iter().map(NodeRef::CategoryEntry).collect(),
            Field::CategoryLinks(items) => items.iter().map(NodeRef::CategoryLink).collect(),
            Field::Forces(items) => items.iter().map(NodeRef::ForceEntry).collect(),
            Field::InfoLinks(items) => items.iter().map(NodeRef::InfoLink).collect(),
            Field::InfoGroups(items) => items.iter().map(NodeRef::InfoGroup).collect(),
            Field::Rules(items) => items.iter().map(NodeRef::Rule).collect(),
            Field::Profiles(items) => items.iter().map(NodeRef::Profile).collect(),
            Field::CostTypes(items) => items.iter().map(NodeRef::CostType).collect(),
            Field::Publications(items) => items.iter().map(NodeRef::Publication).collect(),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $node:ident => $expr:expr) => {
        match $self {
            NodeRef::GameSystem($node) => $expr,
            NodeRef::Catalogue($node) => $expr,
            NodeRef::SelectionEntry($node) => $expr,
            NodeRef::SelectionEntryGroup($node) => $expr,
            NodeRef::EntryLink($node) => $expr,
            NodeRef::CategoryEntry($node) => $expr,
            NodeRef::CategoryLink($node) => $expr,
            NodeRef::ForceEntry($node) => $expr,
            NodeRef::InfoLink($node) => $expr,
            NodeRef::InfoGroup($node) => $expr,
            NodeRef::Rule($node) => $expr,
            NodeRef::Profile($node) => $expr,
            NodeRef::CostType($node) => $expr,
            NodeRef::Publication($node) => $expr,
        }
    };
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> &'a str {
        dispatch!(self, n => n.id.as_str())
    }

    pub fn name(self) -> Option<&'a str> {
        dispatch_name(self)
    }

    /// The name a search compares against. Force entries may take their
    /// name from a `set` modifier rather than their own attribute.
    pub fn effective_name(self) -> Option<&'a str> {
        match self {
            NodeRef::ForceEntry(force) => force.effective_name(),
            other => other.name(),
        }
    }

    /// The node's searchable child collections.
    pub fn fields(self) -> Vec<Field<'a>> {
        match self {
            NodeRef::GameSystem(n) => vec![
                Field::CostTypes(&n.cost_types),
                Field::Categories(&n.category_entries),
                Field::Forces(&n.force_entries),
                Field::Entries(&n.selection_entries),
                Field::EntryLinks(&n.entry_links),
                Field::Entries(&n.shared_selection_entries),
                Field::Groups(&n.shared_selection_entry_groups),
                Field::Rules(&n.shared_rules),
                Field::Profiles(&n.shared_profiles),
                Field::Publications(&n.publications),
            ],
            NodeRef::Catalogue(n) => vec![
                Field::Categories(&n.category_entries),
                Field::Entries(&n.selection_entries),
                Field::EntryLinks(&n.entry_links),
                Field::Entries(&n.shared_selection_entries),
                Field::Groups(&n.shared_selection_entry_groups),
                Field::Rules(&n.shared_rules),
                Field::Profiles(&n.shared_profiles),
                Field::Publications(&n.publications),
            ],
            NodeRef::SelectionEntry(n) => vec![
                Field::Entries(&n.selection_entries),
                Field::Groups(&n.selection_entry_groups),
                Field::EntryLinks(&n.entry_links),
                Field::CategoryLinks(&n.category_links),
                Field::InfoLinks(&n.info_links),
                Field::InfoGroups(&n.info_groups),
                Field::Rules(&n.rules),
                Field::Profiles(&n.profiles),
            ],
            NodeRef::SelectionEntryGroup(n) => vec![
                Field::Entries(&n.selection_entries),
                Field::Groups(&n.selection_entry_groups),
                Field::EntryLinks(&n.entry_links),
            ],
            NodeRef::EntryLink(n) => vec![Field::CategoryLinks(&n.category_links)],
            NodeRef::ForceEntry(n) => vec![
                Field::Forces(&n.force_entries),
                Field::CategoryLinks(&n.category_links),
            ],
            NodeRef::InfoGroup(n) => vec![
                Field::Rules(&n.rules),
                Field::Profiles(&n.profiles),
                Field::InfoLinks(&n.info_links),
            ],
            NodeRef::CategoryEntry(_)
            | NodeRef::CategoryLink(_)
            | NodeRef::InfoLink(_)
            | NodeRef::Rule(_)
            | NodeRef::Profile(_)
            | NodeRef::CostType(_)
            | NodeRef::Publication(_) => Vec::new(),
        }
    }

    /// Finds the first node (self included) with the given id.
    pub fn search_by_id(self, id: &str, recursive: bool) -> Option<NodeRef<'a>> {
        if self.id() == id {
            return Some(self);
        }
        for field in self.fields() {
            for child in field.nodes() {
                if recursive {
                    if let Some(found) = child.search_by_id(id, true) {
                        return Some(found);
                    }
                } else if child.id() == id {
                    return Some(child);
                }
            }
        }
        None
    }

    /// Collects every node (self included) with the given id.
    pub fn search_all_by_id(self, id: &str, recursive: bool) -> Vec<NodeRef<'a>> {
        let mut found = Vec::new();
        self.collect_by_id(id, recursive, &mut found);
        found
    }

    fn collect_by_id(self, id: &str, recursive: bool, found: &mut Vec<NodeRef<'a>>) {
        if self.id() == id {
            found.push(self);
        }
        for field in self.fields() {
            for child in field.nodes() {
                if recursive {
                    child.collect_by_id(id, true, found);
                } else if child.id() == id {
                    found.push(child);
                }
            }
        }
    }

    /// Finds the first node (self included) whose effective name matches.
    pub fn search_by_name(self, name: &str, mode: NameMatch, recursive: bool) -> Option<NodeRef<'a>> {
        if mode.matches(name, self.effective_name()) {
            return Some(self);
        }
        for field in self.fields() {
            for child in field.nodes() {
                if recursive {
                    if let Some(found) = child.search_by_name(name, mode, true) {
                        return Some(found);
                    }
                } else if mode.matches(name, child.effective_name()) {
                    return Some(child);
                }
            }
        }
        None
    }

    /// Collects every node (self included) whose effective name matches.
    pub fn search_all_by_name(
        self,
        name: &str,
        mode: NameMatch,
        recursive: bool,
    ) -> Vec<NodeRef<'a>> {
        let mut found = Vec::new();
        self.collect_by_name(name, mode, recursive, &mut found);
        found
    }

    fn collect_by_name(
        self,
        name: &str,
        mode: NameMatch,
        recursive: bool,
        found: &mut Vec<NodeRef<'a>>,
    ) {
        if mode.matches(name, self.effective_name()) {
            found.push(self);
        }
        for field in self.fields() {
            for child in field.nodes() {
                if recursive {
                    child.collect_by_name(name, mode, true, found);
                } else if mode.matches(name, child.effective_name()) {
                    found.push(child);
                }
            }
        }
    }

    /// Collects every descendant of one variant, optionally flattened
    /// across nesting levels.
    pub fn get_all<T: NodeVariant>(self, recursive: bool) -> Vec<&'a T> {
        let mut found = Vec::new();
        self.collect_variant(recursive, &mut found);
        found
    }

    fn collect_variant<T: NodeVariant>(self, recursive: bool, found: &mut Vec<&'a T>) {
        for field in self.fields() {
            for child in field.nodes() {
                if let Some(node) = T::from_node(child) {
                    found.push(node);
                }
                if recursive {
                    child.collect_variant(recursive, found);
                }
            }
        }
    }
}

fn dispatch_name<'a>(node: NodeRef<'a>) -> Option<&'a str> {
    match node {
        NodeRef::GameSystem(n) => n.name.as_deref(),
        NodeRef::Catalogue(n) => n.name.as_deref(),
        NodeRef::SelectionEntry(n) => n.name.as_deref(),
        NodeRef::SelectionEntryGroup(n) => n.name.as_deref(),
        NodeRef::EntryLink(n) => n.name.as_deref(),
        NodeRef::CategoryEntry(n) => n.name.as_deref(),
        NodeRef::CategoryLink(n) => n.name.as_deref(),
        NodeRef::ForceEntry(n) => n.name.as_deref(),
        NodeRef::InfoLink(n) => n.name.as_deref(),
        NodeRef::InfoGroup(n) => n.name.as_deref(),
        NodeRef::Rule(n) => n.name.as_deref(),
        NodeRef::Profile(n) => n.name.as_deref(),
        NodeRef::CostType(n) => Some(n.name.as_str()),
        NodeRef::Publication(n) => n.name.as_deref(),
    }
}

/// Typed downcast from a [`NodeRef`], the `get_all::<T>` capability.
pub trait NodeVariant {
    fn from_node<'a>(node: NodeRef<'a>) -> Option<&'a Self>;
}

macro_rules! node_variant {
    ($ty:ty, $variant:ident) => {
        impl NodeVariant for $ty {
            fn from_node<'a>(node: NodeRef<'a>) -> Option<&'a Self> {
                match node {
                    NodeRef::$variant(n) => Some(n),
                    _ => None,
                }
            }
        }

        impl<'a> From<&'a $ty> for NodeRef<'a> {
            fn from(node: &'a $ty) -> Self {
                NodeRef::$variant(node)
            }
        }
    };
}

node_variant!(GameSystem, GameSystem);
node_variant!(Catalogue, Catalogue);
node_variant!(SelectionEntry, SelectionEntry);
node_variant!(SelectionEntryGroup, SelectionEntryGroup);
node_variant!(EntryLink, EntryLink);
node_variant!(CategoryEntry, CategoryEntry);
node_variant!(CategoryLink, CategoryLink);
node_variant!(ForceEntry, ForceEntry);
node_variant!(InfoLink, InfoLink);
node_variant!(InfoGroup, InfoGroup);
node_variant!(Rule, Rule);
node_variant!(Profile, Profile);
node_variant!(CostType, CostType);
node_variant!(Publication, Publication);
