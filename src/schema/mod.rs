//! Schema tree model: the immutable game system + catalogue data every
//! roster parse resolves against.

mod group;
pub mod nodes;
pub mod records;
mod search;

pub use group::GameSystemGroup;
pub use nodes::{
    Catalogue, CategoryEntry, CategoryLink, Characteristic, Constraint, Cost, CostType,
    EntryLink, ForceEntry, GameSystem, InfoGroup, InfoLink, LinkKind, Modifier, ModifierKind,
    Profile, Publication, Rule, SelectionEntry, SelectionEntryGroup, SelectionKind,
};
pub use search::{Field, NameMatch, NodeRef, NodeVariant};
