//! Decoded schema document records.
//!
//! Records are the external representation of a game system or catalogue
//! document: plain serde structs, already decoded from their on-disk
//! format. The typed node tree in [`super::nodes`] is constructed from
//! them. Unknown fields are ignored and missing collections default to
//! empty, so partially filled documents still load.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSystemRecord {
    pub id: String,
    pub name: Option<String>,
    pub revision: u32,
    pub cost_types: Vec<CostTypeRecord>,
    pub category_entries: Vec<CategoryRecord>,
    pub force_entries: Vec<ForceRecord>,
    pub selection_entries: Vec<EntryRecord>,
    pub entry_links: Vec<LinkRecord>,
    pub shared_selection_entries: Vec<EntryRecord>,
    pub shared_selection_entry_groups: Vec<GroupRecord>,
    pub shared_rules: Vec<RuleRecord>,
    pub shared_profiles: Vec<ProfileRecord>,
    pub publications: Vec<PublicationRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogueRecord {
    pub id: String,
    pub name: Option<String>,
    pub revision: u32,
    pub game_system_id: String,
    pub library: bool,
    pub category_entries: Vec<CategoryRecord>,
    pub selection_entries: Vec<EntryRecord>,
    pub entry_links: Vec<LinkRecord>,
    pub shared_selection_entries: Vec<EntryRecord>,
    pub shared_selection_entry_groups: Vec<GroupRecord>,
    pub shared_rules: Vec<RuleRecord>,
    pub shared_profiles: Vec<ProfileRecord>,
    pub publications: Vec<PublicationRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryRecord {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub hidden: bool,
    pub costs: Vec<CostRecord>,
    pub constraints: Vec<ConstraintRecord>,
    pub modifiers: Vec<ModifierRecord>,
    pub category_links: Vec<CategoryLinkRecord>,
    pub selection_entries: Vec<EntryRecord>,
    pub selection_entry_groups: Vec<GroupRecord>,
    pub entry_links: Vec<LinkRecord>,
    pub info_links: Vec<InfoLinkRecord>,
    pub info_groups: Vec<InfoGroupRecord>,
    pub rules: Vec<RuleRecord>,
    pub profiles: Vec<ProfileRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: String,
    pub name: Option<String>,
    pub hidden: bool,
    pub default_selection_entry_id: Option<String>,
    pub constraints: Vec<ConstraintRecord>,
    pub modifiers: Vec<ModifierRecord>,
    pub selection_entries: Vec<EntryRecord>,
    pub selection_entry_groups: Vec<GroupRecord>,
    pub entry_links: Vec<LinkRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkRecord {
    pub id: String,
    pub name: Option<String>,
    pub target_id: String,
    #[serde(rename = "type")]
    pub link_type: String,
    pub hidden: bool,
    pub costs: Vec<CostRecord>,
    pub modifiers: Vec<ModifierRecord>,
    pub constraints: Vec<ConstraintRecord>,
    pub category_links: Vec<CategoryLinkRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceRecord {
    pub id: String,
    pub name: Option<String>,
    pub hidden: bool,
    pub modifiers: Vec<ModifierRecord>,
    pub constraints: Vec<ConstraintRecord>,
    pub category_links: Vec<CategoryLinkRecord>,
    pub force_entries: Vec<ForceRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: String,
    pub name: Option<String>,
    pub modifiers: Vec<ModifierRecord>,
    pub constraints: Vec<ConstraintRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryLinkRecord {
    pub id: String,
    pub name: Option<String>,
    pub target_id: String,
    pub primary: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfoLinkRecord {
    pub id: String,
    pub name: Option<String>,
    pub target_id: String,
    #[serde(rename = "type")]
    pub link_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfoGroupRecord {
    pub id: String,
    pub name: Option<String>,
    pub rules: Vec<RuleRecord>,
    pub profiles: Vec<ProfileRecord>,
    pub info_links: Vec<InfoLinkRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleRecord {
    pub id: String,
    pub name: Option<String>,
    pub description: String,
    pub publication_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileRecord {
    pub id: String,
    pub name: Option<String>,
    pub type_id: String,
    pub type_name: String,
    pub characteristics: Vec<CharacteristicRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacteristicRecord {
    pub name: String,
    pub type_id: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModifierRecord {
    #[serde(rename = "type")]
    pub modifier_type: String,
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstraintRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub constraint_type: String,
    pub field: String,
    pub scope: String,
    pub value: f64,
    pub shared: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CostRecord {
    pub name: String,
    pub type_id: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CostTypeRecord {
    pub id: String,
    pub name: String,
    pub default_cost_limit: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicationRecord {
    pub id: String,
    pub name: Option<String>,
    pub short_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_decodes_with_defaults() {
        let record: GameSystemRecord = serde_json::from_str(
            r#"{"id": "sys-1", "name": "Test System", "revision": 3}"#,
        )
        .unwrap();
        assert_eq!(record.id, "sys-1");
        assert_eq!(record.name.as_deref(), Some("Test System"));
        assert_eq!(record.revision, 3);
        assert!(record.cost_types.is_empty());
        assert!(record.force_entries.is_empty());
    }

    #[test]
    fn test_entry_record_type_field_rename() {
        let record: EntryRecord = serde_json::from_str(
            r#"{"id": "e-1", "name": "Overlord", "type": "unit",
                "costs": [{"name": "pts", "typeId": "ct-pts", "value": 140.0}]}"#,
        )
        .unwrap();
        assert_eq!(record.entry_type, "unit");
        assert_eq!(record.costs[0].value, 140.0);
        assert_eq!(record.costs[0].type_id, "ct-pts");
    }
}
