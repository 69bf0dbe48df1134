//! Entry resolution: matching a token's name to a schema entry.
//!
//! Resolution is tiered. With a parent context the parent's subtree is
//! searched first (partial match, the parent itself excluded); without
//! one, or when the scoped search misses, the root strategy runs: a fast
//! path over catalogue top-level entry links, then a group-wide exact
//! search, then a group-wide partial search.

use std::collections::HashSet;

use log::{debug, trace};

use crate::schema::{
    EntryLink, GameSystemGroup, LinkKind, NameMatch, NodeRef, SelectionEntry,
    SelectionEntryGroup,
};

/// A resolved entry plus the path that led to it.
///
/// The link matters because cost overrides live on the link, not the
/// entry; the group supplies `entry_group_id` for sibling merging.
#[derive(Debug, Clone, Copy)]
pub struct EntryMatch<'a> {
    pub entry: &'a SelectionEntry,
    pub link: Option<&'a EntryLink>,
    pub group: Option<&'a SelectionEntryGroup>,
}

impl<'a> EntryMatch<'a> {
    fn direct(entry: &'a SelectionEntry) -> Self {
        Self {
            entry,
            link: None,
            group: None,
        }
    }
}

/// Resolves a selection name, preferring the parent scope when one is
/// known. The parent-scoped match wins over any root-level match.
pub fn resolve_selection<'a>(
    group: &'a GameSystemGroup,
    name: &str,
    parent: Option<&EntryMatch<'a>>,
    allow_partial: bool,
) -> Option<EntryMatch<'a>> {
    if let Some(parent) = parent {
        let mut visited = HashSet::new();
        let scoped = search_scope(
            group,
            NodeRef::SelectionEntry(parent.entry),
            name,
            NameMatch::Partial,
            Some(parent.entry.id.as_str()),
            None,
            &mut visited,
        );
        if let Some(found) = scoped {
            trace!("Resolved {:?} inside parent entry {}", name, parent.entry.id);
            return Some(found);
        }
        debug!(
            "Name {:?} not found under parent entry {}, falling back to root search",
            name, parent.entry.id
        );
    }

    resolve_root_entry(group, name, allow_partial)
}

/// Resolves a name with no established parent context.
pub fn resolve_root_entry<'a>(
    group: &'a GameSystemGroup,
    name: &str,
    allow_partial: bool,
) -> Option<EntryMatch<'a>> {
    // Fast path: top-level catalogue entry links point at root entries.
    // Only the link target itself can match here, which keeps same-named
    // nested entries from shadowing a root entry.
    for catalogue in group.catalogues() {
        for link in &catalogue.entry_links {
            if link.kind != LinkKind::Entry {
                continue;
            }
            let Some(NodeRef::SelectionEntry(entry)) = group.resolve_entry_link(link) else {
                continue;
            };
            let display_name = link.name.as_deref().or(entry.name.as_deref());
            if NameMatch::Exact.matches(name, display_name) {
                trace!("Resolved {:?} via top-level link {}", name, link.id);
                return Some(EntryMatch {
                    entry,
                    link: Some(link),
                    group: None,
                });
            }
        }
    }

    if let Some(found) = search_group_wide(group, name, NameMatch::Exact) {
        return Some(found);
    }
    if allow_partial {
        if let Some(found) = search_group_wide(group, name, NameMatch::Partial) {
            return Some(found);
        }
    }

    debug!("Name {:?} did not resolve against any strategy", name);
    None
}

/// Group-wide search for a selection entry, either named directly or
/// reachable through a matching entry link.
fn search_group_wide<'a>(
    group: &'a GameSystemGroup,
    name: &str,
    mode: NameMatch,
) -> Option<EntryMatch<'a>> {
    for node in group.search_all_by_name(name, mode) {
        match node {
            NodeRef::SelectionEntry(entry) => {
                trace!("Resolved {:?} group-wide ({:?})", name, mode);
                return Some(EntryMatch::direct(entry));
            }
            NodeRef::EntryLink(link) => {
                if let Some(NodeRef::SelectionEntry(entry)) = group.resolve_entry_link(link) {
                    trace!("Resolved {:?} via link {} ({:?})", name, link.id, mode);
                    return Some(EntryMatch {
                        entry,
                        link: Some(link),
                        group: None,
                    });
                }
            }
            _ => {}
        }
    }
    None
}

/// Searches one entry's subtree for a matching selection entry,
/// following entry links through the group. `exclude` keeps the scope
/// entry from trivially resolving to itself; `visited` guards against
/// link cycles in malformed data.
fn search_scope<'a>(
    group: &'a GameSystemGroup,
    scope: NodeRef<'a>,
    name: &str,
    mode: NameMatch,
    exclude: Option<&str>,
    enclosing_group: Option<&'a SelectionEntryGroup>,
    visited: &mut HashSet<String>,
) -> Option<EntryMatch<'a>> {
    if !visited.insert(scope.id().to_string()) {
        return None;
    }

    let (entries, groups, links) = match scope {
        NodeRef::SelectionEntry(entry) => (
            &entry.selection_entries,
            &entry.selection_entry_groups,
            &entry.entry_links,
        ),
        NodeRef::SelectionEntryGroup(group_node) => (
            &group_node.selection_entries,
            &group_node.selection_entry_groups,
            &group_node.entry_links,
        ),
        _ => return None,
    };

    for entry in entries {
        if exclude != Some(entry.id.as_str()) && mode.matches(name, entry.name.as_deref()) {
            return Some(EntryMatch {
                entry,
                link: None,
                group: enclosing_group,
            });
        }
    }

    // Group membership is direct only: recursing below a child entry
    // leaves the enclosing group behind
    for entry in entries {
        if let Some(found) = search_scope(
            group,
            NodeRef::SelectionEntry(entry),
            name,
            mode,
            exclude,
            None,
            visited,
        ) {
            return Some(found);
        }
    }

    for group_node in groups {
        if let Some(found) = search_scope(
            group,
            NodeRef::SelectionEntryGroup(group_node),
            name,
            mode,
            exclude,
            Some(group_node),
            visited,
        ) {
            return Some(found);
        }
    }

    for link in links {
        let target = group.resolve_entry_link(link);
        match target {
            Some(NodeRef::SelectionEntry(entry)) => {
                let display_name = link.name.as_deref().or(entry.name.as_deref());
                if exclude != Some(entry.id.as_str()) && mode.matches(name, display_name) {
                    return Some(EntryMatch {
                        entry,
                        link: Some(link),
                        group: enclosing_group,
                    });
                }
                if let Some(found) = search_scope(
                    group,
                    NodeRef::SelectionEntry(entry),
                    name,
                    mode,
                    exclude,
                    None,
                    visited,
                ) {
                    return Some(found);
                }
            }
            Some(NodeRef::SelectionEntryGroup(group_node)) => {
                if let Some(found) = search_scope(
                    group,
                    NodeRef::SelectionEntryGroup(group_node),
                    name,
                    mode,
                    exclude,
                    Some(group_node),
                    visited,
                ) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }

    None
}

/// Finds up to `limit` entry names similar to the given name, closest
/// first. Similar means an edit distance within 25% of the query length.
pub fn suggest_similar(group: &GameSystemGroup, name: &str, limit: usize) -> Vec<String> {
    let threshold = ((name.len() as f64) * 0.25).ceil() as usize;
    let lowered = name.to_lowercase();

    let mut candidates: Vec<(usize, String)> = Vec::new();
    let mut seen = HashSet::new();
    for document in group.documents() {
        for entry in document.get_all::<SelectionEntry>(true) {
            let Some(entry_name) = entry.name.as_deref() else {
                continue;
            };
            if entry_name == name || !seen.insert(entry_name.to_string()) {
                continue;
            }
            let distance = levenshtein_distance(&lowered, &entry_name.to_lowercase());
            if distance <= threshold {
                candidates.push((distance, entry_name.to_string()));
            }
        }
    }

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    candidates.truncate(limit);
    candidates.into_iter().map(|(_, name)| name).collect()
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let m = s1_chars.len();
    let n = s2_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut matrix = vec![vec![0; n + 1]; m + 1];

    for i in 0..=m {
        matrix[i][0] = i;
    }
    for j in 0..=n {
        matrix[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] { 0 } else { 1 };

            matrix[i][j] = std::cmp::min(
                std::cmp::min(
                    matrix[i - 1][j] + 1,    // deletion
                    matrix[i][j - 1] + 1,    // insertion
                ),
                matrix[i - 1][j - 1] + cost, // substitution
            );
        }
    }

    matrix[m][n]
}
