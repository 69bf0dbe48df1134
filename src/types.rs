use serde::{Deserialize, Serialize};

/// Configuration for roster parsing and schema loading.
#[derive(Debug, Clone)]
pub struct RosterScannerConfig {
    /// Merge structurally identical sibling selections after parsing
    pub merge_duplicate_selections: bool,
    /// Allow the broad partial-name fallback when exact matching fails
    pub allow_partial_matches: bool,
    /// How many similar names to suggest for an unresolvable token
    pub suggestion_limit: usize,
    /// Maximum number of schema documents decoded concurrently
    pub max_threads: usize,
}

impl Default for RosterScannerConfig {
    fn default() -> Self {
        Self {
            merge_duplicate_selections: true,
            allow_partial_matches: true,
            suggestion_limit: 5,
            max_threads: num_cpus::get(),
        }
    }
}

/// Statistics about one roster parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterParseStats {
    /// Number of force lines seen
    pub forces: usize,
    /// Number of selections placed in the tree (sub-entries included)
    pub selections: usize,
    /// Number of category lines seen (informational only)
    pub categories: usize,
    /// Number of tokens skipped because no entry matched
    pub skipped: usize,
    /// The names that resolved to nothing, with suggestions
    pub unresolved: Vec<UnresolvedName>,
}

/// A name that could not be matched to any schema entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedName {
    pub name: String,
    /// Closest entry names by edit distance, best first
    pub suggestions: Vec<String>,
}
