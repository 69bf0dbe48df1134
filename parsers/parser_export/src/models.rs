//! Token model for roster export text.
//!
//! Tokens are short-lived: they carry one classified line (plus the fields
//! its parser extracted) from the reader to the resolver and are discarded
//! once the resolver has consumed them.

/// Classification of one non-blank export line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterTokenKind {
    /// A `++`-prefixed force header line
    Force,
    /// A `+`-prefixed category header line
    Category,
    /// Any unprefixed line describing a selection
    Selection,
    /// The `++ Total:` summary line
    Summary,
    /// Anything after the summary line
    Comment,
}

/// One classified export line, still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterToken {
    pub kind: RosterTokenKind,
    /// The raw line text, untrimmed
    pub raw: String,
}

/// Fields extracted from a force header line.
///
/// Any field the parser could not reach before the line ran out stays
/// unset; a force line is never rejected outright.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForceToken {
    pub name: Option<String>,
    /// The cost word that terminated the name, verbatim (e.g. `-3CP`)
    pub cost: Option<String>,
    /// Parenthesized faction text, brackets removed
    pub faction: Option<String>,
    /// Entries of the trailing `[...]` block, comma-split and trimmed
    pub cost_summary: Vec<String>,
}

/// Fields extracted from a selection line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionToken {
    /// Candidate entry name, trailing bracketed costs removed
    pub name: String,
    /// Entries of a trailing `[...]` block on the name
    pub cost_summary: Vec<String>,
    /// Comma-split text after the selection separator, leading-trimmed
    /// only (trailing spaces are preserved; some upstream entry names
    /// legitimately end with a space)
    pub sub_entries: Vec<String>,
}
