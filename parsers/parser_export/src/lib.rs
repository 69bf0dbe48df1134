//! Parser for the roster export text format.
//!
//! The format is line-oriented and informally specified: `++` opens a
//! force, `+` opens a category, `++ Total:` ends the roster body, and
//! everything else is a selection line whose nesting is written as a
//! repeated `". "` prefix. This crate only classifies lines and extracts
//! per-line fields; resolving names against a game system is the root
//! crate's job.

pub mod force;
pub mod models;
pub mod reader;
pub mod selection;
pub mod words;

pub use force::{is_cost_word, parse_force_token};
pub use models::{ForceToken, RosterToken, RosterTokenKind, SelectionToken};
pub use reader::TokenReader;
pub use selection::{
    parse_selection_token, read_depth_index, strip_bracket_costs, strip_multiplier,
};
pub use words::WordReader;
